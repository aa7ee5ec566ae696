use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use foodgram_shared::Error;
use serde::Deserialize;
use validator::Validate;

use crate::repository::{self, FindType};

#[derive(Debug, Deserialize, Validate)]
pub struct SetPasswordInput {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, max = 150))]
    pub new_password: String,
}

impl super::Command {
    pub async fn set_password(
        &self,
        id: i64,
        input: SetPasswordInput,
    ) -> foodgram_shared::Result<()> {
        input.validate()?;

        let Some(user) = repository::find(&self.read_db, FindType::Id(id)).await? else {
            foodgram_shared::not_found!("User {id} not found.");
        };

        let parsed_hash = PasswordHash::new(&user.password)?;
        let argon2 = Argon2::default();

        if argon2
            .verify_password(input.current_password.as_bytes(), &parsed_hash)
            .is_err()
        {
            return Err(Error::field("current_password", "Invalid current password."));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password = argon2
            .hash_password(input.new_password.as_bytes(), &salt)?
            .to_string();

        repository::update_password(&self.write_db, id, password).await
    }
}
