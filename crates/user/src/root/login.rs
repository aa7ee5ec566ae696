use argon2::{Argon2, PasswordHash, PasswordVerifier};
use foodgram_shared::Error;
use serde::Deserialize;
use validator::Validate;

use crate::repository::{self, FindType};

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl super::Command {
    /// Checks credentials and returns the id of the authenticated user.
    pub async fn login(&self, input: LoginInput) -> foodgram_shared::Result<i64> {
        input.validate()?;

        let Some(user) = repository::find(&self.read_db, FindType::Email(input.email)).await?
        else {
            return Err(Error::field("non_field_errors", INVALID_CREDENTIALS));
        };

        let parsed_hash = PasswordHash::new(&user.password)?;

        if Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            return Err(Error::field("non_field_errors", INVALID_CREDENTIALS));
        }

        Ok(user.id)
    }
}
