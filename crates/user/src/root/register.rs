use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use foodgram_shared::{Error, is_unique_violation};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use validator::Validate;

use crate::{
    UserView,
    repository::{self, FindType, NewUser},
};

static RE_USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 150), regex(path = *RE_USERNAME, message = "Only letters, digits and @/./+/-/_ are allowed."))]
    pub username: String,
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    #[validate(length(min = 8, max = 150))]
    pub password: String,
}

impl super::Command {
    pub async fn register(&self, input: RegisterInput) -> foodgram_shared::Result<UserView> {
        input.validate()?;

        if repository::find(&self.read_db, FindType::Email(input.email.to_owned()))
            .await?
            .is_some()
        {
            foodgram_shared::duplicate!("A user with that email already exists.");
        }

        if repository::find(&self.read_db, FindType::Username(input.username.to_owned()))
            .await?
            .is_some()
        {
            foodgram_shared::duplicate!("A user with that username already exists.");
        }

        let salt = SaltString::generate(&mut OsRng);
        let password = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)?
            .to_string();

        let view = UserView {
            email: input.email.to_owned(),
            id: 0,
            username: input.username.to_owned(),
            first_name: input.first_name.to_owned(),
            last_name: input.last_name.to_owned(),
            is_subscribed: false,
        };

        let id = repository::create(
            &self.write_db,
            NewUser {
                email: input.email,
                username: input.username,
                first_name: input.first_name,
                last_name: input.last_name,
                password,
            },
        )
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                Error::Duplicate("A user with that email or username already exists.".to_owned())
            } else {
                err.into()
            }
        })?;

        tracing::info!(user_id = id, "user registered");

        Ok(UserView { id, ..view })
    }
}
