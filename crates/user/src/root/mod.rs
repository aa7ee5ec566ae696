use std::ops::Deref;

use foodgram_shared::State;

mod login;
mod register;
mod set_password;

pub use login::LoginInput;
pub use register::RegisterInput;
pub use set_password::SetPasswordInput;

#[derive(Clone)]
pub struct Command {
    state: State,
    pub subscription: crate::subscription::Command,
}

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: State) -> Self {
        Self {
            subscription: crate::subscription::Command(state.clone()),
            state,
        }
    }
}
