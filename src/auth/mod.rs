pub mod authorizor;
pub mod password;
pub mod token;

mod platform;
mod user;

pub use platform::Platform;
pub use token::TokenConfig;
pub use user::User;

use serde::Serialize;

use crate::entities::Account;

/// What `register` and `login` hand back: a bearer credential plus the
/// profile it authenticates.
#[derive(Clone, Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub account: Account,
}
