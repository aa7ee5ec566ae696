mod jwt;
mod query;
pub(crate) mod repository;
mod root;
pub mod subscription;

pub use jwt::*;
pub use query::*;
pub use root::*;
