mod error;
mod page;
pub mod recipe;

pub use error::*;
pub use page::*;

/// Lower bound for cooking times and ingredient amounts.
pub const MIN_VALUE: i64 = 1;
/// Upper bound for cooking times and ingredient amounts.
pub const MAX_VALUE: i64 = 32_000;

#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}

impl State {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            read_db: pool.clone(),
            write_db: pool,
        }
    }
}
