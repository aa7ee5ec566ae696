use serde::Serialize;
use sqlx::prelude::FromRow;

/// Short recipe representation returned by collection toggles and
/// subscription listings.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Summary {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}
