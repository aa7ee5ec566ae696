pub mod collection;
mod image;
pub mod ingredient;
mod query;
mod root;
pub mod shopping_list;
pub mod tag;

pub use image::MediaStore;
pub use query::*;
pub use root::*;
