pub mod error;
pub mod helper;
pub mod schema;
pub mod sql;

pub use error::{PlinthError, Result};
pub use helper::{DbHelper, Hook, Hooks};
pub use schema::{Column, ColumnType, DefaultValue, Entity};
