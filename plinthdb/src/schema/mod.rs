pub mod parser;
pub mod types;

pub use parser::parse_entities;
pub use types::{Column, ColumnType, DefaultValue, Entity};
