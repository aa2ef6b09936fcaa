use crate::error::{PlinthError, Result};
use crate::schema::Entity;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Deserialize)]
struct SchemaFile {
    tables: Vec<Entity>,
}

/// Parse a YAML schema document into a list of entities.
///
/// Expected shape:
/// ```yaml
/// tables:
///   - table: users
///     columns:
///       - { name: name, type: text }
///       - { name: age, type: int, default: 0 }
/// ```
///
/// Unlike programmatic construction, parsed schemas are validated:
/// duplicate column names and a user-declared `id` column are rejected.
pub fn parse_entities(yaml: &str) -> Result<Vec<Entity>> {
    let file: SchemaFile = serde_yaml::from_str(yaml)?;
    for entity in &file.tables {
        validate_entity(entity)?;
    }
    Ok(file.tables)
}

fn validate_entity(entity: &Entity) -> Result<()> {
    if entity.table.is_empty() {
        return Err(PlinthError::Schema("Table name must not be empty".into()));
    }

    let mut seen = HashSet::new();
    for column in &entity.columns {
        if column.name.is_empty() {
            return Err(PlinthError::Schema(format!(
                "Table '{}' has a column with an empty name",
                entity.table
            )));
        }
        if column.name.eq_ignore_ascii_case("id") {
            return Err(PlinthError::Schema(format!(
                "Table '{}' declares reserved column 'id' (the primary key is implicit)",
                entity.table
            )));
        }
        if !seen.insert(column.name.as_str()) {
            return Err(PlinthError::Schema(format!(
                "Table '{}' has duplicate column '{}'",
                entity.table, column.name
            )));
        }
    }
    Ok(())
}
