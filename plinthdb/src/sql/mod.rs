//! Pure statement builders. No connection, no side effects — every function
//! renders a deterministic SQL string from its inputs.

use crate::schema::Entity;

/// Render a CREATE TABLE IF NOT EXISTS statement for an entity.
///
/// The auto-incrementing `id` primary key is prepended, then each declared
/// column in order as `name TYPE [DEFAULT literal]`. Safe to execute against
/// a store where the table already exists.
pub fn create_table(entity: &Entity) -> String {
    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT",
        entity.table
    );
    for column in &entity.columns {
        sql.push_str(", ");
        sql.push_str(&column.name);
        sql.push(' ');
        sql.push_str(column.column_type.affinity());
        if let Some(default) = &column.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default.to_sql_literal());
        }
    }
    sql.push(')');
    sql
}

/// Render a single-cell SELECT. The where clause carries one `?` placeholder
/// bound at execution time. LIMIT 1 makes the multi-match contract explicit:
/// when the predicate matches several rows, the first row in store iteration
/// order wins.
pub fn scalar_select(table: &str, column: &str, where_clause: &str) -> String {
    format!("SELECT {column} FROM {table} WHERE {where_clause} LIMIT 1")
}

/// Render a DELETE of the row with the minimum primary-key value.
/// A no-op when the table is empty.
pub fn delete_first_row(table: &str) -> String {
    format!("DELETE FROM {table} WHERE id = (SELECT MIN(id) FROM {table})")
}

/// Render a row-count query, backing `is_empty`.
pub fn count_rows(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {table}")
}

/// Render a max-primary-key query, backing `get_last_id`.
/// Yields NULL on an empty table.
pub fn max_id(table: &str) -> String {
    format!("SELECT MAX(id) FROM {table}")
}
