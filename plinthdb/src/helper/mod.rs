//! The lifecycle coordinator. Owns the SQLite connection, materializes
//! tables from the registered entities on first open, fires the upgrade hook
//! on a version bump, and serializes every operation behind one mutex.
//!
//! Typed accessors are fail-silent: any failure is logged with the caller's
//! description and converted to the type's zero value. The fallible core
//! lives in `query_scalar` and the per-operation closures; the silencing
//! boundary is `read_db`.

use crate::error::Result;
use crate::schema::Entity;
use crate::sql;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A zero-argument lifecycle callback, invoked under the coordinator's lock.
pub type Hook = Box<dyn Fn() + Send + Sync>;

/// Caller-supplied lifecycle callbacks. Each fires at most once per event.
#[derive(Default)]
pub struct Hooks {
    pub on_create_start: Option<Hook>,
    pub on_create_finish: Option<Hook>,
    pub on_upgrade: Option<Hook>,
}

impl Hooks {
    pub fn on_create_start(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_create_start = Some(Box::new(hook));
        self
    }

    pub fn on_create_finish(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_create_finish = Some(Box::new(hook));
        self
    }

    pub fn on_upgrade(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_upgrade = Some(Box::new(hook));
        self
    }
}

/// The main entry point. Holds the database path (or `:memory:`), the
/// requested schema version, the registered entities, and the lazily-opened
/// connection.
pub struct DbHelper {
    name: String,
    version: i32,
    entities: Vec<Entity>,
    hooks: Hooks,
    conn: Mutex<Option<Connection>>,
}

impl DbHelper {
    /// Create a helper with no lifecycle hooks. The database is not opened
    /// until the first read or write.
    pub fn new(name: impl Into<String>, version: i32, entities: Vec<Entity>) -> Self {
        Self::with_hooks(name, version, entities, Hooks::default())
    }

    /// Create a helper with lifecycle hooks.
    pub fn with_hooks(
        name: impl Into<String>,
        version: i32,
        entities: Vec<Entity>,
        hooks: Hooks,
    ) -> Self {
        DbHelper {
            name: name.into(),
            version,
            entities,
            hooks,
            conn: Mutex::new(None),
        }
    }

    // ── Lock + lifecycle ─────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open the connection on first use and run the create/upgrade
    /// lifecycle. Must be called with the lock held.
    fn ensure_open<'a>(&self, slot: &'a mut Option<Connection>) -> Result<&'a Connection> {
        match slot {
            Some(conn) => Ok(conn),
            None => {
                let conn = Connection::open(&self.name)?;
                self.run_lifecycle(&conn)?;
                Ok(slot.insert(conn))
            }
        }
    }

    /// Decide between create, upgrade, and no-op from the stored
    /// `user_version`. 0 means a fresh database; a stored version at or
    /// above the requested one (including downgrade requests) is ignored.
    fn run_lifecycle(&self, conn: &Connection) -> Result<()> {
        let stored: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if stored == 0 {
            log::debug!("'{}': creating schema at version {}", self.name, self.version);
            self.run_create(conn);
            conn.pragma_update(None, "user_version", self.version)?;
        } else if stored < self.version {
            log::debug!("'{}': upgrading {} -> {}", self.name, stored, self.version);
            if let Some(hook) = &self.hooks.on_upgrade {
                hook();
            }
            conn.pragma_update(None, "user_version", self.version)?;
        }
        Ok(())
    }

    /// Materialize every registered entity, best-effort. On a failing
    /// entity the error is logged and the remaining entities and the
    /// finish hook are skipped; already-created tables stay.
    fn run_create(&self, conn: &Connection) {
        if let Some(hook) = &self.hooks.on_create_start {
            hook();
        }
        for entity in &self.entities {
            if let Err(e) = conn.execute_batch(&sql::create_table(entity)) {
                log::error!("Failed to create table '{}': {e}", entity.table);
                return;
            }
        }
        if let Some(hook) = &self.hooks.on_create_finish {
            hook();
        }
    }

    // ── Fail-silent boundary ─────────────────────────────────────────

    /// Run `action` against the open connection under the lock, returning
    /// `default` on any failure after logging it with `log_txt`.
    fn read_db<T>(
        &self,
        log_txt: &str,
        default: T,
        action: impl FnOnce(&Connection) -> Result<T>,
    ) -> T {
        let mut slot = self.lock();
        match self.ensure_open(&mut slot).and_then(action) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Error: {log_txt}  {e}");
                default
            }
        }
    }

    /// Run a write action under the lock. Failures are logged with
    /// `log_txt` and swallowed; the caller observes nothing.
    pub fn write_db(&self, log_txt: &str, action: impl FnOnce(&Connection) -> Result<()>) {
        self.read_db(log_txt, (), action);
    }

    // ── Typed accessors ──────────────────────────────────────────────

    /// Integer cell located by table/column/predicate. 0 when no row
    /// matches or on failure.
    pub fn get_int(&self, table: &str, column: &str, where_clause: &str, where_arg: &str) -> i32 {
        self.read_db("get_int()", 0, |conn| {
            Ok(query_scalar::<i32>(conn, table, column, where_clause, where_arg)?.unwrap_or(0))
        })
    }

    /// String cell. Empty string when no row matches or on failure.
    pub fn get_string(
        &self,
        table: &str,
        column: &str,
        where_clause: &str,
        where_arg: &str,
    ) -> String {
        self.read_db("get_string()", String::new(), |conn| {
            Ok(query_scalar::<String>(conn, table, column, where_clause, where_arg)?
                .unwrap_or_default())
        })
    }

    /// Boolean cell, stored as an integer: false iff 0. False when no row
    /// matches or on failure.
    pub fn get_bool(&self, table: &str, column: &str, where_clause: &str, where_arg: &str) -> bool {
        self.read_db("get_bool()", false, |conn| {
            Ok(query_scalar::<i64>(conn, table, column, where_clause, where_arg)?
                .map(|n| n != 0)
                .unwrap_or(false))
        })
    }

    /// Long-integer cell. 0 when no row matches or on failure.
    pub fn get_long(&self, table: &str, column: &str, where_clause: &str, where_arg: &str) -> i64 {
        self.read_db("get_long()", 0, |conn| {
            Ok(query_scalar::<i64>(conn, table, column, where_clause, where_arg)?.unwrap_or(0))
        })
    }

    /// True iff the table contains zero rows. False on failure.
    pub fn is_empty(&self, table: &str) -> bool {
        self.read_db("is_empty()", false, |conn| {
            let count: i64 = conn.query_row(&sql::count_rows(table), [], |row| row.get(0))?;
            Ok(count == 0)
        })
    }

    /// The maximum primary-key value in the table, or 0 when the table is
    /// empty or on failure.
    pub fn get_last_id(&self, table: &str) -> i64 {
        self.read_db("get_last_id()", 0, |conn| {
            let max: Option<i64> = conn.query_row(&sql::max_id(table), [], |row| row.get(0))?;
            Ok(max.unwrap_or(0))
        })
    }

    /// Delete the row with the smallest primary-key value. A no-op on an
    /// empty table; failures are logged, not surfaced.
    pub fn delete_first_row(&self, table: &str) {
        self.write_db("delete_first_row()", |conn| {
            conn.execute(&sql::delete_first_row(table), [])?;
            Ok(())
        });
    }
}

/// Execute a scalar select and read the first row's single column, or None
/// when no row matches the predicate.
fn query_scalar<T: rusqlite::types::FromSql>(
    conn: &Connection,
    table: &str,
    column: &str,
    where_clause: &str,
    where_arg: &str,
) -> Result<Option<T>> {
    let stmt = sql::scalar_select(table, column, where_clause);
    let value = conn
        .query_row(&stmt, params![where_arg], |row| row.get(0))
        .optional()?;
    Ok(value)
}
