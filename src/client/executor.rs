//! The seam between the driver loop and whatever runs the SQL.
//!
//! The database driver is deliberately not part of this crate; anything that
//! can take a statement string — a connection pool, a test recorder, a
//! printer — plugs in here.

use crate::Result;

pub trait Executor {
    /// Runs one assembled statement.
    fn execute(&mut self, sql: &str) -> Result;
}

impl<F: FnMut(&str) -> Result> Executor for F {
    fn execute(&mut self, sql: &str) -> Result {
        self(sql)
    }
}
