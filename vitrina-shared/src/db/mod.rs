/// Database layer for Vitrina
///
/// This module provides database connection pooling and migrations.
/// The account and role models live in the `models` module at crate root.

pub mod migrations;
pub mod pool;
