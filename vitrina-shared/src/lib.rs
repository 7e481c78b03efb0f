//! # Vitrina Shared Library
//!
//! This crate contains the identity and access-control core shared by the
//! Vitrina admin backend services.
//!
//! ## Module Organization
//!
//! - `auth`: password custody, token codec, auth gateway, authorization gate
//! - `models`: account/role directories and their Postgres implementations
//! - `mail`: outbound mail dispatcher contract and SMTP implementation
//! - `db`: PostgreSQL connection pool and migrations

pub mod auth;
pub mod db;
pub mod mail;
pub mod models;

/// Current version of the Vitrina shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
