//! # Vitrina API Server Library
//!
//! HTTP surface of the vitrina admin backend: authentication, account
//! provisioning and account administration endpoints.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and the authorization gate
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
