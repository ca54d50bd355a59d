//! Libros core library
//!
//! Location and catalog plumbing for the Libros reader.
//!
//! # Modules
//!
//! - `cfi`: EPUB Canonical Fragment Identifiers (parse, serialize, compare, ranges)
//! - `opds`: Schema-driven mapping of OPDS/Atom catalog feeds
//! - `config`: Environment-based configuration
//! - `telemetry`: Tracing subscriber setup

pub mod cfi;
pub mod config;
pub mod error;
pub mod opds;
pub mod telemetry;

pub use config::Config;
pub use error::{Error, Result};
