//! Configuration management for Libros

use std::env;
use std::path::Path;

use crate::error::{Error, Result};
use crate::opds::Namespaces;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log: LogConfig,
    pub opds: OpdsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directives
    pub filter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpdsConfig {
    /// Prefix/URI pairs added to the default namespace table
    pub extra_namespaces: Vec<(String, String)>,
}

const DEFAULT_FILTER: &str = "libros_core=info";

impl Default for Config {
    fn default() -> Self {
        Config {
            log: LogConfig {
                filter: DEFAULT_FILTER.to_string(),
            },
            opds: OpdsConfig::default(),
        }
    }
}

impl Config {
    /// Load `.env` (if any) and read the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load a specific env file, then read the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::from_path(path.as_ref())
            .map_err(|e| Error::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        Ok(Config {
            log: LogConfig {
                filter: env::var("LIBROS_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string()),
            },
            opds: OpdsConfig {
                extra_namespaces: match env::var("LIBROS_OPDS_NAMESPACES") {
                    Ok(raw) => parse_namespace_list(&raw)?,
                    Err(_) => Vec::new(),
                },
            },
        })
    }
}

impl OpdsConfig {
    /// Default namespace table plus configured extras
    pub fn namespaces(&self) -> Namespaces {
        self.extra_namespaces
            .iter()
            .fold(Namespaces::default(), |table, (prefix, uri)| {
                table.with(prefix.as_str(), uri.as_str())
            })
    }
}

/// Parse `prefix=uri;prefix=uri`
fn parse_namespace_list(raw: &str) -> Result<Vec<(String, String)>> {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (prefix, uri) = part
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("expected prefix=uri, got {part:?}")))?;
            let (prefix, uri) = (prefix.trim(), uri.trim());
            if prefix.is_empty() || uri.is_empty() {
                return Err(Error::Config(format!("empty prefix or uri in {part:?}")));
            }
            Ok((prefix.to_string(), uri.to_string()))
        })
        .collect()
}
