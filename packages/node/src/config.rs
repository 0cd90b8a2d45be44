//! Server configuration, populated from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use ldr::mapping::DEFAULT_MAX_MAPPING_DEPTH;
use ldr::DEFAULT_DEPTH;

/// Default TCP port when neither `LDR_BIND` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not valid: {value:?} ({message})")]
    Invalid {
        var: &'static str,
        value: String,
        message: String,
    },
}

/// Runtime configuration for the resolver service.
///
/// All fields are populated from environment variables with sensible
/// defaults, so the server can be started with zero configuration.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `LDR_BIND` | `0.0.0.0:$PORT` | TCP socket address to listen on |
/// | `PORT` | `3000` | Port used when `LDR_BIND` is absent |
/// | `MAPPINGS_FILE` | (absent) | Mapping file loaded at startup |
/// | `LDR_MAX_MAPPING_DEPTH` | `10` | Cap on chained mapping passes |
/// | `LDR_DEFAULT_DEPTH` | `2` | Depth used when a request omits `depth` |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    /// Mapping file to load at startup. A failure to load it is logged and
    /// the server starts with an empty table.
    pub mappings_file: Option<PathBuf>,

    pub max_mapping_depth: usize,

    pub default_depth: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            mappings_file: None,
            max_mapping_depth: DEFAULT_MAX_MAPPING_DEPTH,
            default_depth: DEFAULT_DEPTH,
        }
    }
}

impl ServerConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = match lookup("LDR_BIND") {
            Some(bind) => parse("LDR_BIND", bind)?,
            None => {
                let port = match lookup("PORT") {
                    Some(port) => parse("PORT", port)?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let max_mapping_depth = match lookup("LDR_MAX_MAPPING_DEPTH") {
            Some(v) => parse("LDR_MAX_MAPPING_DEPTH", v)?,
            None => defaults.max_mapping_depth,
        };

        let default_depth = match lookup("LDR_DEFAULT_DEPTH") {
            Some(v) => parse("LDR_DEFAULT_DEPTH", v)?,
            None => defaults.default_depth,
        };

        Ok(Self {
            bind_addr,
            mappings_file: lookup("MAPPINGS_FILE")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            max_mapping_depth,
            default_depth,
        })
    }
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        message: e.to_string(),
        value,
    })
}
