pub mod config;
pub mod error;

pub use config::{Config, ConfigFormat, ConfigLayer};
pub use error::ConfigError;
