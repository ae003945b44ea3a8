pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::app::PlannedCall;
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::http::{HttpSettings, HttpTransport};
pub use crate::config::toml_config::ProfileConfig;
pub use crate::core::runner::ApiCallRunner;
pub use crate::domain::model::{Credential, EnvCredential, Outcome, RequestDescriptor};
pub use crate::utils::error::{Result, RunnerError};
