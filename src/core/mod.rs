pub mod report;
pub mod runner;

pub use crate::domain::model::{Credential, EnvCredential, RawResponse, RequestDescriptor};
pub use crate::domain::ports::{ApiCall, Transport};
pub use crate::utils::error::Result;
