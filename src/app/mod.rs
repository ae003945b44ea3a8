pub mod commands;

pub use commands::{CallKind, PlannedCall};
