pub mod cli;
pub mod config;
pub mod constants;
pub mod helper;
pub mod invoke;
pub mod locate;

pub use anyhow::Result;
pub use helper::DotnetHelper;
pub use invoke::{Invocation, InvocationOutcome};
