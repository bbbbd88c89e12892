//! Compiler and linker invocation.
//!
//! Both steps are "skip if fresh, otherwise run the external tool". Compilation
//! keeps going past failing sources and reports them together; linking stops
//! at the first failure.

mod compile;
mod link;
pub mod runner;
pub mod types;

pub use compile::{compile, compile_args, macro_defines, object_path};
pub use link::{link, link_args};
pub use runner::{ProcessOutput, ProcessRunner, SystemRunner};
pub use types::{CompileFailure, CompileRequest, FailureList, LinkOutcome, LinkRequest, ToolchainError};
