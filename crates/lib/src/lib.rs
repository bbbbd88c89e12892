//! littlebuild-lib: incremental build helpers for C/C++ projects
//!
//! This crate provides the pieces a small native/WebAssembly build needs:
//! - `stale`: timestamp-based freshness checks
//! - `toolchain`: compiler and linker invocation with skip-if-fresh
//! - `header`: binary assets embedded as C byte-array headers
//! - `archive`: reproducible zip archives of asset directories
//! - `pipeline`: a project file driven statics/compile/link/clean sequence

pub mod archive;
pub mod config;
pub mod consts;
pub mod error;
pub mod fsutil;
pub mod header;
pub mod pipeline;
pub mod reporter;
pub mod stale;
pub mod toolchain;

#[cfg(test)]
mod util;

pub use error::{Error, Result};
