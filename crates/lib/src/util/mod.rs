//! Test helpers for timestamps and fake toolchains.

pub mod testutil;
