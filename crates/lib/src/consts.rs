//! Crate-wide constants.

pub const APP_NAME: &str = "littlebuild";

/// Project file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "littlebuild.toml";

/// Environment variable that overrides the project file location.
pub const CONFIG_ENV_VAR: &str = "LITTLEBUILD_CONFIG";

/// Extensions accepted as compilable sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx"];

pub const OBJECT_EXTENSION: &str = "o";

pub const HEADER_EXTENSION: &str = "h";

/// Bumped whenever the generated header layout changes, forcing regeneration.
pub const HEADER_GENERATOR_VERSION: u32 = 1;

/// Byte values per line in generated headers (matches `xxd -i`).
pub const HEADER_COLUMNS: usize = 12;
