//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Stands in for gcc: writes the file after `-o`, and fails with a
/// diagnostic whenever an argument ends in `broken.c`.
#[cfg(unix)]
const FAKE_COMPILER: &str = r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then
    out="$2"
    shift
  fi
  case "$1" in
    *broken.c)
      echo "broken.c:1:1: error: expected ';'" >&2
      exit 1
      ;;
  esac
  shift
done
if [ -n "$out" ]; then
  echo "fake artifact" > "$out"
fi
exit 0
"#;

/// Isolated project directory.
///
/// Each test gets its own temporary directory holding `littlebuild.toml`,
/// sources and assets.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Canonical project root.
  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  pub fn path(&self, relative: &str) -> PathBuf {
    self.root().join(relative)
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: impl AsRef<[u8]>) {
    let path = self.path(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Install the fake compiler and return its absolute path.
  #[cfg(unix)]
  pub fn fake_compiler(&self) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = self.path("bin/fakecc");
    self.write_file("bin/fakecc", FAKE_COMPILER);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  }

  /// Write a project file whose single target uses `compiler`.
  pub fn write_project(&self, compiler: &Path) {
    let config = format!(
      r#"
[project]
title = "Demo"
version = "1.2.0"

[statics]
output_dir = "statics"
assets_dir = "assets"
archives = [{{ source = "sample", output = "sample/sample.zip" }}]

[targets.native]
compiler = "{}"
flags = ["-O2"]
src_dir = "src"
build_dir = "build/native"
includes = ["statics"]
libs = ["m"]

[[clean]]
dir = "build/native"
keep = ["index.html"]
"#,
      compiler.display()
    );
    self.write_file("littlebuild.toml", config);
  }

  /// Get a Command for the lb binary running inside the project.
  pub fn lb_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("lb");
    cmd.current_dir(self.root());
    cmd.env_remove("LITTLEBUILD_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

/// A project with two sources, one asset and one archive tree.
#[cfg(unix)]
pub fn demo_project() -> TestEnv {
  let env = TestEnv::new();
  let compiler = env.fake_compiler();
  env.write_project(&compiler);
  env.write_file("src/main.c", "int main(void) { return 0; }\n");
  env.write_file("src/util.c", "int util(void) { return 1; }\n");
  env.write_file("assets/logo.png", [0x89u8, 0x50, 0x4e, 0x47]);
  env.write_file("sample/scene.json", "{\"puppets\": []}");
  env
}
