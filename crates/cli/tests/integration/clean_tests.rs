#![cfg(unix)]

use predicates::prelude::*;
use serial_test::serial;

use crate::common::demo_project;

#[test]
#[serial]
fn clean_removes_outputs_but_keeps_listed_files() {
  let env = demo_project();
  env.lb_cmd().arg("build").assert().success();
  env.write_file("build/native/index.html", "<html></html>");

  env
    .lb_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("REMOVED:"))
    .stdout(predicate::str::contains("Removed"));

  assert!(env.path("build/native/index.html").exists());
  assert!(!env.path("build/native/main.o").exists());
  assert!(!env.path("build/native/Demo").exists());
  assert!(!env.path("statics/logo.h").exists());
  assert!(!env.path("sample/sample.zip").exists());
  assert!(env.path("sample/scene.json").exists());
  assert!(env.path("src/main.c").exists());

  env
    .lb_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to clean"));
}
