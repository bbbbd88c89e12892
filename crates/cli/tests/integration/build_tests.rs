#![cfg(unix)]

use predicates::prelude::*;
use serial_test::serial;

use crate::common::demo_project;

fn count(haystack: &[u8], needle: &str) -> usize {
  String::from_utf8_lossy(haystack).matches(needle).count()
}

#[test]
#[serial]
fn build_compiles_links_then_is_a_no_op() {
  let env = demo_project();

  let first = env.lb_cmd().arg("build").output().unwrap();
  assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
  // Two compiles and one link.
  assert_eq!(count(&first.stdout, "COMMAND:"), 3);
  assert!(env.path("build/native/main.o").exists());
  assert!(env.path("build/native/util.o").exists());
  assert!(env.path("build/native/Demo").exists());
  assert!(env.path("statics/logo.h").exists());
  assert!(env.path("statics/sample.h").exists());

  let second = env.lb_cmd().arg("build").output().unwrap();
  assert!(second.status.success());
  assert_eq!(count(&second.stdout, "COMMAND:"), 0);
  assert!(count(&second.stdout, "-> nothing to do!") >= 3);
}

#[test]
#[serial]
fn build_passes_project_macros() {
  let env = demo_project();

  env
    .lb_cmd()
    .args(["build", "--no-statics"])
    .assert()
    .success()
    .stdout(predicate::str::contains("-DPROJECT_TITLE=\"Demo\""))
    .stdout(predicate::str::contains("-DPROJECT_VERSION=120"))
    .stdout(predicate::str::contains("-lm"));

  assert!(!env.path("statics").exists());
}

#[test]
#[serial]
fn compile_failure_reports_every_broken_source() {
  let env = demo_project();
  env.write_file("src/broken.c", "int x\n");

  env
    .lb_cmd()
    .arg("build")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("FAILED:"))
    .stderr(predicate::str::contains("expected ';'"))
    .stderr(predicate::str::contains("failed to compile"));

  assert!(env.path("build/native/main.o").exists());
  assert!(env.path("build/native/util.o").exists());
  assert!(!env.path("build/native/broken.o").exists());
  assert!(!env.path("build/native/Demo").exists());
}

#[test]
#[serial]
fn touched_source_recompiles_only_itself() {
  let env = demo_project();
  env.lb_cmd().arg("build").assert().success();

  std::thread::sleep(std::time::Duration::from_millis(20));
  let util = std::fs::File::options().write(true).open(env.path("src/util.c")).unwrap();
  util
    .set_modified(std::time::SystemTime::now() + std::time::Duration::from_secs(5))
    .unwrap();

  let output = env.lb_cmd().args(["build", "--no-statics"]).output().unwrap();
  assert!(output.status.success());
  // util.c recompiled and the target relinked.
  assert_eq!(count(&output.stdout, "COMMAND:"), 2);
  assert!(String::from_utf8_lossy(&output.stdout).contains("main.o -> nothing to do!"));
}

#[test]
#[serial]
fn build_json_output() {
  let env = demo_project();

  let output = env.lb_cmd().args(["--output", "json", "build"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["build"]["target"], "native");
  assert_eq!(json["build"]["state"], "Linked");
  assert_eq!(json["build"]["objects"].as_array().unwrap().len(), 2);
  assert_eq!(json["statics"]["archives"][0]["status"], "written");
}
