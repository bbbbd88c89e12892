#![cfg(unix)]

use std::io::Read;

use predicates::prelude::*;
use serial_test::serial;

use crate::common::demo_project;

#[test]
#[serial]
fn statics_archives_and_embeds() {
  let env = demo_project();

  env
    .lb_cmd()
    .arg("statics")
    .assert()
    .success()
    .stdout(predicate::str::is_match(r"Archives written:\s+1\n").unwrap())
    .stdout(predicate::str::is_match(r"Headers generated:\s+2\n").unwrap());

  let file = std::fs::File::open(env.path("sample/sample.zip")).unwrap();
  let mut archive = zip::ZipArchive::new(file).unwrap();
  let mut scene = String::new();
  archive.by_name("scene.json").unwrap().read_to_string(&mut scene).unwrap();
  assert_eq!(scene, "{\"puppets\": []}");

  let header = std::fs::read_to_string(env.path("statics/sample.h")).unwrap();
  assert!(header.starts_with("/* generated by littlebuild header v"));
  assert!(header.contains("unsigned char sample_zip[] = {"));
}

#[test]
#[serial]
fn statics_second_run_is_fresh() {
  let env = demo_project();
  env.lb_cmd().arg("statics").assert().success();

  env
    .lb_cmd()
    .arg("statics")
    .assert()
    .success()
    .stdout(predicate::str::is_match(r"Archives written:\s+0\n").unwrap())
    .stdout(predicate::str::is_match(r"Headers up to date:\s+2\n").unwrap())
    .stdout(predicate::str::contains("GENERATED:").not());
}

#[test]
#[serial]
fn missing_asset_is_skipped_not_fatal() {
  let env = demo_project();
  let config = std::fs::read_to_string(env.path("littlebuild.toml")).unwrap();
  let config = config.replace("assets_dir = \"assets\"", "assets_dir = \"assets\"\nfiles = [\"extra/gone.png\"]");
  env.write_file("littlebuild.toml", config);

  env
    .lb_cmd()
    .arg("statics")
    .assert()
    .success()
    .stderr(predicate::str::contains("SKIPPED:"))
    .stderr(predicate::str::contains("1 asset(s) missing"));
}
