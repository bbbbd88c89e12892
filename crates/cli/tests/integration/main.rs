//! End-to-end tests driving `lb` against a fake compiler script.

mod common;

mod build_tests;
mod clean_tests;
mod statics_tests;
