#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

pub fn codex_cmd() -> Command {
    let mut cmd = Command::cargo_bin("codex").unwrap();
    cmd.env_remove("CODEX_HOME");
    cmd.env_remove("CODEX_PORT");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// `codex --home <dir> init`
pub fn init_home(dir: &Path) {
    codex_cmd()
        .arg("--home")
        .arg(dir)
        .arg("init")
        .assert()
        .success();
}
