use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn prints_version() {
    let mut cmd = Command::cargo_bin("chp8").unwrap();
    cmd.arg("--version").assert().success();
}

#[test]
fn requires_a_rom_operand() {
    let mut cmd = Command::cargo_bin("chp8").unwrap();
    cmd.assert().failure();
}

#[test]
fn rejects_a_missing_rom_file() {
    let mut cmd = Command::cargo_bin("chp8").unwrap();
    cmd.args(["no-such-rom.ch8", "--steps", "1"]).assert().failure();
}

#[test]
fn headless_run_dumps_machine_state() {
    // LD V0,0x05; ADD V0,0x03; JP 0x200
    let rom_path = std::env::temp_dir().join("chp8-cli-add-loop.ch8");
    std::fs::write(&rom_path, [0x60, 0x05, 0x70, 0x03, 0x12, 0x00]).unwrap();

    let mut cmd = Command::cargo_bin("chp8").unwrap();
    let output = cmd.arg(&rom_path).args(["--steps", "3"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PC 0x0200"));
    assert!(stdout.contains("V0 0x08"));

    let _ = std::fs::remove_file(&rom_path);
}

#[test]
fn headless_run_surfaces_faults() {
    let rom_path = std::env::temp_dir().join("chp8-cli-bad-op.ch8");
    std::fs::write(&rom_path, [0xFF, 0xFF]).unwrap();

    let mut cmd = Command::cargo_bin("chp8").unwrap();
    let output = cmd.arg(&rom_path).args(["--steps", "1"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported opcode"));

    let _ = std::fs::remove_file(&rom_path);
}
