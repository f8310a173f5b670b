//! Runs the `ls8` binary and checks its exit status and output streams.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

const LS8: &str = env!("CARGO_BIN_EXE_ls8");

/// Writes `text` to a scratch file named after the calling test.
fn program_file(name: &str, text: &str) -> PathBuf {
  let path = env::temp_dir().join(format!("ls8-cli-{}-{}", std::process::id(), name));
  fs::write(&path, text).unwrap();
  path
}

fn ls8(args: &[&str], program: &PathBuf) -> Output {
  Command::new(LS8).env_remove("RUST_LOG").args(args).arg(program).output().unwrap()
}

#[test]
fn halt_exits_zero() {
  let program = program_file("halt.asm", "LDI R0, 8\nPRN R0\nHLT\n");
  let output  = ls8(&[], &program);
  assert_eq!(output.status.code(), Some(0));
  assert_eq!(String::from_utf8(output.stdout).unwrap(), "8\n");
}

#[test]
fn asm_flag_reads_assembly_with_any_extension() {
  let program = program_file("flagged.txt", "LDI R0, 3\nPRN R0\nHLT\n");
  let output  = ls8(&["--asm"], &program);
  assert_eq!(output.status.code(), Some(0));
  assert_eq!(String::from_utf8(output.stdout).unwrap(), "3\n");
}

#[test]
fn fault_exits_one() {
  let program = program_file("fault.ls8", "11111111\n");
  let output  = ls8(&[], &program);
  assert_eq!(output.status.code(), Some(1));
  assert!(output.stdout.is_empty());
}

#[test]
fn malformed_image_exits_two() {
  let program = program_file("malformed.ls8", "1010\n");
  let output  = ls8(&[], &program);
  assert_eq!(output.status.code(), Some(2));
  assert!(output.stdout.is_empty());
}

#[test]
fn missing_file_exits_two() {
  let program = env::temp_dir().join("ls8-cli-does-not-exist.ls8");
  assert_eq!(ls8(&[], &program).status.code(), Some(2));
}

#[test]
fn exhausted_cycles_exit_three() {
  // R0 is 0, so `JMP R0` jumps to itself forever.
  let program = program_file("loop.asm", "JMP R0\n");
  let output  = ls8(&["--max-cycles", "10"], &program);
  assert_eq!(output.status.code(), Some(3));
  assert!(output.stdout.is_empty());
}

#[test]
fn trace_goes_to_stderr() {
  let program = program_file("trace.asm", "LDI R0, 8\nPRN R0\nHLT\n");
  let output  = ls8(&["--trace"], &program);
  assert_eq!(output.status.code(), Some(0));
  assert_eq!(String::from_utf8(output.stdout).unwrap(), "8\n");

  let stderr = String::from_utf8(output.stderr).unwrap();
  assert!(stderr.starts_with("TRACE: 00 |"), "{}", stderr);
  assert_eq!(stderr.lines().filter(|line| line.starts_with("TRACE: ")).count(), 3);
}

#[test]
fn dump_prints_machine_state() {
  let program = program_file("dump.asm", "LDI R0, 8\nHLT\n");
  let output  = ls8(&["--dump"], &program);
  assert_eq!(output.status.code(), Some(0));

  let stderr = String::from_utf8(output.stderr).unwrap();
  assert!(stderr.contains("Status: Halted"), "{}", stderr);
  assert!(stderr.contains("PC ="), "{}", stderr);
}

#[test]
fn disassemble_lists_without_running() {
  let program = program_file("listing.ls8", "10000010\n00000000\n00001000\n00000001\n");
  let output  = ls8(&["--disassemble"], &program);
  assert_eq!(output.status.code(), Some(0));
  assert_eq!(String::from_utf8(output.stdout).unwrap(), "00: LDI R0, 8\n03: HLT\n");
}

#[cfg(target_os = "linux")]
#[test]
fn unwritable_output_is_a_fault() {
  // `PRA` output is only written out by the final flush, which fails on /dev/full.
  let program = program_file("full.asm", "LDI R0, 65\nPRA R0\nHLT\n");
  let stdout  = fs::OpenOptions::new().write(true).open("/dev/full").unwrap();
  let status  = Command::new(LS8).arg(&program).stdout(stdout).status().unwrap();
  assert_eq!(status.code(), Some(1));
}
