/*!
  An emulator for the LS-8, an 8 bit virtual CPU with 256 bytes of RAM, eight general purpose
  registers, a program counter, a stack pointer, and a flags register.

  ```
  use ls8::{bytecode, Cpu, Status};

  let image = bytecode::assemble("LDI R0, 8\nLDI R1, 9\nMUL R0, R1\nPRN R0\nHLT").unwrap();
  let mut cpu = Cpu::new(Vec::new());
  cpu.load(&image).unwrap();

  assert!(matches!(cpu.run(), Status::Halted));
  assert_eq!(cpu.output().as_slice(), b"72\n");
  ```
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod address;
pub mod bytecode;
pub mod cpu;
pub mod error;
pub mod flags;
pub mod state;
mod alu;
mod stack;

pub use cpu::{Cpu, Status};
pub use error::{Error, LoadError, Result};
pub use state::State;
