//! Error conditions. Every `Error` is fatal to the program run in which it occurs; loading
//! failures are reported separately as `LoadError`s, before a CPU ever runs.

use std::io;

use thiserror::Error;

use crate::address::{Address, AddressNumberType};
use crate::bytecode::{Operation, Word};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  /// The opcode byte names no operation, or names one outside the class it was routed to.
  #[error("unsupported operation {0:#010b}")]
  UnsupportedOperation(Word),
  /// A register index or memory address outside the machine.
  #[error("invalid operand: {0} does not exist")]
  InvalidOperand(Address),
  #[error("division by zero")]
  DivisionByZero,
  /// A push would move `sp` below address 0.
  #[error("stack overflow: cannot push with sp = {0:#04X}")]
  StackOverflow(AddressNumberType),
  /// A pop would read past the top of memory.
  #[error("stack underflow: cannot pop with sp = {0:#05X}")]
  StackUnderflow(AddressNumberType),
  /// The output sink for `PRN`/`PRA` failed.
  #[error("output error: {0}")]
  Output(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum LoadError {
  #[error("cannot read program: {0}")]
  Io(#[from] io::Error),
  #[error("line {line}: cannot parse `{text}`")]
  Syntax { line: usize, text: String },
  #[error("line {line}: {name} is not an operation")]
  UnknownMnemonic { line: usize, name: String },
  #[error("line {line}: {operation} requires {expected} operands but was given {found}")]
  WrongArity { line: usize, operation: Operation, expected: usize, found: usize },
  #[error("line {line}: expected a register, found `{text}`")]
  ExpectedRegister { line: usize, text: String },
  #[error("line {line}: expected an immediate value, found `{text}`")]
  ExpectedImmediate { line: usize, text: String },
  #[error("line {line}: operand `{text}` is out of range")]
  OperandOutOfRange { line: usize, text: String },
  #[error("program is {size} bytes, which does not fit in memory")]
  ProgramTooLarge { size: usize },
}
