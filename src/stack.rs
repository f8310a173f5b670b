//! The stack lives in RAM below `STACK_START` and grows downward. `sp` points at the last
//! value pushed, or one past the last value popped.

use std::convert::TryFrom;

use crate::address::{Address, MEMORY_SIZE};
use crate::bytecode::{Operation, Word};
use crate::error::{Error, Result};
use crate::state::State;

impl State {

  pub fn push_value(&mut self, value: Word) -> Result<()> {
    if self.sp == 0 {
      return Err(Error::StackOverflow(self.sp));
    }
    self.write(self.sp - 1, value)?;
    self.sp -= 1;
    Ok(())
  }

  pub fn pop_value(&mut self) -> Result<Word> {
    if self.sp >= MEMORY_SIZE {
      return Err(Error::StackUnderflow(self.sp));
    }
    let value = self.read(self.sp)?;
    self.sp += 1;
    Ok(value)
  }

  /// `PUSH`: copies a register onto the stack.
  pub fn push(&mut self, reg: Word) -> Result<()> {
    let value = self.get_register(reg as usize)?;
    self.push_value(value)
  }

  /// `POP`: moves the top of the stack into a register.
  pub fn pop(&mut self, reg: Word) -> Result<()> {
    // Check the register before the stack moves.
    self.get_register(reg as usize)?;
    let value = self.pop_value()?;
    self.set_register(reg as usize, value)
  }

  /// `CALL`: pushes the address of the instruction after the call and jumps to the address
  /// held in `reg`.
  pub fn call(&mut self, reg: Word) -> Result<()> {
    let target         = self.get_register(reg as usize)?;
    let return_address = self.pc + Operation::Call.word().size();
    let return_word    = Word::try_from(return_address).map_err(
      |_| Error::InvalidOperand(Address::Memory(return_address))
    )?;

    self.push_value(return_word)?;
    self.pc = target as usize;
    Ok(())
  }

  /// `RET`: pops the return address into `pc`.
  pub fn ret(&mut self) -> Result<()> {
    self.pc = self.pop_value()? as usize;
    Ok(())
  }

}
