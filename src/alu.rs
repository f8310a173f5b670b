/*!
  The arithmetic/logic unit. Operands are register indices; results are written back to the
  first register. Arithmetic wraps modulo 256. The ALU never moves the program counter.
*/

use crate::bytecode::{Operation, Word};
use crate::error::{Error, Result};
use crate::flags::Flags;
use crate::state::State;

impl State {

  /// Executes `operation` on registers `reg_a` and, for two operand operations, `reg_b`.
  pub fn alu(&mut self, operation: Operation, reg_a: Word, reg_b: Word) -> Result<()> {
    if !operation.is_alu() {
      return Err(Error::UnsupportedOperation(operation.code()));
    }

    let a = self.get_register(reg_a as usize)?;
    let b =
      match operation.arity() {
        2 => self.get_register(reg_b as usize)?,
        _ => 0
      };

    let result =
      match operation {
        Operation::Add => a.wrapping_add(b),
        Operation::Sub => a.wrapping_sub(b),
        Operation::Mul => a.wrapping_mul(b),
        Operation::Div => a.checked_div(b).ok_or(Error::DivisionByZero)?,
        Operation::Mod => a.checked_rem(b).ok_or(Error::DivisionByZero)?,
        Operation::Inc => a.wrapping_add(1),
        Operation::Dec => a.wrapping_sub(1),

        Operation::Cmp => {
          self.fl = Flags::compare(a, b);
          return Ok(());
        }

        Operation::And => a & b,
        Operation::Or  => a | b,
        Operation::Xor => a ^ b,
        Operation::Not => Word::MAX - a,
        // Shifting out every bit leaves zero.
        Operation::Shl => a.checked_shl(b as u32).unwrap_or(0),
        Operation::Shr => a.checked_shr(b as u32).unwrap_or(0),

        other => return Err(Error::UnsupportedOperation(other.code()))
      };

    self.set_register(reg_a as usize, result)
  }

}
