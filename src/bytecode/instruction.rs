use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};
use num_enum::{TryFromPrimitive, IntoPrimitive};

use crate::bytecode::Word;
use crate::error::{Error, Result};

const OPERAND_COUNT_SHIFT: u8 = 6;
const ALU_BIT:             u8 = 0b0010_0000;
const SETS_PC_BIT:         u8 = 0b0001_0000;
const OPERATION_ID_MASK:   u8 = 0b0000_1111;

/**
  Opcodes of the virtual machine.

  Each discriminant is the complete opcode byte, so the operand count and classification bits
  are baked into the value. Conversion from a raw byte is `Operation::try_from(byte)`, which
  fails for bytes that name no operation.
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq, PartialEq,  Debug,           Hash
)]
#[strum(serialize_all = "shouty_snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum Operation {
  // Control //
  Nop  = 0b0000_0000,   // nop
  Hlt  = 0b0000_0001,   // hlt
  Ret  = 0b0001_0001,   // ret

  Push = 0b0100_0101,   // push( register )
  Pop  = 0b0100_0110,   // pop( register )
  Prn  = 0b0100_0111,   // prn( register )
  Pra  = 0b0100_1000,   // pra( register )
  Call = 0b0101_0000,   // call( register )
  Jmp  = 0b0101_0100,   // jmp( register )
  Jeq  = 0b0101_0101,   // jeq( register )
  Jne  = 0b0101_0110,   // jne( register )

  Ldi  = 0b1000_0010,   // ldi( register, immediate )
  Ld   = 0b1000_0011,   // ld( register, register )
  St   = 0b1000_0100,   // st( register, register )

  // ALU //
  Inc  = 0b0110_0101,   // inc( register )
  Dec  = 0b0110_0110,   // dec( register )
  Not  = 0b0110_1001,   // not( register )

  Add  = 0b1010_0000,   // add( register, register )
  Sub  = 0b1010_0001,
  Mul  = 0b1010_0010,
  Div  = 0b1010_0011,
  Mod  = 0b1010_0100,
  Cmp  = 0b1010_0111,
  And  = 0b1010_1000,
  Or   = 0b1010_1010,
  Xor  = 0b1010_1011,
  Shl  = 0b1010_1100,
  Shr  = 0b1010_1101,
}

impl Operation{
  pub fn code(&self) -> Word {
    Into::<Word>::into(*self)
  }

  pub fn word(&self) -> InstructionWord {
    InstructionWord::decode(self.code())
  }

  /// Number of operand bytes following the opcode.
  pub fn arity(&self) -> usize {
    self.word().operand_count as usize
  }

  pub fn is_alu(&self) -> bool {
    self.word().is_alu
  }

  pub fn sets_pc(&self) -> bool {
    self.word().sets_pc
  }

  /// Whether the operand at `position` is an immediate value rather than a register index.
  pub fn is_immediate(&self, position: usize) -> bool {
    *self == Operation::Ldi && position == 1
  }
}

/// The fields of an opcode byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct InstructionWord {
  pub code          : Word,
  pub operand_count : u8,
  pub is_alu        : bool,
  pub sets_pc       : bool,
  pub opcode_id     : u8,
}

impl InstructionWord {
  pub fn decode(code: Word) -> InstructionWord {
    InstructionWord {
      code,
      operand_count : code >> OPERAND_COUNT_SHIFT,
      is_alu        : code & ALU_BIT != 0,
      sets_pc       : code & SETS_PC_BIT != 0,
      opcode_id     : code & OPERATION_ID_MASK,
    }
  }

  /// The instruction length in bytes, opcode included.
  pub fn size(&self) -> usize {
    self.operand_count as usize + 1
  }

  /// Looks up the operation this byte names.
  pub fn operation(&self) -> Result<Operation> {
    Operation::try_from(self.code).map_err(|_| Error::UnsupportedOperation(self.code))
  }
}

/// Holds the unencoded components of an instruction. As such, it enumerates the possible
/// instruction argument combinations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  /// [OpCode:8][Operand:8][Operand:8]
  Binary {
    operation: Operation,
    a: Word,
    b: Word
  },
  /// [OpCode:8][Operand:8]
  Unary {
    operation: Operation,
    a: Word
  },
  /// [OpCode:8]
  Nullary(Operation),
}

impl Instruction {
  pub fn operation(&self) -> Operation {
    match self {
      | Instruction::Binary { operation, .. }
      | Instruction::Unary { operation, .. }
      | Instruction::Nullary(operation) => *operation
    }
  }
}

struct OperandDisplay(Operation, usize, Word);

impl Display for OperandDisplay {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let OperandDisplay(operation, position, value) = self;
    match operation.is_immediate(*position) {
      true  => write!(f, "{}", value),
      false => write!(f, "R{}", value)
    }
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match *self{

      Instruction::Binary{operation, a, b} => {
        write!(
          f, "{} {}, {}",
          operation, OperandDisplay(operation, 0, a), OperandDisplay(operation, 1, b)
        )
      }

      Instruction::Unary{operation, a} => {
        write!(f, "{} {}", operation, OperandDisplay(operation, 0, a))
      }

      Instruction::Nullary(operation) => {
        write!(f, "{}", operation)
      }

    }
  }
}
