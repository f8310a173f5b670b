/*!
  This module is responsible for the encoding and decoding of binary instructions.

*/
use super::{Instruction, InstructionWord, Word};

/// Decodes the instruction at the start of `bytes`. Returns `None` if the opcode names no
/// operation or if `bytes` ends before the instruction's operands do.
pub fn try_decode_instruction(bytes: &[Word]) -> Option<Instruction> {
  let word      = InstructionWord::decode(*bytes.first()?);
  let operation = word.operation().ok()?;

  let instruction =
    match word.operand_count {
      0 => Instruction::Nullary(operation),
      // [OpCode:8][Operand:8]
      1 => Instruction::Unary {
        operation,
        a: *bytes.get(1)?
      },
      // [OpCode:8][Operand:8][Operand:8]
      _ => Instruction::Binary {
        operation,
        a: *bytes.get(1)?,
        b: *bytes.get(2)?
      }
    };

  Some(instruction)
}

/**
  Encodes the instruction into bytecode. It is the caller's responsibility to
  use the correct `Instruction` variant for the given operation.
*/
pub fn encode_instruction(instruction: Instruction) -> Vec<Word>{
  match instruction{

    Instruction::Binary {operation, a, b} => {
      vec![operation.code(), a, b]
    },

    Instruction::Unary {operation, a} => {
      vec![operation.code(), a]
    },

    Instruction::Nullary(operation) => {
      vec![operation.code()]
    },
  }
}

/**
  Produces a listing of a program image, one line per instruction, each prefixed with its
  address. Bytes that do not decode are listed as raw data and skipped one at a time, so a
  listing never stops early.
*/
pub fn disassemble(image: &[Word]) -> Vec<String> {
  let mut listing = Vec::new();
  let mut address = 0;

  while address < image.len() {
    match try_decode_instruction(&image[address..]) {

      Some(instruction) => {
        listing.push(format!("{:02X}: {}", address, instruction));
        address += instruction.operation().arity() + 1;
      }

      None => {
        listing.push(format!("{:02X}: DB {:#010b}", address, image[address]));
        address += 1;
      }

    }
  }

  listing
}
