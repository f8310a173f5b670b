/*!

  The LS-8 uses an 8 bit word. Every instruction is one opcode byte followed by zero, one, or
  two operand bytes, so instructions are one to three bytes long. Operands are either register
  indices or, for `LDI`, an immediate value.

  The opcode byte describes its own instruction:

    Bits 7-6:  Operand count
    Bit    5:  ALU operation
    Bit    4:  Sets the program counter
    Bits 3-0:  Operation identifier

  The operation identifier alone is not unique; `HLT` and `RET` share one, for instance. The
  full byte is unique, so the opcode table maps whole bytes to `Operation` variants, and the
  classification bits decide which unit executes it and how the program counter moves on.

  Instructions are not stored in structured form. The CPU decodes a view of the byte at the
  program counter on every fetch. `Instruction` is only used for assembling, disassembling, and
  tracing.

*/

mod assembly;
mod binary;
mod instruction;

pub use assembly::{assemble, parse_assembly, parse_image};
pub use binary::{disassemble, encode_instruction, try_decode_instruction};
pub use instruction::{Instruction, InstructionWord, Operation};

// If you change this you must also change `encode_instruction` and `try_decode_instruction`.
pub type Word = u8;
