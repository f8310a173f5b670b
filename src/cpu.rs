//! The LS-8 control unit and its fetch, decode, execute loop.

use std::fmt::{Display, Formatter};
use std::io::Write;

use log::{debug, trace, warn};

use crate::bytecode::{InstructionWord, Operation, Word};
use crate::error::{Error, LoadError, Result};
use crate::state::State;

/// Where the execution loop stands. `Halted` and `Faulted` are terminal.
#[derive(Debug)]
pub enum Status {
  Running,
  Halted,
  Faulted(Error),
}

impl Status {
  pub fn is_running(&self) -> bool {
    match self {
      Status::Running => true,
      _ => false
    }
  }
}

impl Display for Status {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Status::Running        => write!(f, "Running"),
      Status::Halted         => write!(f, "Halted"),
      Status::Faulted(error) => write!(f, "Faulted: {}", error),
    }
  }
}

/// What a non-ALU handler asks of the loop.
enum Flow {
  Continue,
  Halt,
}

/// An LS-8 CPU writing `PRN`/`PRA` output to `W`.
pub struct Cpu<W: Write> {
  state  : State,
  status : Status,
  output : W,
  cycles : u64,
  trace  : bool,
}

impl<W: Write> Cpu<W> {

  pub fn new(output: W) -> Cpu<W> {
    Cpu {
      state  : State::new(),
      status : Status::Running,
      output,
      cycles : 0,
      trace  : false,
    }
  }

  // region Accessors

  pub fn state(&self) -> &State {
    &self.state
  }

  pub fn state_mut(&mut self) -> &mut State {
    &mut self.state
  }

  pub fn status(&self) -> &Status {
    &self.status
  }

  /// Number of instructions executed, including a faulting one.
  pub fn cycles(&self) -> u64 {
    self.cycles
  }

  pub fn output(&self) -> &W {
    &self.output
  }

  pub fn into_output(self) -> W {
    self.output
  }

  /// Print the one line trace to stderr before every instruction.
  pub fn set_trace(&mut self, trace: bool) {
    self.trace = trace;
  }

  // endregion

  /// Loads a program image at address 0.
  pub fn load(&mut self, image: &[Word]) -> std::result::Result<(), LoadError> {
    self.state.load(image)?;
    debug!("Loaded {} bytes of program image.", image.len());
    Ok(())
  }

  /// Executes one instruction, unless the CPU has already stopped.
  pub fn step(&mut self) -> &Status {
    if !self.status.is_running() {
      return &self.status;
    }

    trace!("{}", self.state.trace());
    if self.trace {
      eprintln!("{}", self.state.trace());
    }

    self.cycles += 1;
    match self.cycle() {

      Ok(Flow::Continue) => {}

      Ok(Flow::Halt) => {
        debug!("Halted after {} cycles.", self.cycles);
        self.status = Status::Halted;
      }

      Err(error) => {
        warn!("Faulted at {:#04X}: {}", self.state.pc, error);
        self.status = Status::Faulted(error);
      }

    }

    #[cfg(feature = "trace_computation")] eprintln!("{}", self.state);

    &self.status
  }

  /// Runs until `HLT` or a fault.
  pub fn run(&mut self) -> &Status {
    while self.status.is_running() {
      self.step();
    }
    &self.status
  }

  /// Runs at most `max_cycles` instructions. The CPU is still `Running` if the budget runs out
  /// first.
  pub fn run_for(&mut self, max_cycles: u64) -> &Status {
    for _ in 0..max_cycles {
      if !self.step().is_running() {
        break;
      }
    }
    &self.status
  }

  /**
    One fetch, decode, execute cycle. On error `pc` is left at the faulting instruction.

    The handler of an operation whose opcode has the `sets_pc` bit owns `pc`. For everything
    else `pc` moves past the opcode and its operands afterward.
  */
  fn cycle(&mut self) -> Result<Flow> {
    let pc        = self.state.pc;
    let word      = InstructionWord::decode(self.state.read(pc)?);
    let operation = word.operation()?;

    let mut operands: [Word; 2] = [0; 2];
    for (offset, operand) in operands.iter_mut().take(word.operand_count as usize).enumerate() {
      *operand = self.state.read(pc + offset + 1)?;
    }
    let [a, b] = operands;

    let flow =
      match word.is_alu {
        true  => {
          self.state.alu(operation, a, b)?;
          Flow::Continue
        }
        false => self.control(operation, a, b)?
      };

    if !word.sets_pc {
      self.state.pc = pc + word.size();
    }

    Ok(flow)
  }

  /// Executes the non-ALU operations.
  fn control(&mut self, operation: Operation, a: Word, b: Word) -> Result<Flow> {
    let state = &mut self.state;

    match operation {

      Operation::Nop => {}

      Operation::Hlt => return Ok(Flow::Halt),

      Operation::Ldi => state.set_register(a as usize, b)?,

      Operation::Ld => {
        let address = state.get_register(b as usize)?;
        let value   = state.read(address as usize)?;
        state.set_register(a as usize, value)?;
      }

      Operation::St => {
        let address = state.get_register(a as usize)?;
        let value   = state.get_register(b as usize)?;
        state.write(address as usize, value)?;
      }

      Operation::Prn => {
        let value = state.get_register(a as usize)?;
        writeln!(self.output, "{}", value)?;
      }

      Operation::Pra => {
        let value = state.get_register(a as usize)?;
        self.output.write_all(&[value])?;
      }

      Operation::Push => state.push(a)?,
      Operation::Pop  => state.pop(a)?,
      Operation::Call => state.call(a)?,
      Operation::Ret  => state.ret()?,

      Operation::Jmp => state.pc = state.get_register(a as usize)? as usize,

      Operation::Jeq | Operation::Jne => {
        let target = state.get_register(a as usize)?;
        let taken  = state.fl.equal() == (operation == Operation::Jeq);
        match taken {
          true  => state.pc = target as usize,
          false => state.pc += operation.word().size()
        }
      }

      other => return Err(Error::UnsupportedOperation(other.code()))

    }

    Ok(Flow::Continue)
  }

}

impl<W: Write> Display for Cpu<W> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "Status: {}\tCycles: {}\n{}", self.status, self.cycles, self.state)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::address::Address;
  use crate::bytecode::assemble;

  fn run(source: &str) -> Cpu<Vec<u8>> {
    let mut cpu = Cpu::new(Vec::new());
    cpu.load(&assemble(source).unwrap()).unwrap();
    cpu.run_for(10_000);
    cpu
  }

  fn printed(cpu: &Cpu<Vec<u8>>) -> String {
    String::from_utf8(cpu.output().clone()).unwrap()
  }

  #[test]
  fn ldi_then_prn() {
    for r in 0..8 {
      let cpu = run(&format!("LDI R{0}, 173\nPRN R{0}\nHLT", r));
      assert!(matches!(cpu.status(), Status::Halted));
      assert_eq!(printed(&cpu), "173\n");
    }
  }

  #[test]
  fn multiply() {
    let cpu = run("LDI R0, 8\nLDI R1, 9\nMUL R0, R1\nPRN R0\nHLT");
    assert!(matches!(cpu.status(), Status::Halted));
    assert_eq!(printed(&cpu), "72\n");
    assert_eq!(cpu.cycles(), 5);
    assert_eq!(cpu.state().pc, 12);
  }

  #[test]
  fn add_wraps() {
    let cpu = run("LDI R0, 250\nLDI R1, 10\nADD R0, R1\nHLT");
    assert_eq!(cpu.state().get_register(0).unwrap(), 4);
  }

  #[test]
  fn jeq_taken_and_not_taken() {
    // Equal: JEQ at 9 jumps to 13, skipping the PRN of R3 at 11.
    let equal = run("
      LDI R0, 5
      LDI R1, 13
      CMP R0, R0
      JEQ R1
      PRN R3
      PRN R0
      HLT
    ");
    assert_eq!(printed(&equal), "5\n");

    // Not equal: JEQ falls through to the instruction after its operand.
    let mut cpu = Cpu::new(Vec::new());
    cpu.load(&assemble("LDI R0, 5\nLDI R1, 0\nCMP R0, R1\nJEQ R1\nHLT").unwrap()).unwrap();
    cpu.run_for(4);
    assert_eq!(cpu.state().pc, 11);
    assert!(matches!(cpu.run(), Status::Halted));
  }

  #[test]
  fn jne() {
    let cpu = run("
      LDI R0, 1
      LDI R1, 2
      LDI R2, 15
      CMP R0, R1
      JNE R2
      HLT
      PRN R1
      HLT
    ");
    assert_eq!(printed(&cpu), "2\n");
  }

  #[test]
  fn flags_persist_across_instructions() {
    let cpu = run("
      LDI R0, 1
      LDI R1, 1
      CMP R0, R1
      ADD R0, R1
      LDI R2, 18
      JEQ R2
      HLT
      PRN R0
      HLT
    ");
    assert_eq!(printed(&cpu), "2\n");
  }

  #[test]
  fn push_pop_restores_value() {
    let cpu = run("LDI R0, 42\nPUSH R0\nPOP R4\nPRN R4\nHLT");
    assert_eq!(printed(&cpu), "42\n");
    assert_eq!(cpu.state().sp, 0xF4);
  }

  #[test]
  fn call_returns_after_operand() {
    // 0: LDI R1, 8   3: CALL R1   5: PRN R0   7: HLT   8: LDI R0, 99   11: RET
    let cpu = run("LDI R1, 8\nCALL R1\nPRN R0\nHLT\nLDI R0, 99\nRET");
    assert!(matches!(cpu.status(), Status::Halted));
    assert_eq!(printed(&cpu), "99\n");
    assert_eq!(cpu.state().sp, 0xF4);
  }

  #[test]
  fn load_and_store() {
    let cpu = run("
      LDI R0, 0xF0
      LDI R1, 77
      ST R0, R1
      LD R2, R0
      PRN R2
      HLT
    ");
    assert_eq!(printed(&cpu), "77\n");
    assert_eq!(cpu.state().read(0xF0).unwrap(), 77);
  }

  #[test]
  fn pra_writes_one_raw_byte() {
    let cpu = run("LDI R0, 200\nPRA R0\nHLT");
    assert_eq!(cpu.output().as_slice(), &[200]);
  }

  #[test]
  fn pra_prints_characters() {
    let cpu = run("LDI R0, 72\nPRA R0\nLDI R0, 105\nPRA R0\nHLT");
    assert_eq!(printed(&cpu), "Hi");
  }

  #[test]
  fn unknown_opcode_faults_without_advancing() {
    let mut cpu = Cpu::new(Vec::new());
    cpu.load(&[0b0000_0000, 0b1111_1111, 0b0000_0001]).unwrap();
    cpu.run();
    assert!(matches!(cpu.status(), Status::Faulted(Error::UnsupportedOperation(0b1111_1111))));
    assert_eq!(cpu.state().pc, 1);
    assert_eq!(cpu.cycles(), 2);

    // Terminal: stepping again does nothing.
    cpu.step();
    assert_eq!(cpu.cycles(), 2);
  }

  #[test]
  fn division_by_zero_faults() {
    let cpu = run("LDI R0, 9\nDIV R0, R1\nHLT");
    assert!(matches!(cpu.status(), Status::Faulted(Error::DivisionByZero)));
    assert_eq!(cpu.state().pc, 3);
    assert_eq!(cpu.state().get_register(0).unwrap(), 9);
  }

  #[test]
  fn invalid_register_faults() {
    let mut cpu = Cpu::new(Vec::new());
    cpu.load(&[0b0100_0111, 9]).unwrap();
    cpu.run();
    assert!(matches!(
      cpu.status(),
      Status::Faulted(Error::InvalidOperand(Address::Register(9)))
    ));
  }

  #[test]
  fn running_off_the_end_faults() {
    // Memory is all NOPs; the fetch at 256 is out of range.
    let mut cpu = Cpu::new(Vec::new());
    cpu.run();
    assert!(matches!(
      cpu.status(),
      Status::Faulted(Error::InvalidOperand(Address::Memory(256)))
    ));
    assert_eq!(cpu.cycles(), 257);
  }

  #[test]
  fn operands_past_the_end_fault() {
    let mut cpu = Cpu::new(Vec::new());
    cpu.state_mut().pc = 0xFF;
    cpu.state_mut().write(0xFF, Operation::Prn.code()).unwrap();
    cpu.run();
    assert!(matches!(
      cpu.status(),
      Status::Faulted(Error::InvalidOperand(Address::Memory(256)))
    ));
    assert_eq!(cpu.state().pc, 0xFF);
  }

  #[test]
  fn cycle_budget() {
    // JMP R0 with R0 = 0 loops forever.
    let mut cpu = Cpu::new(Vec::new());
    cpu.load(&assemble("JMP R0").unwrap()).unwrap();
    assert!(cpu.run_for(100).is_running());
    assert_eq!(cpu.cycles(), 100);
    assert_eq!(cpu.state().pc, 0);
  }

  #[test]
  fn independent_instances() {
    let first  = run("LDI R0, 1\nPRN R0\nHLT");
    let second = run("LDI R0, 2\nPRN R0\nHLT");
    assert_eq!(printed(&first), "1\n");
    assert_eq!(printed(&second), "2\n");
  }

  #[test]
  fn display_includes_status() {
    let cpu = run("HLT");
    assert!(cpu.to_string().starts_with("Status: Halted\tCycles: 1"));
  }
}
