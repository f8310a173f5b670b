//! Structures and functions for the register and memory state of the LS-8. All reads and writes
//! are bounds checked; nothing wraps around silently.

use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};

use crate::address::*;
use crate::bytecode::Word;
use crate::error::{Error, LoadError, Result};
use crate::flags::Flags;

/// Register 7 shadows the stack pointer at boot.
pub const STACK_POINTER_REGISTER: AddressNumberType = 7;
/// Where the empty stack starts. The stack grows down from here.
pub const STACK_START: AddressNumberType = 0xF4;

pub struct State {

  // Memory Store
  ram: [Word; MEMORY_SIZE],

  // Registers //
  reg    : [Word; REGISTER_COUNT], // General purpose registers
  pub pc : AddressNumberType,      // Program Counter
  pub sp : AddressNumberType,      // Stack Pointer, separate from `R7` after boot
  pub fl : Flags,                  // Result of the last `CMP`

}

impl State {

  // region Display methods

  fn make_register_table<T> (
      name      : &str,
      registers : &[T],
      highlight : Option<usize>,
      start     : usize
    ) -> Table
    where T: Display
  {

    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (i, cell) in registers.iter().enumerate() {
      match Some(i) == highlight{

        true  => {
          table.add_row(
            row![r->format!("* --> {}[{:02X}] =", name, i+start), format!("{}", cell)]
          );
        }

        false => {
          table.add_row(
            row![r->format!("{}[{:02X}] =", name, i+start), format!("{}", cell)]
          );
        }

      } // end match on highlight
    } // end for
    table
  }

  fn make_special_table(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Register", ubl->"Contents"]);
    table.add_row(row![r->"PC =", format!("{:#04X}", self.pc)]);
    table.add_row(row![r->"SP =", format!("{:#04X}", self.sp)]);
    table.add_row(row![r->"FL =", format!("{}", self.fl)]);
    table
  }

  /// The one line trace of the classic LS-8 tooling: `pc | ram[pc..pc+3] | registers`.
  pub fn trace(&self) -> String {
    let peek = |address: AddressNumberType| {
      match self.read(address) {
        Ok(value) => format!("{:02X}", value),
        Err(_e)   => "--".to_string()
      }
    };

    let registers: Vec<String> = self.reg.iter().map(|r| format!("{:02X}", r)).collect();

    format!(
      "TRACE: {:02X} | {} {} {} | {}",
      self.pc,
      peek(self.pc),
      peek(self.pc + 1),
      peek(self.pc + 2),
      registers.join(" ")
    )
  }

  // endregion

  // region Low-level utility methods

  /// The boot state: everything zero except `R7` and `sp`, which point at the empty stack.
  pub fn new() -> State {
    let mut reg = [0; REGISTER_COUNT];
    reg[STACK_POINTER_REGISTER] = STACK_START as Word;

    State {
      ram : [0; MEMORY_SIZE],
      reg,
      pc  : 0,
      sp  : STACK_START,
      fl  : Flags::default(),
    }
  }

  /// Copies a program image into memory starting at address 0.
  pub fn load(&mut self, image: &[Word]) -> std::result::Result<(), LoadError> {
    if image.len() > MEMORY_SIZE {
      return Err(LoadError::ProgramTooLarge { size: image.len() });
    }
    self.ram[..image.len()].copy_from_slice(image);
    Ok(())
  }

  /// The index `address` names, if it exists.
  fn check(address: Address) -> Result<AddressNumberType> {
    match address.in_bounds() {
      true  => Ok(address.idx()),
      false => Err(Error::InvalidOperand(address))
    }
  }

  pub fn read(&self, address: AddressNumberType) -> Result<Word> {
    let idx = State::check(Address::Memory(address))?;
    Ok(self.ram[idx])
  }

  pub fn write(&mut self, address: AddressNumberType, value: Word) -> Result<()> {
    let idx = State::check(Address::Memory(address))?;
    self.ram[idx] = value;
    Ok(())
  }

  pub fn get_register(&self, index: AddressNumberType) -> Result<Word> {
    let idx = State::check(Address::Register(index))?;
    Ok(self.reg[idx])
  }

  pub fn set_register(&mut self, index: AddressNumberType, value: Word) -> Result<()> {
    let idx = State::check(Address::Register(index))?;
    self.reg[idx] = value;
    Ok(())
  }

  // endregion

}

impl Default for State {
  fn default() -> State {
    State::new()
  }
}


lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for State {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let r_table       = State::make_register_table("R", &self.reg[..], None, 0);
    let special_table = self.make_special_table();

    // The live stack is everything from `sp` up to where it started.
    let stack_start = self.sp.min(STACK_START);
    let s_table     = State::make_register_table(
      "RAM", &self.ram[stack_start..STACK_START], Some(0), stack_start
    );

    let mut combined_table = table!([r_table, special_table, s_table]);

    combined_table.set_titles(row![ub->"Registers", ub->"Special", ub->"Stack"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    write!(f, "{}", combined_table)
  }
}
