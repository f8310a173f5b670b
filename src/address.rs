//! An `Either` type that holds the address of either a register or a memory cell, with some
//! convenience functions.

use std::fmt::{Display, Formatter};

// `AddressNumberType` is `usize`, as it is naturally an index into a memory store.
pub type AddressNumberType = usize;

/// Number of bytes of RAM.
pub const MEMORY_SIZE: AddressNumberType = 256;
/// Number of general purpose registers.
pub const REGISTER_COUNT: AddressNumberType = 8;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Address{
  /// An index into RAM.
  Memory(AddressNumberType),
  /// An index into the register file `R`.
  Register(AddressNumberType)
}

impl Address {
  /// Converts the address to an index into the corresponding store.
  pub fn idx(&self) -> AddressNumberType {
    match self{
      | Address::Memory(i)
      | Address::Register(i) => *i
    }
  }

  /// Whether the address lies inside the store it names.
  pub fn in_bounds(&self) -> bool {
    match self{
      Address::Memory(i)   => *i < MEMORY_SIZE,
      Address::Register(i) => *i < REGISTER_COUNT
    }
  }

}


impl Display for Address{
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self{
      Address::Memory(i) => {
        write!(f, "RAM[{:#04X}]", i)
      },
      Address::Register(i) => {
        write!(f, "R{}", i)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bounds() {
    assert!(Address::Memory(0).in_bounds());
    assert!(Address::Memory(255).in_bounds());
    assert!(!Address::Memory(256).in_bounds());
    assert!(Address::Register(7).in_bounds());
    assert!(!Address::Register(8).in_bounds());
  }

  #[test]
  fn display() {
    assert_eq!(format!("{}", Address::Register(3)), "R3");
    assert_eq!(format!("{}", Address::Memory(0xF4)), "RAM[0xF4]");
  }
}
