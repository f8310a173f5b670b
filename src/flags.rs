//! The `FL` register, laid out `00000LGE`.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::bytecode::Word;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Flags(Word);

impl Flags {
  pub const LESS    : Word = 0b0000_0100;
  pub const GREATER : Word = 0b0000_0010;
  pub const EQUAL   : Word = 0b0000_0001;

  /// The flags for comparing `a` with `b`. Exactly one bit is set.
  pub fn compare(a: Word, b: Word) -> Flags {
    match a.cmp(&b) {
      Ordering::Less    => Flags(Flags::LESS),
      Ordering::Greater => Flags(Flags::GREATER),
      Ordering::Equal   => Flags(Flags::EQUAL),
    }
  }

  pub fn bits(&self) -> Word {
    self.0
  }

  pub fn less(&self) -> bool {
    self.0 & Flags::LESS != 0
  }

  pub fn greater(&self) -> bool {
    self.0 & Flags::GREATER != 0
  }

  pub fn equal(&self) -> bool {
    self.0 & Flags::EQUAL != 0
  }
}

impl Display for Flags {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:08b}", self.0)
  }
}
