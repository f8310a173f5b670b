/*!
  Text forms of a program.

  A program image (`.ls8`) lists one byte per line as an 8 digit binary literal, optionally
  followed by a comment. Blank and comment-only lines are skipped:

  ```text
  10000010 # LDI R0,8
  00000000
  00001000
  ```

  Assembly is the human readable form, one instruction per line. This module leverages the
  `strum` derives of `Operation` to read mnemonics, so the opcode table is the only place an
  operation is named:

  ```text
  LDI R0, 8   # immediates may also be written 0x08 or 0b00001000
  PRN R0
  HLT
  ```
*/

use std::str::FromStr;

use nom::{
  branch::alt,
  bytes::complete::{tag_no_case, take_while1, take_while_m_n},
  character::complete::{
    alpha1,
    char as one_char,
    digit1,
    hex_digit1,
    not_line_ending,
    one_of,
    space0,
    space1
  },
  combinator::{all_consuming, map, map_res, opt, recognize},
  multi::separated_list1,
  sequence::{delimited, pair, preceded},
  IResult
};

use crate::address::REGISTER_COUNT;
use crate::bytecode::{encode_instruction, Instruction, Operation, Word};
use crate::error::LoadError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Operand<'a> {
  Register(&'a str),
  Immediate(&'a str)
}

impl<'a> Operand<'a> {
  fn text(&self) -> &'a str {
    match *self {
      | Operand::Register(text)
      | Operand::Immediate(text) => text
    }
  }
}

type Statement<'a> = (&'a str, Vec<Operand<'a>>);

fn comment(input: &str) -> IResult<&str, &str> {
  preceded(one_of("#;"), not_line_ending)(input)
}

/// Images only take `#` comments.
fn image_comment(input: &str) -> IResult<&str, &str> {
  preceded(one_char('#'), not_line_ending)(input)
}

fn binary_literal(input: &str) -> IResult<&str, Word> {
  map_res(
    take_while_m_n(8, 8, |c: char| c == '0' || c == '1'),
    |digits: &str| Word::from_str_radix(digits, 2)
  )(input)
}

/// One line of a program image: an optional literal and an optional comment.
fn image_line(input: &str) -> IResult<&str, Option<Word>> {
  all_consuming(
    delimited(space0, opt(binary_literal), pair(space0, opt(image_comment)))
  )(input)
}

fn register(input: &str) -> IResult<&str, Operand<'_>> {
  map(recognize(pair(one_of("rR"), digit1)), Operand::Register)(input)
}

fn immediate(input: &str) -> IResult<&str, Operand<'_>> {
  map(
    recognize(
      alt((
        preceded(tag_no_case("0x"), hex_digit1),
        preceded(tag_no_case("0b"), take_while1(|c: char| c == '0' || c == '1')),
        digit1
      ))
    ),
    Operand::Immediate
  )(input)
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
  pair(
    alpha1,
    map(
      opt(
        preceded(
          space1,
          separated_list1(
            delimited(space0, one_char(','), space0),
            alt((register, immediate))
          )
        )
      ),
      |operands| operands.unwrap_or_default()
    )
  )(input)
}

/// One line of assembly: an optional statement and an optional comment.
fn assembly_line(input: &str) -> IResult<&str, Option<Statement<'_>>> {
  all_consuming(
    delimited(space0, opt(statement), pair(space0, opt(comment)))
  )(input)
}

fn parse_number(text: &str) -> Option<Word> {
  let lower = text.to_ascii_lowercase();
  if let Some(hex) = lower.strip_prefix("0x") {
    Word::from_str_radix(hex, 16).ok()
  } else if let Some(bin) = lower.strip_prefix("0b") {
    Word::from_str_radix(bin, 2).ok()
  } else {
    lower.parse::<Word>().ok()
  }
}

/// Resolves the operand at `position` of `operation` to its encoded byte.
fn resolve_operand(
    line      : usize,
    operation : Operation,
    position  : usize,
    operand   : Operand
  ) -> Result<Word, LoadError>
{
  let out_of_range = || LoadError::OperandOutOfRange { line, text: operand.text().to_string() };

  match (operation.is_immediate(position), operand) {

    (true, Operand::Immediate(text)) => parse_number(text).ok_or_else(out_of_range),

    (false, Operand::Register(text)) => {
      match text[1..].parse::<usize>() {
        Ok(index) if index < REGISTER_COUNT => Ok(index as Word),
        _                                   => Err(out_of_range())
      }
    }

    (true, Operand::Register(text)) => {
      Err(LoadError::ExpectedImmediate { line, text: text.to_string() })
    }

    (false, Operand::Immediate(text)) => {
      Err(LoadError::ExpectedRegister { line, text: text.to_string() })
    }

  }
}

/// Parses a program image in `.ls8` form into the bytes to load at address 0.
pub fn parse_image(text: &str) -> Result<Vec<Word>, LoadError> {
  let mut image = Vec::new();

  for (idx, line) in text.lines().enumerate() {
    match image_line(line) {
      Ok((_, Some(word))) => image.push(word),
      Ok((_, None))       => {}
      Err(_e)             => {
        return Err(LoadError::Syntax { line: idx + 1, text: line.trim().to_string() });
      }
    }
  }

  Ok(image)
}

/// Parses assembly into instructions, checking mnemonics, arity, and operand ranges.
pub fn parse_assembly(text: &str) -> Result<Vec<Instruction>, LoadError> {
  let mut instructions = Vec::new();

  for (idx, line_text) in text.lines().enumerate() {
    let line = idx + 1;

    let (name, operands) =
      match assembly_line(line_text) {
        Ok((_, Some(statement))) => statement,
        Ok((_, None))            => continue,
        Err(_e)                  => {
          return Err(LoadError::Syntax { line, text: line_text.trim().to_string() });
        }
      };

    let operation = Operation::from_str(name).map_err(
      |_| LoadError::UnknownMnemonic { line, name: name.to_string() }
    )?;

    if operands.len() != operation.arity() {
      return Err(LoadError::WrongArity {
        line,
        operation,
        expected: operation.arity(),
        found: operands.len()
      });
    }

    let mut bytes = Vec::with_capacity(operands.len());
    for (position, operand) in operands.into_iter().enumerate() {
      bytes.push(resolve_operand(line, operation, position, operand)?);
    }

    let instruction =
      match bytes.as_slice() {
        [a, b] => Instruction::Binary { operation, a: *a, b: *b },
        [a]    => Instruction::Unary { operation, a: *a },
        _      => Instruction::Nullary(operation)
      };
    instructions.push(instruction);
  }

  Ok(instructions)
}

/// Assembles a program straight to its image.
pub fn assemble(text: &str) -> Result<Vec<Word>, LoadError> {
  let instructions = parse_assembly(text)?;
  Ok(instructions.into_iter().flat_map(encode_instruction).collect())
}
