use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use ls8::{bytecode, Cpu, Status};

const EXIT_FAULTED: u8 = 1;
const EXIT_LOAD_ERROR: u8 = 2;
const EXIT_OUT_OF_CYCLES: u8 = 3;

/// Runs an LS-8 program.
#[derive(Parser, Debug)]
#[command(name = "ls8", version, about)]
struct Args {
  /// Program file: an `.ls8` image of binary literals, or assembly with `--asm`.
  program: PathBuf,

  /// Treat the program as assembly. Implied by an `.asm` extension.
  #[arg(long)]
  asm: bool,

  /// Print a trace line to stderr before every instruction.
  #[arg(long)]
  trace: bool,

  /// Stop after this many instructions.
  #[arg(long, value_name = "N")]
  max_cycles: Option<u64>,

  /// Print the program listing instead of running it.
  #[arg(long)]
  disassemble: bool,

  /// Print the machine state to stderr when the run ends.
  #[arg(long)]
  dump: bool,
}

fn read_program(args: &Args) -> anyhow::Result<Vec<u8>> {
  let text = fs::read_to_string(&args.program)
    .with_context(|| format!("cannot read {}", args.program.display()))?;

  let is_assembly = args.asm
    || args.program.extension().map_or(false, |extension| extension == "asm");

  let image =
    match is_assembly {
      true  => bytecode::assemble(&text),
      false => bytecode::parse_image(&text)
    }
    .with_context(|| format!("cannot load {}", args.program.display()))?;

  Ok(image)
}

fn run(args: &Args, image: &[u8]) -> anyhow::Result<ExitCode> {
  let stdout  = io::stdout();
  let mut cpu = Cpu::new(stdout.lock());
  cpu.set_trace(args.trace);
  cpu.load(image).context("cannot load program image")?;

  match args.max_cycles {
    Some(max_cycles) => cpu.run_for(max_cycles),
    None             => cpu.run()
  };

  if args.dump {
    eprintln!("{}", cpu);
  }

  let code =
    match cpu.status() {
      Status::Halted         => ExitCode::SUCCESS,
      Status::Faulted(error) => {
        eprintln!("error at {:#04X}: {}", cpu.state().pc, error);
        ExitCode::from(EXIT_FAULTED)
      }
      Status::Running        => {
        eprintln!("stopped after {} cycles", cpu.cycles());
        ExitCode::from(EXIT_OUT_OF_CYCLES)
      }
    };

  if let Err(error) = cpu.into_output().flush() {
    eprintln!("error: cannot write output: {}", error);
    return Ok(ExitCode::from(EXIT_FAULTED));
  }
  Ok(code)
}

fn main() -> ExitCode {
  env_logger::init();
  let args = Args::parse();

  let image =
    match read_program(&args) {
      Ok(image) => image,
      Err(error) => {
        eprintln!("error: {:#}", error);
        return ExitCode::from(EXIT_LOAD_ERROR);
      }
    };

  if args.disassemble {
    for line in bytecode::disassemble(&image) {
      println!("{}", line);
    }
    return ExitCode::SUCCESS;
  }

  match run(&args, &image) {
    Ok(code) => code,
    Err(error) => {
      eprintln!("error: {:#}", error);
      ExitCode::from(EXIT_LOAD_ERROR)
    }
  }
}
