use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use mips_sim::cpu::trap::Trap;
use mips_sim::debug::{self, TraceOptions};
use mips_sim::{Machine, MachineConfig};

#[derive(Parser, Debug)]
#[command(about = "Instruction-set simulator for a small MIPS subset")]
struct Args {
    /// Program image: raw little-endian word dump, or a MIPS ELF32 executable
    #[arg(long)]
    image: PathBuf,

    /// Print every register after each instruction
    #[arg(short = 'r', long, default_value_t = false)]
    registers: bool,

    /// Print all nonzero data memory after each instruction
    #[arg(short = 'm', long, default_value_t = false)]
    memory: bool,

    /// Wait for a line on stdin before each instruction ('q' quits)
    #[arg(short = 'i', long, default_value_t = false)]
    interactive: bool,

    /// Stop after N instructions (0 = run until the program ends)
    #[arg(long, default_value_t = 0)]
    max_insns: u64,

    /// Suppress the per-instruction trace
    #[arg(short = 'q', long, default_value_t = false)]
    quiet: bool,

    /// Hard-wire register 0 to zero
    #[arg(long, default_value_t = false)]
    pin_zero: bool,
}

/// Blocks for the next command; false means halt.
fn prompt<R: BufRead>(input: &mut R) -> io::Result<bool> {
    print!("> ");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(!line.starts_with('q'))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut machine = Machine::with_config(MachineConfig {
        pin_zero_register: args.pin_zero,
    });
    let image = mips_sim::loader::load_image(&args.image)?;
    machine.load_image(&image)?;

    let opts = TraceOptions {
        all_registers: args.registers,
        all_memory: args.memory,
    };
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();

    loop {
        if args.max_insns != 0 && machine.executed >= args.max_insns {
            log::info!("instruction limit reached");
            break;
        }
        if args.interactive && !prompt(&mut input)? {
            break;
        }

        match machine.step() {
            Ok(report) => {
                if !args.quiet {
                    let mut out = stdout.lock();
                    debug::trace_fetch(&mut out, &report)?;
                    debug::trace_state(&mut out, &machine, &report, opts)?;
                }
            }
            // An unsupported word is how programs in this subset end.
            Err(trap @ Trap::UnsupportedOpcode { .. }) => {
                log::warn!("{trap}");
                if let Some(inst) = trap.inst() {
                    log::info!("halting word 0x{inst:08x} at 0x{:08x}", trap.pc());
                }
                println!("CPU halted: {}", trap);
                break;
            }
            Err(trap) => {
                log::warn!("{trap}");
                println!("{}", trap);
                break;
            }
        }
    }

    log::info!("{} instruction(s) retired", machine.executed);
    Ok(())
}
