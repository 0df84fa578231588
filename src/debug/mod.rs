pub mod disasm;

use std::io::{self, Write};

use crate::cpu::{Machine, StepReport};

/// What to dump after each instruction.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceOptions {
    pub all_registers: bool,
    pub all_memory: bool,
}

pub fn trace_fetch<W: Write>(out: &mut W, report: &StepReport) -> io::Result<()> {
    writeln!(
        out,
        "Executing instruction at {:08x}: {:08x}",
        report.pc, report.inst
    )?;
    writeln!(out, "{}", report.instr)
}

pub fn trace_state<W: Write>(
    out: &mut W,
    machine: &Machine,
    report: &StepReport,
    opts: TraceOptions,
) -> io::Result<()> {
    writeln!(out, "New pc = {:08x}", report.next_pc)?;

    if opts.all_registers {
        for (k, r) in machine.cpu.regs.iter().enumerate() {
            write!(out, "r{:02}: {:08x}  ", k, r)?;
            if (k + 1) % 4 == 0 {
                writeln!(out)?;
            }
        }
    } else {
        match report.changed_reg {
            Some((idx, val)) => writeln!(out, "Updated r{:02} to {:08x}", idx, val)?,
            None => writeln!(out, "No register was updated.")?,
        }
    }

    if opts.all_memory {
        writeln!(out, "Nonzero memory")?;
        writeln!(out, "ADDR\t  CONTENTS")?;
        for (addr, word) in machine.mem.nonzero_data() {
            writeln!(out, "{:08x}  {:08x}", addr, word)?;
        }
    } else {
        match report.changed_mem {
            Some((addr, val)) => {
                writeln!(out, "Updated memory at address {:08x} to {:08x}", addr, val)?
            }
            None => writeln!(out, "No memory location was updated.")?,
        }
    }
    Ok(())
}
