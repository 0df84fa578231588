use super::Cpu;
use super::decode::{Funct, IOp, Instr, JOp};

pub const LINK_REG: u8 = 31;

/// Register an instruction writes, if any.
pub fn destination(instr: &Instr) -> Option<u8> {
    match *instr {
        Instr::R {
            funct: Funct::Jr, ..
        } => None,
        Instr::R { rd, .. } => Some(rd),
        Instr::I {
            op: IOp::Addiu | IOp::Andi | IOp::Ori | IOp::Lui | IOp::Lw,
            rt,
            ..
        } => Some(rt),
        Instr::I { .. } => None,
        Instr::J { op: JOp::Jal, .. } => Some(LINK_REG),
        Instr::J { op: JOp::J, .. } => None,
    }
}

/// Commits `value` to the destination register and reports which register
/// changed. A write to a pinned zero register is dropped and reported as no
/// change.
pub fn writeback(cpu: &mut Cpu, instr: &Instr, value: u32) -> Option<u8> {
    let rd = destination(instr)?;
    if cpu.set_reg(rd, value) {
        Some(rd)
    } else {
        None
    }
}
