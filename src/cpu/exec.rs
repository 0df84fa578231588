use super::decode::{Funct, IOp, Instr, JOp, RegisterSnapshot};

/// Computes the instruction's value without touching machine state.
///
/// What the value means depends on the instruction: an ALU result for
/// arithmetic/logic, the jump destination for `jr`, the return address for
/// `jal`, `rs - rt` for branches, and the effective address for `lw`/`sw`.
pub fn execute(instr: &Instr, vals: RegisterSnapshot, pc: u32) -> u32 {
    let RegisterSnapshot { rs, rt } = vals;

    match *instr {
        Instr::R { shamt, funct, .. } => match funct {
            Funct::Sll => rt.wrapping_shl(shamt as u32),
            // u32 shift is logical
            Funct::Srl => rt.wrapping_shr(shamt as u32),
            Funct::Jr => rs,
            Funct::Addu => rs.wrapping_add(rt),
            Funct::Subu => rs.wrapping_sub(rt),
            Funct::And => rs & rt,
            Funct::Or => rs | rt,
            Funct::Slt => {
                if (rs as i32) < (rt as i32) {
                    1
                } else {
                    0
                }
            }
        },
        Instr::J { op: JOp::J, .. } => 0,
        Instr::J { op: JOp::Jal, .. } => pc.wrapping_add(4),
        Instr::I { op, imm, .. } => match op {
            IOp::Beq | IOp::Bne => rs.wrapping_sub(rt),
            IOp::Addiu => rs.wrapping_add(imm),
            IOp::Andi => rs & imm,
            IOp::Ori => rs | imm,
            IOp::Lui => imm << 16,
            IOp::Lw | IOp::Sw => rs.wrapping_add(imm),
        },
    }
}
