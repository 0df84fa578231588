use super::Cpu;
use super::decode::{Funct, IOp, Instr};

/// Next program counter for `instr`, given its execute result.
pub fn next_pc(instr: &Instr, result: u32, pc: u32) -> u32 {
    let fallthrough = pc.wrapping_add(4);
    match *instr {
        Instr::R {
            funct: Funct::Jr, ..
        } => result,
        Instr::R { .. } => fallthrough,
        Instr::J { target, .. } => target,
        Instr::I {
            op: IOp::Beq, imm, ..
        } => {
            if result == 0 {
                imm
            } else {
                fallthrough
            }
        }
        Instr::I {
            op: IOp::Bne, imm, ..
        } => {
            if result != 0 {
                imm
            } else {
                fallthrough
            }
        }
        Instr::I { .. } => fallthrough,
    }
}

/// Commits the next PC. Nothing else writes `cpu.pc` during a cycle.
pub fn update_pc(cpu: &mut Cpu, instr: &Instr, result: u32) -> u32 {
    cpu.pc = next_pc(instr, result, cpu.pc);
    cpu.pc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::JOp;

    const PC: u32 = 0x0040_0010;

    fn branch(op: IOp) -> Instr {
        Instr::I {
            op,
            rs: 1,
            rt: 2,
            imm: 0x0040_0100,
        }
    }

    #[test]
    fn beq_takes_on_zero() {
        assert_eq!(next_pc(&branch(IOp::Beq), 0, PC), 0x0040_0100);
        assert_eq!(next_pc(&branch(IOp::Beq), 3, PC), PC + 4);
    }

    #[test]
    fn bne_takes_on_nonzero() {
        assert_eq!(next_pc(&branch(IOp::Bne), 0xffff_ffff, PC), 0x0040_0100);
        assert_eq!(next_pc(&branch(IOp::Bne), 0, PC), PC + 4);
    }

    #[test]
    fn jumps_use_decoded_target() {
        for op in [JOp::J, JOp::Jal] {
            let instr = Instr::J {
                op,
                target: 0x0040_0200,
            };
            assert_eq!(next_pc(&instr, 0, PC), 0x0040_0200);
        }
    }

    #[test]
    fn jr_uses_result_and_other_r_fall_through() {
        let jr = Instr::R {
            rs: 31,
            rt: 0,
            rd: 0,
            shamt: 0,
            funct: Funct::Jr,
        };
        let addu = Instr::R {
            rs: 1,
            rt: 2,
            rd: 3,
            shamt: 0,
            funct: Funct::Addu,
        };
        assert_eq!(next_pc(&jr, 0x0040_0300, PC), 0x0040_0300);
        assert_eq!(next_pc(&addu, 0x0040_0300, PC), PC + 4);
    }

    #[test]
    fn update_commits() {
        let mut cpu = Cpu {
            pc: PC,
            ..Cpu::default()
        };
        let sw = Instr::I {
            op: IOp::Sw,
            rs: 0,
            rt: 0,
            imm: 0,
        };
        assert_eq!(update_pc(&mut cpu, &sw, 0x0040_1000), PC + 4);
        assert_eq!(cpu.pc, PC + 4);
    }
}
