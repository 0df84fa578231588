use std::fmt;

use crate::cpu::decode::{Funct, IOp, Instr, JOp};

impl Funct {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Funct::Sll => "sll",
            Funct::Srl => "srl",
            Funct::Jr => "jr",
            Funct::Addu => "addu",
            Funct::Subu => "subu",
            Funct::And => "and",
            Funct::Or => "or",
            Funct::Slt => "slt",
        }
    }
}

impl IOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            IOp::Beq => "beq",
            IOp::Bne => "bne",
            IOp::Addiu => "addiu",
            IOp::Andi => "andi",
            IOp::Ori => "ori",
            IOp::Lui => "lui",
            IOp::Lw => "lw",
            IOp::Sw => "sw",
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instr::R {
                rs,
                rt,
                rd,
                shamt,
                funct,
            } => match funct {
                Funct::Jr => write!(f, "jr\t${}", rs),
                Funct::Sll | Funct::Srl => {
                    write!(f, "{}\t${}, ${}, {}", funct.mnemonic(), rd, rt, shamt)
                }
                _ => write!(f, "{}\t${}, ${}, ${}", funct.mnemonic(), rd, rs, rt),
            },
            Instr::J { op, target } => {
                let m = match op {
                    JOp::J => "j",
                    JOp::Jal => "jal",
                };
                write!(f, "{}\t0x{:08x}", m, target)
            }
            Instr::I { op, rs, rt, imm } => match op {
                IOp::Beq | IOp::Bne => {
                    write!(f, "{}\t${}, ${}, 0x{:08x}", op.mnemonic(), rs, rt, imm)
                }
                IOp::Addiu => write!(f, "addiu\t${}, ${}, {}", rt, rs, imm as i32),
                IOp::Andi | IOp::Ori => {
                    write!(f, "{}\t${}, ${}, 0x{:x}", op.mnemonic(), rt, rs, imm)
                }
                IOp::Lui => write!(f, "lui\t${}, 0x{:x}", rt, imm & 0xffff),
                IOp::Lw | IOp::Sw => {
                    write!(f, "{}\t${}, {}(${})", op.mnemonic(), rt, imm as i32, rs)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu::decode::decode;
    use rstest::rstest;

    #[rstest]
    #[case(0x0109_5021, "addu\t$10, $8, $9")]
    #[case(0x0003_1100, "sll\t$2, $3, 4")]
    #[case(0x03e0_0008, "jr\t$31")]
    #[case(0x0c10_0004, "jal\t0x00400010")]
    #[case(0x1022_0003, "beq\t$1, $2, 0x00400010")]
    #[case(0x2508_fffc, "addiu\t$8, $8, -4")]
    #[case(0x3108_00ff, "andi\t$8, $8, 0xff")]
    #[case(0x3c08_1001, "lui\t$8, 0x1001")]
    #[case(0x8fbf_0008, "lw\t$31, 8($29)")]
    #[case(0xafbf_fffc, "sw\t$31, -4($29)")]
    fn listing(#[case] inst: u32, #[case] text: &str) {
        assert_eq!(decode(0x0040_0000, inst).unwrap().to_string(), text);
    }
}
