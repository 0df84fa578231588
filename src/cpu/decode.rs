use std::fmt;

use crate::cpu::Cpu;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    InvalidOpcode { inst: u32 },
    InvalidFunct { inst: u32 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidOpcode { inst } => write!(f, "invalid opcode: 0x{:08x}", inst),
            DecodeError::InvalidFunct { inst } => write!(f, "invalid function: 0x{:08x}", inst),
        }
    }
}

impl std::error::Error for DecodeError {}

/// R-format operations, keyed by the funct field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Funct {
    Sll = 0x00,
    Srl = 0x02,
    Jr = 0x08,
    Addu = 0x21,
    Subu = 0x23,
    And = 0x24,
    Or = 0x25,
    Slt = 0x2a,
}

impl Funct {
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0x00 => Some(Funct::Sll),
            0x02 => Some(Funct::Srl),
            0x08 => Some(Funct::Jr),
            0x21 => Some(Funct::Addu),
            0x23 => Some(Funct::Subu),
            0x24 => Some(Funct::And),
            0x25 => Some(Funct::Or),
            0x2a => Some(Funct::Slt),
            _ => None,
        }
    }
}

/// I-format operations, keyed by opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IOp {
    Beq = 0x04,
    Bne = 0x05,
    Addiu = 0x09,
    Andi = 0x0c,
    Ori = 0x0d,
    Lui = 0x0f,
    Lw = 0x23,
    Sw = 0x2b,
}

/// J-format operations, keyed by opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JOp {
    J = 0x02,
    Jal = 0x03,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instr {
    // opcode 0
    R {
        rs: u8,
        rt: u8,
        rd: u8,
        shamt: u8,
        funct: Funct,
    },
    // `imm` is already extended; for beq/bne it holds the absolute target.
    I {
        op: IOp,
        rs: u8,
        rt: u8,
        imm: u32,
    },
    // opcodes 2 and 3
    J {
        op: JOp,
        target: u32,
    },
}

/// Source register contents captured at decode time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterSnapshot {
    pub rs: u32,
    pub rt: u32,
}

impl RegisterSnapshot {
    pub fn capture(cpu: &Cpu, instr: &Instr) -> Self {
        match *instr {
            Instr::R { rs, rt, .. } | Instr::I { rs, rt, .. } => Self {
                rs: cpu.reg(rs),
                rt: cpu.reg(rt),
            },
            Instr::J { .. } => Self::default(),
        }
    }
}

fn sign_extend16(value: u32) -> u32 {
    (value as u16 as i16) as i32 as u32
}

pub fn opcode(inst: u32) -> u32 {
    inst >> 26
}

pub fn decode(pc: u32, inst: u32) -> Result<Instr, DecodeError> {
    let rs = ((inst >> 21) & 0x1f) as u8;
    let rt = ((inst >> 16) & 0x1f) as u8;
    let raw_imm = inst & 0xffff;

    let i_type = |op: IOp, imm: u32| -> Result<Instr, DecodeError> {
        Ok(Instr::I { op, rs, rt, imm })
    };

    match opcode(inst) {
        // r type
        0x00 => {
            let funct =
                Funct::from_bits(inst & 0x3f).ok_or(DecodeError::InvalidFunct { inst })?;
            Ok(Instr::R {
                rs,
                rt,
                rd: ((inst >> 11) & 0x1f) as u8,
                shamt: ((inst >> 6) & 0x1f) as u8,
                funct,
            })
        }
        // j type; the PC's upper bits are not spliced in
        0x02 => Ok(Instr::J {
            op: JOp::J,
            target: (inst & 0x03ff_ffff) << 2,
        }),
        0x03 => Ok(Instr::J {
            op: JOp::Jal,
            target: (inst & 0x03ff_ffff) << 2,
        }),
        // branches resolve their target here, against the decode-time pc
        0x04 | 0x05 => {
            let op = if opcode(inst) == 0x04 { IOp::Beq } else { IOp::Bne };
            let target = pc
                .wrapping_add(4)
                .wrapping_add(sign_extend16(raw_imm).wrapping_shl(2));
            i_type(op, target)
        }
        0x09 => i_type(IOp::Addiu, sign_extend16(raw_imm)),
        0x0c => i_type(IOp::Andi, raw_imm),
        0x0d => i_type(IOp::Ori, raw_imm),
        0x0f => i_type(IOp::Lui, sign_extend16(raw_imm)),
        0x23 => i_type(IOp::Lw, sign_extend16(raw_imm)),
        0x2b => i_type(IOp::Sw, sign_extend16(raw_imm)),
        _ => Err(DecodeError::InvalidOpcode { inst }),
    }
}
