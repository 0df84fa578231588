#![allow(dead_code)]

//! Tiny encoder for building test programs by hand.

use mips_sim::{Funct, IOp, Machine};

pub fn r(funct: Funct, rd: u32, rs: u32, rt: u32, shamt: u32) -> u32 {
    (rs << 21) | (rt << 16) | (rd << 11) | (shamt << 6) | funct as u32
}

pub fn i(op: IOp, rt: u32, rs: u32, imm: i32) -> u32 {
    ((op as u32) << 26) | (rs << 21) | (rt << 16) | (imm as u32 & 0xffff)
}

pub fn j(target: u32) -> u32 {
    (0x02 << 26) | ((target >> 2) & 0x03ff_ffff)
}

pub fn jal(target: u32) -> u32 {
    (0x03 << 26) | ((target >> 2) & 0x03ff_ffff)
}

pub fn addu(rd: u32, rs: u32, rt: u32) -> u32 {
    r(Funct::Addu, rd, rs, rt, 0)
}

pub fn addiu(rt: u32, rs: u32, imm: i32) -> u32 {
    i(IOp::Addiu, rt, rs, imm)
}

pub fn lw(rt: u32, offset: i32, base: u32) -> u32 {
    i(IOp::Lw, rt, base, offset)
}

pub fn sw(rt: u32, offset: i32, base: u32) -> u32 {
    i(IOp::Sw, rt, base, offset)
}

/// Any word with an opcode outside the subset; ends a program.
pub const HALT: u32 = 0xfc00_0000;

pub fn machine(program: &[u32]) -> Machine {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut m = Machine::new();
    m.load_program(program).unwrap();
    m
}

/// One PT_LOAD entry for [`elf32`]; `memsz` past `data.len()` is bss.
pub struct ElfSegment {
    pub vaddr: u32,
    pub data: Vec<u8>,
    pub memsz: u32,
}

impl ElfSegment {
    pub fn text(vaddr: u32, words: &[u32], big_endian: bool) -> Self {
        let data: Vec<u8> = words
            .iter()
            .flat_map(|w| {
                if big_endian {
                    w.to_be_bytes()
                } else {
                    w.to_le_bytes()
                }
            })
            .collect();
        let memsz = data.len() as u32;
        Self { vaddr, data, memsz }
    }
}

/// Minimal ET_EXEC ELF32 image: header, program headers, then segment bytes.
pub fn elf32(big_endian: bool, machine: u16, entry: u32, segments: &[ElfSegment]) -> Vec<u8> {
    const EHSIZE: u32 = 52;
    const PHENTSIZE: u32 = 32;

    let mut out = Vec::new();
    let h16 = |out: &mut Vec<u8>, v: u16| {
        out.extend(if big_endian { v.to_be_bytes() } else { v.to_le_bytes() })
    };
    let h32 = |out: &mut Vec<u8>, v: u32| {
        out.extend(if big_endian { v.to_be_bytes() } else { v.to_le_bytes() })
    };

    out.extend([0x7f, b'E', b'L', b'F', 1, if big_endian { 2 } else { 1 }, 1]);
    out.resize(16, 0);
    h16(&mut out, 2); // ET_EXEC
    h16(&mut out, machine);
    h32(&mut out, 1);
    h32(&mut out, entry);
    h32(&mut out, EHSIZE);
    h32(&mut out, 0);
    h32(&mut out, 0);
    h16(&mut out, EHSIZE as u16);
    h16(&mut out, PHENTSIZE as u16);
    h16(&mut out, segments.len() as u16);
    h16(&mut out, 40);
    h16(&mut out, 0);
    h16(&mut out, 0);

    let mut offset = EHSIZE + PHENTSIZE * segments.len() as u32;
    for seg in segments {
        h32(&mut out, 1); // PT_LOAD
        h32(&mut out, offset);
        h32(&mut out, seg.vaddr);
        h32(&mut out, seg.vaddr);
        h32(&mut out, seg.data.len() as u32);
        h32(&mut out, seg.memsz);
        h32(&mut out, 5);
        h32(&mut out, 4);
        offset += seg.data.len() as u32;
    }
    for seg in segments {
        out.extend(&seg.data);
    }
    out
}
