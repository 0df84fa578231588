use crate::cpu::Machine;
use crate::mem::{DATA_BASE, MAX_INSTRS, MEM_END, MemError, TEXT_BASE};
use goblin::elf::{
    Elf,
    header::{self, ELFCLASS32, EM_MIPS, ET_EXEC},
    program_header::PT_LOAD,
};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed ELF: {0}")]
    Elf(#[from] goblin::error::Error),

    #[error("unsupported ELF: {0}")]
    Unsupported(&'static str),

    #[error("image length {0} is not a whole number of words")]
    TruncatedWord(usize),

    #[error("Program too big: {words} words, instruction segment holds {capacity}")]
    ProgramTooLarge { words: usize, capacity: usize },

    #[error("segment [0x{start:08x},0x{end:08x}) outside memory image")]
    SegmentOutOfRange { start: u32, end: u32 },

    #[error("memory write failed: {0}")]
    Mem(#[from] MemError),
}

/// A contiguous run of words destined for `addr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub addr: u32,
    pub words: Vec<u32>,
}

/// Program image ready to be placed into a fresh machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub entry: u32,
    pub segments: Vec<Segment>,
}

impl Image {
    /// Raw dump: little-endian words loaded at the instruction base.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, LoadError> {
        Ok(Self {
            entry: TEXT_BASE,
            segments: vec![Segment {
                addr: TEXT_BASE,
                words: words_from_bytes(bytes, true)?,
            }],
        })
    }

    pub fn from_elf(bytes: &[u8]) -> Result<Self, LoadError> {
        let elf = Elf::parse(bytes)?;

        if elf.header.e_ident[header::EI_CLASS] != ELFCLASS32 {
            return Err(LoadError::Unsupported("expected 32-bit ELF"));
        }
        if elf.header.e_machine != EM_MIPS {
            return Err(LoadError::Unsupported("expected MIPS ELF"));
        }
        if elf.header.e_type != ET_EXEC {
            return Err(LoadError::Unsupported("want ET_EXEC"));
        }

        let mut segments = Vec::new();
        for ph in &elf.program_headers {
            if ph.p_type != PT_LOAD || ph.p_memsz == 0 {
                continue;
            }
            let file_off = ph.p_offset as usize;
            let file_sz = ph.p_filesz as usize;
            let end = file_off
                .checked_add(file_sz)
                .filter(|&end| end <= bytes.len())
                .ok_or(LoadError::Unsupported("segment outside file"))?;
            if ph.p_memsz < ph.p_filesz {
                return Err(LoadError::Unsupported("p_memsz smaller than p_filesz"));
            }
            let seg_end = ph.p_vaddr.saturating_add(ph.p_memsz);
            if ph.p_vaddr < TEXT_BASE as u64 || seg_end > MEM_END as u64 {
                return Err(LoadError::SegmentOutOfRange {
                    start: ph.p_vaddr.min(u32::MAX as u64) as u32,
                    end: seg_end.min(u32::MAX as u64) as u32,
                });
            }

            let mut seg = bytes[file_off..end].to_vec();
            // zero-fill bss, then pad to a whole word
            seg.resize(ph.p_memsz as usize, 0);
            seg.resize(seg.len().next_multiple_of(4), 0);

            segments.push(Segment {
                addr: ph.p_vaddr as u32,
                words: words_from_bytes(&seg, elf.little_endian)?,
            });
        }

        Ok(Self {
            entry: elf.entry as u32,
            segments,
        })
    }
}

fn words_from_bytes(bytes: &[u8], little_endian: bool) -> Result<Vec<u32>, LoadError> {
    if bytes.len() % 4 != 0 {
        return Err(LoadError::TruncatedWord(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| {
            let b = [b[0], b[1], b[2], b[3]];
            if little_endian {
                u32::from_le_bytes(b)
            } else {
                u32::from_be_bytes(b)
            }
        })
        .collect())
}

/// Reads an image from disk, telling ELF and raw dumps apart by the magic.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Image, LoadError> {
    let bytes = fs::read(path.as_ref())?;
    let image = if bytes.starts_with(&header::ELFMAG[..]) {
        Image::from_elf(&bytes)?
    } else {
        Image::from_raw(&bytes)?
    };
    log::info!(
        "loaded {} ({} segment(s), entry 0x{:08x})",
        path.as_ref().display(),
        image.segments.len(),
        image.entry
    );
    Ok(image)
}

impl Machine {
    /// Places every segment and sets the PC to the entry point.
    pub fn load_image(&mut self, image: &Image) -> Result<(), LoadError> {
        for seg in &image.segments {
            let bytes = (seg.words.len() as u64) * 4;
            let end = seg.addr as u64 + bytes;
            if (TEXT_BASE..DATA_BASE).contains(&seg.addr) {
                let offset = ((seg.addr - TEXT_BASE) / 4) as usize;
                let words = offset + seg.words.len();
                if words > MAX_INSTRS {
                    return Err(LoadError::ProgramTooLarge {
                        words,
                        capacity: MAX_INSTRS,
                    });
                }
            } else if seg.addr < DATA_BASE || end > MEM_END as u64 {
                return Err(LoadError::SegmentOutOfRange {
                    start: seg.addr,
                    end: end as u32,
                });
            }
            self.mem.write_words(seg.addr, &seg.words)?;
        }
        if !(TEXT_BASE..DATA_BASE).contains(&image.entry) {
            return Err(LoadError::Unsupported("entry point outside instruction segment"));
        }
        self.cpu.pc = image.entry;
        Ok(())
    }
}
