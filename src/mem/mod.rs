use thiserror::Error;

/// Address of the first instruction word.
pub const TEXT_BASE: u32 = 0x0040_0000;
/// Capacity of the instruction segment, in words.
pub const MAX_INSTRS: usize = 1024;
/// Capacity of the data segment, in words.
pub const MAX_DATA: usize = 3072;
/// The data segment starts right after the instruction segment.
pub const DATA_BASE: u32 = TEXT_BASE + (MAX_INSTRS as u32) * 4;
/// One past the last byte of the image; also the initial stack pointer.
pub const MEM_END: u32 = TEXT_BASE + ((MAX_INSTRS + MAX_DATA) as u32) * 4;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemError {
    #[error("address out of range: 0x{0:08x}")]
    Oob(u32),
    #[error("misaligned word address: 0x{0:08x}")]
    Misaligned(u32),
    #[error("address outside data segment: 0x{0:08x}")]
    OutsideData(u32),
}

/// Flat word-addressed image: instruction segment followed by data segment.
pub struct Memory {
    words: Vec<u32>,
    pub base: u32,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            words: vec![0; MAX_INSTRS + MAX_DATA],
            base: TEXT_BASE,
        }
    }

    fn index(&self, addr: u32) -> Result<usize, MemError> {
        let off = addr.checked_sub(self.base).ok_or(MemError::Oob(addr))?;
        if off % 4 != 0 {
            return Err(MemError::Misaligned(addr));
        }
        let idx = (off / 4) as usize;
        if idx >= self.words.len() {
            return Err(MemError::Oob(addr));
        }
        Ok(idx)
    }

    /// Data accesses are restricted to the data segment and must be aligned.
    pub fn check_data(addr: u32) -> Result<(), MemError> {
        if !(DATA_BASE..MEM_END).contains(&addr) {
            return Err(MemError::OutsideData(addr));
        }
        if addr % 4 != 0 {
            return Err(MemError::Misaligned(addr));
        }
        Ok(())
    }

    /// Instruction fetch; anywhere in the image is fair game.
    pub fn fetch(&self, addr: u32) -> Result<u32, MemError> {
        let idx = self.index(addr)?;
        Ok(self.words[idx])
    }

    pub fn read_word(&self, addr: u32) -> Result<u32, MemError> {
        Self::check_data(addr)?;
        let idx = self.index(addr)?;
        Ok(self.words[idx])
    }

    pub fn write_word(&mut self, addr: u32, v: u32) -> Result<(), MemError> {
        Self::check_data(addr)?;
        let idx = self.index(addr)?;
        self.words[idx] = v;
        Ok(())
    }

    /// Bulk copy used by the loader; bypasses the data-segment restriction.
    pub fn write_words(&mut self, addr: u32, words: &[u32]) -> Result<(), MemError> {
        let start = self.index(addr)?;
        let end = start
            .checked_add(words.len())
            .filter(|&end| end <= self.words.len())
            .ok_or(MemError::Oob(addr))?;
        self.words[start..end].copy_from_slice(words);
        Ok(())
    }

    /// Non-zero words of the data segment, in address order.
    pub fn nonzero_data(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.words[MAX_INSTRS..]
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0)
            .map(|(i, w)| (DATA_BASE + (i as u32) * 4, *w))
    }
}
