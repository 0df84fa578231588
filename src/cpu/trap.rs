use crate::cpu::decode::DecodeError;
use crate::mem::MemError;
use thiserror::Error;

/// Conditions that end a run. None of them are recoverable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trap {
    #[error("unsupported instruction at pc=0x{pc:08x}: {err}")]
    UnsupportedOpcode { pc: u32, err: DecodeError },

    #[error("Memory Access Exception at 0x{pc:08x}: address 0x{addr:08x}")]
    MemoryFault { pc: u32, addr: u32 },

    #[error("instruction fetch fault at pc=0x{pc:08x}: {err}")]
    FetchFault { pc: u32, err: MemError },
}

impl Trap {
    /// Returns the PC of the instruction that trapped
    pub fn pc(&self) -> u32 {
        match self {
            Trap::UnsupportedOpcode { pc, .. } => *pc,
            Trap::MemoryFault { pc, .. } => *pc,
            Trap::FetchFault { pc, .. } => *pc,
        }
    }

    /// Returns the offending instruction word, if the trap has one
    pub fn inst(&self) -> Option<u32> {
        match self {
            Trap::UnsupportedOpcode {
                err: DecodeError::InvalidOpcode { inst } | DecodeError::InvalidFunct { inst },
                ..
            } => Some(*inst),
            _ => None,
        }
    }
}

/// Trait for adding PC context to errors that can become Traps
pub trait WithPc<T> {
    fn with_pc(self, pc: u32) -> Result<T, Trap>;
}

impl<T> WithPc<T> for Result<T, DecodeError> {
    fn with_pc(self, pc: u32) -> Result<T, Trap> {
        self.map_err(|err| Trap::UnsupportedOpcode { pc, err })
    }
}

/// Data-side memory errors; all of them collapse into one fault kind.
impl<T> WithPc<T> for Result<T, MemError> {
    fn with_pc(self, pc: u32) -> Result<T, Trap> {
        self.map_err(|err| {
            let addr = match err {
                MemError::Oob(a) | MemError::Misaligned(a) | MemError::OutsideData(a) => a,
            };
            Trap::MemoryFault { pc, addr }
        })
    }
}
