pub mod cpu;
pub mod debug;
pub mod loader;
pub mod mem;

pub use cpu::{Cpu, Machine, MachineConfig, StepReport};
pub use cpu::decode::{DecodeError, Funct, IOp, Instr, JOp, RegisterSnapshot};
pub use cpu::trap::Trap;
pub use loader::{Image, LoadError};
pub use mem::{MemError, Memory};
