pub mod decode;
pub mod exec;
pub mod memory;
pub mod pc;
pub mod trap;
pub mod writeback;

use decode::{Instr, RegisterSnapshot};
use trap::{Trap, WithPc};

use crate::loader::LoadError;
use crate::mem::{MAX_INSTRS, MEM_END, Memory, TEXT_BASE};

pub const SP_REG: u8 = 29;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MachineConfig {
    /// Hard-wire register 0 to zero. Off by default: the modelled machine
    /// lets every register be written.
    pub pin_zero_register: bool,
}

#[derive(Debug, Default)]
pub struct Cpu {
    pub regs: [u32; 32],
    pub pc: u32,
    pub pin_zero: bool,
}

impl Cpu {
    pub fn reg(&self, idx: u8) -> u32 {
        self.regs[(idx & 0x1f) as usize]
    }

    /// Returns false when the write was swallowed by a pinned zero register.
    pub fn set_reg(&mut self, idx: u8, val: u32) -> bool {
        let idx = idx & 0x1f;
        if idx == 0 && self.pin_zero {
            return false;
        }
        self.regs[idx as usize] = val;
        true
    }
}

/// Raw facts about one retired instruction, for whoever is tracing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub pc: u32,
    pub inst: u32,
    pub instr: Instr,
    pub next_pc: u32,
    /// (register index, new value)
    pub changed_reg: Option<(u8, u32)>,
    /// (address, new value)
    pub changed_mem: Option<(u32, u32)>,
}

pub struct Machine {
    pub cpu: Cpu,
    pub mem: Memory,
    pub executed: u64,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        let mut cpu = Cpu {
            pc: TEXT_BASE,
            pin_zero: config.pin_zero_register,
            ..Cpu::default()
        };
        cpu.regs[SP_REG as usize] = MEM_END;
        Self {
            cpu,
            mem: Memory::new(),
            executed: 0,
        }
    }

    /// Places `words` at the start of the instruction segment.
    pub fn load_program(&mut self, words: &[u32]) -> Result<(), LoadError> {
        if words.len() > MAX_INSTRS {
            return Err(LoadError::ProgramTooLarge {
                words: words.len(),
                capacity: MAX_INSTRS,
            });
        }
        self.mem.write_words(TEXT_BASE, words)?;
        Ok(())
    }

    /// Runs exactly one instruction cycle.
    ///
    /// A trap ends the run: the machine is not resumable afterwards, and
    /// `cpu.pc` may already point past the faulting instruction. Use
    /// `Trap::pc` for the faulting address.
    pub fn step(&mut self) -> Result<StepReport, Trap> {
        let pc = self.cpu.pc;

        // Fetch
        let inst = self
            .mem
            .fetch(pc)
            .map_err(|err| Trap::FetchFault { pc, err })?;

        // Decode
        let instr = decode::decode(pc, inst).with_pc(pc)?;
        let vals = RegisterSnapshot::capture(&self.cpu, &instr);

        // Execute
        let result = exec::execute(&instr, vals, pc);
        let next_pc = pc::update_pc(&mut self.cpu, &instr, result);

        // Memory; PC is already committed if this faults
        let out = memory::access(&mut self.mem, &instr, vals, result).with_pc(pc)?;

        // Writeback
        let changed_reg =
            writeback::writeback(&mut self.cpu, &instr, out.value).map(|r| (r, self.cpu.reg(r)));
        let changed_mem = out.changed.map(|addr| (addr, vals.rt));

        self.executed += 1;
        log::debug!(
            "[{:08}] pc=0x{:08x} inst=0x{:08x} -> pc=0x{:08x}",
            self.executed,
            pc,
            inst,
            next_pc
        );

        Ok(StepReport {
            pc,
            inst,
            instr,
            next_pc,
            changed_reg,
            changed_mem,
        })
    }

    /// Steps until a trap or until `max_insns` instructions retire (0 = no
    /// limit). Returns the trap that ended the run, if any.
    pub fn run(&mut self, max_insns: u64) -> Option<Trap> {
        while max_insns == 0 || self.executed < max_insns {
            if let Err(trap) = self.step() {
                return Some(trap);
            }
        }
        None
    }
}
