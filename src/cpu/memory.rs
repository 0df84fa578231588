use super::decode::{IOp, Instr, RegisterSnapshot};
use crate::mem::{MemError, Memory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemOutcome {
    /// Value handed on to writeback: the loaded word for `lw`, otherwise the
    /// execute result unchanged.
    pub value: u32,
    /// Address written by `sw`.
    pub changed: Option<u32>,
}

/// Load/store stage. For `lw`/`sw`, `result` is the effective address and
/// is validated before memory is touched.
pub fn access(
    mem: &mut Memory,
    instr: &Instr,
    vals: RegisterSnapshot,
    result: u32,
) -> Result<MemOutcome, MemError> {
    let passthrough = MemOutcome {
        value: result,
        changed: None,
    };

    match *instr {
        Instr::I { op: IOp::Lw, .. } => Ok(MemOutcome {
            value: mem.read_word(result)?,
            changed: None,
        }),
        Instr::I { op: IOp::Sw, .. } => {
            mem.write_word(result, vals.rt)?;
            Ok(MemOutcome {
                value: result,
                changed: Some(result),
            })
        }
        _ => Ok(passthrough),
    }
}
