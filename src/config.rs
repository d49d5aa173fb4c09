//! CPU configuration knobs.
//!
//! The NES 2A03 differs from a stock NMOS 6502 in one visible way (no BCD
//! arithmetic), and hosts differ in how strictly they want undocumented
//! opcodes treated. Both are captured here and handed to
//! [`Cpu::with_config`](crate::cpu::Cpu::with_config).

use std::fmt;
use std::str::FromStr;

/// What the CPU does when it fetches an undocumented opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IllegalOpcodePolicy {
    /// `step()` fails with `StepError::IllegalOpcode`; PC stays on the opcode.
    #[default]
    Fault,
    /// Execute as a no-op with the published length and cycle cost.
    /// JAM opcodes halt the CPU until reset.
    Nop,
}

impl FromStr for IllegalOpcodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fault" => Ok(IllegalOpcodePolicy::Fault),
            "nop" => Ok(IllegalOpcodePolicy::Nop),
            other => Err(format!("unknown illegal-opcode policy '{other}' (fault|nop)")),
        }
    }
}

impl fmt::Display for IllegalOpcodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalOpcodePolicy::Fault => f.write_str("fault"),
            IllegalOpcodePolicy::Nop => f.write_str("nop"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuConfig {
    pub illegal_opcodes: IllegalOpcodePolicy,
    /// Honour the D flag in ADC/SBC (NMOS BCD). Off for the NES 2A03.
    pub decimal_mode: bool,
}

impl CpuConfig {
    /// Stock NMOS 6502: BCD enabled, undocumented opcodes as no-ops.
    pub fn nmos() -> Self {
        Self {
            illegal_opcodes: IllegalOpcodePolicy::Nop,
            decimal_mode: true,
        }
    }

    pub fn with_illegal_opcodes(mut self, policy: IllegalOpcodePolicy) -> Self {
        self.illegal_opcodes = policy;
        self
    }

    pub fn with_decimal_mode(mut self, on: bool) -> Self {
        self.decimal_mode = on;
        self
    }
}
