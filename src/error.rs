/*!
error.rs - Structured error types surfaced by the loader, the CPU core and
the bus.

Overview
========
Each subsystem has its own `thiserror` enum so callers can match on the exact
failure. `Error` wraps all of them for hosts that only want one type, and
`ErrorKind` gives a stable, display-friendly category for dialogs and logs.

Every message carries the offending byte, address or size.
*/

use std::fmt;

use thiserror::Error;

/// Failure while parsing or mapping a cartridge image.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid iNES header: expected NES<1A>, found {}", hex_bytes(.found))]
    InvalidHeader { found: Vec<u8> },

    #[error("truncated image: {section} needs {declared} bytes but only {available} remain")]
    TruncatedImage {
        section: &'static str,
        declared: usize,
        available: usize,
    },

    #[error("unsupported mapper id {0}")]
    UnsupportedMapper(u16),

    #[error("unsupported PRG-ROM size: {0} x 16 KiB banks (NROM takes 1 or 2)")]
    UnsupportedPrgSize(u16),

    #[error("NES 2.0 exponent-multiplier {section} size (byte 9 nibble $F) is not supported")]
    ExponentRomSize { section: &'static str },

    #[error("failed to read cartridge file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while executing a single CPU step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("illegal opcode ${opcode:02X} at ${pc:04X}")]
    IllegalOpcode { opcode: u8, pc: u16 },

    #[error("CPU halted by opcode ${opcode:02X} at ${pc:04X}; reset required")]
    Halted { opcode: u8, pc: u16 },
}

/// Bus configuration error (region table construction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("no region covers address ${address:04X}")]
    UnmappedAddress { address: u16 },

    #[error("regions overlap at address ${address:04X}")]
    OverlappingRegions { address: u16 },
}

/// Coarse category of an [`Error`], for UI presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidHeader,
    TruncatedImage,
    UnsupportedMapper,
    UnsupportedPrgSize,
    Io,
    IllegalOpcode,
    Halted,
    Bus,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidHeader => "invalid-header",
            ErrorKind::TruncatedImage => "truncated-image",
            ErrorKind::UnsupportedMapper => "unsupported-mapper",
            ErrorKind::UnsupportedPrgSize => "unsupported-prg-size",
            ErrorKind::Io => "io",
            ErrorKind::IllegalOpcode => "illegal-opcode",
            ErrorKind::Halted => "halted",
            ErrorKind::Bus => "bus",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Umbrella error for hosts driving the whole core.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Step(#[from] StepError),
    #[error(transparent)]
    Bus(#[from] BusError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Load(LoadError::InvalidHeader { .. } | LoadError::ExponentRomSize { .. }) => {
                ErrorKind::InvalidHeader
            }
            Error::Load(LoadError::TruncatedImage { .. }) => ErrorKind::TruncatedImage,
            Error::Load(LoadError::UnsupportedMapper(_)) => ErrorKind::UnsupportedMapper,
            Error::Load(LoadError::UnsupportedPrgSize(_)) => ErrorKind::UnsupportedPrgSize,
            Error::Load(LoadError::Io(_)) => ErrorKind::Io,
            Error::Step(StepError::IllegalOpcode { .. }) => ErrorKind::IllegalOpcode,
            Error::Step(StepError::Halted { .. }) => ErrorKind::Halted,
            Error::Bus(_) => ErrorKind::Bus,
        }
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<empty>".to_string();
    }
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
