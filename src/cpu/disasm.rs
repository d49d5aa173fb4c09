//! Side-effect free disassembler used by the trace log and the CLI.
//!
//! Operand bytes are fetched with `Bus::peek`, so disassembling never
//! disturbs memory-mapped registers. Undocumented opcodes are prefixed
//! with `*`.

use std::fmt::Write as _;

use crate::bus::Bus;
use crate::cpu::addressing::AddressingMode;
use crate::cpu::state::CpuState;
use crate::cpu::table::lookup;

/// Disassemble the instruction at `pc`. Returns the text and the
/// instruction length in bytes.
pub fn disassemble(bus: &Bus, pc: u16) -> (String, u8) {
    let record = lookup(bus.peek(pc));
    let lo = bus.peek(pc.wrapping_add(1));
    let hi = bus.peek(pc.wrapping_add(2));
    let word = u16::from_le_bytes([lo, hi]);

    let mut text = String::with_capacity(16);
    if !record.official {
        text.push('*');
    }
    text.push_str(record.mnemonic.as_str());

    let operand = match record.mode {
        AddressingMode::Implied => String::new(),
        AddressingMode::Accumulator => "A".to_string(),
        AddressingMode::Immediate => format!("#${lo:02X}"),
        AddressingMode::ZeroPage => format!("${lo:02X}"),
        AddressingMode::ZeroPageX => format!("${lo:02X},X"),
        AddressingMode::ZeroPageY => format!("${lo:02X},Y"),
        AddressingMode::Absolute => format!("${word:04X}"),
        AddressingMode::AbsoluteX => format!("${word:04X},X"),
        AddressingMode::AbsoluteY => format!("${word:04X},Y"),
        AddressingMode::Indirect => format!("(${word:04X})"),
        AddressingMode::IndexedIndirect => format!("(${lo:02X},X)"),
        AddressingMode::IndirectIndexed => format!("(${lo:02X}),Y"),
        AddressingMode::Relative => {
            let target = pc.wrapping_add(2).wrapping_add(lo as i8 as u16);
            format!("${target:04X}")
        }
    };
    if !operand.is_empty() {
        text.push(' ');
        text.push_str(&operand);
    }
    (text, record.len())
}

/// One trace line: `PC  raw bytes  disassembly  registers`.
pub fn trace_line(state: &CpuState, bus: &Bus) -> String {
    let (text, len) = disassemble(bus, state.pc);
    let mut bytes = String::with_capacity(9);
    for i in 0..len as u16 {
        if i > 0 {
            bytes.push(' ');
        }
        let _ = write!(bytes, "{:02X}", bus.peek(state.pc.wrapping_add(i)));
    }
    format!(
        "{:04X}  {:<8}  {:<14}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        state.pc,
        bytes,
        text,
        state.a,
        state.x,
        state.y,
        state.status().bits(),
        state.sp,
        state.cycles
    )
}
