/*!
addressing.rs - 6502 addressing modes and operand resolution (shared by dispatch)

Overview
========
Provides canonical helpers for:
- Instruction stream byte/word fetch
- Effective address calculation for every 6502 addressing mode
- Page-cross reporting for indexed modes (cycle penalty logic lives in dispatch)
- Emulation of the 6502 JMP (indirect) page-wrap quirk

Scope & Responsibilities
========================
- Pure address / operand resolution only.
- Never reads the *target* of an effective address; family handlers do that,
  so stores and read-modify-write instructions see exactly the bus traffic
  they perform on hardware.
- `resolve` returns an `Operand`; `Operand::Address { crossed, .. }` lets the
  dispatcher add +1 cycle where the decode table says so.

Caller Assumptions
==================
- PC points at the first operand byte when `resolve` is invoked.
- Callers advance PC exclusively via these helpers.
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;

/// The thirteen 6502 addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    /// `(zp,X)`
    IndexedIndirect,
    /// `(zp),Y`
    IndirectIndexed,
    Relative,
}

impl AddressingMode {
    /// Operand bytes following the opcode.
    pub const fn operand_len(self) -> u8 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndexedIndirect
            | AddressingMode::IndirectIndexed
            | AddressingMode::Relative => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }
}

/// A resolved operand, ready for a family handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Implied,
    Accumulator,
    Immediate(u8),
    /// Effective address; `crossed` is true when indexing moved to another page.
    Address { addr: u16, crossed: bool },
    Relative(i8),
}

impl Operand {
    /// Read the operand value (immediate byte, accumulator, or memory).
    #[inline]
    pub(crate) fn value<C: CpuRegs>(self, cpu: &C, bus: &mut Bus) -> u8 {
        match self {
            Operand::Immediate(v) => v,
            Operand::Accumulator => cpu.a(),
            Operand::Address { addr, .. } => bus.read(addr),
            Operand::Implied | Operand::Relative(_) => 0,
        }
    }

    #[inline]
    pub(crate) fn address(self) -> Option<u16> {
        match self {
            Operand::Address { addr, .. } => Some(addr),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn crossed(self) -> bool {
        matches!(self, Operand::Address { crossed: true, .. })
    }
}

/// Fetch next byte from the instruction stream, incrementing PC.
pub(crate) fn fetch_byte<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u8 {
    let pc = cpu.pc();
    let v = bus.read(pc);
    cpu.advance_pc_one();
    v
}

/// Fetch next little-endian word (low, then high), incrementing PC twice.
pub(crate) fn fetch_word<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u16 {
    let lo = fetch_byte(cpu, bus) as u16;
    let hi = fetch_byte(cpu, bus) as u16;
    (hi << 8) | lo
}

#[inline]
fn indexed(base: u16, index: u8) -> Operand {
    let addr = base.wrapping_add(index as u16);
    Operand::Address {
        addr,
        crossed: (base & 0xFF00) != (addr & 0xFF00),
    }
}

#[inline]
fn direct(addr: u16) -> Operand {
    Operand::Address {
        addr,
        crossed: false,
    }
}

/// Consume the operand bytes for `mode` and compute the operand.
pub(crate) fn resolve<C: CpuRegs>(mode: AddressingMode, cpu: &mut C, bus: &mut Bus) -> Operand {
    match mode {
        AddressingMode::Implied => Operand::Implied,
        AddressingMode::Accumulator => Operand::Accumulator,
        AddressingMode::Immediate => Operand::Immediate(fetch_byte(cpu, bus)),
        AddressingMode::ZeroPage => direct(fetch_byte(cpu, bus) as u16),
        AddressingMode::ZeroPageX => direct(fetch_byte(cpu, bus).wrapping_add(cpu.x()) as u16),
        AddressingMode::ZeroPageY => direct(fetch_byte(cpu, bus).wrapping_add(cpu.y()) as u16),
        AddressingMode::Absolute => direct(fetch_word(cpu, bus)),
        AddressingMode::AbsoluteX => {
            let base = fetch_word(cpu, bus);
            indexed(base, cpu.x())
        }
        AddressingMode::AbsoluteY => {
            let base = fetch_word(cpu, bus);
            indexed(base, cpu.y())
        }
        AddressingMode::Indirect => {
            let ptr = fetch_word(cpu, bus);
            direct(read_word_indirect_bug(bus, ptr))
        }
        AddressingMode::IndexedIndirect => {
            let zp = fetch_byte(cpu, bus).wrapping_add(cpu.x());
            direct(read_word_zp(bus, zp))
        }
        AddressingMode::IndirectIndexed => {
            let zp = fetch_byte(cpu, bus);
            let base = read_word_zp(bus, zp);
            indexed(base, cpu.y())
        }
        AddressingMode::Relative => Operand::Relative(fetch_byte(cpu, bus) as i8),
    }
}

// -------------------------
// Low-level word helpers
// -------------------------

/// Read a 16-bit little endian pointer from zero page with wraparound
/// on the high byte (standard 6502 zero-page indirect behavior).
#[inline]
pub(crate) fn read_word_zp(bus: &mut Bus, base: u8) -> u16 {
    let lo = bus.read(base as u16) as u16;
    let hi = bus.read(base.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// Emulate the original 6502 JMP (indirect) hardware bug: when the
/// low byte of the indirect vector is 0xFF, the high byte does not
/// cross to the next page; it wraps within the same page.
#[inline]
pub(crate) fn read_word_indirect_bug(bus: &mut Bus, addr: u16) -> u16 {
    let lo = bus.read(addr) as u16;
    let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
    let hi = bus.read(hi_addr) as u16;
    (hi << 8) | lo
}
