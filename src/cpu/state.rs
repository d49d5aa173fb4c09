/*!
state.rs - Canonical 6502 architectural state (registers, flags, cycle
counter) and inline-friendly helpers.

Overview
========
`CpuState` is the single owner of every architecturally visible register. It
is `Copy`, so a snapshot can be handed to a UI or debugger after each step
without borrowing the CPU. It deliberately excludes:
  - Bus / memory logic
  - Instruction decode / dispatch
  - Interrupt latches and execution state (see `core` / `interrupts`)

6502 Status Register Bit Layout
===============================
Bit: 7 6 5 4 3 2 1 0
     N V 1 B D I Z C
Where:
  N = NEGATIVE
  V = OVERFLOW
  1 = UNUSED (always reads as 1)
  B = BREAK (exists only in pushed copies: PHP/BRK set it, IRQ/NMI clear it)
  D = DECIMAL (ignored by the 2A03 unless decimal mode is configured)
  I = INTERRUPT_DISABLE
  Z = ZERO
  C = CARRY

Invariants
==========
- `UNUSED` is always set in the live register.
- `BREAK` is never set in the live register.
`set_status` enforces both, so every write path (PLP, RTI, tools) is covered.
*/

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Processor status register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        const CARRY = 0b0000_0001;
        const ZERO = 0b0000_0010;
        const INTERRUPT_DISABLE = 0b0000_0100;
        const DECIMAL = 0b0000_1000;
        const BREAK = 0b0001_0000;
        const UNUSED = 0b0010_0000;
        const OVERFLOW = 0b0100_0000;
        const NEGATIVE = 0b1000_0000;
    }
}

impl Status {
    /// Power-on / reset value: interrupts masked, bit 5 set.
    pub const RESET: Status = Status::INTERRUPT_DISABLE.union(Status::UNUSED);

    /// Normalize a raw byte into a valid live register value.
    #[inline]
    pub fn from_stack(raw: u8) -> Status {
        (Status::from_bits_retain(raw) | Status::UNUSED) - Status::BREAK
    }
}

impl fmt::Display for Status {
    /// `NV-BDIZC` style, upper case when set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Status, char); 8] = [
            (Status::NEGATIVE, 'N'),
            (Status::OVERFLOW, 'V'),
            (Status::UNUSED, 'U'),
            (Status::BREAK, 'B'),
            (Status::DECIMAL, 'D'),
            (Status::INTERRUPT_DISABLE, 'I'),
            (Status::ZERO, 'Z'),
            (Status::CARRY, 'C'),
        ];
        for (flag, c) in NAMES {
            if self.contains(flag) {
                write!(f, "{c}")?;
            } else {
                write!(f, "{}", c.to_ascii_lowercase())?;
            }
        }
        Ok(())
    }
}

/// Architectural register file plus the running cycle count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub(crate) status: Status,
    /// Total CPU cycles since power-on (reset sequence counts as 7).
    pub cycles: u64,
}

impl Default for CpuState {
    fn default() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0x0000,
            status: Status::RESET,
            cycles: 0,
        }
    }
}

impl CpuState {
    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    /// Create a new CPU state using power-up defaults.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Basic Accessors (Read)
    // ---------------------------------------------------------------------
    #[inline]
    pub fn a(&self) -> u8 {
        self.a
    }
    #[inline]
    pub fn x(&self) -> u8 {
        self.x
    }
    #[inline]
    pub fn y(&self) -> u8 {
        self.y
    }
    #[inline]
    pub fn sp(&self) -> u8 {
        self.sp
    }
    #[inline]
    pub fn pc(&self) -> u16 {
        self.pc
    }
    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    // ---------------------------------------------------------------------
    // Mutators (Write)
    // ---------------------------------------------------------------------
    #[inline]
    pub fn set_a(&mut self, v: u8) {
        self.a = v;
    }
    #[inline]
    pub fn set_x(&mut self, v: u8) {
        self.x = v;
    }
    #[inline]
    pub fn set_y(&mut self, v: u8) {
        self.y = v;
    }
    #[inline]
    pub fn set_sp(&mut self, v: u8) {
        self.sp = v;
    }
    #[inline]
    pub fn set_pc(&mut self, v: u16) {
        self.pc = v;
    }

    /// Replace the status register. Bit 5 is forced on and BREAK is dropped.
    #[inline]
    pub fn set_status(&mut self, v: Status) {
        self.status = (v | Status::UNUSED) - Status::BREAK;
    }

    // ---------------------------------------------------------------------
    // Program Counter Helpers
    // ---------------------------------------------------------------------

    /// Advance PC by `delta` (wrapping at 16 bits).
    #[inline]
    pub fn advance_pc(&mut self, delta: u16) {
        self.pc = self.pc.wrapping_add(delta);
    }

    // ---------------------------------------------------------------------
    // Flag Operations
    // ---------------------------------------------------------------------

    #[inline]
    pub fn is_flag_set(&self, flag: Status) -> bool {
        self.status.contains(flag)
    }

    /// Set or clear `flag`. BREAK and UNUSED are not assignable.
    #[inline]
    pub fn assign_flag(&mut self, flag: Status, value: bool) {
        let flag = flag - (Status::BREAK | Status::UNUSED);
        self.status.set(flag, value);
    }

    /// Compose the status byte for pushing to stack (BRK/PHP vs. IRQ/NMI).
    pub fn compose_status_for_push(&self, set_break: bool) -> u8 {
        let mut v = self.status | Status::UNUSED;
        v.set(Status::BREAK, set_break);
        v.bits()
    }

    // ---------------------------------------------------------------------
    // Cycle accounting
    // ---------------------------------------------------------------------

    #[inline]
    pub(crate) fn add_cycles(&mut self, n: u32) {
        self.cycles = self.cycles.wrapping_add(n as u64);
    }
}

impl fmt::Display for CpuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PC:{:04X} CYC:{}",
            self.a,
            self.x,
            self.y,
            self.status.bits(),
            self.sp,
            self.pc,
            self.cycles
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_power_up() {
        let s = CpuState::new();
        assert_eq!(s.a(), 0);
        assert_eq!(s.x(), 0);
        assert_eq!(s.y(), 0);
        assert_eq!(s.sp(), 0xFD);
        assert!(s.is_flag_set(Status::INTERRUPT_DISABLE));
        assert!(s.is_flag_set(Status::UNUSED));
        assert_eq!(s.status().bits(), 0x24);
    }

    #[test]
    fn flag_assignment() {
        let mut s = CpuState::new();
        s.assign_flag(Status::INTERRUPT_DISABLE, false);
        assert!(!s.is_flag_set(Status::INTERRUPT_DISABLE));
        s.assign_flag(Status::DECIMAL, true);
        assert!(s.is_flag_set(Status::DECIMAL));
        s.assign_flag(Status::DECIMAL, false);
        assert!(!s.is_flag_set(Status::DECIMAL));
    }

    #[test]
    fn break_and_unused_cannot_be_assigned() {
        let mut s = CpuState::new();
        s.assign_flag(Status::BREAK, true);
        s.assign_flag(Status::UNUSED, false);
        assert!(!s.is_flag_set(Status::BREAK));
        assert!(s.is_flag_set(Status::UNUSED));

        s.set_status(Status::from_bits_retain(0xFF));
        assert_eq!(s.status().bits(), 0xEF);
        s.set_status(Status::empty());
        assert_eq!(s.status().bits(), 0x20);
    }

    #[test]
    fn pc_advance_wraps() {
        let mut s = CpuState::new();
        s.set_pc(0xFFFF);
        s.advance_pc(1);
        assert_eq!(s.pc(), 0x0000);
        s.advance_pc(2);
        assert_eq!(s.pc(), 0x0002);
    }

    #[test]
    fn compose_status_break_flag_behavior() {
        let s = CpuState::new();
        let with_break = s.compose_status_for_push(true);
        let without_break = s.compose_status_for_push(false);
        assert_eq!(with_break, 0x34);
        assert_eq!(without_break, 0x24);
    }

    #[test]
    fn from_stack_normalizes() {
        assert_eq!(Status::from_stack(0x10).bits(), 0x20);
        assert_eq!(Status::from_stack(0xC3).bits(), 0xE3);
    }

    #[test]
    fn display_formats() {
        let mut s = CpuState::new();
        s.pc = 0xC000;
        s.cycles = 7;
        assert_eq!(s.to_string(), "A:00 X:00 Y:00 P:24 SP:FD PC:C000 CYC:7");
        assert_eq!(s.status().to_string(), "nvUbdIzc");
    }
}
