/*!
regs.rs - `CpuRegs`: the minimal register + flag interface instruction
semantics are written against.

The trait does NOT include:
  - Stack push/pop
  - Instruction fetch helpers
  - Bus access of any kind

Memory, stack, and fetch operations stay explicit at call sites via
`&mut Bus`, which keeps borrows short and implementations trivial.
Execute / dispatch helpers are generic (`fn op<C: CpuRegs>(cpu: &mut C)`),
so they are statically dispatched with no trait-object overhead.
*/

use crate::cpu::state::{CpuState, Status};

/// Register + flag access used by execute / dispatch code.
pub trait CpuRegs {
    // ---------------------------------------------------------------------
    // Read accessors
    // ---------------------------------------------------------------------
    fn a(&self) -> u8;
    fn x(&self) -> u8;
    fn y(&self) -> u8;
    fn sp(&self) -> u8;
    fn pc(&self) -> u16;
    fn status(&self) -> Status;

    // ---------------------------------------------------------------------
    // Mutators
    // ---------------------------------------------------------------------
    fn set_a(&mut self, v: u8);
    fn set_x(&mut self, v: u8);
    fn set_y(&mut self, v: u8);
    fn set_sp(&mut self, v: u8);
    fn set_pc(&mut self, v: u16);
    /// Implementations must keep bit 5 set and BREAK clear.
    fn set_status(&mut self, v: Status);

    // ---------------------------------------------------------------------
    // Program Counter helpers
    // ---------------------------------------------------------------------
    fn advance_pc(&mut self, delta: u16);

    #[inline]
    fn advance_pc_one(&mut self) {
        self.advance_pc(1);
    }

    // ---------------------------------------------------------------------
    // Flag operations
    // ---------------------------------------------------------------------
    fn is_flag_set(&self, flag: Status) -> bool;

    fn assign_flag(&mut self, flag: Status, value: bool);

    /// Composite: update ZERO and NEGATIVE based on result.
    #[inline]
    fn update_zn(&mut self, result: u8) {
        self.assign_flag(Status::ZERO, result == 0);
        self.assign_flag(Status::NEGATIVE, (result & 0x80) != 0);
    }

    /// Status byte as pushed by PHP/BRK (`set_break`) or IRQ/NMI.
    #[inline]
    fn compose_status_for_push(&self, set_break: bool) -> u8 {
        let mut v = self.status() | Status::UNUSED;
        v.set(Status::BREAK, set_break);
        v.bits()
    }
}

// -------------------------------------------------------------------------
// Implementation: CpuState (canonical)
// -------------------------------------------------------------------------

impl CpuRegs for CpuState {
    #[inline]
    fn a(&self) -> u8 {
        self.a
    }
    #[inline]
    fn x(&self) -> u8 {
        self.x
    }
    #[inline]
    fn y(&self) -> u8 {
        self.y
    }
    #[inline]
    fn sp(&self) -> u8 {
        self.sp
    }
    #[inline]
    fn pc(&self) -> u16 {
        self.pc
    }
    #[inline]
    fn status(&self) -> Status {
        self.status
    }

    #[inline]
    fn set_a(&mut self, v: u8) {
        self.a = v;
    }
    #[inline]
    fn set_x(&mut self, v: u8) {
        self.x = v;
    }
    #[inline]
    fn set_y(&mut self, v: u8) {
        self.y = v;
    }
    #[inline]
    fn set_sp(&mut self, v: u8) {
        self.sp = v;
    }
    #[inline]
    fn set_pc(&mut self, v: u16) {
        self.pc = v;
    }
    #[inline]
    fn set_status(&mut self, v: Status) {
        CpuState::set_status(self, v);
    }

    #[inline]
    fn advance_pc(&mut self, delta: u16) {
        CpuState::advance_pc(self, delta);
    }

    #[inline]
    fn is_flag_set(&self, flag: Status) -> bool {
        CpuState::is_flag_set(self, flag)
    }

    #[inline]
    fn assign_flag(&mut self, flag: Status, value: bool) {
        CpuState::assign_flag(self, flag, value);
    }
}
