/*!
execute.rs - 6502 instruction semantic helpers (ALU, flags, stack, RMW)

Purpose
=======
Centralize side-effect logic for instructions so every dispatch family
shares one implementation. All helpers are generic over `CpuRegs`; memory
access goes through an explicit `&mut Bus`.

Scope (crate-visible)
---------------------
Stack:
    push, pop, push_word, pop_word, push_status_with_break
    php, plp, pha, pla

Loads / transfers:
    lda/ldx/ldy, tax/tay/txa/tya, tsx/txs

Logical / arithmetic:
    and/ora/eor/bit, adc/sbc (binary + NMOS decimal), cmp_generic
    inx/iny/dex/dey

Shifts / rotates / INC / DEC:
    accumulator forms and memory forms; memory forms run through
    `rmw_memory` (read -> dummy write of the old value -> final write)

Branches:
    branch_offset, branch_cond (returns the 0/1/2 extra cycles)
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::Status;

// ---------------------------------------------------------------------------
// Flag helpers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn set_flag<C: CpuRegs>(cpu: &mut C, flag: Status, on: bool) {
    cpu.assign_flag(flag, on);
}

#[inline]
pub(crate) fn get_flag<C: CpuRegs>(cpu: &C, flag: Status) -> bool {
    cpu.is_flag_set(flag)
}

#[inline]
pub(crate) fn update_zn<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.update_zn(v);
}

// ---------------------------------------------------------------------------
// Stack helpers
// ---------------------------------------------------------------------------
//
// The stack lives on page $01. Push writes at $0100|SP then decrements;
// pull increments then reads.

#[inline]
pub(crate) fn push<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, v: u8) {
    let sp = cpu.sp();
    bus.write(0x0100 | sp as u16, v);
    cpu.set_sp(sp.wrapping_sub(1));
}

#[inline]
pub(crate) fn pop<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u8 {
    let sp = cpu.sp().wrapping_add(1);
    cpu.set_sp(sp);
    bus.read(0x0100 | sp as u16)
}

/// Push high byte first so the word pops back low, high.
#[inline]
pub(crate) fn push_word<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, v: u16) {
    push(cpu, bus, (v >> 8) as u8);
    push(cpu, bus, (v & 0xFF) as u8);
}

#[inline]
pub(crate) fn pop_word<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u16 {
    let lo = pop(cpu, bus) as u16;
    let hi = pop(cpu, bus) as u16;
    (hi << 8) | lo
}

/// Push P with control over Break flag semantics (BRK/PHP vs IRQ/NMI).
pub(crate) fn push_status_with_break<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, set_break: bool) {
    let v = cpu.compose_status_for_push(set_break);
    push(cpu, bus, v);
}

#[inline]
pub(crate) fn php<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    push_status_with_break(cpu, bus, true);
}

/// Pull P; BREAK is discarded and bit 5 forced on.
#[inline]
pub(crate) fn plp<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let v = pop(cpu, bus);
    cpu.set_status(Status::from_stack(v));
}

#[inline]
pub(crate) fn pha<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let a = cpu.a();
    push(cpu, bus, a);
}

#[inline]
pub(crate) fn pla<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let val = pop(cpu, bus);
    cpu.set_a(val);
    update_zn(cpu, val);
}

// ---------------------------------------------------------------------------
// Loads / Transfers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn lda<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_a(v);
    update_zn(cpu, v);
}

#[inline]
pub(crate) fn ldx<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_x(v);
    update_zn(cpu, v);
}

#[inline]
pub(crate) fn ldy<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_y(v);
    update_zn(cpu, v);
}

#[inline]
pub(crate) fn tax<C: CpuRegs>(cpu: &mut C) {
    let a = cpu.a();
    ldx(cpu, a);
}

#[inline]
pub(crate) fn tay<C: CpuRegs>(cpu: &mut C) {
    let a = cpu.a();
    ldy(cpu, a);
}

#[inline]
pub(crate) fn txa<C: CpuRegs>(cpu: &mut C) {
    let x = cpu.x();
    lda(cpu, x);
}

#[inline]
pub(crate) fn tya<C: CpuRegs>(cpu: &mut C) {
    let y = cpu.y();
    lda(cpu, y);
}

#[inline]
pub(crate) fn tsx<C: CpuRegs>(cpu: &mut C) {
    let sp = cpu.sp();
    ldx(cpu, sp);
}

/// TXS does not touch flags.
#[inline]
pub(crate) fn txs<C: CpuRegs>(cpu: &mut C) {
    cpu.set_sp(cpu.x());
}

// ---------------------------------------------------------------------------
// Logical / Bit
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn and<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() & v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn ora<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() | v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn eor<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() ^ v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn bit<C: CpuRegs>(cpu: &mut C, v: u8) {
    let a = cpu.a();
    set_flag(cpu, Status::ZERO, (a & v) == 0);
    set_flag(cpu, Status::NEGATIVE, (v & 0x80) != 0);
    set_flag(cpu, Status::OVERFLOW, (v & 0x40) != 0);
}

// ---------------------------------------------------------------------------
// Increment / Decrement (register)
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn inx<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.x().wrapping_add(1);
    ldx(cpu, v);
}

#[inline]
pub(crate) fn iny<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.y().wrapping_add(1);
    ldy(cpu, v);
}

#[inline]
pub(crate) fn dex<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.x().wrapping_sub(1);
    ldx(cpu, v);
}

#[inline]
pub(crate) fn dey<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.y().wrapping_sub(1);
    ldy(cpu, v);
}

// ---------------------------------------------------------------------------
// Shift / rotate kernels (shared by accumulator and memory forms)
// ---------------------------------------------------------------------------

#[inline]
fn asl_value<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    set_flag(cpu, Status::CARRY, (v & 0x80) != 0);
    v << 1
}

#[inline]
fn lsr_value<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    set_flag(cpu, Status::CARRY, (v & 0x01) != 0);
    v >> 1
}

#[inline]
fn rol_value<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let carry_in = get_flag(cpu, Status::CARRY) as u8;
    set_flag(cpu, Status::CARRY, (v & 0x80) != 0);
    (v << 1) | carry_in
}

#[inline]
fn ror_value<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let carry_in = if get_flag(cpu, Status::CARRY) { 0x80 } else { 0 };
    set_flag(cpu, Status::CARRY, (v & 0x01) != 0);
    (v >> 1) | carry_in
}

// ---------------------------------------------------------------------------
// Shifts / Rotates - Accumulator
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn asl_acc<C: CpuRegs>(cpu: &mut C) {
    let a = cpu.a();
    let r = asl_value(cpu, a);
    lda(cpu, r);
}

#[inline]
pub(crate) fn lsr_acc<C: CpuRegs>(cpu: &mut C) {
    let a = cpu.a();
    let r = lsr_value(cpu, a);
    lda(cpu, r);
}

#[inline]
pub(crate) fn rol_acc<C: CpuRegs>(cpu: &mut C) {
    let a = cpu.a();
    let r = rol_value(cpu, a);
    lda(cpu, r);
}

#[inline]
pub(crate) fn ror_acc<C: CpuRegs>(cpu: &mut C) {
    let a = cpu.a();
    let r = ror_value(cpu, a);
    lda(cpu, r);
}

// ---------------------------------------------------------------------------
// ADC / SBC
// ---------------------------------------------------------------------------

/// Add with carry. `decimal` enables NMOS BCD when the D flag is set.
#[inline]
pub(crate) fn adc<C: CpuRegs>(cpu: &mut C, v: u8, decimal: bool) {
    if decimal && get_flag(cpu, Status::DECIMAL) {
        adc_decimal(cpu, v);
    } else {
        adc_binary(cpu, v);
    }
}

/// Subtract with borrow (borrow = !C).
#[inline]
pub(crate) fn sbc<C: CpuRegs>(cpu: &mut C, v: u8, decimal: bool) {
    if decimal && get_flag(cpu, Status::DECIMAL) {
        sbc_decimal(cpu, v);
    } else {
        adc_binary(cpu, v ^ 0xFF);
    }
}

fn adc_binary<C: CpuRegs>(cpu: &mut C, v: u8) {
    let a = cpu.a();
    let carry_in = get_flag(cpu, Status::CARRY) as u16;
    let sum16 = a as u16 + v as u16 + carry_in;
    let result = sum16 as u8;

    set_flag(cpu, Status::CARRY, sum16 > 0xFF);
    // Overflow: operands share a sign that differs from the result's.
    set_flag(cpu, Status::OVERFLOW, ((!(a ^ v)) & (a ^ result) & 0x80) != 0);
    lda(cpu, result);
}

/// NMOS BCD add: Z from the binary sum, N and V from the intermediate high
/// nibble, C from the decimal-adjusted high nibble.
fn adc_decimal<C: CpuRegs>(cpu: &mut C, v: u8) {
    let a = cpu.a();
    let carry = get_flag(cpu, Status::CARRY) as u16;

    let mut lo = (a & 0x0F) as u16 + (v & 0x0F) as u16 + carry;
    if lo > 9 {
        lo += 6;
    }
    let mut hi = (a >> 4) as u16 + (v >> 4) as u16 + u16::from(lo > 0x0F);

    let binary = (a as u16 + v as u16 + carry) as u8;
    set_flag(cpu, Status::ZERO, binary == 0);
    set_flag(cpu, Status::NEGATIVE, (hi & 0x08) != 0);
    let intermediate = ((hi << 4) | (lo & 0x0F)) as u8;
    set_flag(
        cpu,
        Status::OVERFLOW,
        ((!(a ^ v)) & (a ^ intermediate) & 0x80) != 0,
    );

    if hi > 9 {
        hi += 6;
    }
    set_flag(cpu, Status::CARRY, hi > 0x0F);
    cpu.set_a(((hi << 4) | (lo & 0x0F)) as u8);
}

/// NMOS BCD subtract: all flags from the binary difference.
fn sbc_decimal<C: CpuRegs>(cpu: &mut C, v: u8) {
    let a = cpu.a();
    let borrow: i16 = if get_flag(cpu, Status::CARRY) { 0 } else { 1 };

    let binary = a as i16 - v as i16 - borrow;
    set_flag(cpu, Status::CARRY, binary >= 0);
    set_flag(cpu, Status::ZERO, (binary as u8) == 0);
    set_flag(cpu, Status::NEGATIVE, (binary & 0x80) != 0);
    set_flag(
        cpu,
        Status::OVERFLOW,
        ((a as i16 ^ binary) & (a as i16 ^ v as i16) & 0x80) != 0,
    );

    let mut lo = (a & 0x0F) as i16 - (v & 0x0F) as i16 - borrow;
    let mut hi = (a >> 4) as i16 - (v >> 4) as i16;
    if lo < 0 {
        lo -= 6;
        hi -= 1;
    }
    if hi < 0 {
        hi -= 6;
    }
    cpu.set_a((((hi << 4) & 0xF0) | (lo & 0x0F)) as u8);
}

// ---------------------------------------------------------------------------
// Compare
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn cmp_generic<C: CpuRegs>(cpu: &mut C, reg: u8, v: u8) {
    set_flag(cpu, Status::CARRY, reg >= v);
    update_zn(cpu, reg.wrapping_sub(v));
}

// ---------------------------------------------------------------------------
// Read-Modify-Write (memory) choreography
// ---------------------------------------------------------------------------

/// Canonical 6502 RMW sequence: read -> dummy write old -> write new.
/// Returns the final value.
pub(crate) fn rmw_memory<C: CpuRegs, F>(cpu: &mut C, bus: &mut Bus, addr: u16, transform: F) -> u8
where
    F: FnOnce(&mut C, u8) -> u8,
{
    let old = bus.read(addr);
    bus.write(addr, old);
    let newv = transform(cpu, old);
    bus.write(addr, newv);
    newv
}

// ---------------------------------------------------------------------------
// Shifts / Rotates / INC / DEC - Memory
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn asl_mem<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, addr: u16) {
    let r = rmw_memory(cpu, bus, addr, asl_value);
    update_zn(cpu, r);
}

#[inline]
pub(crate) fn lsr_mem<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, addr: u16) {
    let r = rmw_memory(cpu, bus, addr, lsr_value);
    update_zn(cpu, r);
}

#[inline]
pub(crate) fn rol_mem<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, addr: u16) {
    let r = rmw_memory(cpu, bus, addr, rol_value);
    update_zn(cpu, r);
}

#[inline]
pub(crate) fn ror_mem<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, addr: u16) {
    let r = rmw_memory(cpu, bus, addr, ror_value);
    update_zn(cpu, r);
}

#[inline]
pub(crate) fn inc_mem<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, addr: u16) {
    let r = rmw_memory(cpu, bus, addr, |_, old| old.wrapping_add(1));
    update_zn(cpu, r);
}

#[inline]
pub(crate) fn dec_mem<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, addr: u16) {
    let r = rmw_memory(cpu, bus, addr, |_, old| old.wrapping_sub(1));
    update_zn(cpu, r);
}

// ---------------------------------------------------------------------------
// Branch helpers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn branch_offset<C: CpuRegs>(cpu: &mut C, offset: i8) {
    let new_pc = cpu.pc().wrapping_add(offset as i16 as u16);
    cpu.set_pc(new_pc);
}

/// Apply an already-fetched displacement if `take`; return extra cycles
/// (0 not taken, 1 taken, 2 taken across a page).
pub(crate) fn branch_cond<C: CpuRegs>(cpu: &mut C, offset: i8, take: bool) -> u32 {
    if !take {
        return 0;
    }
    let old_pc = cpu.pc();
    branch_offset(cpu, offset);
    if (old_pc & 0xFF00) != (cpu.pc() & 0xFF00) {
        2
    } else {
        1
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::CpuState;

    fn setup() -> (CpuState, Bus) {
        (CpuState::new(), Bus::new())
    }

    #[test]
    fn adc_overflow_and_carry() {
        let (mut cpu, _bus) = setup();
        cpu.a = 0x50;
        adc(&mut cpu, 0x50, false); // 0x50 + 0x50 = 0xA0 (signed overflow)
        assert!(get_flag(&cpu, Status::OVERFLOW));
        assert!(!get_flag(&cpu, Status::CARRY));
        assert!(get_flag(&cpu, Status::NEGATIVE));
        cpu.a = 0xF0;
        adc(&mut cpu, 0x20, false); // 0xF0 + 0x20 = 0x110
        assert!(get_flag(&cpu, Status::CARRY));
        assert_eq!(cpu.a, 0x10);
    }

    #[test]
    fn sbc_basic() {
        let (mut cpu, _bus) = setup();
        cpu.a = 0x10;
        set_flag(&mut cpu, Status::CARRY, true);
        sbc(&mut cpu, 0x01, false);
        assert_eq!(cpu.a, 0x0F);
        assert!(get_flag(&cpu, Status::CARRY));

        sbc(&mut cpu, 0x10, false);
        assert_eq!(cpu.a, 0xFF);
        assert!(!get_flag(&cpu, Status::CARRY));
    }

    #[test]
    fn decimal_flag_ignored_without_decimal_mode() {
        let (mut cpu, _bus) = setup();
        set_flag(&mut cpu, Status::DECIMAL, true);
        cpu.a = 0x09;
        adc(&mut cpu, 0x01, false);
        assert_eq!(cpu.a, 0x0A);
    }

    #[test]
    fn decimal_adc_and_sbc() {
        let (mut cpu, _bus) = setup();
        set_flag(&mut cpu, Status::DECIMAL, true);
        cpu.a = 0x09;
        adc(&mut cpu, 0x01, true);
        assert_eq!(cpu.a, 0x10);
        assert!(!get_flag(&cpu, Status::CARRY));

        cpu.a = 0x99;
        adc(&mut cpu, 0x01, true);
        assert_eq!(cpu.a, 0x00);
        assert!(get_flag(&cpu, Status::CARRY));

        set_flag(&mut cpu, Status::CARRY, true);
        cpu.a = 0x10;
        sbc(&mut cpu, 0x01, true);
        assert_eq!(cpu.a, 0x09);
        assert!(get_flag(&cpu, Status::CARRY));

        set_flag(&mut cpu, Status::CARRY, true);
        cpu.a = 0x00;
        sbc(&mut cpu, 0x01, true);
        assert_eq!(cpu.a, 0x99);
        assert!(!get_flag(&cpu, Status::CARRY));
    }

    #[test]
    fn rmw_performs_dummy_write_then_final_value() {
        let (mut cpu, mut bus) = setup();
        let addr = 0x0200;
        bus.write(addr, 0x0F);
        inc_mem(&mut cpu, &mut bus, addr);
        assert_eq!(bus.read(addr), 0x10);
        assert!(!get_flag(&cpu, Status::ZERO));

        bus.write(addr, 0x80);
        asl_mem(&mut cpu, &mut bus, addr);
        assert_eq!(bus.read(addr), 0x00);
        assert!(get_flag(&cpu, Status::CARRY));
        assert!(get_flag(&cpu, Status::ZERO));
    }

    #[test]
    fn branch_cond_page_cross() {
        let (mut cpu, _bus) = setup();
        cpu.pc = 0x80FF;
        assert_eq!(branch_cond(&mut cpu, 0x02, true), 2);
        assert_eq!(cpu.pc, 0x8101);
        assert_eq!(branch_cond(&mut cpu, -0x01, true), 1);
        assert_eq!(cpu.pc, 0x8100);
        assert_eq!(branch_cond(&mut cpu, 0x10, false), 0);
        assert_eq!(cpu.pc, 0x8100);
    }

    #[test]
    fn stack_push_pop_round_trip() {
        let (mut cpu, mut bus) = setup();
        push_word(&mut cpu, &mut bus, 0xABCD);
        assert_eq!(cpu.sp, 0xFB);
        assert_eq!(bus.read(0x01FD), 0xAB);
        assert_eq!(bus.read(0x01FC), 0xCD);
        assert_eq!(pop_word(&mut cpu, &mut bus), 0xABCD);
        assert_eq!(cpu.sp, 0xFD);
    }

    #[test]
    fn plp_discards_break() {
        let (mut cpu, mut bus) = setup();
        push(&mut cpu, &mut bus, 0xFF);
        plp(&mut cpu, &mut bus);
        assert_eq!(cpu.status().bits(), 0xEF);
    }

    #[test]
    fn generic_register_ops() {
        let (mut cpu, _bus) = setup();
        lda(&mut cpu, 0x10);
        ldx(&mut cpu, 0x01);
        inx(&mut cpu);
        assert_eq!(cpu.x, 0x02);
        and(&mut cpu, 0x00);
        assert_eq!(cpu.a, 0x00);
        assert!(get_flag(&cpu, Status::ZERO));
        ora(&mut cpu, 0x80);
        assert_eq!(cpu.a, 0x80);
        assert!(get_flag(&cpu, Status::NEGATIVE));
        rol_acc(&mut cpu); // 0x80 -> sets carry, A becomes 0x00
        assert_eq!(cpu.a, 0x00);
        assert!(get_flag(&cpu, Status::CARRY));
        assert!(get_flag(&cpu, Status::ZERO));
        ror_acc(&mut cpu); // carry back into bit 7
        assert_eq!(cpu.a, 0x80);
        assert!(!get_flag(&cpu, Status::CARRY));
    }
}
