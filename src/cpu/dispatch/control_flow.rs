/*!
control_flow.rs - Control-flow / system opcode family handler

Overview
========
  JMP abs        (0x4C)
  JMP (ind)      (0x6C)  (indirect page-wrap quirk applied during resolve)
  JSR abs        (0x20)
  RTS            (0x60)
  RTI            (0x40)
  BRK            (0x00)

Behavior Details
================
- JSR pushes (PC - 1), high byte first; RTS pulls it and adds 1.
- RTI pulls status (BREAK discarded, bit 5 forced) then PC. No +1.
- BRK skips its padding byte: it pushes PC + 2 relative to the opcode,
  then status with BREAK set, sets I and jumps through $FFFE/$FFFF.
  BRK is an ordinary software interrupt; it never halts the CPU.

Cycle counts come straight from the decode table (JSR/RTS/RTI 6, BRK 7,
JMP 3/5).
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{php, plp, pop_word, push_word, set_flag};
use crate::cpu::interrupts::Interrupt;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::Status;
use crate::cpu::table::Mnemonic;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[inline]
fn op_jsr<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, target: u16) {
    // PC already points past the operand; push the address of its last byte.
    let ret = cpu.pc().wrapping_sub(1);
    push_word(cpu, bus, ret);
    cpu.set_pc(target);
}

#[inline]
fn op_rts<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let ret = pop_word(cpu, bus);
    cpu.set_pc(ret.wrapping_add(1));
}

#[inline]
fn op_brk<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let ret = cpu.pc().wrapping_add(1);
    push_word(cpu, bus, ret);
    php(cpu, bus);
    set_flag(cpu, Status::INTERRUPT_DISABLE, true);
    let vector = bus.read_word(Interrupt::Irq.vector());
    cpu.set_pc(vector);
}

#[inline]
fn op_rti<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    plp(cpu, bus);
    let return_pc = pop_word(cpu, bus);
    cpu.set_pc(return_pc);
}

pub(super) fn handle<C: CpuRegs>(m: Mnemonic, operand: Operand, cpu: &mut C, bus: &mut Bus) -> bool {
    match m {
        Mnemonic::Jmp => match operand.address() {
            Some(target) => cpu.set_pc(target),
            None => return false,
        },
        Mnemonic::Jsr => match operand.address() {
            Some(target) => op_jsr(cpu, bus, target),
            None => return false,
        },
        Mnemonic::Rts => op_rts(cpu, bus),
        Mnemonic::Rti => op_rti(cpu, bus),
        Mnemonic::Brk => op_brk(cpu, bus),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use crate::cpu::state::Status;
    use crate::test_utils::{setup, setup_with_vectors};

    #[test]
    fn jsr_rts_round_trip() {
        // $8000: JSR $8010 ; $8003: NOP ... $8010: RTS
        let mut prg = vec![0xEA; 0x20];
        prg[0..3].copy_from_slice(&[0x20, 0x10, 0x80]);
        prg[0x10] = 0x60;
        let (mut cpu, mut bus) = setup(&prg);
        let s = cpu.step(&mut bus).expect("jsr");
        assert_eq!(s.pc, 0x8010);
        assert_eq!(s.sp, 0xFB);
        assert_eq!(cpu.last_cycles(), 6);
        assert_eq!(bus.read(0x01FD), 0x80);
        assert_eq!(bus.read(0x01FC), 0x02);
        let s = cpu.step(&mut bus).expect("rts");
        assert_eq!(s.pc, 0x8003);
        assert_eq!(s.sp, 0xFD);
        assert_eq!(cpu.last_cycles(), 6);
    }

    #[test]
    fn jmp_indirect_page_wrap() {
        // JMP ($02FF): low from $02FF, high from $0200.
        let (mut cpu, mut bus) = setup(&[0x6C, 0xFF, 0x02]);
        bus.write(0x02FF, 0x34);
        bus.write(0x0200, 0x12);
        bus.write(0x0300, 0x99);
        let s = cpu.step(&mut bus).expect("jmp");
        assert_eq!(s.pc, 0x1234);
        assert_eq!(cpu.last_cycles(), 5);
    }

    #[test]
    fn brk_pushes_pc_plus_two_and_break_flag() {
        let (mut cpu, mut bus) = setup_with_vectors(&[0x00, 0xFF], (0x8000, 0x9000, 0x9100));
        let s = cpu.step(&mut bus).expect("brk");
        assert_eq!(s.pc, 0x9100);
        assert_eq!(cpu.last_cycles(), 7);
        assert!(s.status().contains(Status::INTERRUPT_DISABLE));
        assert!(!cpu.is_halted());
        // Stack: PCH, PCL, P
        assert_eq!(bus.read(0x01FD), 0x80);
        assert_eq!(bus.read(0x01FC), 0x02);
        assert_eq!(bus.read(0x01FB) & 0x30, 0x30);
    }

    #[test]
    fn rti_restores_status_without_break() {
        // Hand-built interrupt frame: P=$FF, PC=$8123.
        let (mut cpu, mut bus) = setup(&[0x40]);
        bus.write(0x01FD, 0x81);
        bus.write(0x01FC, 0x23);
        bus.write(0x01FB, 0xFF);
        cpu.set_sp(0xFA);
        let s = cpu.step(&mut bus).expect("rti");
        assert_eq!(s.pc, 0x8123);
        assert_eq!(s.status().bits(), 0xEF);
        assert_eq!(s.sp, 0xFD);
    }
}
