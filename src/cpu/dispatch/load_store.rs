/*!
load_store.rs - Load / Store opcode family handler

Overview
========
Loads (set Z/N):     LDA, LDX, LDY
Stores (no flags):   STA, STX, STY

The operand has already been resolved by the dispatcher, and the page-cross
penalty for indexed loads is applied there from the decode table. Stores
never read their target address.

Return Contract
===============
`handle` returns:
- true  => mnemonic belongs to this family and was executed
- false => not a load/store; caller continues the chain
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{lda, ldx, ldy};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Mnemonic;

pub(super) fn handle<C: CpuRegs>(m: Mnemonic, operand: Operand, cpu: &mut C, bus: &mut Bus) -> bool {
    match m {
        Mnemonic::Lda => {
            let v = operand.value(cpu, bus);
            lda(cpu, v);
        }
        Mnemonic::Ldx => {
            let v = operand.value(cpu, bus);
            ldx(cpu, v);
        }
        Mnemonic::Ldy => {
            let v = operand.value(cpu, bus);
            ldy(cpu, v);
        }
        Mnemonic::Sta => store(operand, cpu.a(), bus),
        Mnemonic::Stx => store(operand, cpu.x(), bus),
        Mnemonic::Sty => store(operand, cpu.y(), bus),
        _ => return false,
    }
    true
}

#[inline]
fn store(operand: Operand, value: u8, bus: &mut Bus) {
    if let Some(addr) = operand.address() {
        bus.write(addr, value);
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu::state::Status;
    use crate::test_utils::setup;

    #[test]
    fn lda_immediate_sets_a_and_flags() {
        let (mut cpu, mut bus) = setup(&[0xA9, 0x00, 0xA9, 0x80, 0xA9, 0x42]);
        let s = cpu.step(&mut bus).expect("step");
        assert_eq!(s.a, 0x00);
        assert!(s.status().contains(Status::ZERO));
        assert_eq!(cpu.last_cycles(), 2);
        assert_eq!(s.pc, 0x8002);

        let s = cpu.step(&mut bus).expect("step");
        assert_eq!(s.a, 0x80);
        assert!(s.status().contains(Status::NEGATIVE));
        assert!(!s.status().contains(Status::ZERO));

        let s = cpu.step(&mut bus).expect("step");
        assert_eq!(s.a, 0x42);
        assert!(!s.status().contains(Status::NEGATIVE));
        assert!(!s.status().contains(Status::ZERO));
    }

    #[test]
    fn store_and_reload_through_ram() {
        // LDX #$07; STX $0200; LDY $0200
        let (mut cpu, mut bus) = setup(&[0xA2, 0x07, 0x8E, 0x00, 0x02, 0xAC, 0x00, 0x02]);
        cpu.step(&mut bus).expect("ldx");
        cpu.step(&mut bus).expect("stx");
        assert_eq!(cpu.last_cycles(), 4);
        assert_eq!(bus.read(0x0200), 0x07);
        let s = cpu.step(&mut bus).expect("ldy");
        assert_eq!(s.y, 0x07);
        assert_eq!(cpu.last_cycles(), 4);
    }

    #[test]
    fn indexed_load_page_cross_costs_one_cycle() {
        // LDX #$10; LDA $80F5,X (crosses into $8105)
        let (mut cpu, mut bus) = setup(&[0xA2, 0x10, 0xBD, 0xF5, 0x80]);
        cpu.step(&mut bus).expect("ldx");
        cpu.step(&mut bus).expect("lda");
        assert_eq!(cpu.last_cycles(), 5);
    }

    #[test]
    fn indexed_store_has_fixed_cost() {
        // LDX #$10; STA $02F5,X (crosses, but stores always take 5)
        let (mut cpu, mut bus) = setup(&[0xA2, 0x10, 0x9D, 0xF5, 0x02]);
        cpu.step(&mut bus).expect("ldx");
        cpu.step(&mut bus).expect("sta");
        assert_eq!(cpu.last_cycles(), 5);
    }
}
