/*!
branches.rs - Relative branch opcode handler (BPL/BMI/BVC/BVS/BCC/BCS/BNE/BEQ)

Overview
========
Executes all conditional relative branch instructions:
- Compute the branch condition.
- If taken, add the already-fetched displacement to PC.
- Add +1 (taken) / +2 (taken + page cross) to *cycles via `branch_cond`.

Cycle Rules
===========
Base cost: 2 cycles (from the decode table).
Taken: +1. Taken and the target is on another page than the next
instruction: +2 total.
*/

use crate::cpu::addressing::Operand;
use crate::cpu::execute::{branch_cond, get_flag};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::Status;
use crate::cpu::table::Mnemonic;

pub(super) fn handle<C: CpuRegs>(m: Mnemonic, operand: Operand, cpu: &mut C, cycles: &mut u32) -> bool {
    let take = match m {
        Mnemonic::Bpl => !get_flag(cpu, Status::NEGATIVE),
        Mnemonic::Bmi => get_flag(cpu, Status::NEGATIVE),
        Mnemonic::Bvc => !get_flag(cpu, Status::OVERFLOW),
        Mnemonic::Bvs => get_flag(cpu, Status::OVERFLOW),
        Mnemonic::Bcc => !get_flag(cpu, Status::CARRY),
        Mnemonic::Bcs => get_flag(cpu, Status::CARRY),
        Mnemonic::Bne => !get_flag(cpu, Status::ZERO),
        Mnemonic::Beq => get_flag(cpu, Status::ZERO),
        _ => return false,
    };
    let Operand::Relative(offset) = operand else {
        return false;
    };
    *cycles += branch_cond(cpu, offset, take);
    true
}

#[cfg(test)]
mod tests {
    use crate::test_utils::setup;

    #[test]
    fn branch_not_taken_base_cycles() {
        // BCS +2 with carry clear after reset: not taken.
        let (mut cpu, mut bus) = setup(&[0xB0, 0x02, 0xEA, 0x00]);
        let s = cpu.step(&mut bus).expect("step");
        assert_eq!(cpu.last_cycles(), 2);
        assert_eq!(s.pc, 0x8002);
    }

    #[test]
    fn branch_taken_no_page_cross() {
        // BCC +2 (carry clear) skips the NOP.
        let (mut cpu, mut bus) = setup(&[0x90, 0x02, 0xEA, 0x00]);
        let s = cpu.step(&mut bus).expect("step");
        assert_eq!(cpu.last_cycles(), 3);
        assert_eq!(s.pc, 0x8004);
    }

    #[test]
    fn branch_taken_page_cross() {
        // 0xFD NOPs, then BCC +1 at $80FD; next instruction $80FF, target $8100.
        let mut prg = vec![0xEA; 0x00FD];
        prg.push(0x90);
        prg.push(0x01);
        let (mut cpu, mut bus) = setup(&prg);
        for _ in 0..0x00FD {
            cpu.step(&mut bus).expect("nop");
            assert_eq!(cpu.last_cycles(), 2);
        }
        let s = cpu.step(&mut bus).expect("bcc");
        assert_eq!(s.pc, 0x8100);
        assert_eq!(cpu.last_cycles(), 4);
    }

    #[test]
    fn backward_branch_loop() {
        // LDX #$03; DEX; BNE -3; -> exits with X = 0
        let (mut cpu, mut bus) = setup(&[0xA2, 0x03, 0xCA, 0xD0, 0xFD, 0xEA]);
        cpu.run(&mut bus, 7).expect("run");
        assert_eq!(cpu.x(), 0);
        assert_eq!(cpu.pc(), 0x8005);
    }
}
