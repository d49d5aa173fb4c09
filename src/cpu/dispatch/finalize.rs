/*!
finalize.rs - Undocumented opcode handling under the configured policy.

Overview
========
Every opcode the decode table marks as unofficial reaches this module
instead of the family chain. What happens depends on
`IllegalOpcodePolicy`:

- `Fault`: PC is rewound to the opcode byte and `StepError::IllegalOpcode`
  is returned. No operand bytes are consumed and no cycles are charged, so
  the host may halt, or change policy and step again.
- `Nop`: the operand bytes are consumed through normal operand resolution
  (pointer reads included) and the published cycle cost is charged,
  including the page-cross penalty where the table lists one. JAM opcodes
  report `Finalized::Jammed` and the core enters its halted state.

Non-Responsibilities
====================
- Does NOT emulate the data effects of undocumented opcodes (LAX, DCP, ...).
- Does NOT touch the cycle counter; cycles are returned to the caller.
*/

use log::warn;

use crate::bus::Bus;
use crate::config::IllegalOpcodePolicy;
use crate::cpu::addressing::resolve;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::{InstructionRecord, Mnemonic};
use crate::error::StepError;

/// Outcome of an unofficial opcode that did not fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Finalized {
    Retired(u32),
    Jammed,
}

/// Apply the illegal-opcode policy. `opcode_pc` is the address of the opcode
/// byte; PC currently points one past it.
pub(crate) fn handle_unofficial<C: CpuRegs>(
    record: &InstructionRecord,
    opcode_pc: u16,
    cpu: &mut C,
    bus: &mut Bus,
    policy: IllegalOpcodePolicy,
) -> Result<Finalized, StepError> {
    match policy {
        IllegalOpcodePolicy::Fault => {
            warn!(
                "illegal opcode ${:02X} ({}) at ${:04X}",
                record.opcode, record.mnemonic, opcode_pc
            );
            cpu.set_pc(opcode_pc);
            Err(StepError::IllegalOpcode {
                opcode: record.opcode,
                pc: opcode_pc,
            })
        }
        IllegalOpcodePolicy::Nop if record.mnemonic == Mnemonic::Jam => {
            warn!("JAM ${:02X} at ${:04X}; CPU halted", record.opcode, opcode_pc);
            cpu.set_pc(opcode_pc);
            Ok(Finalized::Jammed)
        }
        IllegalOpcodePolicy::Nop => {
            let operand = resolve(record.mode, cpu, bus);
            let mut cycles = record.cycles as u32;
            if record.page_penalty && operand.crossed() {
                cycles += 1;
            }
            Ok(Finalized::Retired(cycles))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{CpuConfig, IllegalOpcodePolicy};
    use crate::cpu::core::ExecState;
    use crate::error::StepError;
    use crate::test_utils::{setup, setup_with_config};

    fn nop_policy() -> CpuConfig {
        CpuConfig::default().with_illegal_opcodes(IllegalOpcodePolicy::Nop)
    }

    #[test]
    fn fault_reports_opcode_and_address() {
        let (mut cpu, mut bus) = setup(&[0xEA, 0xA7, 0x10]);
        cpu.step(&mut bus).expect("nop");
        let cycles_before = cpu.cycles();
        let err = cpu.step(&mut bus).unwrap_err();
        assert_eq!(
            err,
            StepError::IllegalOpcode {
                opcode: 0xA7,
                pc: 0x8001
            }
        );
        assert_eq!(cpu.pc(), 0x8001);
        assert_eq!(cpu.cycles(), cycles_before);
        assert_eq!(cpu.exec_state(), ExecState::Fetch);
    }

    #[test]
    fn fault_then_retry_with_nop_policy() {
        let (mut cpu, mut bus) = setup(&[0x04, 0x10, 0xEA]);
        assert!(cpu.step(&mut bus).is_err());
        cpu.set_config(nop_policy());
        let s = cpu.step(&mut bus).expect("nop zp");
        assert_eq!(s.pc, 0x8002);
        assert_eq!(cpu.last_cycles(), 3);
    }

    #[test]
    fn nop_policy_charges_page_penalty() {
        // LDX #$FF; NOP $80F0,X (undocumented abs,X read: 4 + 1)
        let (mut cpu, mut bus) = setup_with_config(&[0xA2, 0xFF, 0x1C, 0xF0, 0x80], nop_policy());
        cpu.step(&mut bus).expect("ldx");
        let s = cpu.step(&mut bus).expect("nop abs,x");
        assert_eq!(s.pc, 0x8005);
        assert_eq!(cpu.last_cycles(), 5);
    }

    #[test]
    fn nop_policy_leaves_registers_alone() {
        // LAX $10 would load A and X on hardware; here it is a no-op.
        let (mut cpu, mut bus) = setup_with_config(&[0xA7, 0x10], nop_policy());
        bus.write(0x0010, 0x55);
        let s = cpu.step(&mut bus).expect("lax");
        assert_eq!(s.a, 0);
        assert_eq!(s.x, 0);
        assert_eq!(cpu.last_cycles(), 3);
    }

    #[test]
    fn jam_halts_until_reset() {
        let (mut cpu, mut bus) = setup_with_config(&[0x02, 0xEA], nop_policy());
        let err = cpu.step(&mut bus).unwrap_err();
        assert_eq!(
            err,
            StepError::Halted {
                opcode: 0x02,
                pc: 0x8000
            }
        );
        assert!(cpu.is_halted());
        assert_eq!(
            cpu.step(&mut bus).unwrap_err(),
            StepError::Halted {
                opcode: 0x02,
                pc: 0x8000
            }
        );

        cpu.interrupts_mut().request_reset();
        let s = cpu.step(&mut bus).expect("reset");
        assert_eq!(s.pc, 0x8000);
        assert!(!cpu.is_halted());
    }
}
