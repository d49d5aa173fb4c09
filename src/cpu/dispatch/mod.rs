/*!
dispatch - Fetch / decode / execute for a single instruction, plus the
interrupt entry sequence.

Overview
========
1. Fetch the opcode at PC and advance PC.
2. Look up its `InstructionRecord` in the decode table.
3. Unofficial opcodes go to `finalize::handle_unofficial` (policy driven).
4. Resolve the operand for the record's addressing mode.
5. Charge base cycles, plus +1 when the record has a page-cross penalty and
   the indexed address crossed a page.
6. Run the family handler chain; exactly one family claims each documented
   mnemonic. Branch handlers add their own taken / page-cross cycles.

Interrupt polling happens one level up in `core::Cpu::step`, at the fetch
boundary; `service_interrupt` here performs the 7-cycle entry sequence.

Cycle Accounting
================
Handlers never touch the cycle counter; `step` returns the instruction's
cycles and the core adds them to `CpuState::cycles`.
*/

pub(crate) mod arithmetic;
pub(crate) mod branches;
pub(crate) mod compare;
pub(crate) mod control_flow;
pub(crate) mod finalize;
pub(crate) mod load_store;
pub(crate) mod logical;
pub(crate) mod misc;
pub(crate) mod rmw;

use crate::bus::Bus;
use crate::config::CpuConfig;
use crate::cpu::addressing::{fetch_byte, resolve};
use crate::cpu::execute::{push_status_with_break, push_word, set_flag};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::Status;
use crate::cpu::table::lookup;
use crate::error::StepError;

pub(crate) use finalize::Finalized;

/// Cycles charged for the interrupt entry sequence (NMI / IRQ).
pub(crate) const INTERRUPT_CYCLES: u32 = 7;

/// Execute one instruction at PC and return its outcome.
pub(crate) fn step<C: CpuRegs>(
    cpu: &mut C,
    bus: &mut Bus,
    config: &CpuConfig,
) -> Result<Finalized, StepError> {
    let opcode_pc = cpu.pc();
    let opcode = fetch_byte(cpu, bus);
    let record = lookup(opcode);

    if !record.official {
        return finalize::handle_unofficial(record, opcode_pc, cpu, bus, config.illegal_opcodes);
    }

    let operand = resolve(record.mode, cpu, bus);
    let mut cycles = record.cycles as u32;
    if record.page_penalty && operand.crossed() {
        cycles += 1;
    }

    let m = record.mnemonic;
    let handled = load_store::handle(m, operand, cpu, bus)
        || logical::handle(m, operand, cpu, bus)
        || arithmetic::handle(m, operand, cpu, bus, config.decimal_mode)
        || compare::handle(m, operand, cpu, bus)
        || branches::handle(m, operand, cpu, &mut cycles)
        || rmw::handle(m, operand, cpu, bus)
        || control_flow::handle(m, operand, cpu, bus)
        || misc::handle(m, cpu, bus);
    debug_assert!(handled, "documented opcode ${opcode:02X} has no handler");

    Ok(Finalized::Retired(cycles))
}

/// Common interrupt entry sequence (push PC, status with Break=0; set I;
/// load vector).
pub(crate) fn service_interrupt<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, vector_addr: u16) -> u32 {
    let current_pc = cpu.pc();
    push_word(cpu, bus, current_pc);
    push_status_with_break(cpu, bus, false);
    set_flag(cpu, Status::INTERRUPT_DISABLE, true);
    let new_pc = bus.read_word(vector_addr);
    cpu.set_pc(new_pc);
    INTERRUPT_CYCLES
}
