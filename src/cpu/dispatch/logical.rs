/*!
logical.rs - Logical opcode family handler (AND / ORA / EOR / BIT)

AND, ORA and EOR combine the operand into A and update Z/N. BIT sets Z from
A & M and copies bits 7 and 6 of M into N and V without changing A.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{and, bit, eor, ora};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Mnemonic;

pub(super) fn handle<C: CpuRegs>(m: Mnemonic, operand: Operand, cpu: &mut C, bus: &mut Bus) -> bool {
    let op: fn(&mut C, u8) = match m {
        Mnemonic::And => and,
        Mnemonic::Ora => ora,
        Mnemonic::Eor => eor,
        Mnemonic::Bit => bit,
        _ => return false,
    };
    let v = operand.value(cpu, bus);
    op(cpu, v);
    true
}
