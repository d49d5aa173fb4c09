/*!
compare.rs - Compare opcode family handler (CMP / CPX / CPY)

C = reg >= M, Z/N from reg - M. Registers are never modified.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::cmp_generic;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Mnemonic;

pub(super) fn handle<C: CpuRegs>(m: Mnemonic, operand: Operand, cpu: &mut C, bus: &mut Bus) -> bool {
    let reg = match m {
        Mnemonic::Cmp => cpu.a(),
        Mnemonic::Cpx => cpu.x(),
        Mnemonic::Cpy => cpu.y(),
        _ => return false,
    };
    let v = operand.value(cpu, bus);
    cmp_generic(cpu, reg, v);
    true
}
