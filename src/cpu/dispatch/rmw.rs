/*!
rmw.rs - Read-modify-write opcode family handler (ASL/LSR/ROL/ROR/INC/DEC)

Overview
========
Accumulator forms (ASL A, ...) operate on A directly. Memory forms run the
6502 RMW bus choreography through `execute::rmw_memory`: read the old
value, write it back unchanged (dummy write), then write the result.
Memory-mapped registers therefore observe two writes, as on hardware.

Indexed RMW instructions always pay their full cycle count; the decode
table marks none of them with a page-cross penalty.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{
    asl_acc, asl_mem, dec_mem, inc_mem, lsr_acc, lsr_mem, rol_acc, rol_mem, ror_acc, ror_mem,
};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Mnemonic;

pub(super) fn handle<C: CpuRegs>(m: Mnemonic, operand: Operand, cpu: &mut C, bus: &mut Bus) -> bool {
    match (m, operand) {
        (Mnemonic::Asl, Operand::Accumulator) => asl_acc(cpu),
        (Mnemonic::Lsr, Operand::Accumulator) => lsr_acc(cpu),
        (Mnemonic::Rol, Operand::Accumulator) => rol_acc(cpu),
        (Mnemonic::Ror, Operand::Accumulator) => ror_acc(cpu),
        (Mnemonic::Asl, Operand::Address { addr, .. }) => asl_mem(cpu, bus, addr),
        (Mnemonic::Lsr, Operand::Address { addr, .. }) => lsr_mem(cpu, bus, addr),
        (Mnemonic::Rol, Operand::Address { addr, .. }) => rol_mem(cpu, bus, addr),
        (Mnemonic::Ror, Operand::Address { addr, .. }) => ror_mem(cpu, bus, addr),
        (Mnemonic::Inc, Operand::Address { addr, .. }) => inc_mem(cpu, bus, addr),
        (Mnemonic::Dec, Operand::Address { addr, .. }) => dec_mem(cpu, bus, addr),
        _ => return false,
    }
    true
}
