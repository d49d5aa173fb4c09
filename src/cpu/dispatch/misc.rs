/*!
misc.rs - Implied-mode opcode family handler

Overview
========
Handles the single-byte instructions that only touch registers, flags or
the stack:

- Register transfers: TAX TAY TXA TYA TSX TXS
- Register inc/dec:   INX INY DEX DEY
- Stack:              PHA PHP PLA PLP
- Flag set/clear:     CLC SEC CLI SEI CLD SED CLV
- NOP (0xEA)

PHP pushes status with BREAK and bit 5 set. PLP discards BREAK.
*/

use crate::bus::Bus;
use crate::cpu::execute::{
    dex, dey, inx, iny, pha, php, pla, plp, set_flag, tax, tay, tsx, txa, txs, tya,
};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::Status;
use crate::cpu::table::Mnemonic;

pub(super) fn handle<C: CpuRegs>(m: Mnemonic, cpu: &mut C, bus: &mut Bus) -> bool {
    match m {
        // Transfers
        Mnemonic::Tax => tax(cpu),
        Mnemonic::Tay => tay(cpu),
        Mnemonic::Txa => txa(cpu),
        Mnemonic::Tya => tya(cpu),
        Mnemonic::Tsx => tsx(cpu),
        Mnemonic::Txs => txs(cpu),

        // Increments / decrements
        Mnemonic::Inx => inx(cpu),
        Mnemonic::Iny => iny(cpu),
        Mnemonic::Dex => dex(cpu),
        Mnemonic::Dey => dey(cpu),

        // Stack
        Mnemonic::Pha => pha(cpu, bus),
        Mnemonic::Php => php(cpu, bus),
        Mnemonic::Pla => pla(cpu, bus),
        Mnemonic::Plp => plp(cpu, bus),

        // Flags
        Mnemonic::Clc => set_flag(cpu, Status::CARRY, false),
        Mnemonic::Sec => set_flag(cpu, Status::CARRY, true),
        Mnemonic::Cli => set_flag(cpu, Status::INTERRUPT_DISABLE, false),
        Mnemonic::Sei => set_flag(cpu, Status::INTERRUPT_DISABLE, true),
        Mnemonic::Cld => set_flag(cpu, Status::DECIMAL, false),
        Mnemonic::Sed => set_flag(cpu, Status::DECIMAL, true),
        Mnemonic::Clv => set_flag(cpu, Status::OVERFLOW, false),

        Mnemonic::Nop => {}
        _ => return false,
    }
    true
}
