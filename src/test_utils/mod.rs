//! Shared test utilities: minimal iNES (v1) image builders and ready-to-step
//! CPU/Bus fixtures.
//!
//! The builders cover what the test suite needs (NROM, simple flags):
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units (0 => 8 KiB CHR RAM)
//! - byte 6 = Flags 6 (mirroring, battery, trainer, mapper low nibble)
//! - byte 7 = Flags 7 (NES 2.0 indicator, mapper high nibble)
//! - byte 8 = PRG RAM size in 8 KiB units
//! - bytes 9..15 = padding
//!
//! Vectors live at PRG offset 0x3FFA..=0x3FFF (16 KiB) or 0x7FFA..=0x7FFF (32 KiB).
//!
//! Fixtures (`setup*`) place a program at $8000, build the NROM cartridge,
//! attach it to a fresh NES bus and run the reset sequence, so the first
//! `step` executes the first program byte.

#![allow(dead_code)]

use crate::bus::Bus;
use crate::cartridge::{CHR_BANK_LEN, HEADER_LEN, INES_MAGIC, PRG_BANK_LEN, TRAINER_LEN};
use crate::config::CpuConfig;
use crate::cpu::Cpu;
use crate::mapper::Nrom;

/// Raw iNES (v1) image: header, optional trainer, PRG filled with $AA
/// (TAX) and CHR filled with $CC.
pub fn build_ines(
    prg_16k: usize,
    chr_8k: usize,
    flags6: u8,
    flags7: u8,
    prg_ram_8k: u8,
    trainer: Option<&[u8; 512]>,
) -> Vec<u8> {
    let prg_len = prg_16k * PRG_BANK_LEN;
    let chr_len = chr_8k * CHR_BANK_LEN;
    let mut bytes = Vec::with_capacity(HEADER_LEN + TRAINER_LEN + prg_len + chr_len);

    bytes.extend_from_slice(&INES_MAGIC);
    bytes.extend_from_slice(&[prg_16k as u8, chr_8k as u8, flags6, flags7, prg_ram_8k]);
    bytes.resize(HEADER_LEN, 0);
    if let Some(t) = trainer {
        bytes.extend_from_slice(t);
    }
    bytes.extend(std::iter::repeat_n(0xAA, prg_len));
    bytes.extend(std::iter::repeat_n(0xCC, chr_len));
    bytes
}

/// NROM-128 image with `prg` at $8000 and the given (reset, nmi, irq)
/// vectors, all $8000 by default.
pub fn build_nrom_with_prg(
    prg: &[u8],
    chr_8k: usize,
    prg_ram_8k: u8,
    vectors: Option<(u16, u16, u16)>,
) -> Vec<u8> {
    assert!(prg.len() <= PRG_BANK_LEN, "program must fit in one 16 KiB bank");

    let mut rom = build_ines(1, chr_8k, 0, 0, prg_ram_8k, None);
    let bank = &mut rom[HEADER_LEN..HEADER_LEN + PRG_BANK_LEN];
    bank[..prg.len()].copy_from_slice(prg);
    let (reset, nmi, irq) = vectors.unwrap_or((0x8000, 0x8000, 0x8000));
    set_vectors_in_prg(bank, reset, nmi, irq);
    rom
}

/// Write NMI/RESET/IRQ vectors into the last six bytes of a 16 KiB or
/// 32 KiB PRG image.
pub fn set_vectors_in_prg(prg: &mut [u8], reset: u16, nmi: u16, irq: u16) {
    assert!(
        matches!(prg.len(), 16384 | 32768),
        "unsupported PRG length {} for vector placement",
        prg.len()
    );
    let base = prg.len() - 6;
    write_le_u16(prg, base, nmi);
    write_le_u16(prg, base + 2, reset);
    write_le_u16(prg, base + 4, irq);
}

#[inline]
fn write_le_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Parse `rom` as NROM and attach it to a fresh NES bus.
pub fn bus_from_rom(rom: &[u8]) -> Bus {
    let mapper = Nrom::load(rom).expect("test ROM should load");
    Bus::with_cartridge(Box::new(mapper))
}

/// CPU (default config) and bus with `prg` at $8000, reset already performed.
pub fn setup(prg: &[u8]) -> (Cpu, Bus) {
    setup_with_config(prg, CpuConfig::default())
}

/// As `setup`, with an explicit CPU configuration.
pub fn setup_with_config(prg: &[u8], config: CpuConfig) -> (Cpu, Bus) {
    let rom = build_nrom_with_prg(prg, 1, 1, None);
    let mut bus = bus_from_rom(&rom);
    let mut cpu = Cpu::with_config(config);
    cpu.reset(&mut bus);
    (cpu, bus)
}

/// As `setup`, with explicit (reset, nmi, irq) vectors.
pub fn setup_with_vectors(prg: &[u8], vectors: (u16, u16, u16)) -> (Cpu, Bus) {
    let rom = build_nrom_with_prg(prg, 1, 1, Some(vectors));
    let mut bus = bus_from_rom(&rom);
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    (cpu, bus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_ines() {
        let rom = build_ines(2, 1, 0x01, 0x00, 1, None);
        assert_eq!(&rom[0..4], b"NES\x1A");
        assert_eq!(rom[4], 2);
        assert_eq!(rom[5], 1);
        assert_eq!(rom[6], 0x01);
        assert_eq!(rom[7], 0x00);
        assert_eq!(rom[8], 1);
        // Basic size sanity
        assert_eq!(rom.len(), 16 + 2 * 16 * 1024 + 1 * 8 * 1024);
    }

    #[test]
    fn writes_vectors_for_16k_prg() {
        let mut prg = vec![0u8; 16 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(prg[0x3FFA], 0x56);
        assert_eq!(prg[0x3FFB], 0x84);
        assert_eq!(prg[0x3FFC], 0x23);
        assert_eq!(prg[0x3FFD], 0x81);
        assert_eq!(prg[0x3FFE], 0xBC);
        assert_eq!(prg[0x3FFF], 0x8A);
    }

    #[test]
    fn writes_vectors_for_32k_prg() {
        let mut prg = vec![0u8; 32 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(prg[0x7FFA], 0x56);
        assert_eq!(prg[0x7FFB], 0x84);
        assert_eq!(prg[0x7FFC], 0x23);
        assert_eq!(prg[0x7FFD], 0x81);
        assert_eq!(prg[0x7FFE], 0xBC);
        assert_eq!(prg[0x7FFF], 0x8A);
    }

    #[test]
    fn setup_starts_at_program() {
        let (cpu, mut bus) = setup(&[0xA9, 0x01]);
        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(bus.read(0x8000), 0xA9);
        assert_eq!(bus.read(0xC000), 0xA9);
    }

    #[test]
    fn builds_nrom_with_prg_and_vectors() {
        let prg = [0xA9, 0x01, 0x00]; // LDA #$01; BRK
        let rom = build_nrom_with_prg(&prg, 1, 1, None);
        // Header magic
        assert_eq!(&rom[0..4], b"NES\x1A");
        // PRG size units
        assert_eq!(rom[4], 1);
        // CHR size units
        assert_eq!(rom[5], 1);
        // RESET vector defaults to $8000 at PRG offset 0x3FFC
        let prg_start = 16;
        assert_eq!(rom[prg_start + 0x3FFC], 0x00);
        assert_eq!(rom[prg_start + 0x3FFD], 0x80);
        assert_eq!(&rom[prg_start..prg_start + 3], &prg);
    }
}
