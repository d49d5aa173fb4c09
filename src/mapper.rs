/*!
Mapper subsystem: trait definition and the NROM (mapper 0) implementation.

Purpose:
- Decouple CPU address mapping from the parsed `Cartridge` image so further
  mappers can be added behind the same interface.
- The bus owns the mapper inside its cartridge slot ($4020-$FFFF) and
  forwards every CPU access in that window.

NROM mapping:
- $4020-$5FFF: not driven (the bus supplies open bus).
- $6000-$7FFF: 8 KiB PRG RAM. A trainer, when present, is preloaded at $7000.
- $8000-$FFFF: PRG ROM; 16 KiB (NROM-128) mirrored at $C000, 32 KiB
  (NROM-256) mapped directly. Writes are ignored.
*/

use log::debug;

use crate::cartridge::Cartridge;
use crate::error::LoadError;

pub const PRG_RAM_LEN: usize = 8 * 1024;
const TRAINER_ADDR: u16 = 0x7000;

/// Common interface all cartridge mappers implement.
///
/// Addresses are full CPU addresses in $4020..=$FFFF. Returning `None` from a
/// read means the cartridge does not drive the data bus for that address.
pub trait Mapper {
    /// Mapper numeric identifier (e.g., 0 for NROM).
    fn mapper_id(&self) -> u16;

    /// CPU-visible read. May have side effects on bank-switching hardware.
    fn cpu_read(&mut self, addr: u16) -> Option<u8> {
        self.cpu_peek(addr)
    }

    /// Side-effect free read, for debuggers and disassembly.
    fn cpu_peek(&self, addr: u16) -> Option<u8>;

    fn cpu_write(&mut self, addr: u16, value: u8);

    /// Reset/Power-on mapper state (bank registers, IRQ state, etc).
    fn reset(&mut self) {}

    /// Whether this mapper is asserting its IRQ output line.
    fn irq_pending(&self) -> bool {
        false
    }
}

/// NROM (mapper 0).
#[derive(Clone, Debug)]
pub struct Nrom {
    cartridge: Cartridge,
    prg_ram: Vec<u8>,
}

impl Nrom {
    /// Wrap a parsed cartridge. Rejects mapper ids other than 0 and PRG sizes
    /// other than 16 KiB / 32 KiB.
    pub fn new(cartridge: Cartridge) -> Result<Self, LoadError> {
        let header = cartridge.header();
        if header.mapper_id != 0 {
            return Err(LoadError::UnsupportedMapper(header.mapper_id));
        }
        if !matches!(header.prg_banks, 1 | 2) {
            return Err(LoadError::UnsupportedPrgSize(header.prg_banks));
        }

        let mut prg_ram = vec![0; PRG_RAM_LEN];
        if let Some(trainer) = cartridge.trainer() {
            let start = (TRAINER_ADDR - 0x6000) as usize;
            prg_ram[start..start + trainer.len()].copy_from_slice(trainer);
        }

        debug!(
            "NROM-{} mapped, {} KiB PRG ROM",
            if header.prg_banks == 1 { 128 } else { 256 },
            cartridge.prg_rom().len() / 1024
        );
        Ok(Self { cartridge, prg_ram })
    }

    /// Parse raw iNES bytes and build the mapper in one go.
    pub fn load(bytes: &[u8]) -> Result<Self, LoadError> {
        Self::new(Cartridge::from_ines_bytes(bytes)?)
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    /// Returns true if this is an NROM-128 (16 KiB PRG) ROM.
    pub fn is_nrom_128(&self) -> bool {
        self.cartridge.prg_rom().len() == 16 * 1024
    }

    #[inline]
    fn prg_rom_read(&self, addr: u16) -> u8 {
        let prg = self.cartridge.prg_rom();
        // Length is 16 KiB or 32 KiB, so the mask mirrors NROM-128.
        prg[(addr as usize - 0x8000) & (prg.len() - 1)]
    }
}

impl Mapper for Nrom {
    #[inline]
    fn mapper_id(&self) -> u16 {
        0
    }

    fn cpu_peek(&self, addr: u16) -> Option<u8> {
        match addr {
            0x6000..=0x7FFF => Some(self.prg_ram[(addr - 0x6000) as usize]),
            0x8000..=0xFFFF => Some(self.prg_rom_read(addr)),
            _ => None,
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize] = value,
            0x8000..=0xFFFF => {
                debug!("ignored write ${value:02X} to PRG ROM ${addr:04X}");
            }
            _ => {}
        }
    }
}
