/*!
Cartridge image: iNES header parse and section extraction.

Features:
- Parse an iNES header from bytes or a file path
- Extract PRG ROM, CHR (or an 8 KiB CHR RAM buffer when CHR size == 0) and
  the optional 512-byte trainer
- Report mirroring, battery-backed RAM, mapper id and the NES 2.0 marker

Notes:
- NES 2.0 headers are accepted: mapper bits 8..11 come from byte 8 and the
  PRG/CHR bank count MSBs from byte 9. The exponent-multiplier size form is
  rejected.
- A CHR section shorter than declared is padded with zeros and logged; the
  CPU never reads CHR.
- The image is parsed once and never mutated; mapping lives in `mapper`.
*/

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::LoadError;

/// iNES magic: "NES" followed by MS-DOS EOF.
pub const INES_MAGIC: [u8; 4] = *b"NES\x1A";
pub const HEADER_LEN: usize = 16;
pub const TRAINER_LEN: usize = 512;
pub const PRG_BANK_LEN: usize = 16 * 1024;
pub const CHR_BANK_LEN: usize = 8 * 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

/// Decoded 16-byte header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InesHeader {
    /// PRG ROM size in 16 KiB banks.
    pub prg_banks: u16,
    /// CHR ROM size in 8 KiB banks (0 => CHR RAM).
    pub chr_banks: u16,
    pub mapper_id: u16,
    pub mirroring: Mirroring,
    pub battery: bool,
    pub trainer: bool,
    pub nes2: bool,
}

impl InesHeader {
    /// Decode the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, LoadError> {
        if data.len() < INES_MAGIC.len() || data[..4] != INES_MAGIC {
            return Err(LoadError::InvalidHeader {
                found: data[..data.len().min(4)].to_vec(),
            });
        }
        if data.len() < HEADER_LEN {
            return Err(LoadError::TruncatedImage {
                section: "header",
                declared: HEADER_LEN,
                available: data.len(),
            });
        }

        let flags6 = data[6];
        let flags7 = data[7];
        // NES 2.0 if (flags7 & 0x0C) == 0x08.
        let nes2 = (flags7 & 0x0C) == 0x08;

        let mut mapper_id = ((flags7 & 0xF0) as u16) | ((flags6 >> 4) as u16);
        let mut prg_banks = data[4] as u16;
        let mut chr_banks = data[5] as u16;
        if nes2 {
            mapper_id |= ((data[8] & 0x0F) as u16) << 8;
            // Byte 9 holds the size MSBs; $F selects exponent-multiplier form.
            prg_banks |= size_msb(data[9] & 0x0F, "PRG ROM")? << 8;
            chr_banks |= size_msb(data[9] >> 4, "CHR ROM")? << 8;
        }

        let mirroring = if flags6 & 0b0000_1000 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0b0000_0001 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        Ok(Self {
            prg_banks,
            chr_banks,
            mapper_id,
            mirroring,
            battery: flags6 & 0b0000_0010 != 0,
            trainer: flags6 & 0b0000_0100 != 0,
            nes2,
        })
    }

    pub fn prg_rom_len(&self) -> usize {
        self.prg_banks as usize * PRG_BANK_LEN
    }

    pub fn chr_rom_len(&self) -> usize {
        self.chr_banks as usize * CHR_BANK_LEN
    }
}

/// A parsed cartridge image.
#[derive(Clone, Debug)]
pub struct Cartridge {
    header: InesHeader,
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    trainer: Option<Vec<u8>>,
}

impl Cartridge {
    /// Parse raw iNES bytes.
    pub fn from_ines_bytes(data: &[u8]) -> Result<Self, LoadError> {
        let header = InesHeader::parse(data)?;
        let mut offset = HEADER_LEN;

        let trainer = if header.trainer {
            let section = take(data, offset, TRAINER_LEN, "trainer")?;
            offset += TRAINER_LEN;
            Some(section.to_vec())
        } else {
            None
        };

        let prg_len = header.prg_rom_len();
        let prg_rom = take(data, offset, prg_len, "PRG ROM")?.to_vec();
        offset += prg_len;

        let chr = if header.chr_banks == 0 {
            vec![0; CHR_BANK_LEN]
        } else {
            let declared = header.chr_rom_len();
            let rest = &data[offset.min(data.len())..];
            let mut chr = rest[..declared.min(rest.len())].to_vec();
            if chr.len() < declared {
                warn!(
                    "CHR ROM truncated: header declares {declared} bytes, image has {}; padding with zeros",
                    chr.len()
                );
                chr.resize(declared, 0);
            }
            chr
        };

        debug!(
            "parsed iNES image: mapper {}, PRG {} KiB, CHR {} KiB{}{}",
            header.mapper_id,
            prg_rom.len() / 1024,
            chr.len() / 1024,
            if header.trainer { ", trainer" } else { "" },
            if header.nes2 { ", NES 2.0" } else { "" },
        );

        Ok(Self {
            header,
            prg_rom,
            chr,
            trainer,
        })
    }

    /// Load a cartridge from an iNES file (.nes).
    pub fn from_ines_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let bytes = fs::read(path)?;
        Self::from_ines_bytes(&bytes)
    }

    pub fn header(&self) -> &InesHeader {
        &self.header
    }

    pub fn mapper_id(&self) -> u16 {
        self.header.mapper_id
    }

    pub fn mirroring(&self) -> Mirroring {
        self.header.mirroring
    }

    pub fn battery_backed(&self) -> bool {
        self.header.battery
    }

    pub fn prg_rom(&self) -> &[u8] {
        &self.prg_rom
    }

    /// CHR ROM, or the zeroed CHR RAM buffer when the header declares none.
    pub fn chr(&self) -> &[u8] {
        &self.chr
    }

    pub fn chr_is_ram(&self) -> bool {
        self.header.chr_banks == 0
    }

    pub fn trainer(&self) -> Option<&[u8]> {
        self.trainer.as_deref()
    }
}

fn size_msb(nibble: u8, section: &'static str) -> Result<u16, LoadError> {
    if nibble == 0x0F {
        return Err(LoadError::ExponentRomSize { section });
    }
    Ok(nibble as u16)
}

/// Slice `len` bytes at `offset`, or report how many were actually present.
fn take<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    section: &'static str,
) -> Result<&'a [u8], LoadError> {
    let available = data.len().saturating_sub(offset);
    if available < len {
        return Err(LoadError::TruncatedImage {
            section,
            declared: len,
            available,
        });
    }
    Ok(&data[offset..offset + len])
}
