#![doc = r#"
Bus module: the CPU-visible address space as an ordered region table.

Overview
- The Bus owns a list of non-overlapping regions, each a `(start, end, device)`
  triple, that together cover $0000-$FFFF. Every CPU access resolves its region
  by binary search and delegates to the device.
- A device may decline to drive the data bus (`read` returns `None`). The Bus
  then answers with the open-bus value: the last byte transferred on the bus.

Default NES CPU map (`Bus::new`)
- $0000-$1FFF: 2 KiB internal RAM, mirrored every $0800 (`ram`)
- $2000-$3FFF: PPU register window (`IoPort` "ppu")
- $4000-$401F: APU and I/O registers (`IoPort` "apu-io")
- $4020-$FFFF: cartridge slot (`slot`), open bus until a mapper is attached

Submodules
- ram: internal RAM device.
- io: `IoPort`, a register window driven by host callbacks.
- slot: `CartridgeSlot`, forwarding to a `Mapper`.
"#]

pub mod io;
pub mod ram;
pub mod slot;


use std::fmt;

use log::debug;

use crate::error::BusError;
use crate::mapper::Mapper;

pub use io::IoPort;
pub use ram::Ram;
pub use slot::CartridgeSlot;

pub const RAM_START: u16 = 0x0000;
pub const RAM_END: u16 = 0x1FFF;
pub const PPU_START: u16 = 0x2000;
pub const PPU_END: u16 = 0x3FFF;
pub const APU_IO_START: u16 = 0x4000;
pub const APU_IO_END: u16 = 0x401F;
pub const CARTRIDGE_START: u16 = 0x4020;
pub const CARTRIDGE_END: u16 = 0xFFFF;

/// A handler for one region of the address space.
///
/// All methods receive the full CPU address.
pub trait BusDevice {
    /// Short label for logs and `Debug` output.
    fn name(&self) -> &str;

    /// Read a byte, or `None` to leave the data bus floating (open bus).
    fn read(&mut self, addr: u16) -> Option<u8>;

    fn write(&mut self, addr: u16, value: u8);

    /// Side-effect free read. Devices whose reads have side effects keep the
    /// default, which reports open bus.
    fn peek(&self, addr: u16) -> Option<u8> {
        let _ = addr;
        None
    }

    /// Whether the device is currently pulling the IRQ line low.
    fn irq_asserted(&self) -> bool {
        false
    }

    /// Console reset. Most devices keep their contents.
    fn reset(&mut self) {}
}

struct Region {
    start: u16,
    end: u16,
    device: Box<dyn BusDevice>,
}

/// CPU address space.
pub struct Bus {
    regions: Vec<Region>,
    open_bus: u8,
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for r in &self.regions {
            list.entry(&format_args!(
                "${:04X}-${:04X} {}",
                r.start,
                r.end,
                r.device.name()
            ));
        }
        list.finish()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// NES CPU map with an empty cartridge slot.
    pub fn new() -> Self {
        Self::nes_map(CartridgeSlot::empty())
    }

    /// NES CPU map with `mapper` in the cartridge slot.
    pub fn with_cartridge(mapper: Box<dyn Mapper>) -> Self {
        Self::nes_map(CartridgeSlot::new(mapper))
    }

    fn nes_map(slot: CartridgeSlot) -> Self {
        let regions = vec![
            Region {
                start: RAM_START,
                end: RAM_END,
                device: Box::new(Ram::new()),
            },
            Region {
                start: PPU_START,
                end: PPU_END,
                device: Box::new(IoPort::new("ppu")),
            },
            Region {
                start: APU_IO_START,
                end: APU_IO_END,
                device: Box::new(IoPort::new("apu-io")),
            },
            Region {
                start: CARTRIDGE_START,
                end: CARTRIDGE_END,
                device: Box::new(slot),
            },
        ];
        Self {
            regions,
            open_bus: 0,
        }
    }

    /// Put `mapper` into the cartridge slot, replacing any previous one.
    pub fn attach_cartridge(&mut self, mapper: Box<dyn Mapper>) -> Result<(), BusError> {
        debug!("attaching mapper {} to cartridge slot", mapper.mapper_id());
        self.install(CARTRIDGE_START, CARTRIDGE_END, CartridgeSlot::new(mapper))
    }

    /// Replace the device of the region spanning exactly `start..=end`.
    pub fn install(
        &mut self,
        start: u16,
        end: u16,
        device: impl BusDevice + 'static,
    ) -> Result<(), BusError> {
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.start == start && r.end == end)
            .ok_or(BusError::UnmappedAddress { address: start })?;
        debug!(
            "installed {} at ${start:04X}-${end:04X} (was {})",
            device.name(),
            region.device.name()
        );
        region.device = Box::new(device);
        Ok(())
    }

    #[inline]
    fn region_index(&self, addr: u16) -> usize {
        self.regions.partition_point(|r| r.end < addr)
    }

    /// CPU read. Updates the open-bus latch.
    pub fn read(&mut self, addr: u16) -> u8 {
        let idx = self.region_index(addr);
        let driven = self
            .regions
            .get_mut(idx)
            .and_then(|r| r.device.read(addr));
        let value = driven.unwrap_or(self.open_bus);
        self.open_bus = value;
        value
    }

    /// CPU write. Updates the open-bus latch.
    pub fn write(&mut self, addr: u16, value: u8) {
        self.open_bus = value;
        let idx = self.region_index(addr);
        if let Some(r) = self.regions.get_mut(idx) {
            r.device.write(addr, value);
        }
    }

    /// Little-endian word read (vectors, pointers).
    pub fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr);
        let hi = self.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Read without side effects (no device state change, open bus untouched).
    pub fn peek(&self, addr: u16) -> u8 {
        self.regions
            .get(self.region_index(addr))
            .and_then(|r| r.device.peek(addr))
            .unwrap_or(self.open_bus)
    }

    /// OR of every device's IRQ output.
    pub fn irq_asserted(&self) -> bool {
        self.regions.iter().any(|r| r.device.irq_asserted())
    }

    /// Forward a console reset to every device.
    pub fn reset(&mut self) {
        for r in &mut self.regions {
            r.device.reset();
        }
    }

    /// Last byte transferred on the data bus.
    pub fn open_bus(&self) -> u8 {
        self.open_bus
    }

    /// `(start, end, device name)` for each region, in address order.
    pub fn regions(&self) -> impl Iterator<Item = (u16, u16, &str)> + '_ {
        self.regions
            .iter()
            .map(|r| (r.start, r.end, r.device.name()))
    }
}

/// Assembles a custom region table.
#[derive(Default)]
pub struct BusBuilder {
    regions: Vec<Region>,
}

impl BusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, start: u16, end: u16, device: impl BusDevice + 'static) -> Self {
        self.regions.push(Region {
            start,
            end,
            device: Box::new(device),
        });
        self
    }

    /// Validate that the regions are disjoint and cover $0000-$FFFF.
    pub fn build(mut self) -> Result<Bus, BusError> {
        self.regions.sort_by_key(|r| r.start);

        // Next address that must be claimed; None once $FFFF is covered.
        let mut next: Option<u16> = Some(0x0000);
        for r in &self.regions {
            let Some(expected) = next else {
                return Err(BusError::OverlappingRegions { address: r.start });
            };
            if r.start < expected {
                return Err(BusError::OverlappingRegions { address: r.start });
            }
            if r.start > expected {
                return Err(BusError::UnmappedAddress { address: expected });
            }
            if r.end < r.start {
                return Err(BusError::UnmappedAddress { address: r.start });
            }
            next = r.end.checked_add(1);
        }
        if let Some(address) = next {
            return Err(BusError::UnmappedAddress { address });
        }

        Ok(Bus {
            regions: self.regions,
            open_bus: 0,
        })
    }
}
