//! Cartridge slot: forwards $4020-$FFFF to the inserted mapper.

use crate::bus::BusDevice;
use crate::mapper::Mapper;

/// Holds at most one mapper. An empty slot never drives the data bus.
#[derive(Default)]
pub struct CartridgeSlot {
    mapper: Option<Box<dyn Mapper>>,
}

impl CartridgeSlot {
    pub fn new(mapper: Box<dyn Mapper>) -> Self {
        Self {
            mapper: Some(mapper),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.mapper.is_none()
    }
}

impl BusDevice for CartridgeSlot {
    fn name(&self) -> &str {
        if self.is_empty() {
            "cartridge (empty)"
        } else {
            "cartridge"
        }
    }

    fn read(&mut self, addr: u16) -> Option<u8> {
        self.mapper.as_mut().and_then(|m| m.cpu_read(addr))
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let Some(m) = self.mapper.as_mut() {
            m.cpu_write(addr, value);
        }
    }

    fn peek(&self, addr: u16) -> Option<u8> {
        self.mapper.as_ref().and_then(|m| m.cpu_peek(addr))
    }

    fn irq_asserted(&self) -> bool {
        self.mapper.as_ref().is_some_and(|m| m.irq_pending())
    }

    fn reset(&mut self) {
        if let Some(m) = self.mapper.as_mut() {
            m.reset();
        }
    }
}
