//! Work RAM: 2 KiB at $0000-$07FF, repeated three more times up to $1FFF.

use crate::bus::BusDevice;

/// Size of CPU internal RAM (in bytes).
pub const CPU_RAM_SIZE: usize = 0x0800;

/// Internal work RAM. Any address in $0000-$1FFF lands on its mirror.
#[derive(Clone)]
pub struct Ram {
    data: [u8; CPU_RAM_SIZE],
}

impl Default for Ram {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Ram {
    /// Zero-filled RAM.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: [0; CPU_RAM_SIZE],
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Physical cell for `addr`.
    #[inline]
    pub fn mirror_index(addr: u16) -> usize {
        (addr as usize) & (CPU_RAM_SIZE - 1)
    }
}

impl BusDevice for Ram {
    fn name(&self) -> &str {
        "ram"
    }

    #[inline]
    fn read(&mut self, addr: u16) -> Option<u8> {
        Some(self.data[Self::mirror_index(addr)])
    }

    #[inline]
    fn write(&mut self, addr: u16, value: u8) {
        self.data[Self::mirror_index(addr)] = value;
    }

    #[inline]
    fn peek(&self, addr: u16) -> Option<u8> {
        Some(self.data[Self::mirror_index(addr)])
    }
}
