/*!
I/O port: a memory-mapped register window whose behaviour is supplied by
the host.

The CPU core has no PPU, APU or controller of its own. Hosts that want
those registers to do something attach callbacks:

- `with_read(|addr| Option<u8>)`: answer a read, or `None` for open bus.
- `with_write(|addr, value| ...)`: observe a write.
- `with_irq(|| bool)`: report the device's IRQ output.

A port without hooks reads as open bus and drops writes (trace logged).
*/

use log::trace;

use crate::bus::BusDevice;

type ReadHook = Box<dyn FnMut(u16) -> Option<u8>>;
type WriteHook = Box<dyn FnMut(u16, u8)>;
type IrqHook = Box<dyn Fn() -> bool>;

pub struct IoPort {
    name: String,
    on_read: Option<ReadHook>,
    on_write: Option<WriteHook>,
    irq: Option<IrqHook>,
}

impl IoPort {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on_read: None,
            on_write: None,
            irq: None,
        }
    }

    pub fn with_read(mut self, hook: impl FnMut(u16) -> Option<u8> + 'static) -> Self {
        self.on_read = Some(Box::new(hook));
        self
    }

    pub fn with_write(mut self, hook: impl FnMut(u16, u8) + 'static) -> Self {
        self.on_write = Some(Box::new(hook));
        self
    }

    pub fn with_irq(mut self, hook: impl Fn() -> bool + 'static) -> Self {
        self.irq = Some(Box::new(hook));
        self
    }
}

impl BusDevice for IoPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, addr: u16) -> Option<u8> {
        self.on_read.as_mut().and_then(|hook| hook(addr))
    }

    fn write(&mut self, addr: u16, value: u8) {
        match self.on_write.as_mut() {
            Some(hook) => hook(addr, value),
            None => trace!("{}: dropped write ${value:02X} to ${addr:04X}", self.name),
        }
    }

    fn irq_asserted(&self) -> bool {
        self.irq.as_ref().is_some_and(|hook| hook())
    }
}
