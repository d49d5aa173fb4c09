#![doc = r#"
CatNES core library crate.

An instruction-accurate 6502 CPU core with a memory-mapped bus and an iNES
(NROM) cartridge loader: the headless foundation of a NES emulator.

Modules:
- bus: region-table address space (RAM, host-driven I/O ports, cartridge slot, open bus)
- cartridge: iNES header parse and PRG/CHR/trainer extraction
- config: CPU configuration (illegal-opcode policy, decimal mode)
- cpu: 6502 CPU core (facade + state + decode table + dispatch + interrupts + disassembler)
- error: structured load / step / bus errors
- mapper: Mapper trait and NROM (mapper 0) implementation

Typical use:
```rust,no_run
use catnes::{Bus, Cpu, Nrom};

let mapper = Nrom::new(catnes::Cartridge::from_ines_file("game.nes")?)?;
let mut bus = Bus::with_cartridge(Box::new(mapper));
let mut cpu = Cpu::new();
cpu.reset(&mut bus);
for _ in 0..100 {
    let state = cpu.step(&mut bus)?;
    println!("{state}");
}
# Ok::<(), catnes::Error>(())
```

In tests, shared iNES builders and CPU fixtures are available under `crate::test_utils`.
"#]

pub mod bus;
pub mod cartridge;
pub mod config;
pub mod cpu;
pub mod error;
pub mod mapper;

// Re-export commonly used types at the crate root for convenience.
pub use bus::{Bus, BusBuilder, BusDevice, IoPort};
pub use cartridge::Cartridge;
pub use config::{CpuConfig, IllegalOpcodePolicy};
pub use cpu::{Cpu, CpuState, ExecState, Status};
pub use error::{BusError, Error, ErrorKind, LoadError, StepError};
pub use mapper::{Mapper, Nrom};

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
