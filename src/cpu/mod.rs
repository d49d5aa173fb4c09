/*!
cpu::mod - Public façade for the 6502 CPU core.

Layout:

```text
    state.rs       - Architectural state (registers, `Status` flags, cycles).
    regs.rs        - `CpuRegs` trait the execute / dispatch helpers are generic over.
    table.rs       - 256-entry decode table (mnemonic, mode, cycles, penalties).
    addressing.rs  - Addressing modes and operand resolution.
    execute.rs     - Instruction semantics (ALU, stack, RMW, branch).
    dispatch/      - One-instruction fetch/decode/execute, family handlers,
                     illegal-opcode policy, interrupt entry.
    interrupts.rs  - Reset / NMI / IRQ latches and priority.
    core/          - `Cpu`: execution state machine driving all of the above.
    disasm.rs      - Side-effect free disassembler and trace line.
```

Usage:
```rust,no_run
use catnes::{Bus, Cpu, Nrom};

# let image: Vec<u8> = Vec::new();
let mapper = Nrom::load(&image)?;
let mut bus = Bus::with_cartridge(Box::new(mapper));
let mut cpu = Cpu::new();
cpu.reset(&mut bus);
let state = cpu.step(&mut bus)?;
println!("{state}");
# Ok::<(), catnes::Error>(())
```
*/

pub mod addressing;
pub mod core;
pub mod disasm;
pub(crate) mod dispatch;
pub(crate) mod execute;
pub mod interrupts;
pub mod regs;
pub mod state;
pub mod table;

pub use crate::cpu::core::{Cpu, ExecState};
pub use crate::cpu::disasm::{disassemble, trace_line};
pub use crate::cpu::interrupts::{Interrupt, InterruptController};
pub use crate::cpu::regs::CpuRegs;
pub use crate::cpu::state::{CpuState, Status};
pub use crate::cpu::table::{InstructionRecord, Mnemonic};
