/*!
core::Cpu - The 6502 CPU façade: registers, execution state and
interrupt controller.

Execution Model
===============
`Cpu` is a small state machine advanced one instruction per `step`:

```text
Reset ──reset──► Fetch ──opcode──► Execute ──retire──► Fetch
                   │                   │
                   ├─irq/nmi─► InterruptPending ─7 cycles─► Fetch
                   │                   │
                   │                   └─JAM (Nop policy)─► Halted
                   └─reset request (from any state)─► Reset
```

- A fresh `Cpu` is in `Reset`; its first `step` performs the reset
  sequence (or call `reset` directly).
- Interrupts are polled at the fetch boundary with priority
  Reset > NMI > IRQ. Servicing one consumes the whole step.
- `Halted` is left only through a reset request.

Errors
======
`step` returns `StepError::IllegalOpcode` under the `Fault` policy (PC is
left on the opcode, no cycles charged) and `StepError::Halted` once the
core is jammed.
*/

use log::{debug, log_enabled, trace, Level};

use crate::bus::Bus;
use crate::config::CpuConfig;
use crate::cpu::disasm::trace_line;
use crate::cpu::dispatch::{self, Finalized};
use crate::cpu::interrupts::{Interrupt, InterruptController};
use crate::cpu::state::{CpuState, Status};
use crate::error::StepError;

/// Cycles consumed by the reset sequence.
pub const RESET_CYCLES: u32 = 7;

/// Where the CPU is in its execution cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    Reset,
    Fetch,
    Execute,
    InterruptPending,
    Halted,
}

#[derive(Debug, Clone)]
pub struct Cpu {
    state: CpuState,
    exec: ExecState,
    interrupts: InterruptController,
    config: CpuConfig,
    last_cycles: u32,
    halted_by: Option<(u8, u16)>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Construct a CPU awaiting reset, with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CpuConfig::default())
    }

    pub fn with_config(config: CpuConfig) -> Self {
        Self {
            state: CpuState::new(),
            exec: ExecState::Reset,
            interrupts: InterruptController::new(),
            config,
            last_cycles: 0,
            halted_by: None,
        }
    }

    /// Run the reset sequence: bus devices reset, registers to power-up
    /// values, SP=$FD, P=$24, PC from $FFFC/$FFFD, cycle counter set to 7.
    /// Latched reset and NMI requests are dropped.
    pub fn reset(&mut self, bus: &mut Bus) {
        self.exec = ExecState::Reset;
        self.interrupts.on_reset();
        bus.reset();
        self.state = CpuState::new();
        self.state.pc = bus.read_word(Interrupt::Reset.vector());
        self.state.cycles = RESET_CYCLES as u64;
        self.last_cycles = RESET_CYCLES;
        self.halted_by = None;
        self.exec = ExecState::Fetch;
        debug!("cpu reset: PC=${:04X}", self.state.pc);
    }

    /// Execute one instruction (or service one interrupt / reset) and
    /// return a snapshot of the resulting state.
    pub fn step(&mut self, bus: &mut Bus) -> Result<CpuState, StepError> {
        if self.exec == ExecState::Reset {
            self.reset(bus);
            return Ok(self.state);
        }

        let irq_masked = self.state.status.contains(Status::INTERRUPT_DISABLE);
        let pending = self.interrupts.poll(irq_masked, bus.irq_asserted());
        if pending == Some(Interrupt::Reset) {
            self.reset(bus);
            return Ok(self.state);
        }

        if self.exec == ExecState::Halted {
            let (opcode, pc) = self.halted_by.unwrap_or((0, self.state.pc));
            return Err(StepError::Halted { opcode, pc });
        }

        if let Some(kind) = pending {
            self.exec = ExecState::InterruptPending;
            debug!("servicing {:?} at PC=${:04X}", kind, self.state.pc);
            let cycles = dispatch::service_interrupt(&mut self.state, bus, kind.vector());
            self.retire(cycles);
            return Ok(self.state);
        }

        if log_enabled!(Level::Trace) {
            trace!("{}", trace_line(&self.state, bus));
        }

        self.exec = ExecState::Execute;
        let opcode_pc = self.state.pc;
        match dispatch::step(&mut self.state, bus, &self.config) {
            Ok(Finalized::Retired(cycles)) => {
                self.retire(cycles);
                Ok(self.state)
            }
            Ok(Finalized::Jammed) => {
                let opcode = bus.peek(opcode_pc);
                self.exec = ExecState::Halted;
                self.halted_by = Some((opcode, opcode_pc));
                self.last_cycles = 0;
                Err(StepError::Halted {
                    opcode,
                    pc: opcode_pc,
                })
            }
            Err(e) => {
                self.exec = ExecState::Fetch;
                self.last_cycles = 0;
                Err(e)
            }
        }
    }

    fn retire(&mut self, cycles: u32) {
        self.state.add_cycles(cycles);
        self.last_cycles = cycles;
        self.exec = ExecState::Fetch;
    }

    /// Step up to `max_steps` times, stopping at the first error.
    /// Returns the number of steps completed.
    pub fn run(&mut self, bus: &mut Bus, max_steps: usize) -> Result<usize, StepError> {
        for done in 0..max_steps {
            if let Err(e) = self.step(bus) {
                debug!("run stopped after {done} steps: {e}");
                return Err(e);
            }
        }
        Ok(max_steps)
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    pub fn exec_state(&self) -> ExecState {
        self.exec
    }

    pub fn is_halted(&self) -> bool {
        self.exec == ExecState::Halted
    }

    /// Cycles charged by the most recent step.
    pub fn last_cycles(&self) -> u32 {
        self.last_cycles
    }

    pub fn cycles(&self) -> u64 {
        self.state.cycles
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CpuConfig) {
        self.config = config;
    }

    pub fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    pub fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }

    // ---------------------------------------------------------------------
    // Register accessors
    // ---------------------------------------------------------------------
    pub fn a(&self) -> u8 {
        self.state.a
    }
    pub fn x(&self) -> u8 {
        self.state.x
    }
    pub fn y(&self) -> u8 {
        self.state.y
    }
    pub fn sp(&self) -> u8 {
        self.state.sp
    }
    pub fn pc(&self) -> u16 {
        self.state.pc
    }
    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn set_a(&mut self, v: u8) {
        self.state.a = v;
    }
    pub fn set_x(&mut self, v: u8) {
        self.state.x = v;
    }
    pub fn set_y(&mut self, v: u8) {
        self.state.y = v;
    }
    pub fn set_sp(&mut self, v: u8) {
        self.state.sp = v;
    }
    pub fn set_pc(&mut self, v: u16) {
        self.state.pc = v;
    }
    pub fn set_status(&mut self, v: Status) {
        self.state.set_status(v);
    }
}
