/*!
interrupts.rs - Interrupt lines, latches and priority.

Overview
========
Three interrupt sources feed the CPU:

- Reset: a latched request, serviced at the next step from any state,
  including Halted.
- NMI: edge triggered. `assert_nmi` latches one request directly;
  `set_nmi_line` latches on a low-to-high transition of the level.
- IRQ: level triggered. While the line (or any bus device's IRQ output)
  is asserted and the I flag is clear, an IRQ is taken at each
  instruction boundary. Nothing is consumed on service; the source must
  clear it.

Priority at a boundary is Reset > NMI > IRQ. A completed reset drops any
latched NMI and reset request.

The I flag is sampled at the boundary itself, so an asserted IRQ is taken
right after CLI (or PLP/RTI clearing I). The one-instruction delay of the
real 6502 is not modelled.
*/

/// Interrupt kinds, in service priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Reset,
    Nmi,
    Irq,
}

impl Interrupt {
    /// Address of the little-endian vector for this interrupt.
    pub const fn vector(self) -> u16 {
        match self {
            Interrupt::Reset => 0xFFFC,
            Interrupt::Nmi => 0xFFFA,
            Interrupt::Irq => 0xFFFE,
        }
    }
}

/// Pending interrupt state owned by the CPU.
#[derive(Debug, Clone, Default)]
pub struct InterruptController {
    reset_pending: bool,
    nmi_pending: bool,
    nmi_line: bool,
    irq_line: bool,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch a single NMI request.
    pub fn assert_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Drive the NMI input level; a rising edge latches a request.
    pub fn set_nmi_line(&mut self, level: bool) {
        if level && !self.nmi_line {
            self.nmi_pending = true;
        }
        self.nmi_line = level;
    }

    pub fn assert_irq(&mut self) {
        self.irq_line = true;
    }

    pub fn clear_irq(&mut self) {
        self.irq_line = false;
    }

    pub fn irq_line(&self) -> bool {
        self.irq_line
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    /// Request a reset, serviced at the next step.
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Drop latched reset and NMI requests once a reset has run. Line
    /// levels are inputs and stay as driven.
    pub(crate) fn on_reset(&mut self) {
        self.reset_pending = false;
        self.nmi_pending = false;
    }

    /// Pick the interrupt to service at this boundary, consuming latched
    /// requests. `device_irq` is the bus's aggregated IRQ output.
    pub(crate) fn poll(&mut self, irq_masked: bool, device_irq: bool) -> Option<Interrupt> {
        if self.reset_pending {
            self.on_reset();
            return Some(Interrupt::Reset);
        }
        if self.nmi_pending {
            self.nmi_pending = false;
            return Some(Interrupt::Nmi);
        }
        if !irq_masked && (self.irq_line || device_irq) {
            return Some(Interrupt::Irq);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::IoPort;
    use crate::cpu::state::Status;
    use crate::test_utils::setup_with_vectors;
    use std::cell::Cell;
    use std::rc::Rc;

    const VECTORS: (u16, u16, u16) = (0x8000, 0x9000, 0x9100);

    /// Main program of NOPs with RTI at both handler addresses.
    fn program() -> Vec<u8> {
        let mut prg = vec![0xEA; 0x1200];
        prg[0x1000] = 0x40;
        prg[0x1100] = 0x40;
        prg
    }

    #[test]
    fn nmi_round_trip_restores_pc_and_status() {
        let (mut cpu, mut bus) = setup_with_vectors(&program(), VECTORS);
        cpu.step(&mut bus).expect("nop");
        let before = *cpu.state();
        cpu.interrupts_mut().assert_nmi();

        let s = cpu.step(&mut bus).expect("nmi");
        assert_eq!(s.pc, 0x9000);
        assert_eq!(cpu.last_cycles(), 7);
        assert_eq!(s.cycles, before.cycles + 7);
        assert_eq!(bus.read(0x01FB) & 0x10, 0);

        let s = cpu.step(&mut bus).expect("rti");
        assert_eq!(s.pc, before.pc);
        assert_eq!(s.status(), before.status());
        assert_eq!(s.sp, before.sp);
    }

    #[test]
    fn irq_is_masked_by_interrupt_disable() {
        // CLI at the start so the second poll sees I clear.
        let mut prg = program();
        prg[0] = 0x58;
        let (mut cpu, mut bus) = setup_with_vectors(&prg, VECTORS);
        cpu.interrupts_mut().assert_irq();
        // I is set after reset: CLI executes instead of the IRQ.
        let s = cpu.step(&mut bus).expect("cli");
        assert_eq!(s.pc, 0x8001);
        let s = cpu.step(&mut bus).expect("irq");
        assert_eq!(s.pc, 0x9100);
        assert!(s.status().contains(Status::INTERRUPT_DISABLE));
    }

    #[test]
    fn irq_level_retriggers_after_rti() {
        let mut prg = program();
        prg[0] = 0x58;
        let (mut cpu, mut bus) = setup_with_vectors(&prg, VECTORS);
        cpu.step(&mut bus).expect("cli");
        cpu.interrupts_mut().assert_irq();
        assert_eq!(cpu.step(&mut bus).expect("irq").pc, 0x9100);
        assert_eq!(cpu.step(&mut bus).expect("rti").pc, 0x8001);
        // Line still high and I restored clear: taken again.
        assert_eq!(cpu.step(&mut bus).expect("irq").pc, 0x9100);
        cpu.interrupts_mut().clear_irq();
        cpu.step(&mut bus).expect("rti");
        assert_eq!(cpu.step(&mut bus).expect("nop").pc, 0x8002);
    }

    #[test]
    fn nmi_has_priority_over_irq() {
        let mut prg = program();
        prg[0] = 0x58;
        let (mut cpu, mut bus) = setup_with_vectors(&prg, VECTORS);
        cpu.step(&mut bus).expect("cli");
        cpu.interrupts_mut().assert_irq();
        cpu.interrupts_mut().assert_nmi();
        assert_eq!(cpu.step(&mut bus).expect("nmi").pc, 0x9000);
    }

    #[test]
    fn nmi_line_latches_on_rising_edge_only() {
        let mut irq = InterruptController::new();
        irq.set_nmi_line(true);
        assert_eq!(irq.poll(true, false), Some(Interrupt::Nmi));
        irq.set_nmi_line(true);
        assert_eq!(irq.poll(true, false), None);
        irq.set_nmi_line(false);
        irq.set_nmi_line(true);
        assert_eq!(irq.poll(true, false), Some(Interrupt::Nmi));
    }

    #[test]
    fn reset_outranks_everything() {
        let mut irq = InterruptController::new();
        irq.assert_nmi();
        irq.assert_irq();
        irq.request_reset();
        assert_eq!(irq.poll(false, false), Some(Interrupt::Reset));
        assert!(!irq.nmi_pending());
        assert_eq!(irq.poll(false, false), Some(Interrupt::Irq));
    }

    #[test]
    fn reset_drops_latched_nmi() {
        let (mut cpu, mut bus) = setup_with_vectors(&program(), VECTORS);
        cpu.interrupts_mut().assert_nmi();
        cpu.reset(&mut bus);
        assert!(!cpu.interrupts().nmi_pending());
        assert_eq!(cpu.step(&mut bus).expect("nop").pc, 0x8001);
    }

    #[test]
    fn device_irq_output_reaches_cpu() {
        let mut prg = program();
        prg[0] = 0x58;
        let (mut cpu, mut bus) = setup_with_vectors(&prg, VECTORS);
        let line = Rc::new(Cell::new(false));
        let probe = Rc::clone(&line);
        bus.install(0x4000, 0x401F, IoPort::new("apu").with_irq(move || probe.get()))
            .expect("install");
        cpu.step(&mut bus).expect("cli");
        assert_eq!(cpu.step(&mut bus).expect("nop").pc, 0x8002);
        line.set(true);
        assert_eq!(cpu.step(&mut bus).expect("irq").pc, 0x9100);
    }
}
