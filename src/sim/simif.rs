use crate::blocks::axi::AxiBusInterface;
use crate::common::errors::*;
use crate::common::{Addr, Cycle, Word};
use crate::sim::mmio_if::{mmio_read, mmio_write};
use crate::sim::trace::{SignalValue, VcdTracer};
use derivative::Derivative;
use log::{debug, info};
use std::fmt::Debug;
use std::path::Path;

/// A clocked design that can be driven by `Sim`
pub trait Dut: Debug {
    /// Drive the active-low reset. Assertion forces the design idle right away.
    fn set_reset(self: &mut Self, asserted: bool);

    /// Rising clock edge: compute every next value from pre-edge values, then commit
    fn posedge(self: &mut Self);

    /// Re-drive combinational outputs from the current state
    fn comb(self: &mut Self);

    /// Signals to record in a waveform
    fn signals(self: &Self) -> Vec<SignalValue>;
}

/// A design with an AXI4-Lite slave port a test master can poke at
pub trait AxiLiteDut: Dut {
    fn bus(self: &Self) -> &AxiBusInterface;
    fn bus_mut(self: &mut Self) -> &mut AxiBusInterface;
}

/// Register level access to a simulated design
pub trait SimIf: Debug {
    fn step(self: &mut Self);
    fn cycle(self: &Self) -> Cycle;
    fn read(self: &mut Self, addr: Addr) -> Result<Word>;
    fn write(self: &mut Self, addr: Addr, data: Word) -> Result<()>;
}

pub const DEFAULT_HANDSHAKE_CYCLES: Cycle = 1000;

#[derive(Derivative)]
#[derivative(Debug)]
pub struct Sim<D: Dut> {
    pub dut: D,

    /// Number of rising edges since construction
    cycle: Cycle,

    /// Upper bound of cycles spent waiting on a single handshake
    max_cycles: Cycle,

    #[derivative(Debug = "ignore")]
    tracer: Option<VcdTracer>,
}

impl<D: Dut> Sim<D> {
    pub fn new(mut dut: D) -> Self {
        dut.comb();
        Sim {
            dut: dut,
            cycle: 0,
            max_cycles: DEFAULT_HANDSHAKE_CYCLES,
            tracer: None,
        }
    }

    /// Record every signal of the design into a VCD waveform named `top`
    pub fn with_trace(mut self, top: &str) -> Self {
        let mut tracer = VcdTracer::new(top);
        tracer.sample_initial(&self.dut.signals());
        self.tracer = Some(tracer);
        self
    }

    pub fn with_max_cycles(mut self, max_cycles: Cycle) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn max_cycles(self: &Self) -> Cycle {
        self.max_cycles
    }

    pub fn cycle(self: &Self) -> Cycle {
        self.cycle
    }

    pub fn step(self: &mut Self) {
        self.dut.posedge();
        self.dut.comb();
        self.cycle += 1;
        match self.tracer.as_mut() {
            Some(t) => t.sample_posedge(self.cycle, &self.dut.signals()),
            None => {}
        }
    }

    pub fn step_by(self: &mut Self, cycles: Cycle) {
        for _ in 0..cycles {
            self.step();
        }
    }

    pub fn set_reset(self: &mut Self, asserted: bool) {
        debug!("cycle {} reset {}", self.cycle, if asserted { "asserted" } else { "released" });
        self.dut.set_reset(asserted);
        self.dut.comb();
    }

    /// Hold reset for `cycles` edges, then release it
    pub fn reset(self: &mut Self, cycles: Cycle) {
        self.set_reset(true);
        self.step_by(cycles);
        self.set_reset(false);
    }

    pub fn trace(self: &Self) -> Option<&VcdTracer> {
        self.tracer.as_ref()
    }

    pub fn dump_trace(self: &Self, path: impl AsRef<Path>) -> Result<()> {
        match self.tracer.as_ref() {
            Some(t) => {
                t.dump(path.as_ref())?;
                info!("wrote {} cycles of waveform to {}", self.cycle, path.as_ref().display());
            }
            None => {
                debug!("tracing disabled, nothing written to {}", path.as_ref().display());
            }
        }
        Ok(())
    }
}

impl<D: AxiLiteDut> SimIf for Sim<D> {
    fn step(self: &mut Self) {
        Sim::step(self);
    }

    fn cycle(self: &Self) -> Cycle {
        self.cycle
    }

    fn read(self: &mut Self, addr: Addr) -> Result<Word> {
        let r = mmio_read(self, addr)?;
        Ok(r.data)
    }

    fn write(self: &mut Self, addr: Addr, data: Word) -> Result<()> {
        let strb = self.dut.bus().cfg().strb();
        mmio_write(self, addr, data, strb)?;
        Ok(())
    }
}
