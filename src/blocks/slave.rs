use crate::blocks::axi::AxiBusInterface;
use crate::blocks::bridge::AxiLiteBridge;
use crate::blocks::memory::AxiMemory;
use crate::common::config::BusConfig;
use crate::common::errors::*;
use crate::sim::simif::{AxiLiteDut, Dut};
use crate::sim::trace::SignalValue;

/// AXI4-Lite slave port, bridge and backing memory as one clocked design
#[derive(Debug, Clone)]
pub struct AxiLiteSlave {
    pub xbar: AxiBusInterface,
    pub mem: AxiMemory,
    pub bridge: AxiLiteBridge,
}

impl AxiLiteSlave {
    pub fn new(cfg: BusConfig) -> Result<Self> {
        cfg.validate()?;
        let mut slave = AxiLiteSlave {
            xbar: AxiBusInterface::new(cfg),
            mem: AxiMemory::from_cfg(&cfg),
            bridge: AxiLiteBridge::new(),
        };
        slave.bridge.comb(&mut slave.xbar);
        Ok(slave)
    }

    pub fn bus_signals(self: &Self) -> Vec<SignalValue> {
        let bus = &self.xbar;
        let cfg = bus.cfg();
        let a = cfg.addr_bits;
        let d = cfg.data_bits;
        vec![
            SignalValue::bit("aresetn", bus.aresetn),
            SignalValue::new("awaddr",  a, bus.awaddr),
            SignalValue::bit("awvalid", bus.awvalid),
            SignalValue::bit("awready", bus.awready),
            SignalValue::new("wdata",   d, bus.wdata),
            SignalValue::new("wstrb",   cfg.strb_bits(), bus.wstrb as u64),
            SignalValue::bit("wvalid",  bus.wvalid),
            SignalValue::bit("wready",  bus.wready),
            SignalValue::new("bresp",   2, bus.bresp.to_bits() as u64),
            SignalValue::bit("bvalid",  bus.bvalid),
            SignalValue::bit("bready",  bus.bready),
            SignalValue::new("araddr",  a, bus.araddr),
            SignalValue::bit("arvalid", bus.arvalid),
            SignalValue::bit("arready", bus.arready),
            SignalValue::new("rdata",   d, bus.rdata),
            SignalValue::new("rresp",   2, bus.rresp.to_bits() as u64),
            SignalValue::bit("rvalid",  bus.rvalid),
            SignalValue::bit("rready",  bus.rready),
        ]
    }
}

impl Dut for AxiLiteSlave {
    fn set_reset(self: &mut Self, asserted: bool) {
        self.xbar.aresetn = !asserted;
        if asserted {
            self.bridge.reset(&mut self.xbar);
        }
    }

    fn posedge(self: &mut Self) {
        self.bridge.posedge(&mut self.xbar, &mut self.mem);
    }

    fn comb(self: &mut Self) {
        self.bridge.comb(&mut self.xbar);
    }

    fn signals(self: &Self) -> Vec<SignalValue> {
        self.bus_signals()
    }
}

impl AxiLiteDut for AxiLiteSlave {
    fn bus(self: &Self) -> &AxiBusInterface {
        &self.xbar
    }

    fn bus_mut(self: &mut Self) -> &mut AxiBusInterface {
        &mut self.xbar
    }
}
