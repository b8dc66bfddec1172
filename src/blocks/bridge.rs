use crate::blocks::axi::{AxiBusInterface, Resp};
use crate::blocks::memory::{AxiMemory, Decoded};
use crate::common::Addr;
use log::{debug, trace};
use serde::Serialize;

/// Read channel handshake phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ReadState {
    #[default]
    Idle,

    /// `rdata`/`rresp` hold a result the master has not consumed yet
    DataValid,
}

impl ReadState {
    pub fn arready(self: &Self) -> bool {
        *self == ReadState::Idle
    }

    pub fn rvalid(self: &Self) -> bool {
        *self == ReadState::DataValid
    }
}

/// Write channel handshake phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum WriteState {
    #[default]
    Idle,

    /// Address arrived alone, `awready` pulses for one cycle
    AddressAccepted { addr: Addr },

    /// Address latched, still waiting for `wvalid`
    AwaitingData { addr: Addr },

    /// Memory updated, `wready` high until the data handshake completes
    DataAccepted { address_ready: bool },

    /// `bvalid` high until the master takes the response
    ResponsePending,
}

impl WriteState {
    pub fn awready(self: &Self) -> bool {
        match self {
            WriteState::AddressAccepted { .. } => true,
            WriteState::DataAccepted { address_ready } => *address_ready,
            _ => false,
        }
    }

    pub fn wready(self: &Self) -> bool {
        matches!(self, WriteState::DataAccepted { .. })
    }

    pub fn bvalid(self: &Self) -> bool {
        *self == WriteState::ResponsePending
    }
}

/// # Context
/// - Maps an AXI4-Lite slave port onto an `AxiMemory`
/// - Two independent channel machines clocked by the same edge
/// - Reads only touch `block_out`, writes only touch `block_in`
///
/// # Usage
/// - Call `posedge` once per rising clock edge, then `comb` to drive the
///   handshake outputs for the following cycle
#[derive(Debug, Clone, Default)]
pub struct AxiLiteBridge {
    read: ReadState,
    write: WriteState,
}

impl AxiLiteBridge {
    pub fn new() -> Self {
        AxiLiteBridge::default()
    }

    pub fn read_state(self: &Self) -> ReadState {
        self.read
    }

    pub fn write_state(self: &Self) -> WriteState {
        self.write
    }

    /// Force both channels idle and clear the registered response fields.
    /// Memory contents are left as they are.
    pub fn reset(self: &mut Self, bus: &mut AxiBusInterface) {
        if self.read != ReadState::Idle || self.write != WriteState::Idle {
            debug!("bridge reset, abandoning read {:?} write {:?}", self.read, self.write);
        }
        self.read = ReadState::Idle;
        self.write = WriteState::Idle;
        bus.rdata = 0;
        bus.rresp = Resp::Okay;
        bus.bresp = Resp::Okay;
        self.comb(bus);
    }

    /// Rising clock edge. Both channels compute their next state from the
    /// pre-edge bus values before anything is committed.
    pub fn posedge(self: &mut Self, bus: &mut AxiBusInterface, mem: &mut AxiMemory) {
        if !bus.aresetn {
            self.reset(bus);
            return;
        }
        let read_next = self.read_edge(bus, mem);
        let write_next = self.write_edge(bus, mem);

        if read_next != self.read {
            trace!("read {:?} -> {:?}", self.read, read_next);
        }
        if write_next != self.write {
            trace!("write {:?} -> {:?}", self.write, write_next);
        }
        self.read = read_next;
        self.write = write_next;
    }

    /// Drive the handshake outputs from the current state
    pub fn comb(self: &Self, bus: &mut AxiBusInterface) {
        bus.arready = self.read.arready();
        bus.rvalid  = self.read.rvalid();
        bus.awready = self.write.awready();
        bus.wready  = self.write.wready();
        bus.bvalid  = self.write.bvalid();
    }

    fn read_edge(self: &Self, bus: &mut AxiBusInterface, mem: &AxiMemory) -> ReadState {
        match self.read {
            ReadState::Idle => {
                if !bus.arvalid {
                    return ReadState::Idle;
                }
                match mem.decode(bus.araddr) {
                    Decoded::Word(idx) => {
                        let data = mem.block_out[idx];
                        debug!("read {:#x} [{}] = {:#x}", bus.araddr, idx, data);
                        bus.set_rdata(data);
                    }
                    skip => {
                        // rdata keeps whatever the last read left there
                        debug!("read {:#x} ignored ({:?})", bus.araddr, skip);
                    }
                }
                bus.rresp = Resp::Okay;
                ReadState::DataValid
            }
            ReadState::DataValid => {
                if bus.rready {
                    ReadState::Idle
                } else {
                    ReadState::DataValid
                }
            }
        }
    }

    fn write_edge(self: &Self, bus: &mut AxiBusInterface, mem: &mut AxiMemory) -> WriteState {
        match self.write {
            WriteState::Idle => {
                if bus.awvalid && bus.wvalid {
                    Self::commit_write(bus, mem, bus.awaddr);
                    WriteState::DataAccepted { address_ready: true }
                } else if bus.awvalid {
                    WriteState::AddressAccepted { addr: bus.awaddr }
                } else {
                    WriteState::Idle
                }
            }
            WriteState::AddressAccepted { addr } | WriteState::AwaitingData { addr } => {
                if bus.wvalid {
                    Self::commit_write(bus, mem, addr);
                    WriteState::DataAccepted { address_ready: false }
                } else {
                    WriteState::AwaitingData { addr: addr }
                }
            }
            WriteState::DataAccepted { .. } => {
                if bus.wvalid {
                    bus.bresp = Resp::Okay;
                    WriteState::ResponsePending
                } else {
                    WriteState::DataAccepted { address_ready: false }
                }
            }
            WriteState::ResponsePending => {
                if bus.bready {
                    WriteState::Idle
                } else {
                    WriteState::ResponsePending
                }
            }
        }
    }

    fn commit_write(bus: &AxiBusInterface, mem: &mut AxiMemory, addr: Addr) {
        match mem.decode(addr) {
            Decoded::Word(idx) => {
                let stored = mem.write_strobed(idx, bus.wdata, bus.wstrb);
                debug!("write {:#x} [{}] strb {:#x} -> {:#x?}", addr, idx, bus.wstrb, stored);
            }
            skip => {
                debug!("write {:#x} ignored ({:?})", addr, skip);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::BusConfig;

    fn setup() -> (AxiLiteBridge, AxiBusInterface, AxiMemory) {
        let cfg = BusConfig::default();
        let bridge = AxiLiteBridge::new();
        let mut bus = AxiBusInterface::new(cfg);
        bridge.comb(&mut bus);
        (bridge, bus, AxiMemory::from_cfg(&cfg))
    }

    fn edge(bridge: &mut AxiLiteBridge, bus: &mut AxiBusInterface, mem: &mut AxiMemory) {
        bridge.posedge(bus, mem);
        bridge.comb(bus);
    }

    #[test]
    fn read_drops_arready_for_one_cycle() {
        let (mut bridge, mut bus, mut mem) = setup();
        mem.block_out.set(2, 0xcafe);
        bus.set_araddr(0x8);
        bus.arvalid = true;
        edge(&mut bridge, &mut bus, &mut mem);
        assert_eq!(bridge.read_state(), ReadState::DataValid);
        assert!(!bus.arready && bus.rvalid);
        assert_eq!(bus.rdata, 0xcafe);
        bus.arvalid = false;
        edge(&mut bridge, &mut bus, &mut mem);
        assert!(bus.arready && !bus.rvalid);
    }

    #[test]
    fn read_result_is_held_until_consumed() {
        let (mut bridge, mut bus, mut mem) = setup();
        bus.rready = false;
        bus.arvalid = true;
        edge(&mut bridge, &mut bus, &mut mem);
        for _ in 0..5 {
            edge(&mut bridge, &mut bus, &mut mem);
            assert!(!bus.arready);
            assert!(bus.rvalid);
        }
        bus.rready = true;
        bus.arvalid = false;
        edge(&mut bridge, &mut bus, &mut mem);
        assert_eq!(bridge.read_state(), ReadState::Idle);
    }

    #[test]
    fn misaligned_read_keeps_stale_data() {
        let (mut bridge, mut bus, mut mem) = setup();
        mem.block_out.set(1, 0x55);
        bus.set_araddr(0x4);
        bus.arvalid = true;
        edge(&mut bridge, &mut bus, &mut mem);
        edge(&mut bridge, &mut bus, &mut mem);
        assert_eq!(bus.rdata, 0x55);
        bus.set_araddr(0x5);
        edge(&mut bridge, &mut bus, &mut mem);
        assert!(bus.rvalid);
        assert_eq!(bus.rdata, 0x55);
        assert_eq!(bus.rresp, Resp::Okay);
    }

    #[test]
    fn write_with_address_and_data_together() {
        let (mut bridge, mut bus, mut mem) = setup();
        bus.set_awaddr(0x10);
        bus.set_wdata(0xdead_beef);
        bus.set_wstrb(0xf);
        bus.awvalid = true;
        bus.wvalid = true;
        edge(&mut bridge, &mut bus, &mut mem);
        assert_eq!(mem.block_in[4], 0xdead_beef);
        assert!(bus.awready && bus.wready && !bus.bvalid);
        edge(&mut bridge, &mut bus, &mut mem);
        assert_eq!(bridge.write_state(), WriteState::ResponsePending);
        assert!(!bus.awready && !bus.wready && bus.bvalid);
        bus.awvalid = false;
        bus.wvalid = false;
        bus.bready = true;
        edge(&mut bridge, &mut bus, &mut mem);
        assert_eq!(bridge.write_state(), WriteState::Idle);
        assert!(!bus.bvalid);
    }

    #[test]
    fn address_before_data_is_latched() {
        let (mut bridge, mut bus, mut mem) = setup();
        bus.set_awaddr(0xc);
        bus.awvalid = true;
        edge(&mut bridge, &mut bus, &mut mem);
        assert_eq!(bridge.write_state(), WriteState::AddressAccepted { addr: 0xc });
        assert!(bus.awready);
        bus.awvalid = false;
        bus.set_awaddr(0x0);
        edge(&mut bridge, &mut bus, &mut mem);
        assert_eq!(bridge.write_state(), WriteState::AwaitingData { addr: 0xc });
        assert!(!bus.awready);
        bus.set_wdata(0x77);
        bus.set_wstrb(0x1);
        bus.wvalid = true;
        edge(&mut bridge, &mut bus, &mut mem);
        assert_eq!(mem.block_in[3], 0x77);
        assert!(!bus.awready && bus.wready);
    }

    #[test]
    fn reset_forces_idle_outputs() {
        let (mut bridge, mut bus, mut mem) = setup();
        bus.rready = false;
        bus.arvalid = true;
        bus.awvalid = true;
        bus.wvalid = true;
        edge(&mut bridge, &mut bus, &mut mem);
        assert!(bus.rvalid && bus.wready);
        bus.aresetn = false;
        edge(&mut bridge, &mut bus, &mut mem);
        assert!(bus.arready);
        assert!(!bus.rvalid && !bus.awready && !bus.wready && !bus.bvalid);
        assert_eq!(bridge.read_state(), ReadState::Idle);
        assert_eq!(bridge.write_state(), WriteState::Idle);
    }
}
