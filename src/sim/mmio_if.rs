use crate::blocks::axi::*;
use crate::common::errors::*;
use crate::common::{Addr, Word};
use crate::sim::simif::{AxiLiteDut, Sim};
use log::trace;

/// Step until `cond` holds on the bus, giving up after the handshake budget
fn wait_until<D, F>(sim: &mut Sim<D>, channel: Channel, cond: F) -> Result<()>
where
    D: AxiLiteDut,
    F: Fn(&AxiBusInterface) -> bool,
{
    let mut waited = 0;
    while !cond(sim.dut.bus()) {
        if waited >= sim.max_cycles() {
            return Err(Error::HandshakeTimeout {
                channel: channel,
                cycles: waited,
            });
        }
        sim.step();
        waited += 1;
    }
    Ok(())
}

/// Single-beat read through the AR and R channels.
/// Takes two cycles against an idle bridge.
pub fn mmio_read<D: AxiLiteDut>(sim: &mut Sim<D>, addr: Addr) -> Result<AxiLiteR> {
    // Wait until the ready signal is high
    wait_until(sim, Channel::AR, |b| b.arready)?;

    let bus = sim.dut.bus_mut();
    bus.poke_ar(&AxiLiteAR { addr: addr });
    bus.arvalid = true;
    bus.rready = true;

    // arready was high before this edge, so the address is taken here
    sim.step();
    sim.dut.bus_mut().arvalid = false;

    wait_until(sim, Channel::R, |b| b.rvalid)?;
    let r = sim.dut.bus().peek_r();
    sim.step();

    trace!("mmio_read {:#x} -> {:#x} {:?}", addr, r.data, r.resp);
    return Ok(r);
}

/// Single-beat write through the AW, W and B channels.
/// Takes three cycles against an idle bridge.
pub fn mmio_write<D: AxiLiteDut>(
    sim: &mut Sim<D>,
    addr: Addr,
    data: Word,
    strb: u8,
) -> Result<AxiLiteB> {
    let bus = sim.dut.bus_mut();
    bus.poke_aw(&AxiLiteAW { addr: addr });
    bus.poke_w(&AxiLiteW { data: data, strb: strb });
    bus.awvalid = true;
    bus.wvalid = true;
    bus.bready = false;

    let mut aw_done = false;
    let mut w_done = false;
    let mut waited = 0;
    while !(aw_done && w_done) {
        if waited >= sim.max_cycles() {
            let channel = if aw_done { Channel::W } else { Channel::AW };
            return Err(Error::HandshakeTimeout {
                channel: channel,
                cycles: waited,
            });
        }
        let aw_fire = sim.dut.bus().fire(Channel::AW);
        let w_fire = sim.dut.bus().fire(Channel::W);
        sim.step();
        waited += 1;

        let bus = sim.dut.bus_mut();
        if aw_fire {
            aw_done = true;
            bus.awvalid = false;
        }
        if w_fire {
            w_done = true;
            bus.wvalid = false;
        }
    }

    sim.dut.bus_mut().bready = true;
    wait_until(sim, Channel::B, |b| b.bvalid)?;
    let b = sim.dut.bus().peek_b();
    sim.step();
    sim.dut.bus_mut().bready = false;

    trace!("mmio_write {:#x} <- {:#x} strb {:#x} {:?}", addr, data, strb, b.resp);
    return Ok(b);
}

/// Read `addr` and compare against `expected`
pub fn mmio_read_expect<D: AxiLiteDut>(sim: &mut Sim<D>, addr: Addr, expected: Word) -> Result<Word> {
    let r = mmio_read(sim, addr)?;
    if r.data != expected {
        return Err(Error::ReadMismatch {
            addr: addr,
            expected: expected,
            actual: r.data,
        });
    }
    Ok(r.data)
}
