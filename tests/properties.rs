//! Randomised bus properties

use axil::blocks::axi::Resp;
use axil::blocks::slave::AxiLiteSlave;
use axil::common::config::BusConfig;
use axil::sim::mmio_if::{mmio_read, mmio_write};
use axil::sim::simif::Sim;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

const DEPTH: usize = 32;

fn sim() -> Sim<AxiLiteSlave> {
    let cfg = BusConfig::try_new(8, 32, DEPTH).unwrap();
    let mut sim = Sim::new(AxiLiteSlave::new(cfg).unwrap());
    sim.reset(1);
    sim
}

#[quickcheck]
fn written_word_reads_back(idx: u8, data: u32) -> bool {
    let idx = idx as usize % DEPTH;
    let addr = (idx as u64) << 2;
    let mut sim = sim();

    let b = mmio_write(&mut sim, addr, data as u64, 0xf).unwrap();
    let stored = sim.dut.mem.block_in[idx];
    sim.dut.mem.block_out.set(idx, stored);
    let r = mmio_read(&mut sim, addr).unwrap();

    b.resp == Resp::Okay && r.resp == Resp::Okay && r.data == data as u64
}

#[quickcheck]
fn strobe_replaces_only_selected_bytes(initial: u32, data: u32, strb: u8) -> bool {
    let strb = strb & 0xf;
    let mut sim = sim();
    sim.dut.mem.block_in.set(5, initial as u64);

    mmio_write(&mut sim, 0x14, data as u64, strb).unwrap();

    let got = sim.dut.mem.block_in[5] as u32;
    (0..4).all(|lane| {
        let shift = lane * 8;
        let expected = if strb & (1 << lane) != 0 { data } else { initial };
        (got >> shift) & 0xff == (expected >> shift) & 0xff
    })
}

#[quickcheck]
fn accesses_outside_memory_change_nothing(addr: u8, data: u32) -> TestResult {
    let addr = addr as u64;
    if addr & 0b11 == 0 && ((addr >> 2) as usize) < DEPTH {
        return TestResult::discard();
    }
    let mut sim = sim();
    let before = sim.dut.mem.block_in.clone();
    let b = mmio_write(&mut sim, addr, data as u64, 0xf).unwrap();
    TestResult::from_bool(b.resp == Resp::Okay && sim.dut.mem.block_in == before)
}
