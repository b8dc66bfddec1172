use crate::blocks::axi::{Channel, Resp};
use crate::blocks::memory::Decoded;
use crate::blocks::slave::AxiLiteSlave;
use crate::common::errors::*;
use crate::common::{Addr, Cycle, Word};
use crate::sim::mmio_if::{mmio_read, mmio_write};
use crate::sim::simif::Sim;
use indicatif::ProgressBar;
use log::{debug, info};
use rand::Rng;
use serde::Serialize;

/// Summary of a random write/read run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StressReport {
    pub iterations: u32,

    /// Writes that landed in memory
    pub writes: u32,

    /// Reads that were compared against the shadow copy
    pub checked_reads: u32,

    /// Misaligned or out-of-range accesses that were dropped by the bridge
    pub ignored: u32,

    pub cycles: Cycle,
}

/// Turn anything but an OKAY response into an error
pub fn expect_okay(channel: Channel, addr: Addr, resp: Resp) -> Result<()> {
    match resp {
        Resp::Okay => Ok(()),
        _ => Err(Error::UnexpectedResp {
            channel: channel,
            addr: addr,
            resp: resp,
        }),
    }
}

/// Random write/read round-trips against an `AxiLiteSlave`.
///
/// Every write uses a random strobe and an address that may be misaligned or
/// past the end of memory. The host side copies `block_in` to `block_out`
/// after each write so the value can be read back over the bus and compared
/// against a shadow model.
pub fn test_axil_bridge<R: Rng>(
    sim: &mut Sim<AxiLiteSlave>,
    iterations: u32,
    rng: &mut R,
    show_progress: bool,
) -> Result<StressReport> {
    let bar = if show_progress {
        ProgressBar::new(iterations as u64)
    } else {
        ProgressBar::hidden()
    };

    let cfg = *sim.dut.xbar.cfg();
    let mut shadow: Vec<Word> = vec![0; cfg.depth];
    let start = sim.cycle();
    let mut report = StressReport {
        iterations: iterations,
        ..StressReport::default()
    };

    info!("stress run: {} iterations, {:?}", iterations, cfg);

    // the top fifth of the address span lies past the end of memory
    let span = (cfg.depth as u64 * 5).min(cfg.addr_mask());
    for i in 0..iterations {
        bar.inc(1);

        let addr = if rng.gen_bool(0.9) {
            rng.gen_range(0..=span) & !0b11
        } else {
            rng.gen_range(0..=span)
        };
        let data: Word = rng.gen::<u64>() & cfg.data_mask();
        let strb: u8 = rng.gen::<u8>() & cfg.strb();

        let b = mmio_write(sim, addr, data, strb)?;
        expect_okay(Channel::B, addr, b.resp)?;

        match sim.dut.mem.decode(addr) {
            Decoded::Word(idx) => {
                for lane in 0..cfg.strb_bits() {
                    if (strb >> lane) & 1 == 1 {
                        let byte_mask: Word = 0xff << (lane * 8);
                        shadow[idx] = (shadow[idx] & !byte_mask) | (data & byte_mask);
                    }
                }
                report.writes += 1;

                let stored = sim.dut.mem.block_in[idx];
                sim.dut.mem.block_out.set(idx, stored);

                let r = mmio_read(sim, addr)?;
                expect_okay(Channel::R, addr, r.resp)?;
                if r.data != shadow[idx] {
                    return Err(Error::ReadMismatch {
                        addr: addr,
                        expected: shadow[idx],
                        actual: r.data,
                    });
                }
                report.checked_reads += 1;
            }
            skip => {
                debug!("iter {} access {:#x} dropped ({:?})", i, addr, skip);
                report.ignored += 1;
            }
        }
    }
    bar.finish();

    report.cycles = sim.cycle() - start;
    info!("stress run done in {} cycles", report.cycles);
    return Ok(report);
}
