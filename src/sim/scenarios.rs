use crate::blocks::memory::Decoded;
use crate::blocks::slave::AxiLiteSlave;
use crate::common::config::BusConfig;
use crate::common::errors::*;
use crate::common::{Addr, Cycle, Word};
use crate::sim::mmio_if::{mmio_read_expect, mmio_write};
use crate::sim::simif::Sim;
use log::info;
use std::path::{Path, PathBuf};

/// Full-width address used by the waveform scenarios, truncated to 8 bits on the bus
pub const SCENARIO_ADDR: Addr = 0x43C0_0018;

pub const SCENARIO_VALUE: Word = 0x1234_5678;

pub const READ_TRACE: &str = "axi4lite_sim_read";

pub const WRITE_TRACE: &str = "axi4lite_sim_write";

fn scenario_sim(name: &str, max_cycles: Cycle) -> Result<Sim<AxiLiteSlave>> {
    let cfg = BusConfig::try_new(8, 32, 32)?;
    let slave = AxiLiteSlave::new(cfg)?;
    let mut sim = Sim::new(slave).with_trace(name).with_max_cycles(max_cycles);
    sim.reset(1);
    sim.step();
    Ok(sim)
}

fn scenario_index(sim: &Sim<AxiLiteSlave>, addr: Addr) -> Result<usize> {
    match sim.dut.mem.decode(addr) {
        Decoded::Word(idx) => Ok(idx),
        _ => Err(Error::UnmappedAddress(addr)),
    }
}

/// Preload the scenario word in `block_out` and read it back over the bus
pub fn simulate_read(max_cycles: Cycle) -> Result<Sim<AxiLiteSlave>> {
    let mut sim = scenario_sim(READ_TRACE, max_cycles)?;
    let idx = scenario_index(&sim, SCENARIO_ADDR)?;
    sim.dut.mem.block_out.set(idx, SCENARIO_VALUE);

    mmio_read_expect(&mut sim, SCENARIO_ADDR, SCENARIO_VALUE)?;

    sim.step();
    sim.dut.mem.block_out.set(idx, 0);
    sim.step();
    Ok(sim)
}

/// Write the scenario word with every strobe lane enabled and check `block_in`
pub fn simulate_write(max_cycles: Cycle) -> Result<Sim<AxiLiteSlave>> {
    let mut sim = scenario_sim(WRITE_TRACE, max_cycles)?;
    let idx = scenario_index(&sim, SCENARIO_ADDR)?;
    let strb = sim.dut.xbar.cfg().strb();

    mmio_write(&mut sim, SCENARIO_ADDR, SCENARIO_VALUE, strb)?;

    let stored = sim.dut.mem.block_in[idx];
    if stored != SCENARIO_VALUE {
        return Err(Error::ReadMismatch {
            addr: SCENARIO_ADDR,
            expected: SCENARIO_VALUE,
            actual: stored,
        });
    }
    sim.step_by(2);
    Ok(sim)
}

/// Run both scenarios and write their waveforms into `dir`
pub fn run_scenarios(dir: &Path, max_cycles: Cycle) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut out = vec![];
    for (name, sim) in [
        (READ_TRACE, simulate_read(max_cycles)?),
        (WRITE_TRACE, simulate_write(max_cycles)?),
    ] {
        let path = dir.join(format!("{}.vcd", name));
        sim.dump_trace(&path)?;
        info!("{} passed after {} cycles", name, sim.cycle());
        out.push(path);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_address_maps_to_word_six() {
        let sim = scenario_sim(READ_TRACE, 10).unwrap();
        assert_eq!(scenario_index(&sim, SCENARIO_ADDR).unwrap(), 6);
    }

    #[test]
    fn unmapped_scenario_address_is_named() {
        let sim = scenario_sim(WRITE_TRACE, 10).unwrap();
        match scenario_index(&sim, 0x43C0_0080) {
            Err(Error::UnmappedAddress(0x43C0_0080)) => {}
            other => panic!("unexpected result {:?}", other),
        }
        assert!(matches!(scenario_index(&sim, 0x1a), Err(Error::UnmappedAddress(0x1a))));
    }
}
