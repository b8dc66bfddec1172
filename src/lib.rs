pub mod blocks;
pub mod common;
pub mod sim;
pub mod toplevels;

pub use common::errors::{Error, Result};

#[cfg(test)]
pub mod axil_bridge_test {
    use crate::blocks::axi::Resp;
    use crate::blocks::slave::AxiLiteSlave;
    use crate::common::config::BusConfig;
    use crate::sim::mmio_if::*;
    use crate::sim::simif::*;
    use test_case::test_case;

    fn round_trip(addr_bits: u32, data_bits: u32, depth: usize) -> bool {
        let cfg = BusConfig::try_new(addr_bits, data_bits, depth).unwrap();
        let mut sim = Sim::new(AxiLiteSlave::new(cfg).unwrap());
        sim.reset(2);

        for idx in 0..depth {
            let addr = (idx as u64) << 2;
            let data = 0x0101_0101_0101_0101u64.wrapping_mul(idx as u64 + 1) & cfg.data_mask();
            let b = mmio_write(&mut sim, addr, data, cfg.strb()).unwrap();
            if b.resp != Resp::Okay || sim.dut.mem.block_in[idx] != data {
                return false;
            }
            // external logic copies the written word back to the bus side
            sim.dut.mem.block_out.set(idx, data);
        }
        for idx in 0..depth {
            let addr = (idx as u64) << 2;
            let r = mmio_read(&mut sim, addr).unwrap();
            if r.resp != Resp::Okay || r.data != sim.dut.mem.block_in[idx] {
                return false;
            }
        }
        true
    }

    #[test_case(8,  32, 8;  "default bus")]
    #[test_case(8,  32, 32; "scenario bus")]
    #[test_case(12, 32, 1;  "single word")]
    #[test_case(16, 64, 16; "wide data")]
    #[test_case(32, 64, 64; "wide address")]
    pub fn test_round_trip(addr_bits: u32, data_bits: u32, depth: usize) {
        assert_eq!(round_trip(addr_bits, data_bits, depth), true);
    }

    #[test]
    pub fn test_read_takes_two_cycles_write_three() {
        let mut sim = Sim::new(AxiLiteSlave::new(BusConfig::default()).unwrap());
        let start = sim.cycle();
        mmio_write(&mut sim, 0x4, 1, 0xf).unwrap();
        assert_eq!(sim.cycle() - start, 3);
        let start = sim.cycle();
        mmio_read(&mut sim, 0x4).unwrap();
        assert_eq!(sim.cycle() - start, 2);
    }
}
