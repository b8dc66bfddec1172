use crate::common::errors::*;
use crate::common::utils::bit_mask;
use crate::common::Cycle;
use clap::{Parser, ValueEnum};
use serde::Serialize;

/// # Context
/// - Construction-time shape of an AXI4-Lite slave and the memory behind it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusConfig {
    /// Address bus width in bits
    pub addr_bits: u32,

    /// Data bus width in bits, 32 or 64
    pub data_bits: u32,

    /// Number of words in each memory array
    pub depth: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig {
            addr_bits: 8,
            data_bits: 32,
            depth: 8,
        }
    }
}

impl BusConfig {
    pub fn try_new(addr_bits: u32, data_bits: u32, depth: usize) -> Result<Self> {
        let cfg = BusConfig {
            addr_bits: addr_bits,
            data_bits: data_bits,
            depth: depth,
        };
        cfg.validate()?;
        return Ok(cfg);
    }

    pub fn validate(self: &Self) -> Result<()> {
        if self.data_bits != 32 && self.data_bits != 64 {
            return Err(Error::InvalidDataWidth(self.data_bits));
        }
        if self.addr_bits < 2 || self.addr_bits > 64 {
            return Err(Error::InvalidAddrWidth(self.addr_bits));
        }
        if self.depth == 0 {
            return Err(Error::InvalidDepth(self.depth));
        }
        Ok(())
    }

    /// Number of byte lanes, i.e. the width of `wstrb`
    pub fn strb_bits(self: &Self) -> u32 {
        self.data_bits / 8
    }

    /// Strobe with every byte lane enabled
    pub fn strb(self: &Self) -> u8 {
        bit_mask(self.strb_bits()) as u8
    }

    pub fn data_mask(self: &Self) -> u64 {
        bit_mask(self.data_bits)
    }

    pub fn addr_mask(self: &Self) -> u64 {
        bit_mask(self.addr_bits)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
pub enum Top {
    /// AXI4-Lite mapped memory with a version register
    MemTest,

    /// Output-only GPIO wrapper
    SimpleGpio,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Top-level design to elaborate
    #[arg(short, long, value_enum, default_value_t = Top::MemTest)]
    pub top: Top,

    /// Print the versioned design name and exit
    #[arg(long, default_value_t = false)]
    pub print_version: bool,

    /// Write the port description of the top-level as JSON to this file
    #[arg(long)]
    pub ports: Option<String>,

    /// Run the read and write scenarios and dump VCD waveforms into this directory
    #[arg(long)]
    pub trace_dir: Option<String>,

    /// Number of random write/read round-trips to run against the bridge.
    /// The stress run always targets a bare AXI4-Lite slave shaped by
    /// `--addr-bits`, `--data-bits` and `--depth`; `--top` does not apply to it.
    #[arg(long, default_value_t = 0)]
    pub stress_iterations: u32,

    /// address bus width in bits
    #[arg(long, default_value_t = 8)]
    pub addr_bits: u32,

    /// data bus width in bits (32 or 64)
    #[arg(long, default_value_t = 32)]
    pub data_bits: u32,

    /// number of words in the memory arrays
    #[arg(long, default_value_t = 32)]
    pub depth: usize,

    /// cycle budget for a single handshake before giving up
    #[arg(long, default_value_t = 1000)]
    pub max_cycles: Cycle,
}

impl Args {
    pub fn bus_config(self: &Self) -> Result<BusConfig> {
        BusConfig::try_new(self.addr_bits, self.data_bits, self.depth)
    }
}
