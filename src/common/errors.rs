use crate::blocks::axi::{Channel, Resp};
use crate::common::{Addr, Cycle, Word};
use std::io;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("data width must be 32 or 64 bits, got {0}")]
    InvalidDataWidth(u32),

    #[error("address width must be within 2..=64 bits, got {0}")]
    InvalidAddrWidth(u32),

    #[error("memory depth must be at least one word, got {0}")]
    InvalidDepth(usize),

    #[error("invalid sliding window configuration: samples={samples} count={count}")]
    InvalidFilterConfig { samples: u32, count: u32 },

    #[error("{channel} handshake did not complete within {cycles} cycles")]
    HandshakeTimeout { channel: Channel, cycles: Cycle },

    #[error("read of {addr:#x} returned {actual:#x}, expected {expected:#x}")]
    ReadMismatch { addr: Addr, expected: Word, actual: Word },

    #[error("{channel} response for {addr:#x} was {resp:?}, expected Okay")]
    UnexpectedResp { channel: Channel, addr: Addr, resp: Resp },

    #[error("address {0:#x} does not map onto a memory word")]
    UnmappedAddress(Addr),

    #[error("host I/O error")]
    IoError(#[from] io::Error),

    #[error("JSON serialization failed")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
