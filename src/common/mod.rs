pub mod config;
pub mod errors;
pub mod port;
pub mod utils;

pub use errors::{Error, Result};

/// Byte address on the bus
pub type Addr = u64;

/// One memory word, masked to the configured data width
pub type Word = u64;

/// Number of rising clock edges
pub type Cycle = u64;
