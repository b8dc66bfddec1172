pub mod axi;
pub mod bridge;
pub mod gpio;
pub mod iir;
pub mod memory;
pub mod slave;
