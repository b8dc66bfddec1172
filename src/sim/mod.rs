pub mod driver;
pub mod mmio_if;
pub mod scenarios;
pub mod simif;
pub mod trace;
