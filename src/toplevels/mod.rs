pub mod simple_gpio;

use crate::common::config::Top;
use crate::common::port::Entity;

pub fn name_and_ver(top: Top) -> String {
    match top {
        Top::MemTest => mem_test::name_and_ver(),
        Top::SimpleGpio => simple_gpio::name_and_ver(),
    }
}

/// Black-box description of a top-level
pub fn describe(top: Top) -> Entity {
    match top {
        Top::MemTest => mem_test::MemTest::entity(),
        Top::SimpleGpio => simple_gpio::SimpleGpio::entity(),
    }
}
