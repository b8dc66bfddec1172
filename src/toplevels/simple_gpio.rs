use crate::blocks::axi::AxiVersion;
use crate::blocks::gpio::Gpio;
use crate::common::port::{Entity, Port};
use crate::common::utils::bit_mask;
use crate::sim::simif::Dut;
use crate::sim::trace::SignalValue;

pub const NAME: &str = "simple_gpio";

pub const WIDTH: u32 = 4;

pub fn version() -> AxiVersion {
    AxiVersion::new(1, 0)
}

pub fn name_and_ver() -> String {
    format!("{}_v{}", NAME, version().to_string().replace('.', "_"))
}

/// Output-only GPIO bank driven straight from `reg_out`
#[derive(Debug, Clone)]
pub struct SimpleGpio {
    pub gpio: Gpio,
    reg_out: u64,
}

impl SimpleGpio {
    pub fn new() -> Self {
        SimpleGpio {
            gpio: Gpio::new(WIDTH, false, false),
            reg_out: 0,
        }
    }

    pub fn set_reg_out(self: &mut Self, value: u64) {
        self.reg_out = value & bit_mask(WIDTH);
    }

    pub fn ports() -> Vec<Port> {
        let mut ports = vec![Port::input("reg_out", WIDTH)];
        ports.extend(Gpio::new(WIDTH, false, false).ports("gpio_"));
        ports
    }

    pub fn entity() -> Entity {
        Entity {
            name: name_and_ver(),
            ports: Self::ports(),
        }
    }
}

impl Default for SimpleGpio {
    fn default() -> Self {
        SimpleGpio::new()
    }
}

impl Dut for SimpleGpio {
    fn set_reset(self: &mut Self, _asserted: bool) {}

    fn posedge(self: &mut Self) {}

    fn comb(self: &mut Self) {
        self.gpio.drive_o(self.reg_out);
    }

    fn signals(self: &Self) -> Vec<SignalValue> {
        vec![
            SignalValue::new("reg_out", WIDTH, self.reg_out),
            SignalValue::new("gpio_tri_o", WIDTH, self.gpio.tri_o()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_name() {
        assert_eq!(name_and_ver(), "simple_gpio_v1_0");
    }

    #[test]
    fn output_follows_register() {
        let mut top = SimpleGpio::new();
        top.set_reg_out(0x1a);
        top.comb();
        assert_eq!(top.gpio.tri_o(), 0xa);
    }

    #[test]
    fn only_output_ports() {
        let ports = SimpleGpio::ports();
        let names: Vec<&str> = ports.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["reg_out", "gpio_tri_o"]);
    }
}
