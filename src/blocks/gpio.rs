use crate::common::port::Port;
use crate::common::utils::bit_mask;

/// Tri-state GPIO bank. Ports that are not enabled stay out of the port list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gpio {
    width: u32,
    use_i: bool,
    use_t: bool,

    tri_o: u64,
}

impl Gpio {
    pub fn new(width: u32, use_i: bool, use_t: bool) -> Self {
        Gpio {
            width: width,
            use_i: use_i,
            use_t: use_t,
            tri_o: 0,
        }
    }

    pub fn tri_o(self: &Self) -> u64 {
        self.tri_o
    }

    pub fn drive_o(self: &mut Self, value: u64) {
        self.tri_o = value & bit_mask(self.width);
    }

    pub fn ports(self: &Self, prefix: &str) -> Vec<Port> {
        let mut ports = vec![];
        if self.use_i {
            ports.push(Port::input(format!("{}tri_i", prefix), self.width));
        }
        ports.push(Port::output(format!("{}tri_o", prefix), self.width));
        if self.use_t {
            ports.push(Port::output(format!("{}tri_t", prefix), self.width));
        }
        ports
    }
}
