use crate::common::config::BusConfig;
use crate::common::port::Port;
use crate::common::utils::log2ceil;
use crate::common::{Addr, Word};
use serde::Serialize;
use std::fmt;
use strum::EnumCount;
use strum_macros::EnumCount as EnumCountMacro;

/// AXI4-Lite response code, as driven on `bresp` and `rresp`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, EnumCountMacro)]
#[repr(u8)]
pub enum Resp {
    #[default]
    Okay = 0b00,
    Reserved = 0b01,
    SlvErr = 0b10,
    Reserved2 = 0b11,
}

impl Resp {
    /// Width of the response field on the bus
    pub fn bits() -> u32 {
        log2ceil(Self::COUNT as u64)
    }

    pub fn to_bits(self: &Self) -> u8 {
        *self as u8
    }

    pub fn from_bits(x: u8) -> Self {
        match x & 0b11 {
            0b00 => Resp::Okay,
            0b01 => Resp::Reserved,
            0b10 => Resp::SlvErr,
            _ => Resp::Reserved2,
        }
    }
}

/// The five AXI4-Lite channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum Channel {
    AR,
    R,
    AW,
    W,
    B,
}

/// Version descriptor exposed as a read-only register by top-levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxiVersion {
    major: u32,
    minor: u32,
    rev_id: u32,
}

impl AxiVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self::with_rev(major, minor, 0)
    }

    pub fn with_rev(major: u32, minor: u32, rev_id: u32) -> Self {
        AxiVersion {
            major: major,
            minor: minor,
            rev_id: rev_id,
        }
    }

    pub fn major(self: &Self) -> u32 {
        self.major
    }

    pub fn minor(self: &Self) -> u32 {
        self.minor
    }

    pub fn rev_id(self: &Self) -> u32 {
        self.rev_id
    }

    /// Packed register layout: major[31:24] minor[23:16] rev_id[15:12]
    pub fn value(self: &Self) -> u32 {
        ((self.major & 0xFF) << 24) | ((self.minor & 0xFF) << 16) | ((self.rev_id & 0xF) << 12)
    }
}

impl Default for AxiVersion {
    fn default() -> Self {
        AxiVersion::new(1, 0)
    }
}

impl fmt::Display for AxiVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxiLiteAW {
    pub addr: Addr,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxiLiteW {
    pub data: Word,
    pub strb: u8,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxiLiteB {
    pub resp: Resp,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxiLiteAR {
    pub addr: Addr,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxiLiteR {
    pub data: Word,
    pub resp: Resp,
}

/// # Context
/// - Every signal of an AXI4-Lite slave port
/// - The slave owns the `*ready`, `bvalid`, `rvalid`, `bresp`, `rresp` and `rdata` fields,
///   the master drives the rest between clock edges
/// - Setters mask to the configured field widths
#[derive(Debug, Clone)]
pub struct AxiBusInterface {
    cfg: BusConfig,

    pub aresetn: bool,

    // write address
    pub awaddr:  Addr,
    pub awvalid: bool,
    pub awready: bool,

    // write data
    pub wdata:  Word,
    pub wstrb:  u8,
    pub wvalid: bool,
    pub wready: bool,

    // write response
    pub bresp:  Resp,
    pub bvalid: bool,
    pub bready: bool,

    // read address
    pub araddr:  Addr,
    pub arvalid: bool,
    pub arready: bool,

    // read data
    pub rdata:  Word,
    pub rresp:  Resp,
    pub rvalid: bool,
    pub rready: bool,
}

impl AxiBusInterface {
    pub fn new(cfg: BusConfig) -> Self {
        AxiBusInterface {
            cfg:     cfg,
            aresetn: true,
            awaddr:  0,
            awvalid: false,
            awready: false,
            wdata:   0,
            wstrb:   0,
            wvalid:  false,
            wready:  false,
            bresp:   Resp::Okay,
            bvalid:  false,
            bready:  false,
            araddr:  0,
            arvalid: false,
            arready: true,
            rdata:   0,
            rresp:   Resp::Okay,
            rvalid:  false,
            rready:  true,
        }
    }

    pub fn cfg(self: &Self) -> &BusConfig {
        &self.cfg
    }

    pub fn set_awaddr(self: &mut Self, addr: Addr) {
        self.awaddr = addr & self.cfg.addr_mask();
    }

    pub fn set_araddr(self: &mut Self, addr: Addr) {
        self.araddr = addr & self.cfg.addr_mask();
    }

    pub fn set_wdata(self: &mut Self, data: Word) {
        self.wdata = data & self.cfg.data_mask();
    }

    pub fn set_wstrb(self: &mut Self, strb: u8) {
        self.wstrb = strb & self.cfg.strb();
    }

    pub fn set_rdata(self: &mut Self, data: Word) {
        self.rdata = data & self.cfg.data_mask();
    }

    pub fn poke_aw(self: &mut Self, aw: &AxiLiteAW) {
        self.set_awaddr(aw.addr);
    }

    pub fn poke_w(self: &mut Self, w: &AxiLiteW) {
        self.set_wdata(w.data);
        self.set_wstrb(w.strb);
    }

    pub fn poke_ar(self: &mut Self, ar: &AxiLiteAR) {
        self.set_araddr(ar.addr);
    }

    pub fn peek_b(self: &Self) -> AxiLiteB {
        AxiLiteB { resp: self.bresp }
    }

    pub fn peek_r(self: &Self) -> AxiLiteR {
        AxiLiteR {
            data: self.rdata,
            resp: self.rresp,
        }
    }

    /// True when both sides of `channel` are asserted, i.e. the next edge transfers
    pub fn fire(self: &Self, channel: Channel) -> bool {
        match channel {
            Channel::AR => self.arvalid && self.arready,
            Channel::R  => self.rvalid  && self.rready,
            Channel::AW => self.awvalid && self.awready,
            Channel::W  => self.wvalid  && self.wready,
            Channel::B  => self.bvalid  && self.bready,
        }
    }

    /// Port list with every bus signal prefixed by `prefix`
    pub fn ports(self: &Self, prefix: &str) -> Vec<Port> {
        let a = self.cfg.addr_bits;
        let d = self.cfg.data_bits;
        let s = self.cfg.strb_bits();
        let r = Resp::bits();
        let p = |n: &str| format!("{}{}", prefix, n);
        vec![
            Port::input (p("aclk"),    1),
            Port::input (p("aresetn"), 1),
            Port::input (p("awaddr"),  a),
            Port::input (p("awvalid"), 1),
            Port::output(p("awready"), 1),
            Port::input (p("wdata"),   d),
            Port::input (p("wstrb"),   s),
            Port::input (p("wvalid"),  1),
            Port::output(p("wready"),  1),
            Port::output(p("bresp"),   r),
            Port::output(p("bvalid"),  1),
            Port::input (p("bready"),  1),
            Port::input (p("araddr"),  a),
            Port::input (p("arvalid"), 1),
            Port::output(p("arready"), 1),
            Port::output(p("rdata"),   d),
            Port::output(p("rresp"),   r),
            Port::output(p("rvalid"),  1),
            Port::input (p("rready"),  1),
        ]
    }
}
