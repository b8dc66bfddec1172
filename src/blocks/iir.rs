use crate::common::errors::*;
use crate::common::port::Port;
use crate::common::utils::{bit_mask, log2ceil};
use crate::sim::simif::Dut;
use crate::sim::trace::SignalValue;
use log::trace;
use serde::Serialize;

/// Unsigned fixed point number, `mantissa / 2^frac_bits`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixedPoint {
    pub mantissa: u64,
    pub frac_bits: u32,
}

impl FixedPoint {
    /// Closest representable value to `num / den`, ties to even
    pub fn from_ratio(num: u64, den: u64, frac_bits: u32) -> Self {
        let scaled = (num as u128) << frac_bits;
        let den = den as u128;
        let q = scaled / den;
        let r = scaled % den;
        let mantissa = if 2 * r > den || (2 * r == den && q & 1 == 1) {
            q + 1
        } else {
            q
        };
        FixedPoint {
            mantissa: mantissa as u64,
            frac_bits: frac_bits,
        }
    }

    /// `(x * self) >> frac_bits`, truncating
    pub fn mul_truncate(self: &Self, x: u64) -> u64 {
        ((x as u128 * self.mantissa as u128) >> self.frac_bits) as u64
    }
}

/// Construction-time parameters of the sliding window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IirConfig {
    /// Window length in `ready` cycles
    pub samples: u32,

    /// Number of input pulses per window that saturates the filter
    pub count: u32,
}

/// Values derived from an `IirConfig`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IirParams {
    pub frac_bits: u32,
    pub int_bits: u32,
    pub width: u32,
    pub gain: FixedPoint,
}

impl IirConfig {
    pub fn new(samples: u32, count: u32) -> Self {
        IirConfig {
            samples: samples,
            count: count,
        }
    }

    pub fn params(self: &Self) -> Result<IirParams> {
        let invalid = Error::InvalidFilterConfig {
            samples: self.samples,
            count: self.count,
        };
        if self.samples == 0 || self.count < 2 {
            return Err(invalid);
        }
        let frac_bits = log2ceil(self.samples as u64) + 3;
        let int_bits = log2ceil(self.count as u64);
        let width = int_bits + frac_bits;

        // the decay product internal * gain must fit in 64 bits
        if width + frac_bits > u64::BITS {
            return Err(invalid);
        }

        // decay factor is 2^f - samples/count, which has to stay positive
        let one = 1u64 << frac_bits;
        let count = self.count as u64;
        let samples = self.samples as u64;
        if samples >= one * count {
            return Err(invalid);
        }
        let gain = FixedPoint::from_ratio(one * count - samples, count, 0);
        Ok(IirParams {
            frac_bits: frac_bits,
            int_bits: int_bits,
            width: width,
            gain: FixedPoint {
                mantissa: gain.mantissa,
                frac_bits: frac_bits,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum IirState {
    #[default]
    Idle,
    UpdateRequest,
}

/// # Context
/// - Rate detector: `output` pulses when more than `count - 1` input pulses
///   arrived within roughly `samples` `ready` cycles
/// - Every accepted sample is followed by one decay cycle
#[derive(Debug, Clone)]
pub struct IirSlidingWindow {
    cfg: IirConfig,
    params: IirParams,

    pub ready: bool,
    pub input: bool,
    output: bool,

    internal: u64,
    state: IirState,
    in_reset: bool,
}

impl IirSlidingWindow {
    pub fn new(cfg: IirConfig) -> Result<Self> {
        let params = cfg.params()?;
        Ok(IirSlidingWindow {
            cfg: cfg,
            params: params,
            ready: false,
            input: false,
            output: false,
            internal: 0,
            state: IirState::Idle,
            in_reset: false,
        })
    }

    pub fn cfg(self: &Self) -> &IirConfig {
        &self.cfg
    }

    pub fn params(self: &Self) -> &IirParams {
        &self.params
    }

    pub fn output(self: &Self) -> bool {
        self.output
    }

    pub fn internal(self: &Self) -> u64 {
        self.internal
    }

    pub fn state(self: &Self) -> IirState {
        self.state
    }

    pub fn ports(self: &Self) -> Vec<Port> {
        vec![
            Port::input("clk", 1),
            Port::input("rstn", 1),
            Port::input("ready", 1),
            Port::input("input", 1),
            Port::output("output", 1),
        ]
    }

    fn clear(self: &mut Self) {
        self.internal = 0;
        self.output = false;
        self.state = IirState::Idle;
    }
}

impl Dut for IirSlidingWindow {
    fn set_reset(self: &mut Self, asserted: bool) {
        self.in_reset = asserted;
        if asserted {
            self.clear();
        }
    }

    fn posedge(self: &mut Self) {
        if self.in_reset {
            self.clear();
            return;
        }
        let f = self.params.frac_bits;
        match self.state {
            IirState::Idle => {
                if self.ready {
                    if self.input {
                        let saturated = (self.internal >> f) >= (self.cfg.count as u64 - 1);
                        self.output = saturated;
                        if !saturated {
                            self.internal = (self.internal + (1 << f)) & bit_mask(self.params.width);
                        }
                    }
                    self.state = IirState::UpdateRequest;
                }
            }
            IirState::UpdateRequest => {
                let next = self.params.gain.mul_truncate(self.internal) & bit_mask(self.params.width);
                trace!("iir decay {} -> {}", self.internal, next);
                self.internal = next;
                self.output = false;
                self.state = IirState::Idle;
            }
        }
    }

    fn comb(self: &mut Self) {}

    fn signals(self: &Self) -> Vec<SignalValue> {
        vec![
            SignalValue::bit("rstn", !self.in_reset),
            SignalValue::bit("ready", self.ready),
            SignalValue::bit("input", self.input),
            SignalValue::bit("output", self.output),
            SignalValue::new("internal", self.params.width, self.internal),
            SignalValue::bit("update_request", self.state == IirState::UpdateRequest),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(3000, 300, 15, 9, 24, 32758)]
    #[test_case(4, 2, 5, 1, 6, 30)]
    #[test_case(1000, 3, 13, 2, 15, 7859; "fraction rounds up")]
    #[test_case(5, 2, 6, 1, 7, 62; "tie rounds to even")]
    fn derived_parameters(samples: u32, count: u32, f: u32, i: u32, w: u32, gain: u64) {
        let p = IirConfig::new(samples, count).params().unwrap();
        assert_eq!(p.frac_bits, f);
        assert_eq!(p.int_bits, i);
        assert_eq!(p.width, w);
        assert_eq!(p.gain.mantissa, gain);
        assert_eq!(p.gain.frac_bits, f);
    }

    #[test_case(0, 10)]
    #[test_case(10, 0)]
    #[test_case(10, 1)]
    #[test_case(0x8000_0001, 0x4000_0000; "decay product wider than a word")]
    #[test_case(u32::MAX, u32::MAX; "largest window")]
    fn rejects_degenerate_windows(samples: u32, count: u32) {
        assert!(IirConfig::new(samples, count).params().is_err());
        assert!(IirSlidingWindow::new(IirConfig::new(samples, count)).is_err());
    }

    #[test]
    fn single_pulse_decays() {
        let mut iir = IirSlidingWindow::new(IirConfig::new(3000, 300)).unwrap();
        iir.ready = true;
        iir.input = true;
        iir.posedge();
        assert_eq!(iir.internal(), 32768);
        assert_eq!(iir.state(), IirState::UpdateRequest);
        iir.input = false;
        iir.posedge();
        assert_eq!(iir.internal(), 32758);
        assert_eq!(iir.state(), IirState::Idle);
        assert!(!iir.output());
    }

    #[test]
    fn saturates_and_flags_error() {
        let mut iir = IirSlidingWindow::new(IirConfig::new(4, 2)).unwrap();
        iir.ready = true;
        iir.input = true;
        let mut trail = vec![];
        for _ in 0..6 {
            iir.posedge();
            trail.push((iir.internal(), iir.output()));
        }
        assert_eq!(
            trail,
            vec![(32, false), (30, false), (62, false), (58, false), (58, true), (54, false)]
        );
    }

    #[test]
    fn runs_under_the_simulator() {
        use crate::sim::simif::Sim;
        let iir = IirSlidingWindow::new(IirConfig::new(3000, 300)).unwrap();
        assert_eq!(iir.ports().len(), 5);
        let mut sim = Sim::new(iir).with_trace("iir_sliding_window");
        sim.reset(1);
        sim.dut.ready = true;
        sim.dut.input = true;
        sim.step_by(2);
        assert_eq!(sim.dut.internal(), 32758);
        let vcd = sim.trace().unwrap().render();
        assert!(vcd.contains("$var wire 24 "));
    }

    #[test]
    fn idle_without_ready() {
        let mut iir = IirSlidingWindow::new(IirConfig::new(4, 2)).unwrap();
        iir.input = true;
        iir.posedge();
        assert_eq!(iir.internal(), 0);
        assert_eq!(iir.state(), IirState::Idle);
    }

    #[test]
    fn reset_clears_accumulator() {
        let mut iir = IirSlidingWindow::new(IirConfig::new(4, 2)).unwrap();
        iir.ready = true;
        iir.input = true;
        iir.posedge();
        iir.set_reset(true);
        assert_eq!(iir.internal(), 0);
        iir.posedge();
        assert_eq!(iir.internal(), 0);
        assert_eq!(iir.state(), IirState::Idle);
        iir.set_reset(false);
        iir.posedge();
        assert_eq!(iir.internal(), 32);
    }
}
