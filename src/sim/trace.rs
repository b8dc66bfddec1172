use crate::common::utils::write_string_to_file;
use crate::common::Cycle;
use indexmap::IndexMap;
use std::fmt::Write;
use std::path::Path;

/// Snapshot of one named signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalValue {
    pub name: String,
    pub width: u32,
    pub value: u64,
}

impl SignalValue {
    pub fn new(name: impl Into<String>, width: u32, value: u64) -> Self {
        SignalValue {
            name: name.into(),
            width: width,
            value: value,
        }
    }

    pub fn bit(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, 1, value as u64)
    }
}

#[derive(Debug, Clone)]
struct TraceVar {
    id: String,
    width: u32,
    last: Option<u64>,
}

/// Half period of the traced clock in timescale units
pub const HALF_PERIOD: u64 = 10;

const CLK: &str = "clk";

/// Value change dump writer.
/// Signals are registered on the first sample and keep their registration order.
#[derive(Debug, Clone)]
pub struct VcdTracer {
    top: String,
    vars: IndexMap<String, TraceVar>,
    body: String,
}

fn vcd_id(mut idx: usize) -> String {
    let mut id = String::new();
    loop {
        id.push((b'!' + (idx % 94) as u8) as char);
        idx /= 94;
        if idx == 0 {
            break;
        }
        idx -= 1;
    }
    id
}

fn vcd_value(width: u32, value: u64, id: &str) -> String {
    if width == 1 {
        format!("{}{}", value & 1, id)
    } else {
        format!("b{:b} {}", value, id)
    }
}

impl VcdTracer {
    pub fn new(top: impl Into<String>) -> Self {
        VcdTracer {
            top: top.into(),
            vars: IndexMap::new(),
            body: String::new(),
        }
    }

    pub fn signal_names(self: &Self) -> Vec<&str> {
        self.vars.keys().map(|k| k.as_str()).collect()
    }

    fn register(self: &mut Self, name: &str, width: u32) {
        if !self.vars.contains_key(name) {
            let id = vcd_id(self.vars.len());
            self.vars.insert(
                name.to_string(),
                TraceVar {
                    id: id,
                    width: width,
                    last: None,
                },
            );
        }
    }

    fn emit(self: &mut Self, sig: &SignalValue) {
        self.register(&sig.name, sig.width);
        if let Some(var) = self.vars.get_mut(&sig.name) {
            if var.last != Some(sig.value) {
                var.last = Some(sig.value);
                let line = vcd_value(var.width, sig.value, &var.id);
                self.body.push_str(&line);
                self.body.push('\n');
            }
        }
    }

    /// Initial values before the first clock edge
    pub fn sample_initial(self: &mut Self, signals: &[SignalValue]) {
        self.body.push_str("#0\n");
        self.emit(&SignalValue::bit(CLK, false));
        for s in signals {
            self.emit(s);
        }
    }

    /// Values right after rising edge number `cycle`, followed by the falling edge
    pub fn sample_posedge(self: &mut Self, cycle: Cycle, signals: &[SignalValue]) {
        let rise = cycle * 2 * HALF_PERIOD - HALF_PERIOD;
        let _ = writeln!(self.body, "#{}", rise);
        self.emit(&SignalValue::bit(CLK, true));
        for s in signals {
            self.emit(s);
        }
        let _ = writeln!(self.body, "#{}", rise + HALF_PERIOD);
        self.emit(&SignalValue::bit(CLK, false));
    }

    pub fn render(self: &Self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "$version axil-sim $end");
        let _ = writeln!(out, "$timescale 1ns $end");
        let _ = writeln!(out, "$scope module {} $end", self.top);
        for (name, var) in self.vars.iter() {
            let _ = writeln!(out, "$var wire {} {} {} $end", var.width, var.id, name);
        }
        let _ = writeln!(out, "$upscope $end");
        let _ = writeln!(out, "$enddefinitions $end");
        out.push_str(&self.body);
        out
    }

    pub fn dump(self: &Self, path: impl AsRef<Path>) -> std::io::Result<()> {
        write_string_to_file(self.render(), path)
    }
}
