use crate::common::config::BusConfig;
use crate::common::{Addr, Word};
use bitvec::prelude::*;
use std::ops::Index;

/// Fixed-depth array of words, each masked to the data width on assignment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordArray {
    mask: Word,
    words: Vec<Word>,
}

impl WordArray {
    pub fn new(depth: usize, data_bits: u32) -> Self {
        WordArray {
            mask:  crate::common::utils::bit_mask(data_bits),
            words: vec![0; depth],
        }
    }

    pub fn len(self: &Self) -> usize {
        self.words.len()
    }

    pub fn is_empty(self: &Self) -> bool {
        self.words.is_empty()
    }

    pub fn get(self: &Self, idx: usize) -> Option<Word> {
        self.words.get(idx).copied()
    }

    /// Returns the masked value that was stored, or `None` when `idx` is out of range
    pub fn set(self: &mut Self, idx: usize, value: Word) -> Option<Word> {
        let mask = self.mask;
        match self.words.get_mut(idx) {
            Some(w) => {
                *w = value & mask;
                Some(*w)
            }
            None => None,
        }
    }

    pub fn iter(self: &Self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }
}

impl Index<usize> for WordArray {
    type Output = Word;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.words[idx]
    }
}

/// Result of mapping a bus address onto the memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Word(usize),
    Misaligned,
    OutOfRange,
}

/// # Context
/// - Storage behind an AXI4-Lite slave
/// - `block_in`: written by the bus, read by the surrounding design
/// - `block_out`: written by the surrounding design, read by the bus
#[derive(Clone, Debug)]
pub struct AxiMemory {
    addr_mask: Addr,
    lanes: usize,
    pub block_in: WordArray,
    pub block_out: WordArray,
}

impl Default for AxiMemory {
    fn default() -> Self {
        AxiMemory::from_cfg(&BusConfig::default())
    }
}

impl AxiMemory {
    pub fn new(depth: usize, data_bits: u32) -> Self {
        let cfg = BusConfig {
            depth: depth,
            data_bits: data_bits,
            ..BusConfig::default()
        };
        Self::from_cfg(&cfg)
    }

    pub fn from_cfg(cfg: &BusConfig) -> Self {
        AxiMemory {
            addr_mask: cfg.addr_mask(),
            lanes:     cfg.strb_bits() as usize,
            block_in:  WordArray::new(cfg.depth, cfg.data_bits),
            block_out: WordArray::new(cfg.depth, cfg.data_bits),
        }
    }

    pub fn depth(self: &Self) -> usize {
        self.block_in.len()
    }

    /// Word index is `addr[addr_bits-1:2]`; the low two bits must be zero
    pub fn decode(self: &Self, addr: Addr) -> Decoded {
        let addr = addr & self.addr_mask;
        if addr & 0b11 != 0 {
            return Decoded::Misaligned;
        }
        let idx = (addr >> 2) as usize;
        if idx < self.depth() {
            Decoded::Word(idx)
        } else {
            Decoded::OutOfRange
        }
    }

    /// Replace the bytes of `block_in[idx]` selected by `strb`, leaving the others
    pub fn write_strobed(self: &mut Self, idx: usize, data: Word, strb: u8) -> Option<Word> {
        let cur = self.block_in.get(idx)?;
        let mut next = cur;
        for (lane, en) in strb.view_bits::<Lsb0>().iter().by_vals().take(self.lanes).enumerate() {
            if en {
                let byte_mask: Word = 0xff << (lane * 8);
                next = (next & !byte_mask) | (data & byte_mask);
            }
        }
        self.block_in.set(idx, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0x00, Decoded::Word(0))]
    #[test_case(0x1c, Decoded::Word(7))]
    #[test_case(0x20, Decoded::OutOfRange)]
    #[test_case(0x02, Decoded::Misaligned)]
    #[test_case(0x19, Decoded::Misaligned)]
    #[test_case(0x104, Decoded::Word(1); "upper bits are ignored")]
    fn decode_default_memory(addr: Addr, expected: Decoded) {
        let mem = AxiMemory::default();
        assert_eq!(mem.decode(addr), expected);
    }

    #[test_case(0xf, 0x1234_5678)]
    #[test_case(0x1, 0xaaaa_aa78)]
    #[test_case(0x6, 0xaa34_56aa)]
    #[test_case(0x8, 0x12aa_aaaa)]
    #[test_case(0x0, 0xaaaa_aaaa)]
    fn strobe_selects_byte_lanes(strb: u8, expected: Word) {
        let mut mem = AxiMemory::default();
        mem.block_in.set(3, 0xaaaa_aaaa);
        mem.write_strobed(3, 0x1234_5678, strb);
        assert_eq!(mem.block_in[3], expected);
    }

    #[test]
    fn wide_words_use_eight_lanes() {
        let mut mem = AxiMemory::new(4, 64);
        mem.write_strobed(0, 0x0123_4567_89ab_cdef, 0xf0);
        assert_eq!(mem.block_in[0], 0x0123_4567_0000_0000);
        mem.write_strobed(0, 0xffff_ffff_ffff_ffff, 0x01);
        assert_eq!(mem.block_in[0], 0x0123_4567_0000_00ff);
    }

    #[test]
    fn assignments_are_masked() {
        let mut mem = AxiMemory::default();
        assert_eq!(mem.block_out.set(0, 0x1_0000_0001), Some(1));
        assert_eq!(mem.block_out.set(8, 1), None);
        assert_eq!(mem.write_strobed(8, 1, 0xf), None);
    }
}
