use std::fs;
use std::io::Write;
use std::path::Path;

pub fn write_string_to_file(input: String, file_path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut file = fs::File::create(file_path)?;
    file.write_all(input.as_bytes())?;
    Ok(())
}

/// All-ones mask covering the lowest `width` bits
pub fn bit_mask(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// ceil(log2(v)), with log2ceil(0) == log2ceil(1) == 0
pub fn log2ceil(v: u64) -> u32 {
    if v <= 1 {
        0
    } else {
        u64::BITS - (v - 1).leading_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1, 0)]
    #[test_case(2, 1)]
    #[test_case(4, 2)]
    #[test_case(300, 9)]
    #[test_case(3000, 12)]
    #[test_case(4096, 12)]
    #[test_case(4097, 13)]
    fn log2ceil_matches_float(v: u64, expected: u32) {
        assert_eq!(log2ceil(v), expected);
    }

    #[test]
    fn bit_mask_saturates_at_word_size() {
        assert_eq!(bit_mask(0), 0);
        assert_eq!(bit_mask(8), 0xff);
        assert_eq!(bit_mask(32), 0xffff_ffff);
        assert_eq!(bit_mask(64), u64::MAX);
    }
}
