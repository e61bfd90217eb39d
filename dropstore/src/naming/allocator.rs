use rand::Rng;
use crate::store::config::TenantConfig;
use super::{parse_alphabet, NameError, NameGenerator};

/// A fixed-width odometer over a symbol alphabet.
///
/// Each call to [`next`](NameAllocator::next) returns the current code and
/// advances the least-significant position, carrying leftwards when a
/// position runs past the last symbol. A carry out of the most-significant
/// position wraps to the all-lowest code. Once the odometer is back at the
/// code it started from, every code has been issued exactly once and every
/// further call fails with [`NameError::SequenceExhausted`].
//
// // 一个基于符号字母表的定宽“里程表”。
// // 每次调用返回当前编码并推进最低位，溢出时向高位进位，最高位溢出时回绕到全零；
// // 回到起点时序列关闭，后续调用全部返回 SequenceExhausted。
#[derive(Debug, Clone)]
pub struct NameAllocator {
    alphabet: Vec<char>,
    /// Symbol indices, most-significant first.
    digits: Vec<usize>,
    origin: Vec<usize>,
    exhausted: bool,
}

impl NameAllocator {
    /// Creates an allocator starting at the all-lowest code (`"0000"` for the
    /// default alphabet at width 4).
    pub fn new(alphabet: &str, width: usize) -> Result<Self, NameError> {
        let alphabet = parse_alphabet(alphabet)?;
        Ok(NameAllocator {
            alphabet,
            digits: vec![0; width],
            origin: vec![0; width],
            exhausted: false,
        })
    }

    /// Creates an allocator positioned at a random point of the sequence.
    ///
    /// Used for public names so a restarted process does not walk the same
    /// prefix of already-taken names again.
    pub fn starting_at_random(alphabet: &str, width: usize) -> Result<Self, NameError> {
        let mut allocator = NameAllocator::new(alphabet, width)?;
        let mut rng = rand::thread_rng();
        let size = allocator.alphabet.len();
        for digit in allocator.digits.iter_mut() {
            *digit = rng.gen_range(0..size);
        }
        allocator.origin = allocator.digits.clone();
        Ok(allocator)
    }

    /// Creates an allocator whose first code will be `start`.
    pub fn starting_at(alphabet: &str, start: &str) -> Result<Self, NameError> {
        let mut allocator = NameAllocator::new(alphabet, start.chars().count())?;
        for (digit, symbol) in allocator.digits.iter_mut().zip(start.chars()) {
            *digit = allocator
                .alphabet
                .iter()
                .position(|c| *c == symbol)
                .ok_or_else(|| NameError::InvalidAlphabet(format!("'{}' is not in the alphabet", symbol)))?;
        }
        allocator.origin = allocator.digits.clone();
        Ok(allocator)
    }

    pub fn width(&self) -> usize {
        self.digits.len()
    }

    /// Returns the current code and advances the odometer.
    pub fn next(&mut self) -> Result<String, NameError> {
        if self.exhausted {
            return Err(NameError::SequenceExhausted { width: self.width() });
        }
        let code: String = self.digits.iter().map(|&d| self.alphabet[d]).collect();

        // 从最低位开始进位；最高位的进位直接丢弃，即回绕
        for position in (0..self.digits.len()).rev() {
            self.digits[position] += 1;
            if self.digits[position] < self.alphabet.len() {
                break;
            }
            self.digits[position] = 0;
        }
        if self.digits == self.origin {
            self.exhausted = true;
        }

        Ok(code)
    }
}

impl NameGenerator for NameAllocator {
    fn generate(&mut self, _tenant: &TenantConfig) -> Result<String, NameError> {
        self.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_first_codes_of_default_alphabet() {
        let mut allocator = NameAllocator::new(crate::common::constants::DEFAULT_ALPHABET, 4).unwrap();
        assert_eq!(allocator.next().unwrap(), "0000");
        assert_eq!(allocator.next().unwrap(), "0001");
        assert_eq!(allocator.next().unwrap(), "0002");
    }

    #[test]
    fn test_carries_across_several_positions() {
        let mut allocator = NameAllocator::starting_at("ab", "abb").unwrap();
        assert_eq!(allocator.next().unwrap(), "abb");
        assert_eq!(allocator.next().unwrap(), "baa");
        assert_eq!(allocator.next().unwrap(), "bab");
    }

    #[test]
    fn test_sequence_exhaustion() {
        let mut allocator = NameAllocator::new("xyz", 2).unwrap();
        let codes: Vec<String> = (0..9).map(|_| allocator.next().unwrap()).collect();
        assert_eq!(codes.first().unwrap(), "xx");
        assert_eq!(codes.last().unwrap(), "zz");
        assert!(matches!(allocator.next(), Err(NameError::SequenceExhausted { width: 2 })));
        // 一旦耗尽就保持耗尽
        assert!(allocator.next().is_err());
    }

    #[test]
    fn test_wraps_around_to_origin() {
        let mut allocator = NameAllocator::starting_at("xyz", "zy").unwrap();
        let codes: Vec<String> = (0..9).map(|_| allocator.next().unwrap()).collect();
        assert_eq!(codes[..3], ["zy", "zz", "xx"]);
        assert_eq!(codes.last().unwrap(), "zx");
        assert!(matches!(allocator.next(), Err(NameError::SequenceExhausted { width: 2 })));
    }

    #[test]
    fn test_starting_at_rejects_foreign_symbols() {
        assert!(NameAllocator::starting_at("ab", "ac").is_err());
    }

    #[test]
    fn test_random_start_has_requested_width() {
        let mut allocator =
            NameAllocator::starting_at_random(crate::common::constants::DEFAULT_ALPHABET, 30).unwrap();
        let code = allocator.next().unwrap();
        assert_eq!(code.chars().count(), 30);
    }

    proptest! {
        #[test]
        fn prop_codes_are_distinct_increasing_then_exhausted(size in 1usize..5, width in 1usize..4) {
            let alphabet: String = "abcde".chars().take(size).collect();
            let mut allocator = NameAllocator::new(&alphabet, width).unwrap();
            let total = size.pow(width as u32);

            let mut seen = HashSet::new();
            let mut previous: Option<String> = None;
            for _ in 0..total {
                let code = allocator.next().unwrap();
                prop_assert_eq!(code.chars().count(), width);
                if let Some(prev) = &previous {
                    // 字母表是升序的，因此按字节比较即按字母表顺序比较
                    prop_assert!(code > *prev);
                }
                prop_assert!(seen.insert(code.clone()));
                previous = Some(code);
            }
            let exhausted = matches!(allocator.next(), Err(NameError::SequenceExhausted { .. }));
            prop_assert!(exhausted);
        }
    }
}
