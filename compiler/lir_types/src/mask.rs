//! Fixed-width all-ones bit patterns wider than a machine word.
//!
//! Stands in for arbitrary-precision integer support: the only value this
//! core ever needs is "the low `width` bits set".

use std::fmt;

use smallvec::SmallVec;

/// An all-ones mask of `width` bits, stored little-endian in 64-bit words.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct WideMask {
    width: u32,
    words: SmallVec<[u64; 2]>,
}

impl WideMask {
    /// Mask with the low `width` bits set.
    pub fn all_ones(width: u32) -> Self {
        let full = (width / 64) as usize;
        let rem = width % 64;
        let mut words: SmallVec<[u64; 2]> = SmallVec::from_elem(u64::MAX, full);
        if rem != 0 {
            words.push(u64::MAX >> (64 - rem));
        }
        Self { width, words }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Little-endian words; the last word holds the high bits.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// The low 64 bits.
    pub fn low_u64(&self) -> u64 {
        self.words.first().copied().unwrap_or(0)
    }

    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }
}

impl fmt::Debug for WideMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WideMask(i{}: {self})", self.width)
    }
}

impl fmt::Display for WideMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = self.words.iter().rev();
        match words.next() {
            None => f.write_str("0x0"),
            Some(high) => {
                write!(f, "{high:#x}")?;
                for word in words {
                    write!(f, "{word:016x}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests;
