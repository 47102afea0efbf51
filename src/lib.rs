mod greedy_packer;
mod holes;
mod lz;
mod match_finder;
mod parsing_packer;

use thiserror::Error;

pub use greedy_packer::pack as pack_fast;
pub use holes::{fill_holes, zero_holes};
pub use lz::{unpack, unpack_consumed, UnpackError, MAX_EXPANSION, MAX_SIZE, MIN_SIZE};
pub use parsing_packer::pack as pack_best;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Take the longest match at every position; fast.
    Greedy,
    /// Minimize the encoded size over the whole page; default.
    Optimal,
}

impl ParseMode {
    fn run(self, data: &[u8]) -> Vec<u8> {
        match self {
            ParseMode::Greedy => greedy_packer::pack(data),
            ParseMode::Optimal => parsing_packer::pack(data),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleMode {
    /// Compress the page exactly as given, final hole included.
    Preserve,
    /// Overwrite the invisible screen hole bytes with whatever
    /// compresses best and drop the final hole.
    Rewrite,
}

#[derive(Error, Debug)]
pub enum PackError {
    #[error("input is {size} bytes, must be {min} - {max}")]
    BadInputSize { size: usize, min: usize, max: usize },
    #[error("verify failed to expand: {0}")]
    Verify(#[from] UnpackError),
    #[error("verify expanded {actual} of expected {expected} bytes")]
    VerifyLength { actual: usize, expected: usize },
    #[error("verify mismatch at byte {index}: expected {expected:#04x}, got {actual:#04x}")]
    VerifyMismatch {
        index: usize,
        expected: u8,
        actual: u8,
    },
}

/// Compresses a hi-res page and round-trips the result as a self-check.
///
/// With [`HoleMode::Rewrite`] the page is compressed twice, once with the
/// screen holes zeroed and once with them filled from the surrounding
/// pattern, and the smaller encoding wins. Which rewrite compresses
/// better depends on the image, usually by a few dozen bytes either way.
pub fn pack(data: &[u8], mode: ParseMode, holes: HoleMode) -> Result<Vec<u8>, PackError> {
    if data.len() < MIN_SIZE || data.len() > MAX_SIZE {
        return Err(PackError::BadInputSize {
            size: data.len(),
            min: MIN_SIZE,
            max: MAX_SIZE,
        });
    }

    match holes {
        HoleMode::Preserve => {
            let packed = mode.run(data);
            verify(&packed, data)?;
            Ok(packed)
        }
        HoleMode::Rewrite => {
            let mut zeroed = data[..MIN_SIZE].to_vec();
            let mut filled = zeroed.clone();
            holes::zero_holes(&mut zeroed);
            holes::fill_holes(&mut filled);

            let packed_zeroed = mode.run(&zeroed);
            let packed_filled = mode.run(&filled);
            // ties go to the zero-filled page
            let (packed, source) = if packed_zeroed.len() <= packed_filled.len() {
                (packed_zeroed, zeroed)
            } else {
                (packed_filled, filled)
            };
            verify(&packed, &source)?;
            Ok(packed)
        }
    }
}

// Round-trip check run after every compression. A failure here means an
// encoder bug, not bad input.
fn verify(packed: &[u8], source: &[u8]) -> Result<(), PackError> {
    let expanded = lz::unpack(packed)?;
    if expanded.len() != source.len() {
        return Err(PackError::VerifyLength {
            actual: expanded.len(),
            expected: source.len(),
        });
    }
    for (index, (&expected, &actual)) in source.iter().zip(expanded.iter()).enumerate() {
        if expected != actual {
            return Err(PackError::VerifyMismatch {
                index,
                expected,
                actual,
            });
        }
    }
    Ok(())
}
