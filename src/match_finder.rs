use crate::lz::{MAX_MATCH_LEN, MIN_MATCH_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub offset: usize,
    pub length: usize,
}

pub struct MatchFinder<'a> {
    data: &'a [u8],
}

impl<'a> MatchFinder<'a> {
    pub fn new(data: &'a [u8]) -> MatchFinder<'a> {
        MatchFinder { data }
    }

    /// Longest match for the bytes at `pos`, searched over every earlier
    /// start position. Only the start is bounded by `pos`; the matched
    /// region may run past it, since the decoder will have produced those
    /// bytes by the time it copies them.
    pub fn longest_match(&self, pos: usize) -> Option<Match> {
        let max_len = (self.data.len() - pos).min(MAX_MATCH_LEN);
        if max_len < MIN_MATCH_LEN {
            // too close to the end of the buffer
            return None;
        }

        let mut best = Match {
            offset: 0,
            length: 0,
        };
        for start in 0..pos {
            let length = self.data[pos..pos + max_len]
                .iter()
                .zip(self.data[start..].iter())
                .take_while(|(a, b)| a == b)
                .count();
            if length > best.length {
                best = Match {
                    offset: start,
                    length,
                };
                if length == max_len {
                    // nothing longer is possible
                    break;
                }
            }
        }

        if best.length >= MIN_MATCH_LEN {
            Some(best)
        } else {
            None
        }
    }
}
