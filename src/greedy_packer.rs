use crate::lz::{self, Op};
use crate::match_finder::MatchFinder;

/// Forward scan: take the longest match wherever one exists, otherwise
/// extend the pending literal run.
pub fn pack(data: &[u8]) -> Vec<u8> {
    let match_finder = MatchFinder::new(data);
    let mut out = Vec::with_capacity(data.len() + lz::MAX_EXPANSION);
    out.push(lz::MAGIC);

    let mut literal_start = 0;
    let mut pos = 0;
    while pos < data.len() {
        if let Some(m) = match_finder.longest_match(pos) {
            Op::Match {
                literals: &data[literal_start..pos],
                offset: m.offset,
                len: m.length,
            }
            .encode(&mut out);
            pos += m.length;
            literal_start = pos;
        } else {
            if pos - literal_start == lz::MAX_LITERAL_LEN {
                // run is full, close it out with no match and keep going
                Op::Literals(&data[literal_start..pos]).encode(&mut out);
                literal_start = pos;
            }
            pos += 1;
        }
    }

    lz::encode_eof(&mut out, &data[literal_start..]);
    out
}
