use crate::lz::{self, Op};
use crate::match_finder::MatchFinder;

// Choosing the cheapest encoding is a shortest-path problem over a two
// edge graph: from every position we can leave as a single literal or as
// the longest match found there. Walking the input backward gives the
// exact cost from each position to the end, then a forward walk emits
// the winning path.

#[derive(Clone, Copy, Default)]
struct Node {
    total_cost: usize,
    // zero when the literal path wins
    match_length: usize,
    match_offset: usize,
    // running length of the literal run starting here
    literal_length: usize,
}

pub fn pack(data: &[u8]) -> Vec<u8> {
    let nodes = parse(data);

    let mut out = Vec::with_capacity(data.len() + lz::MAX_EXPANSION);
    out.push(lz::MAGIC);

    let mut literal_start = 0;
    let mut num_literals = 0;
    let mut i = 0;
    while i < data.len() {
        let node = nodes[i];
        if node.match_length != 0 {
            Op::Match {
                literals: &data[literal_start..literal_start + num_literals],
                offset: node.match_offset,
                len: node.match_length,
            }
            .encode(&mut out);
            i += node.match_length;
            literal_start = i;
            num_literals = 0;
        } else {
            if num_literals != 0 {
                // the backward parse can leave a short run in front of a
                // full one; close the pending run with no match
                Op::Literals(&data[literal_start..literal_start + num_literals])
                    .encode(&mut out);
            }
            literal_start = i;
            num_literals = node.literal_length;
            i += node.literal_length;
        }
    }

    lz::encode_eof(&mut out, &data[literal_start..literal_start + num_literals]);
    out
}

fn parse(data: &[u8]) -> Vec<Node> {
    let match_finder = MatchFinder::new(data);
    let mut nodes = vec![Node::default(); data.len() + 1];

    for i in (0..data.len()).rev() {
        let longest = match_finder.longest_match(i);

        let cost_for_match = match longest {
            Some(m) => {
                let mut cost = nodes[i + m.length].total_cost + 3;
                if m.length - lz::MIN_MATCH_LEN >= lz::INITIAL_LEN {
                    // match length continuation byte
                    cost += 1;
                }
                cost
            }
            None => usize::MAX,
        };

        let cost_for_literal;
        if i == data.len() - 1 {
            nodes[i].literal_length = 1;
            cost_for_literal = 2;
        } else if nodes[i + 1].match_length != 0 {
            // the next position starts a match; ride along as a literal
            // prefix of that chunk
            nodes[i].literal_length = 1;
            cost_for_literal = 1 + nodes[i + 1].total_cost;
        } else if nodes[i + 1].literal_length == lz::MAX_LITERAL_LEN {
            // the next run is full; this byte starts a fresh run paying
            // its own mixed-length byte and empty-match sentinel
            nodes[i].literal_length = 1;
            cost_for_literal = 3 + nodes[i + 1].total_cost;
        } else {
            let run = nodes[i + 1].literal_length + 1;
            nodes[i].literal_length = run;
            // at fifteen the length nibble saturates and the
            // continuation byte appears
            cost_for_literal =
                if run == lz::INITIAL_LEN { 2 } else { 1 } + nodes[i + 1].total_cost;
        }

        if cost_for_match < cost_for_literal {
            let m = longest.unwrap();
            nodes[i].match_length = m.length;
            nodes[i].match_offset = m.offset;
            nodes[i].total_cost = cost_for_match;
        } else {
            nodes[i].total_cost = cost_for_literal;
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::greedy_packer;
    use crate::lz::unpack;

    #[test]
    fn beats_greedy_when_a_short_match_is_a_trap() {
        // The greedy parser grabs the four-byte "qrst" match and then
        // needs a second match for the tail; deferring one byte allows a
        // single ten-byte match instead.
        let data = b"qrst#rstuvwxyzA#qrstuvwxyzA";
        let optimal = pack(data);
        let greedy = greedy_packer::pack(data);
        assert!(optimal.len() < greedy.len(), "{} vs {}", optimal.len(), greedy.len());
        assert_eq!(unpack(&optimal).unwrap(), data);
        assert_eq!(unpack(&greedy).unwrap(), data);
    }

    #[test]
    fn adjacent_literal_runs_emit_in_parse_order() {
        // 300 matchless bytes: the backward parse leaves a 45-byte run
        // in front of the full 255-byte one
        let mut data = vec![];
        for ic in 0u8..75 {
            data.extend_from_slice(&[ic, ic + 1, ic + 2, ic + 3]);
        }
        let packed = pack(&data);
        assert_eq!(packed[1], 0xff);
        assert_eq!(packed[2], 45 - 15);
        assert_eq!(packed.len(), 307);
        assert_eq!(unpack(&packed).unwrap(), data);
    }

    #[test]
    fn repeated_pattern_is_a_seed_plus_one_match() {
        let data = b"abcdabcdabcdabcdabcd";
        let packed = pack(data);
        assert_eq!(
            packed,
            [0x66, 0x4c, b'a', b'b', b'c', b'd', 0x00, 0x00, 0x0f, 0xfe]
        );
        assert_eq!(unpack(&packed).unwrap(), data);
    }

    #[test]
    fn never_larger_than_greedy_on_mixed_content() {
        let mut data = vec![0u8; 64];
        data.extend_from_slice(b"the quick brown fox jumps over the lazy dog");
        data.extend(std::iter::repeat(0x2a).take(80));
        data.extend_from_slice(b"the quick brown fox");
        let optimal = pack(&data);
        let greedy = greedy_packer::pack(&data);
        assert!(optimal.len() <= greedy.len());
        assert_eq!(unpack(&optimal).unwrap(), data);
        assert_eq!(unpack(&greedy).unwrap(), data);
    }
}
