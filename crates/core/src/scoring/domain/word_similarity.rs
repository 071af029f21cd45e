/// Score returned for two identical words.
pub const EXACT_MATCH: f64 = 100.0;

/// Lexical similarity of two normalized words on a 0-100 scale.
///
/// Computes the matching-blocks ratio `2 * M / T`, where `M` is the number of
/// characters covered by the recursively found longest common blocks and `T`
/// is the combined length of both words. Identical words short-circuit to
/// exactly 100 and an empty word on either side scores 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return EXACT_MATCH;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let matched = matching_characters(&a, &b);
    let total = a.len() + b.len();

    2.0 * matched as f64 / total as f64 * 100.0
}

/// A contiguous run of equal characters: `a[a_start..a_start + len] == b[b_start..b_start + len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    a_start: usize,
    b_start: usize,
    len: usize,
}

/// Sums the lengths of all matching blocks between `a` and `b`.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let block = longest_block(a, b, a_lo, a_hi, b_lo, b_hi);
        if block.len == 0 {
            continue;
        }
        matched += block.len;

        if a_lo < block.a_start && b_lo < block.b_start {
            pending.push((a_lo, block.a_start, b_lo, block.b_start));
        }
        let a_end = block.a_start + block.len;
        let b_end = block.b_start + block.len;
        if a_end < a_hi && b_end < b_hi {
            pending.push((a_end, a_hi, b_end, b_hi));
        }
    }

    matched
}

/// Longest common block inside `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_block(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> Block {
    let mut best = Block {
        a_start: a_lo,
        b_start: b_lo,
        len: 0,
    };
    let width = b_hi - b_lo;
    // run_len[k + 1] = length of the common run ending at a[i - 1], b[b_lo + k]
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];

    for i in a_lo..a_hi {
        for k in 0..width {
            let j = b_lo + k;
            curr[k + 1] = if a[i] == b[j] { prev[k] + 1 } else { 0 };
            let len = curr[k + 1];
            if len > best.len {
                best = Block {
                    a_start: i + 1 - len,
                    b_start: j + 1 - len,
                    len,
                };
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}
