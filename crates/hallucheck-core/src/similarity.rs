//! Surface lexical similarity via longest-common-matching-block alignment.
//!
//! The score is `2 * M / (len(a) + len(b))` where `M` is the number of
//! characters covered by matching blocks, found by recursively taking the
//! longest common block and repeating on both sides of it (Ratcliff/Obershelp).
//! Lengths are counted in Unicode scalar values.

use std::collections::HashMap;

/// Below this length of the second sequence no character is considered
/// "popular".
const AUTOJUNK_MIN_LEN: usize = 200;

/// Similarity of `a` and `b` in `[0.0, 1.0]`.
///
/// 1.0 for identical inputs (including two empty strings), 0.0 when the
/// inputs share no character alignment. Symmetric: both argument orders are
/// aligned and the larger matched-character count is used.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matched_chars(&a, &b).max(matched_chars(&b, &a));
    let ratio = 2.0 * matched as f64 / total as f64;
    ratio.clamp(0.0, 1.0)
}

/// Number of characters covered by the matching blocks of `a` against `b`.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let index = BIndex::new(b);
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = index.longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Positions of every character of `b`, minus "popular" characters of long
/// inputs (those occurring in more than 1% of the positions).
struct BIndex {
    positions: HashMap<char, Vec<usize>>,
}

impl BIndex {
    fn new(b: &[char]) -> Self {
        let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            positions.entry(*c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            positions.retain(|_, idx| idx.len() <= limit);
        }

        Self { positions }
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given windows.
    ///
    /// Ties resolve to the earliest `i`, then the earliest `j`. The block is
    /// then widened over popular characters that the index skipped.
    fn longest_match(
        &self,
        a: &[char],
        b: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);
        // run length of the match ending at b[j], for the previous a-row
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(js) = self.positions.get(c) {
                for &j in js {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }
}
