//! Edit distance and normalized similarity.
//!
//! Fuzzy retrieval compares every query token against every vocabulary token,
//! so its cost is O(query tokens × vocabulary × token length²). That is fine
//! for a corpus of a few thousand short texts; a large vocabulary would need
//! an automaton or n-gram prefilter instead of this linear scan.

/// Levenshtein distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();

    if a.is_empty() {
        return b_len;
    }

    let mut dp: Vec<usize> = (0..=b_len).collect();
    for (i, ac) in a.chars().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;

        for (j, bc) in b_chars.iter().enumerate() {
            let temp = dp[j + 1];
            let cost = if ac == *bc { 0 } else { 1 };
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
        }
    }

    dp[b_len]
}

/// `1 - distance / max(len_a, len_b)`; two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    // Single rounding step: (max - d) / max
    (max_len - levenshtein(a, b)) as f64 / max_len as f64
}

/// Strict comparison against the fuzzy threshold.
#[inline]
pub fn exceeds_threshold(similarity: f64, threshold: f64) -> bool {
    similarity > threshold
}

/// Similarity of `a` and `b` if it can exceed `threshold`, skipping the DP
/// when the length difference alone rules it out.
pub fn similarity_above(a: &str, b: &str, threshold: f64) -> Option<f64> {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return exceeds_threshold(1.0, threshold).then_some(1.0);
    }

    // |len(a) - len(b)| is a lower bound on the edit distance
    let upper_bound = (max_len - a_len.abs_diff(b_len)) as f64 / max_len as f64;
    if !exceeds_threshold(upper_bound, threshold) {
        return None;
    }

    let sim = similarity(a, b);
    exceeds_threshold(sim, threshold).then_some(sim)
}
