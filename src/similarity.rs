//! String similarity metrics used to match bill titles against result headings.
//!
//! Both metrics are based on the indel distance (insertions and deletions
//! only), i.e. on the longest common subsequence of the two strings.

/// Length of the longest common subsequence of `a` and `b`.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_len(a, b)) as f64 / total as f64
}

/// Normalized edit distance similarity in `[0, 1]`, 1 meaning identical.
pub fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    indel_ratio(&a, &b)
}

/// Drops Latin-1 supplement characters (`U+0080..=U+00FF`, e.g. umlauts and
/// guillemets), lowercases and replaces every character that is not a word
/// character with a space.
fn default_process(s: &str) -> String {
    s.chars()
        .filter(|c| !('\u{80}'..='\u{ff}').contains(c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .trim()
        .to_string()
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Best [`indel_ratio`] of `needle` against every window of `haystack` that is
/// at most as long as `needle`, including the partial windows at both ends.
fn best_window(needle: &[char], haystack: &[char]) -> f64 {
    let m = needle.len();
    let n = haystack.len();
    let mut best: f64 = 0.0;

    for i in 1..m.min(n + 1) {
        best = best.max(indel_ratio(needle, &haystack[..i]));
    }
    for start in 0..=(n - m) {
        best = best.max(indel_ratio(needle, &haystack[start..start + m]));
        if best >= 1.0 {
            return best;
        }
    }
    for start in (n - m + 1)..n {
        best = best.max(indel_ratio(needle, &haystack[start..]));
    }
    best
}

/// Similarity of the shorter string against the best matching substring of
/// the longer one, in `[0, 100]`.
fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let mut best = best_window(short, long);
    if short.len() == long.len() {
        best = best.max(best_window(long, short));
    }
    best * 100.0
}

/// Order-insensitive token similarity in `[0, 100]`.
///
/// Both inputs lose their Latin-1 supplement characters, are lowercased,
/// stripped of punctuation and have their tokens sorted before the partial ratio is computed, so word order and surrounding
/// extra words matter little.
pub fn partial_token_sort_ratio(a: &str, b: &str) -> u8 {
    let a = sorted_tokens(&default_process(a));
    let b = sorted_tokens(&default_process(b));
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    partial_ratio(&a, &b).round_ties_even() as u8
}
