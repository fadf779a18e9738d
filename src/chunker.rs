use log::debug;

// @module: Line-bounded chunk splitting for translation requests

/// Default maximum number of lines per translation request.
///
/// This is a token-budget heuristic: completion models start dropping or
/// merging lines well before their hard context limit, so requests are kept
/// to at most this many lines of source text.
pub const MAX_CHUNK_LINES: usize = 125;

/// Split a text into ordered chunks of at most `max_lines` lines each.
///
/// Chunk boundaries are deterministic: the same input always produces the
/// same chunks. Each chunk is the newline-joined run of its member lines and
/// no line is ever split across two chunks. The final chunk takes whatever
/// remainder is left, so `n` input lines always yield `ceil(n / max_lines)`
/// chunks. An empty input produces a single chunk holding the empty string.
pub fn split_lines(text: &str, max_lines: usize) -> Vec<String> {
    let effective_max = max_lines.max(1);
    let lines: Vec<&str> = text.split('\n').collect();

    let mut chunks = Vec::with_capacity(lines.len().div_ceil(effective_max));
    let mut current: Vec<&str> = Vec::with_capacity(effective_max);

    for (i, line) in lines.iter().copied().enumerate() {
        current.push(line);
        // Flush on the boundary and always on the last line
        if (i + 1) % effective_max == 0 || i == lines.len() - 1 {
            chunks.push(current.join("\n"));
            current = Vec::with_capacity(effective_max);
        }
    }

    debug!("Split {} line(s) into {} chunk(s)", lines.len(), chunks.len());

    chunks
}

/// Split a text using the default line budget.
pub fn split(text: &str) -> Vec<String> {
    split_lines(text, MAX_CHUNK_LINES)
}
