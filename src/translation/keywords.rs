use super::parsers::{match_word, skip_whitespace};
use super::scanner::{Region, Scanner};

/// A keyword sequence found in code (never inside literals, identifiers or comments).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct KeywordMatch {
    pub(super) start: usize,
    pub(super) end: usize,
    /// Parenthesis nesting depth at the keyword.
    pub(super) depth: u32,
}

/// Find the first occurrence of `words` (case-insensitive, whitespace between them).
pub(super) fn find_keyword(sql: &str, words: &[&str]) -> Option<KeywordMatch> {
    let bytes = sql.as_bytes();
    let mut depth: u32 = 0;
    for (idx, region) in Scanner::new(sql) {
        if region != Region::Code {
            continue;
        }
        match bytes[idx] {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if let Some(end) = match_sequence(bytes, idx, words) {
            return Some(KeywordMatch {
                start: idx,
                end,
                depth,
            });
        }
    }
    None
}

/// Whether the first code token of `sql` is `keyword`; leading comments are skipped.
pub(super) fn starts_with_keyword(sql: &str, keyword: &str) -> bool {
    let bytes = sql.as_bytes();
    Scanner::new(sql)
        .find(|(idx, region)| *region != Region::Comment && !bytes[*idx].is_ascii_whitespace())
        .is_some_and(|(idx, region)| {
            region == Region::Code && match_word(bytes, idx, keyword).is_some()
        })
}

/// First code word of `sql`, after leading whitespace and comments.
pub(crate) fn leading_word(sql: &str) -> Option<&str> {
    let bytes = sql.as_bytes();
    let (start, region) = Scanner::new(sql)
        .find(|(idx, region)| *region != Region::Comment && !bytes[*idx].is_ascii_whitespace())?;
    if region != Region::Code {
        return None;
    }
    let len = bytes[start..]
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))
        .unwrap_or(bytes.len() - start);
    (len > 0).then(|| &sql[start..start + len])
}

fn match_sequence(bytes: &[u8], idx: usize, words: &[&str]) -> Option<usize> {
    let mut end = idx;
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            let next = skip_whitespace(bytes, end);
            if next == end {
                return None;
            }
            end = next;
        }
        end = match_word(bytes, end, word)?;
    }
    Some(end)
}
