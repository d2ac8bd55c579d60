pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

/// Bytes that may appear inside a T-SQL identifier or variable name.
pub(super) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'@' | b'#' | b'$') || !b.is_ascii()
}

/// Match `word` case-insensitively at `idx` as a whole word; returns the index just past it.
pub(super) fn match_word(bytes: &[u8], idx: usize, word: &str) -> Option<usize> {
    let end = idx + word.len();
    let candidate = bytes.get(idx..end)?;
    if !candidate.eq_ignore_ascii_case(word.as_bytes()) {
        return None;
    }
    if idx > 0 && is_word_byte(bytes[idx - 1]) {
        return None;
    }
    if bytes.get(end).is_some_and(|b| is_word_byte(*b)) {
        return None;
    }
    Some(end)
}

pub(super) fn skip_whitespace(bytes: &[u8], mut idx: usize) -> usize {
    while bytes.get(idx).is_some_and(u8::is_ascii_whitespace) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_whole_words_only() {
        let sql = b"select fromage FROM t";
        assert_eq!(match_word(sql, 7, "from"), None);
        assert_eq!(match_word(sql, 15, "from"), Some(19));
        assert_eq!(match_word(b"x_from", 2, "from"), None);
    }
}
