use super::parsers::{is_block_comment_end, is_block_comment_start, is_line_comment_start};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    Bracketed,
    LineComment,
    BlockComment(u32),
}

/// What a byte of SQL text belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Region {
    Code,
    /// Inside `'...'`, quotes included.
    Literal,
    /// Inside `"..."` or `[...]`, delimiters included.
    Identifier,
    Comment,
}

/// Classifies every byte of a SQL string, one item per byte.
///
/// `''`, `""` and `]]` are treated as escapes inside their respective quotes, and block
/// comments nest.
pub(super) struct Scanner<'a> {
    bytes: &'a [u8],
    idx: usize,
    state: State,
    // second byte of a two-byte token (`/*`, `*/`, `''`, ...) already decided
    pending: Option<Region>,
}

impl<'a> Scanner<'a> {
    pub(super) fn new(sql: &'a str) -> Self {
        Self {
            bytes: sql.as_bytes(),
            idx: 0,
            state: State::Normal,
            pending: None,
        }
    }

    fn closes(&mut self, idx: usize, close: u8) {
        if self.bytes.get(idx + 1) == Some(&close) {
            self.pending = Some(self.region_of_quote());
        } else {
            self.state = State::Normal;
        }
    }

    fn region_of_quote(&self) -> Region {
        match self.state {
            State::SingleQuoted => Region::Literal,
            _ => Region::Identifier,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = (usize, Region);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.idx;
        let b = *self.bytes.get(idx)?;
        self.idx += 1;

        if let Some(region) = self.pending.take() {
            return Some((idx, region));
        }

        let region = match self.state {
            State::Normal => match b {
                b'\'' => {
                    self.state = State::SingleQuoted;
                    Region::Literal
                }
                b'"' => {
                    self.state = State::DoubleQuoted;
                    Region::Identifier
                }
                b'[' => {
                    self.state = State::Bracketed;
                    Region::Identifier
                }
                _ if is_line_comment_start(self.bytes, idx) => {
                    self.state = State::LineComment;
                    Region::Comment
                }
                _ if is_block_comment_start(self.bytes, idx) => {
                    self.state = State::BlockComment(1);
                    self.pending = Some(Region::Comment);
                    Region::Comment
                }
                _ => Region::Code,
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    self.closes(idx, b'\'');
                }
                Region::Literal
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    self.closes(idx, b'"');
                }
                Region::Identifier
            }
            State::Bracketed => {
                if b == b']' {
                    self.closes(idx, b']');
                }
                Region::Identifier
            }
            State::LineComment => {
                if b == b'\n' {
                    self.state = State::Normal;
                    Region::Code
                } else {
                    Region::Comment
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(self.bytes, idx) {
                    self.state = State::BlockComment(depth + 1);
                    self.pending = Some(Region::Comment);
                } else if is_block_comment_end(self.bytes, idx) {
                    self.state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    self.pending = Some(Region::Comment);
                }
                Region::Comment
            }
        };

        Some((idx, region))
    }
}
