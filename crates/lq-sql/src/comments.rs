//! SQL comment stripping

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment,
}

/// Remove SQL comments from `sql`.
///
/// Block comments (`/* ... */`, may span lines) become a single space; line
/// comments (`-- ...`) are dropped up to, but not including, the newline.
/// Comment markers inside single-quoted literals or double-quoted identifiers
/// are left alone. Stripping is idempotent.
pub fn strip_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut state = ScanState::Code;

    while let Some(c) = chars.next() {
        match state {
            ScanState::Code => match c {
                '\'' => {
                    out.push(c);
                    state = ScanState::SingleQuoted;
                }
                '"' => {
                    out.push(c);
                    state = ScanState::DoubleQuoted;
                }
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    state = ScanState::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = ScanState::BlockComment;
                }
                _ => out.push(c),
            },
            // A doubled quote closes and immediately reopens, which keeps
            // escaped quotes inside the literal.
            ScanState::SingleQuoted => {
                out.push(c);
                if c == '\'' {
                    state = ScanState::Code;
                }
            }
            ScanState::DoubleQuoted => {
                out.push(c);
                if c == '"' {
                    state = ScanState::Code;
                }
            }
            ScanState::LineComment => {
                if c == '\n' {
                    out.push(c);
                    state = ScanState::Code;
                }
            }
            ScanState::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push(' ');
                    state = ScanState::Code;
                }
            }
        }
    }

    if state == ScanState::BlockComment {
        out.push(' ');
    }
    out
}

#[cfg(test)]
#[path = "comments_test.rs"]
mod tests;
