//! Helpers for inspecting raw migration SQL text.

/// Returns `true` if `sql` contains anything besides whitespace, semicolons,
/// `--` line comments, and `/* */` block comments.
///
/// Freshly scaffolded migrations consist only of comments; those are recorded
/// as applied without sending anything to the database.
///
/// # Examples
/// ```
/// use sqlmig_core::sql_utils::has_statements;
/// assert!(has_statements("CREATE TABLE t (id INTEGER);"));
/// assert!(!has_statements("-- nothing yet\n;\n/* later */"));
/// ```
pub fn has_statements(sql: &str) -> bool {
    skip_trivia(sql, 0) < sql.len()
}

/// Leading keywords of statements that open, close, or abort a transaction.
const TRANSACTION_CONTROL: &[&str] = &["BEGIN", "START", "COMMIT", "END", "ROLLBACK", "ABORT"];

/// Returns the leading keyword, uppercased, of the first top-level statement
/// that opens, closes, or aborts a transaction.
///
/// String literals, quoted identifiers, and comments are skipped, so
/// `SELECT 'commit;'` is not a match.
///
/// # Examples
/// ```
/// use sqlmig_core::sql_utils::find_transaction_control;
/// assert_eq!(
///     find_transaction_control("CREATE TABLE t (id INTEGER);\ncommit;"),
///     Some("COMMIT".to_string())
/// );
/// assert_eq!(find_transaction_control("SELECT 'commit;'"), None);
/// ```
pub fn find_transaction_control(sql: &str) -> Option<String> {
    let bytes = sql.as_bytes();
    let mut i = skip_trivia(sql, 0);
    while i < bytes.len() {
        let word_end = bytes[i..]
            .iter()
            .position(|b| !b.is_ascii_alphabetic())
            .map_or(bytes.len(), |n| i + n);
        let word = &sql[i..word_end];
        if TRANSACTION_CONTROL
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case(word))
        {
            return Some(word.to_ascii_uppercase());
        }
        i = skip_trivia(sql, statement_end(sql, word_end));
    }
    None
}

/// Index of the first byte at or after `i` that is not whitespace, `;`, or
/// part of a comment.
fn skip_trivia(sql: &str, mut i: usize) -> usize {
    let bytes = sql.as_bytes();
    while i < bytes.len() {
        match bytes[i] {
            b if b.is_ascii_whitespace() || b == b';' => i += 1,
            b'-' if bytes.get(i + 1) == Some(&b'-') => i = line_comment_end(sql, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = block_comment_end(sql, i),
            _ => return i,
        }
    }
    bytes.len()
}

/// Index just past the `;` that ends the statement containing `i`.
fn statement_end(sql: &str, mut i: usize) -> usize {
    let bytes = sql.as_bytes();
    while i < bytes.len() {
        match bytes[i] {
            b';' => return i + 1,
            quote @ (b'\'' | b'"') => {
                i = match bytes[i + 1..].iter().position(|&b| b == quote) {
                    Some(offset) => i + 1 + offset + 1,
                    None => bytes.len(),
                };
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => i = line_comment_end(sql, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = block_comment_end(sql, i),
            _ => i += 1,
        }
    }
    bytes.len()
}

fn line_comment_end(sql: &str, i: usize) -> usize {
    match sql[i..].find('\n') {
        Some(offset) => i + offset + 1,
        None => sql.len(),
    }
}

fn block_comment_end(sql: &str, i: usize) -> usize {
    match sql[i + 2..].find("*/") {
        Some(offset) => i + 2 + offset + 2,
        None => sql.len(),
    }
}
