//! TeamCity service message value escaping
//!
//! Values embedded in `key='value'` attributes must escape the characters the
//! service message parser treats specially:
//!
//! | Character | Escaped |
//! |-----------|---------|
//! | `\|`      | `\|\|`  |
//! | `'`       | `\|'`   |
//! | `\n`      | `\|n`   |
//! | `\r`      | `\|r`   |
//! | `[`       | `\|[`   |
//! | `]`       | `\|]`   |

/// Escape `text` for embedding in a service message attribute value.
///
/// The input is scanned once, so the `|` introduced by one substitution is
/// never escaped again. Apply exactly once per field.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '|' => out.push_str("||"),
            '\'' => out.push_str("|'"),
            '\n' => out.push_str("|n"),
            '\r' => out.push_str("|r"),
            '[' => out.push_str("|["),
            ']' => out.push_str("|]"),
            _ => out.push(c),
        }
    }
    out
}
