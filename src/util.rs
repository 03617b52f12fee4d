/// Whitespace as understood by C's `isspace` in the "C" locale. Unlike
/// [`char::is_ascii_whitespace`] this includes the vertical tab.
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

pub(crate) fn trim(value: &str) -> &str {
    value.trim_matches(is_space)
}

#[must_use]
pub(crate) fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Returns the first character of `key` that is not allowed in a key.
pub(crate) fn invalid_key_char(key: &str) -> Option<char> {
    key.chars().find(|&c| !is_key_char(c))
}

/// Split a `;`-separated list value. `\;` yields a literal semicolon and a single trailing
/// separator does not produce an empty element.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&';') => {
                _ = chars.next();
                current.push(';');
            }
            ';' => items.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        items.push(current);
    }

    items
}
