//! Name transformation helpers used to generate idiomatic Rust constants.
//==================================================================================NAME_HELPERS
/// Convert a human readable DGN label into a `SCREAMING_SNAKE_CASE` constant name.
///
/// Word separators (spaces, dashes, slashes, parentheses...) collapse into a single
/// underscore, `camelCase` boundaries are split, and a leading digit gets a `DGN_`
/// prefix so the result is always a valid identifier.
pub(crate) fn to_screaming_snake_case(label: &str) -> String {
    let mut buffer = String::new();
    let mut pending_separator = false;
    let mut previous_lower = false;

    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            let camel_boundary = previous_lower && c.is_ascii_uppercase();
            if (pending_separator || camel_boundary) && !buffer.is_empty() {
                buffer.push('_');
            }
            pending_separator = false;
            previous_lower = c.is_ascii_lowercase();
            buffer.push(c.to_ascii_uppercase());
        } else {
            pending_separator = true;
            previous_lower = false;
        }
    }

    if buffer.starts_with(|c: char| c.is_ascii_digit()) {
        buffer.insert_str(0, "DGN_");
    }
    buffer
}
