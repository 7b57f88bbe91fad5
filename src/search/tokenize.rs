//! Code-aware tokenizer shared by indexing and querying.

/// Tokenize text for indexing or querying.
///
/// Identifiers (runs of alphanumerics and `_`) are split at `_`,
/// camelCase/PascalCase humps and digit boundaries; every part is
/// lowercased. When an identifier splits into more than one part, the whole
/// lowercased identifier is kept as an extra token, so an exact-name query
/// matches one more term than a partial one.
///
/// # Example
/// ```rust
/// use cartograph::search::tokenize;
/// assert_eq!(tokenize("getHTTPResponse"), vec!["get", "http", "response", "gethttpresponse"]);
/// assert_eq!(tokenize("a.go"), vec!["a", "go"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    identifier_tokens(text).flatten().collect()
}

/// [`tokenize`] grouped by source identifier, one non-empty group each.
///
/// A multi-part group ends with its whole-identifier token.
pub fn identifier_tokens(text: &str) -> impl Iterator<Item = Vec<String>> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|s| !s.is_empty())
        .map(|identifier| {
            let mut tokens: Vec<String> = identifier
                .split('_')
                .filter(|s| !s.is_empty())
                .flat_map(split_camel_case)
                .map(str::to_lowercase)
                .collect();
            if tokens.len() > 1 {
                tokens.push(identifier.to_lowercase());
            }
            tokens
        })
        .filter(|tokens| !tokens.is_empty())
}

/// Split a camelCase or PascalCase string into its components.
/// "processRequest" -> ["process", "Request"]
/// "HTMLParser" -> ["HTML", "Parser"]
/// "item2count" -> ["item", "2", "count"]
fn split_camel_case(s: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut parts = Vec::new();
    let mut start = 0;

    for i in 1..chars.len() {
        let prev = chars[i - 1].1;
        let curr = chars[i].1;

        let lower_to_upper = prev.is_lowercase() && curr.is_uppercase();
        let upper_run_end =
            i >= 2 && chars[i - 2].1.is_uppercase() && prev.is_uppercase() && curr.is_lowercase();
        let digit_boundary = (prev.is_alphabetic() && curr.is_ascii_digit())
            || (prev.is_ascii_digit() && curr.is_alphabetic());

        if lower_to_upper || upper_run_end || digit_boundary {
            let split_at = if upper_run_end { i - 1 } else { i };
            if split_at > start {
                parts.push(&s[chars[start].0..chars[split_at].0]);
                start = split_at;
            }
        }
    }
    if start < chars.len() {
        parts.push(&s[chars[start].0..]);
    }
    parts
}
