/// Keep the first `limit` sentences of `text`.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// the text. A `limit` of zero returns the whole text, trimmed.
pub fn first_sentences(text: &str, limit: usize) -> String {
    let text = text.trim();
    if limit == 0 {
        return text.to_string();
    }

    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = match chars.peek() {
            None => true,
            Some((_, next)) => next.is_whitespace(),
        };
        if at_boundary {
            seen += 1;
            if seen == limit {
                return text[..idx + ch.len_utf8()].to_string();
            }
        }
    }
    text.to_string()
}
