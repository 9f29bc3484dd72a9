const ELLIPSIS: &str = "...";

/// Truncate to at most `max_chars` characters, marker included.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    let t = s.trim();

    // Byte length bounds char count.
    if t.len() <= max_chars {
        return t.to_string();
    }
    if t.chars().count() <= max_chars {
        return t.to_string();
    }

    let marker = ELLIPSIS.len();
    if max_chars <= marker {
        return t.chars().take(max_chars).collect();
    }
    let mut head: String = t.chars().take(max_chars - marker).collect();
    head.truncate(head.trim_end().len());
    head.push_str(ELLIPSIS);
    head
}
