//! Filename mask matching.

/// True when `name` matches the configured mask. An empty mask matches every
/// file; a mask containing `*` or `?` is a glob; anything else is a substring
/// match (mask `rep` matches `report.txt`, mirroring a `*mask*` listing).
pub fn mask_matches(mask: &str, name: &str) -> bool {
    if mask.is_empty() {
        return true;
    }
    if mask.contains('*') || mask.contains('?') {
        glob_match(mask, name)
    } else {
        name.contains(mask)
    }
}

/// Simple glob pattern matching (supports * and ?)
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let mut pattern_chars = pattern.chars().peekable();
    let mut text_chars = text.chars().peekable();

    while let Some(&p) = pattern_chars.peek() {
        match p {
            '*' => {
                pattern_chars.next();
                if pattern_chars.peek().is_none() {
                    return true; // trailing * matches everything
                }
                // Try to match rest of pattern at every suffix of text
                while text_chars.peek().is_some() {
                    if glob_match(
                        &pattern_chars.clone().collect::<String>(),
                        &text_chars.clone().collect::<String>(),
                    ) {
                        return true;
                    }
                    text_chars.next();
                }
                return false;
            }
            '?' => {
                pattern_chars.next();
                if text_chars.next().is_none() {
                    return false;
                }
            }
            _ => {
                pattern_chars.next();
                if text_chars.next() != Some(p) {
                    return false;
                }
            }
        }
    }

    text_chars.peek().is_none()
}
