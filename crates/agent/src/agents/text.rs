//! Word-boundary matching shared by the scoring heuristics.
//!
//! All helpers expect lower-cased input. A phrase matches only when it is
//! not glued to neighbouring letters or digits, so "hot" does not match
//! "photo" and "hi" does not match "this".

/// Whether `phrase` occurs in `text` on word boundaries.
pub fn contains_word(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    text.match_indices(phrase).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + phrase.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// How many of `phrases` occur in `text` (each counted once).
pub fn count_words(text: &str, phrases: &[&str]) -> usize {
    phrases.iter().filter(|p| contains_word(text, p)).count()
}

/// Whether any of `phrases` occurs in `text`.
pub fn any_word(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_word(text, p))
}

/// Whether `text` starts with `phrase` followed by a boundary.
pub fn starts_with_word(text: &str, phrase: &str) -> bool {
    text.strip_prefix(phrase)
        .is_some_and(|rest| !rest.chars().next().is_some_and(is_word_char))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// "new york" -> "New York".
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop every word of `text` found in `noise`; keep the rest in order.
pub fn strip_words(text: &str, noise: &[&str]) -> String {
    text.split(|c: char| !is_word_char(c) && c != '\'' && c != '-')
        .filter(|w| !w.is_empty() && !noise.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}
