/// Lowercases `text`, strips punctuation and splits it into words.
///
/// Characters other than alphanumerics, `_` and whitespace are dropped in
/// place, so `"don't"` becomes `"dont"` rather than two words. Returns an
/// empty vector for empty or punctuation-only input.
pub fn normalize(text: &str) -> Vec<String> {
    strip_punctuation(&text.to_lowercase())
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Normalizes a single display token. Pure punctuation yields `""`.
pub fn normalize_word(token: &str) -> String {
    normalize(token).concat()
}

fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| is_word_char(*c) || c.is_whitespace()).collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
