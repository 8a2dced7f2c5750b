//! Lightweight, model-free text utilities shared by the lexical index and stub backends.
//!
//! Statute text is mostly CJK without word boundaries, so [`tokenize`] emits every CJK
//! character plus each adjacent CJK bigram. Latin letters and digits form lowercase words.

/// Returns `true` for characters in the CJK ideograph blocks.
fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}')
}

/// Splits `text` into lexical terms.
///
/// Punctuation and whitespace separate terms and never appear in the output.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut prev_cjk: Option<char> = None;

    for c in text.chars() {
        if is_cjk(c) {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            tokens.push(c.to_string());
            if let Some(prev) = prev_cjk {
                let mut bigram = String::with_capacity(8);
                bigram.push(prev);
                bigram.push(c);
                tokens.push(bigram);
            }
            prev_cjk = Some(c);
        } else if c.is_alphanumeric() {
            word.extend(c.to_lowercase());
            prev_cjk = None;
        } else {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            prev_cjk = None;
        }
    }

    if !word.is_empty() {
        tokens.push(word);
    }

    tokens
}

/// Returns at most `max_chars` characters of `text` (char-boundary safe).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
