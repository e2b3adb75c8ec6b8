// text_prep.rs — Text preparation ahead of word-vector lookup.
//
// Normalizes Amharic orthography so that spelling variants hit the same vocabulary
// entry, then splits into whitespace tokens. Also provides a simple sentence splitter
// for paragraph input.

/// Maps raw text to a canonical, token-friendly string. Must be pure (no side effects).
pub trait TextNormalizer {
    fn normalize(&self, text: &str) -> String;
}

impl<F> TextNormalizer for F
where
    F: Fn(&str) -> String,
{
    fn normalize(&self, text: &str) -> String {
        self(text)
    }
}

/// Normalizer for Amharic (Ge'ez script) text.
///
/// - Ethiopic and Latin punctuation become word breaks
/// - Homophone letter families fold to one canonical family (ሐ/ኀ→ሀ, ሠ→ሰ, ዐ→አ, ፀ→ጸ)
/// - Latin letters are lowercased, zero-width characters dropped
/// - Whitespace runs collapse to a single space
#[derive(Debug, Clone, Copy, Default)]
pub struct AmharicNormalizer;

impl TextNormalizer for AmharicNormalizer {
    fn normalize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        // A space is only emitted between words, so leading and trailing whitespace vanish.
        let mut pending_space = false;

        for c in text.chars() {
            if is_zero_width(c) {
                continue;
            }
            if c.is_whitespace() || is_punctuation(c) {
                pending_space = !out.is_empty();
                continue;
            }
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            let folded = fold_homophone(c);
            if folded.is_uppercase() {
                out.extend(folded.to_lowercase());
            } else {
                out.push(folded);
            }
        }

        out
    }
}

// Rows of the Ethiopic block are laid out as 7 vowel orders (+ labialized forms).
// Only orders 1-7 are folded; (variant row start, canonical row start).
const HOMOPHONE_ROWS: &[(u32, u32)] = &[
    (0x1210, 0x1200), // ሐ → ሀ
    (0x1280, 0x1200), // ኀ → ሀ
    (0x1220, 0x1230), // ሠ → ሰ
    (0x12D0, 0x12A0), // ዐ → አ
    (0x1340, 0x1338), // ፀ → ጸ
];
const VOWEL_ORDERS: u32 = 7;

fn fold_homophone(c: char) -> char {
    let cp = c as u32;
    let folded = HOMOPHONE_ROWS
        .iter()
        .find(|(from, _)| (*from..*from + VOWEL_ORDERS).contains(&cp))
        .and_then(|(from, to)| char::from_u32(to + (cp - from)))
        .unwrap_or(c);

    // ኣ and አ are the same vowel.
    if folded == 'ኣ' {
        'አ'
    } else {
        folded
    }
}

fn is_punctuation(c: char) -> bool {
    // ፡ ። ፣ ፤ ፥ ፦ ፧ ፨
    matches!(c, '\u{1361}'..='\u{1368}')
        || c.is_ascii_punctuation()
        // ¡ « » ¿, General Punctuation (dashes, quotes, … ‹ › ‰), CJK 、。〃
        || matches!(
            c,
            '\u{00A1}' | '\u{00AB}' | '\u{00BB}' | '\u{00BF}'
                | '\u{2010}'..='\u{2027}'
                | '\u{2030}'..='\u{205E}'
                | '\u{3001}'..='\u{3003}'
        )
}

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}')
}

/// Split on whitespace into ordered, non-empty tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().filter(|t| !t.is_empty()).collect()
}

/// Split a paragraph into sentences on ። ፧ ? ! and line breaks.
///
/// Terminators stay attached to their sentence; empty pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        match c {
            '\n' | '\r' => flush_sentence(&mut current, &mut sentences),
            '።' | '፧' | '?' | '!' => {
                current.push(c);
                flush_sentence(&mut current, &mut sentences);
            }
            _ => current.push(c),
        }
    }
    flush_sentence(&mut current, &mut sentences);

    sentences
}

fn flush_sentence(current: &mut String, sentences: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}
