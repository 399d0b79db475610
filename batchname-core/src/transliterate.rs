//! Greek to Latin transliteration for file names.
//!
//! Follows the common ELOT 743 style mapping: `ου` becomes `ou`, letters with
//! tonos or dialytika lose their accents, and multi-letter outputs (`θ`, `χ`,
//! `ψ`) follow the case of the surrounding text. Characters outside the Greek
//! block pass through unchanged.

fn greek_letter(c: char) -> Option<&'static str> {
    let latin = match c.to_lowercase().next()? {
        'α' | 'ά' => "a",
        'β' => "v",
        'γ' => "g",
        'δ' => "d",
        'ε' | 'έ' => "e",
        'ζ' => "z",
        'η' | 'ή' => "i",
        'θ' => "th",
        'ι' | 'ί' | 'ϊ' | 'ΐ' => "i",
        'κ' => "k",
        'λ' => "l",
        'μ' => "m",
        'ν' => "n",
        'ξ' => "x",
        'ο' | 'ό' => "o",
        'π' => "p",
        'ρ' => "r",
        'σ' | 'ς' => "s",
        'τ' => "t",
        'υ' | 'ύ' | 'ϋ' | 'ΰ' => "y",
        'φ' => "f",
        'χ' => "ch",
        'ψ' => "ps",
        'ω' | 'ώ' => "o",
        _ => return None,
    };
    Some(latin)
}

fn is_upsilon(c: char) -> bool {
    matches!(c, 'υ' | 'ύ' | 'Υ' | 'Ύ')
}

fn is_omicron(c: char) -> bool {
    matches!(c, 'ο' | 'ό' | 'Ο' | 'Ό')
}

// Apply the case of the source letter; a capital followed by lowercase text
// only capitalizes the first output letter (Θέμα -> Thema, ΘΕΜΑ -> THEMA).
fn apply_case(latin: &str, source: char, next: Option<char>) -> String {
    if !source.is_uppercase() {
        return latin.to_string();
    }
    let next_is_lower = next.is_some_and(char::is_lowercase);
    if latin.chars().count() > 1 && next_is_lower {
        crate::case_model::capitalize_first(latin)
    } else {
        latin.to_uppercase()
    }
}

/// Transliterate Greek characters to Latin.
pub fn greek_to_latin(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // "ου" is a single vowel
        if is_omicron(c) && chars.get(i + 1).copied().is_some_and(is_upsilon) {
            let upsilon = chars[i + 1];
            let first = if c.is_uppercase() { 'O' } else { 'o' };
            let second = if upsilon.is_uppercase() { 'U' } else { 'u' };
            result.push(first);
            result.push(second);
            i += 2;
            continue;
        }

        match greek_letter(c) {
            Some(latin) => result.push_str(&apply_case(latin, c, chars.get(i + 1).copied())),
            None => result.push(c),
        }
        i += 1;
    }

    result
}
