//! Description improver.
//!
//! A local, rule-based clean-up of the author's description: whitespace and
//! punctuation normalisation, sentence case, terminal punctuation, and one
//! stock sentence appended when the text is very short. The stock sentence is
//! picked with the caller's random generator, so tests pass a seeded one.

use rand::Rng;

/// Texts with fewer words than this get a stock sentence appended
pub const MIN_WORDS: usize = 10;

/// Stock sentences for short descriptions
pub const FILLER_SENTENCES: [&str; 5] = [
    "Este produto oferece uma experiência única e inovadora.",
    "Desenvolvido com os mais altos padrões de qualidade.",
    "Pensado para atender às necessidades mais exigentes.",
    "Uma solução completa para o seu negócio ou projeto.",
    "Destaque-se com esta proposta de valor excepcional.",
];

/// Improve `text`, or `None` when it is blank
pub fn improve_description<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Option<String> {
    let mut improved = normalize(text)?;

    if !improved.ends_with(['.', '!', '?']) {
        improved.push('.');
    }

    if improved.split(' ').count() < MIN_WORDS {
        let filler = FILLER_SENTENCES[rng.random_range(0..FILLER_SENTENCES.len())];
        improved.push(' ');
        improved.push_str(filler);
    }

    Some(improved)
}

/// Whitespace, punctuation spacing and sentence case, without the filler
pub fn normalize(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    let spaced = collapsed.replace(" .", ".").replace(" ,", ",");
    Some(sentence_case(&spaced))
}

/// Upper-case the first character and every letter that follows a sentence
/// terminator and a space
fn sentence_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut capitalize = true;
    let mut prev_terminator = false;

    for c in text.chars() {
        if capitalize && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            capitalize = false;
        } else {
            out.push(c);
            if !c.is_whitespace() {
                capitalize = false;
            }
        }
        if c == ' ' && prev_terminator {
            capitalize = true;
        }
        prev_terminator = matches!(c, '.' | '!' | '?');
    }

    out
}
