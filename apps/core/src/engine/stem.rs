//! Heuristic stem extraction for Russian words.
//!
//! Strips one known inflectional ending from the word. Words without a known
//! ending are cut down to their leading characters instead.

/// Inflectional endings recognised by [`stem`].
const ENDINGS: &[&str] = &[
    "ый", "ая", "ое", "ые", "ой", "ей", "ом", "ем", "ую", "ов", "ев", "ин", "ын", "ых", "их",
    "ам", "ям", "ами", "ями", "ах", "ях", "и", "ы", "а", "о", "е", "у", "ю", "ь", "ъ",
];

/// Words of this many characters or fewer are returned as-is.
const MIN_STRIPPABLE_LEN: usize = 3;

/// Longest ending length tried first.
const MAX_ENDING_LEN: usize = 3;

/// Shortest root kept when no ending matches.
const FALLBACK_ROOT_LEN: usize = 4;

/// Reduce a word to an approximate root.
///
/// The word is lowercased and trimmed first. Endings are tried from three
/// characters down to one and the first match is removed.
pub fn stem(word: &str) -> String {
    let word = word.trim().to_lowercase();
    let chars: Vec<char> = word.chars().collect();
    let len = chars.len();

    if len <= MIN_STRIPPABLE_LEN {
        return word;
    }

    for ending_len in (1..=MAX_ENDING_LEN).rev() {
        if len > ending_len {
            let ending: String = chars[len - ending_len..].iter().collect();
            if ENDINGS.contains(&ending.as_str()) {
                return chars[..len - ending_len].iter().collect();
            }
        }
    }

    let keep = FALLBACK_ROOT_LEN.max(len - 2);
    chars[..keep.min(len)].iter().collect()
}
