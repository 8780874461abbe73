//! Tokenization, shuffling and layout-preserving reassembly.
//!
//! The input is cut into alternating word and whitespace segments. Shuffled
//! words are written back into the word slots while whitespace runs are
//! copied through untouched, so line breaks and indentation survive.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

// NOTE: expect() is fine here, the pattern is a compile-time constant.
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace run"));

static WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+").expect("Invalid regex: word run"));

/// A piece of the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A maximal run of non-whitespace characters.
    Word(&'a str),
    /// A maximal run of whitespace.
    Gap(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Word(s) | Segment::Gap(s) => s,
        }
    }
}

/// Extracts the words of `text` in order of appearance.
pub fn tokenize(text: &str) -> Vec<&str> {
    WORD_RUN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Splits `text` into word and gap segments.
///
/// Concatenating the segments yields `text` again.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut cursor = 0;

    for gap in WHITESPACE_RUN.find_iter(text) {
        if gap.start() > cursor {
            out.push(Segment::Word(&text[cursor..gap.start()]));
        }
        out.push(Segment::Gap(gap.as_str()));
        cursor = gap.end();
    }
    if cursor < text.len() {
        out.push(Segment::Word(&text[cursor..]));
    }

    out
}

/// Fisher-Yates shuffle into a new vector.
pub fn shuffle_tokens<T: Clone, R: Rng + ?Sized>(tokens: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = tokens.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

/// Writes `tokens` into the word slots of `text`, in the given order.
///
/// Gaps are always copied. Word slots beyond the supplied tokens are dropped
/// entirely; their neighbouring gaps stay. Tokens left over once every slot
/// is filled are appended, space separated.
pub fn reassemble<S: AsRef<str>>(text: &str, tokens: &[S]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut next = tokens.iter();

    for segment in segments(text) {
        match segment {
            Segment::Word(_) => {
                if let Some(token) = next.next() {
                    out.push_str(token.as_ref());
                }
            }
            Segment::Gap(gap) => out.push_str(gap),
        }
    }

    for token in next {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token.as_ref());
    }

    out
}

/// Shuffles `tokens` and reassembles them into the layout of `text`.
pub fn render<S, R>(text: &str, tokens: &[S], rng: &mut R) -> String
where
    S: AsRef<str> + Clone,
    R: Rng + ?Sized,
{
    let shuffled = shuffle_tokens(tokens, rng);
    reassemble(text, &shuffled)
}
