//! Prompt templates for the language-model backend.

/// Default prompt used when a user has not set one.
pub const DEFAULT_PROMPT: &str = "Обработай текст по заданным правилам. Текст: {text}. Слова для исключения (и однокоренные): {exc}. Ответь только результатом, без пояснений.";

const TEXT_PLACEHOLDER: &str = "{text}";
const EXCLUDE_PLACEHOLDER: &str = "{exc}";

/// Substitutes every `{text}` and `{exc}` in `template`.
///
/// Both values are trimmed. A missing exclude string becomes empty.
pub fn fill_template(template: &str, text: &str, exclude_words: Option<&str>) -> String {
    template
        .replace(TEXT_PLACEHOLDER, text.trim())
        .replace(EXCLUDE_PLACEHOLDER, exclude_words.map(str::trim).unwrap_or(""))
}
