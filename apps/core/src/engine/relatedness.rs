//! Relatedness check between two words based on their stems.

use super::stem::stem;

/// Stems shorter than this never match by containment or shared prefix.
const MIN_SHARED_ROOT_LEN: usize = 4;

/// Returns `true` when two words look like they share a root.
///
/// Matches on equal stems, on one stem containing the other, or on a common
/// leading prefix of at least four characters. Errs towards matching.
pub fn related(word_a: &str, word_b: &str) -> bool {
    let root_a = stem(word_a);
    let root_b = stem(word_b);

    if root_a == root_b {
        return true;
    }

    let len_a = root_a.chars().count();
    let len_b = root_b.chars().count();
    if len_a >= MIN_SHARED_ROOT_LEN
        && len_b >= MIN_SHARED_ROOT_LEN
        && (root_a.contains(&root_b) || root_b.contains(&root_a))
    {
        return true;
    }

    common_prefix_len(&root_a, &root_b) >= MIN_SHARED_ROOT_LEN
}

/// Number of leading characters shared by both strings.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_related_to_itself() {
        for word in ["мир", "дела", "Привет", "hello", "программирование", "a"] {
            assert!(related(word, word), "'{}' should relate to itself", word);
        }
    }

    #[test]
    fn test_equal_stems() {
        assert!(related("книгами", "книга"));
        assert!(related("дом", "домами"));
        assert!(related("Дела", "дело"));
    }

    #[test]
    fn test_containment() {
        assert!(related("программа", "программирование"));
        assert!(related("привет", "приветствие"));
    }

    #[test]
    fn test_shared_prefix() {
        // "столиц" and "столов" share only "стол"
        assert!(related("столица", "столовая"));
    }

    #[test]
    fn test_short_roots_do_not_match() {
        assert!(!related("кот", "кит"));
        assert!(!related("мир", "мирный"));
        assert!(!related("как", "дела"));
    }

    #[test]
    fn test_unrelated_words() {
        assert!(!related("привет", "мир"));
        assert!(!related("книга", "столовая"));
    }

    #[test]
    fn test_common_prefix_len() {
        assert_eq!(common_prefix_len("стол", "столов"), 4);
        assert_eq!(common_prefix_len("abc", "xbc"), 0);
        assert_eq!(common_prefix_len("", "abc"), 0);
    }
}
