use crate::keys::Letter;
use derive_more::{AsRef, Deref, Display};

/// Human-readable typed text: lowercase letters and single spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Display, Deref, AsRef)]
pub struct DisplayText(String);

impl DisplayText {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

/// Letters typed so far plus the text shown on screen.
///
/// Spaces only ever reach the display text, so `letters().len()` never exceeds the
/// number of non-space characters in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedSequence {
    letters: Vec<Letter>,
    display: DisplayText,
}

impl TypedSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn display_text(&self) -> &DisplayText {
        &self.display
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn push_letter(&mut self, letter: Letter) {
        self.display.0.push(letter.to_lowercase());
        self.letters.push(letter);
    }

    /// Returns false when the text is empty or already ends in a space.
    pub fn push_space(&mut self) -> bool {
        if self.display.is_empty() || self.display.ends_with(' ') {
            return false;
        }
        self.display.0.push(' ');
        true
    }

    /// Removes the last displayed character, and the last letter along with it when
    /// that character was alphabetic.
    pub fn backspace(&mut self) -> Option<char> {
        let removed = self.display.0.pop()?;
        if removed.is_alphabetic() {
            self.letters.pop();
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.letters.clear();
        self.display.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TypedSequence {
        let mut seq = TypedSequence::new();
        for c in text.chars() {
            match Letter::new(c) {
                Some(l) => seq.push_letter(l),
                None => {
                    seq.push_space();
                }
            }
        }
        seq
    }

    #[test]
    fn test_letters_and_display_diverge_on_spaces() {
        let seq = typed("Ab Cd");
        assert_eq!(seq.display_text().as_str(), "ab cd");
        assert_eq!(
            seq.letters().iter().map(|l| l.as_char()).collect::<String>(),
            "ABCD"
        );
    }

    #[test]
    fn test_space_rejected_at_start_and_after_space() {
        let mut seq = TypedSequence::new();
        assert!(!seq.push_space());
        assert_eq!(seq.display_text(), &DisplayText::default());

        let mut seq = typed("ab");
        assert!(seq.push_space());
        assert!(!seq.push_space());
        assert_eq!(seq.display_text(), &DisplayText::new("ab "));
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_backspace_over_space_keeps_letters() {
        let mut seq = typed("ab ");
        assert_eq!(seq.backspace(), Some(' '));
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.backspace(), Some('b'));
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.display_text().as_str(), "a");
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut seq = TypedSequence::new();
        assert_eq!(seq.backspace(), None);
        assert!(seq.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut seq = typed("hello world");
        seq.clear();
        assert_eq!(seq, TypedSequence::new());
    }
}
