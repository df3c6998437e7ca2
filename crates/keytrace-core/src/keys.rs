use derive_more::Display;

/// The three letter rows of the on-screen keyboard, top to bottom.
pub const ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

/// An uppercase ASCII letter present on the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct Letter(char);

impl Letter {
    /// Accepts either case; anything that is not an ASCII letter is rejected.
    pub fn new(c: char) -> Option<Self> {
        c.is_ascii_alphabetic()
            .then(|| Self(c.to_ascii_uppercase()))
    }

    pub fn as_char(self) -> char {
        self.0
    }

    pub fn to_lowercase(self) -> char {
        self.0.to_ascii_lowercase()
    }

    /// All keyboard letters in row order.
    pub fn all() -> Vec<Letter> {
        ROWS.iter()
            .flat_map(|row| row.chars())
            .map(Letter)
            .collect()
    }

    /// Row and column of this letter in [`ROWS`].
    pub fn locate(self) -> Option<(usize, usize)> {
        ROWS.iter()
            .enumerate()
            .find_map(|(row, keys)| keys.find(self.0).map(|col| (row, col)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Letter(Letter),
    Space,
    Backspace,
    Confirm,
    Ignored,
}

impl KeyAction {
    pub fn from_char(c: char) -> Self {
        match c {
            ' ' => Self::Space,
            '\u{8}' => Self::Backspace,
            '\r' | '\n' => Self::Confirm,
            c => Letter::new(c).map_or(Self::Ignored, Self::Letter),
        }
    }

    /// Whether this action can change the typed text.
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Letter(_) | Self::Space | Self::Backspace)
    }
}
