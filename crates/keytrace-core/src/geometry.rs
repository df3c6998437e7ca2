use crate::keys::{Letter, ROWS};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Supplies the current centre of each rendered key, in drawing-surface coordinates.
pub trait LayoutProvider {
    /// Letters that cannot be placed right now are left out of the result.
    fn positions_of(&self, letters: &[Letter]) -> HashMap<Letter, Point>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyPositionRegistry {
    positions: HashMap<Letter, Point>,
}

impl KeyPositionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every entry with a fresh reading from `provider`.
    pub fn recalculate(&mut self, provider: &impl LayoutProvider) {
        self.positions = provider.positions_of(&Letter::all());
        log::trace!("Recalculated {} key positions", self.positions.len());
    }

    pub fn get(&self, letter: Letter) -> Option<Point> {
        self.positions.get(&letter).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<(Letter, Point)> for KeyPositionRegistry {
    fn from_iter<I: IntoIterator<Item = (Letter, Point)>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Nominal key placement computed from [`ROWS`] without a toolkit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub origin: Point,
    pub key_size: f64,
    pub gap: f64,
    /// Horizontal shift per row, as a fraction of the key pitch.
    pub stagger: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            origin: Point::default(),
            key_size: 56.0,
            gap: 8.0,
            stagger: 0.5,
        }
    }
}

impl GridLayout {
    /// Default grid centred on a surface of the given size.
    pub fn centered(width: f64, height: f64) -> Self {
        let grid = Self::default();
        let (w, h) = grid.extent();
        Self {
            origin: Point::new((width - w) / 2.0, (height - h) / 2.0),
            ..grid
        }
    }

    fn pitch(&self) -> f64 {
        self.key_size + self.gap
    }

    /// Width and height covered by the keys.
    pub fn extent(&self) -> (f64, f64) {
        let width = ROWS
            .iter()
            .enumerate()
            .map(|(row, keys)| {
                row as f64 * self.stagger * self.pitch()
                    + keys.len() as f64 * self.pitch()
                    - self.gap
            })
            .fold(0.0, f64::max);
        let height = ROWS.len() as f64 * self.pitch() - self.gap;
        (width, height)
    }

    pub fn center_of(&self, row: usize, col: usize) -> Point {
        let half = self.key_size / 2.0;
        Point::new(
            self.origin.x + (row as f64 * self.stagger + col as f64) * self.pitch() + half,
            self.origin.y + row as f64 * self.pitch() + half,
        )
    }
}

impl LayoutProvider for GridLayout {
    fn positions_of(&self, letters: &[Letter]) -> HashMap<Letter, Point> {
        letters
            .iter()
            .filter_map(|&l| l.locate().map(|(row, col)| (l, self.center_of(row, col))))
            .collect()
    }
}
