use crate::geometry::{KeyPositionRegistry, Point};
use crate::keys::Letter;
use crate::settings::{Color, LineSettings};

/// Fewest letters that produce a visible segment.
pub const MIN_TRACE_LEN: usize = 2;
/// Blur radius applied to the stroke when glow is enabled.
pub const GLOW_BLUR: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
}

/// Polyline through the resolved positions of consecutive typed letters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TracePath {
    commands: Vec<PathCommand>,
}

impl TracePath {
    /// Pairs with an unresolved endpoint are skipped; the pen is lifted and
    /// re-anchored at the next drawable pair so the gap stays empty.
    pub fn build(letters: &[Letter], registry: &KeyPositionRegistry) -> Self {
        let mut commands = Vec::new();
        let mut pen_at = None;

        for (i, pair) in letters.windows(2).enumerate() {
            let (Some(start), Some(end)) = (registry.get(pair[0]), registry.get(pair[1])) else {
                continue;
            };
            if pen_at != Some(i) {
                commands.push(PathCommand::MoveTo(start));
            }
            commands.push(PathCommand::LineTo(end));
            pen_at = Some(i + 1);
        }

        Self { commands }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::LineTo(_)))
            .count()
    }
}

/// Resolved position of every typed letter, in typing order.
pub fn markers<'a>(
    letters: &'a [Letter],
    registry: &'a KeyPositionRegistry,
) -> impl Iterator<Item = Point> + 'a {
    letters.iter().filter_map(|&l| registry.get(l))
}

/// Stroke parameters derived from [`LineSettings`]. Line caps are always round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub dash: &'static [f64],
    pub blur: Option<f64>,
}

/// A persistent drawing target for the trace.
pub trait Surface {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;
    fn stroke(&mut self, path: &TracePath, style: &StrokeStyle) -> Result<(), Self::Error>;
}

/// Clears `surface` and strokes the current trace onto it.
pub fn redraw<S: Surface>(
    surface: &mut S,
    letters: &[Letter],
    registry: &KeyPositionRegistry,
    line: &LineSettings,
) -> Result<(), S::Error> {
    surface.clear()?;
    if letters.len() < MIN_TRACE_LEN {
        return Ok(());
    }

    let path = TracePath::build(letters, registry);
    if path.is_empty() {
        return Ok(());
    }
    surface.stroke(&path, &line.stroke())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GridLayout;
    use std::convert::Infallible;

    #[derive(Default)]
    struct Recorder {
        clears: usize,
        strokes: Vec<(TracePath, StrokeStyle)>,
    }

    impl Surface for Recorder {
        type Error = Infallible;

        fn clear(&mut self) -> Result<(), Infallible> {
            self.clears += 1;
            Ok(())
        }

        fn stroke(&mut self, path: &TracePath, style: &StrokeStyle) -> Result<(), Infallible> {
            self.strokes.push((path.clone(), *style));
            Ok(())
        }
    }

    fn letters(text: &str) -> Vec<Letter> {
        text.chars().filter_map(Letter::new).collect()
    }

    fn grid() -> KeyPositionRegistry {
        let mut registry = KeyPositionRegistry::new();
        registry.recalculate(&GridLayout::default());
        registry
    }

    #[test]
    fn test_full_path() {
        let registry = grid();
        let path = TracePath::build(&letters("hello"), &registry);

        assert_eq!(path.line_count(), 4);
        assert_eq!(path.commands().len(), 5);
        assert!(matches!(path.commands()[0], PathCommand::MoveTo(_)));
    }

    #[test]
    fn test_unresolved_pairs_are_skipped() {
        let full = grid();
        let registry: KeyPositionRegistry = Letter::all()
            .into_iter()
            .filter(|l| l.as_char() != 'C')
            .filter_map(|l| full.get(l).map(|p| (l, p)))
            .collect();

        // A-B drawn, B-C and C-D skipped, D-E drawn from a fresh anchor
        let path = TracePath::build(&letters("abcde"), &registry);
        let pos = |c| full.get(Letter::new(c).unwrap()).unwrap();
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(pos('a')),
                PathCommand::LineTo(pos('b')),
                PathCommand::MoveTo(pos('d')),
                PathCommand::LineTo(pos('e')),
            ]
        );
        assert_eq!(markers(&letters("abcde"), &registry).count(), 4);
    }

    #[test]
    fn test_path_starts_at_first_resolvable_pair() {
        let full = grid();
        let registry: KeyPositionRegistry = ['B', 'C']
            .into_iter()
            .filter_map(Letter::new)
            .filter_map(|l| full.get(l).map(|p| (l, p)))
            .collect();

        let path = TracePath::build(&letters("abc"), &registry);
        assert_eq!(path.line_count(), 1);
        assert_eq!(
            path.commands()[0],
            PathCommand::MoveTo(full.get(Letter::new('b').unwrap()).unwrap())
        );
    }

    #[test]
    fn test_redraw_short_sequence_never_strokes() {
        let registry = grid();
        let line = LineSettings::default();

        for text in ["", "a"] {
            let mut surface = Recorder::default();
            redraw(&mut surface, &letters(text), &registry, &line).unwrap();
            assert_eq!(surface.clears, 1);
            assert!(surface.strokes.is_empty());
        }
    }

    #[test]
    fn test_redraw_strokes_once_with_style() {
        let registry = grid();
        let line = LineSettings::default();
        let mut surface = Recorder::default();

        redraw(&mut surface, &letters("abc"), &registry, &line).unwrap();

        assert_eq!(surface.strokes.len(), 1);
        let (path, style) = &surface.strokes[0];
        assert_eq!(path.line_count(), 2);
        assert_eq!(style, &line.stroke());
    }

    #[test]
    fn test_redraw_with_empty_registry_only_clears() {
        let mut surface = Recorder::default();
        redraw(
            &mut surface,
            &letters("abc"),
            &KeyPositionRegistry::new(),
            &LineSettings::default(),
        )
        .unwrap();
        assert_eq!(surface.clears, 1);
        assert!(surface.strokes.is_empty());
    }
}
