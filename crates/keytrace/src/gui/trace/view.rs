use super::{GLOW_ALPHA, GLOW_PASSES};
use cairo::Context;
use keytrace_core::session::Session;
use keytrace_core::trace::{PathCommand, StrokeStyle, Surface, TracePath};
use palette::Srgba;

/// Cairo-backed drawing surface for the trace.
pub struct CairoSurface<'a> {
    cr: &'a Context,
}

impl<'a> CairoSurface<'a> {
    pub fn new(cr: &'a Context) -> Self {
        Self { cr }
    }

    fn append_path(&self, path: &TracePath) {
        self.cr.new_path();
        for command in path.commands() {
            match *command {
                PathCommand::MoveTo(p) => self.cr.move_to(p.x, p.y),
                PathCommand::LineTo(p) => self.cr.line_to(p.x, p.y),
            }
        }
    }

    fn set_source(&self, color: Srgba<f64>) {
        let (r, g, b, a) = color.into_components();
        self.cr.set_source_rgba(r, g, b, a);
    }

    /// Canvas-style shadow blur, faked with progressively wider translucent strokes
    /// under the main one.
    fn stroke_glow(&self, style: &StrokeStyle, blur: f64) -> Result<(), cairo::Error> {
        let alpha = GLOW_ALPHA / GLOW_PASSES as f64;
        for pass in (1..=GLOW_PASSES).rev() {
            let spread = blur * pass as f64 / GLOW_PASSES as f64;
            self.set_source(style.color.to_srgba(alpha));
            self.cr.set_line_width(style.width + spread);
            self.cr.stroke_preserve()?;
        }
        Ok(())
    }
}

impl Surface for CairoSurface<'_> {
    type Error = cairo::Error;

    fn clear(&mut self) -> Result<(), cairo::Error> {
        self.cr.save()?;
        self.cr.set_operator(cairo::Operator::Clear);
        self.cr.paint()?;
        self.cr.restore()
    }

    fn stroke(&mut self, path: &TracePath, style: &StrokeStyle) -> Result<(), cairo::Error> {
        self.cr.save()?;
        self.cr.set_line_cap(cairo::LineCap::Round);
        self.cr.set_line_join(cairo::LineJoin::Round);
        self.cr.set_dash(style.dash, 0.0);
        self.append_path(path);

        if let Some(blur) = style.blur {
            self.stroke_glow(style, blur)?;
        }

        self.set_source(style.color.to_srgba(1.0));
        self.cr.set_line_width(style.width);
        self.cr.stroke()?;
        self.cr.restore()
    }
}

pub fn draw(cr: &Context, session: &Session) -> Result<(), cairo::Error> {
    session.redraw(&mut CairoSurface::new(cr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keytrace_core::fade::ManualTimers;
    use keytrace_core::geometry::GridLayout;
    use keytrace_core::keys::KeyAction;
    use keytrace_core::settings::Settings;

    fn pixel_alpha(surface: &mut cairo::ImageSurface, x: usize, y: usize) -> u8 {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let offset = y * stride + x * 4;
        // ARGB32 pixels are native-endian u32s with alpha in the top byte
        let px = u32::from_ne_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);
        (px >> 24) as u8
    }

    #[test]
    fn test_draws_segment_between_keys() {
        let mut session = Session::new(Settings::default());
        let mut timers = ManualTimers::new();
        session.relayout(&GridLayout::default());
        for c in "qw".chars() {
            session.handle_key(KeyAction::from_char(c), &mut timers);
        }

        let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 200, 100).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            draw(&cr, &session).unwrap();
        }
        surface.flush();

        // Q and W centres sit at (28, 28) and (92, 28)
        assert!(pixel_alpha(&mut surface, 60, 28) > 0);
        assert_eq!(pixel_alpha(&mut surface, 60, 90), 0);
    }

    #[test]
    fn test_single_letter_leaves_surface_empty() {
        let mut session = Session::new(Settings::default());
        let mut timers = ManualTimers::new();
        session.relayout(&GridLayout::default());
        session.handle_key(KeyAction::from_char('q'), &mut timers);

        let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 100, 60).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            draw(&cr, &session).unwrap();
        }
        surface.flush();

        assert_eq!(pixel_alpha(&mut surface, 28, 28), 0);
    }
}
