use crate::export::{self, ExportFormat, Viewport};
use crate::fade::{FadeController, TimerHandle, Timers};
use crate::geometry::{KeyPositionRegistry, LayoutProvider};
use crate::keys::KeyAction;
use crate::sequence::TypedSequence;
use crate::settings::Settings;
use crate::trace::{self, Surface};
use svg::Document;

/// What the host should do after an input was handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    pub should_redraw: bool,
    /// Key positions should be re-read once layout has settled, then redrawn.
    pub should_relayout: bool,
}

impl KeyOutcome {
    pub fn new(should_redraw: bool, should_relayout: bool) -> Self {
        Self {
            should_redraw,
            should_relayout,
        }
    }
}

/// All mutable application state, owned in one place.
#[derive(Debug, Default)]
pub struct Session {
    sequence: TypedSequence,
    registry: KeyPositionRegistry,
    fade: FadeController,
    settings: Settings,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn sequence(&self) -> &TypedSequence {
        &self.sequence
    }

    pub fn registry(&self) -> &KeyPositionRegistry {
        &self.registry
    }

    pub fn fade(&self) -> &FadeController {
        &self.fade
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn handle_key(&mut self, action: KeyAction, timers: &mut impl Timers) -> KeyOutcome {
        match action {
            KeyAction::Letter(letter) => {
                self.sequence.push_letter(letter);
                self.fade.on_input(true, timers);
                KeyOutcome::new(true, true)
            }
            KeyAction::Space => {
                if self.sequence.push_space() {
                    self.fade.on_input(true, timers);
                }
                KeyOutcome::default()
            }
            KeyAction::Backspace => match self.sequence.backspace() {
                Some(_) => {
                    let has_content = !self.sequence.display_text().is_empty();
                    self.fade.on_input(has_content, timers);
                    KeyOutcome::new(true, false)
                }
                None => KeyOutcome::default(),
            },
            KeyAction::Confirm => {
                self.fade.confirm(timers);
                KeyOutcome::default()
            }
            KeyAction::Ignored => KeyOutcome::default(),
        }
    }

    pub fn pointer_enter(&mut self, timers: &mut impl Timers) {
        self.fade.pointer_enter(timers);
    }

    pub fn pointer_leave(&mut self, timers: &mut impl Timers) {
        let has_content = !self.sequence.is_empty();
        self.fade.pointer_leave(has_content, timers);
    }

    pub fn timer_fired(&mut self, handle: TimerHandle, timers: &mut impl Timers) -> bool {
        self.fade.timer_fired(handle, timers)
    }

    /// Empties the text and returns the fade to its initial state. The host must
    /// redraw afterwards to clear the surface.
    pub fn clear(&mut self, timers: &mut impl Timers) {
        self.sequence.clear();
        self.fade.reset(timers);
    }

    pub fn relayout(&mut self, provider: &impl LayoutProvider) {
        self.registry.recalculate(provider);
    }

    pub fn redraw<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        trace::redraw(
            surface,
            self.sequence.letters(),
            &self.registry,
            &self.settings.line,
        )
    }

    pub fn export_svg(&self, viewport: Viewport) -> Option<Document> {
        export::render_svg(
            self.sequence.letters(),
            &self.registry,
            &self.settings.line,
            viewport,
        )
    }

    pub fn export_file_name(&self, format: ExportFormat) -> String {
        export::file_name(self.sequence.display_text(), format)
    }
}
