use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use keytrace_core::fade::FadeState;
use keytrace_core::geometry::{LayoutProvider, Point};
use keytrace_core::keys::{KeyAction, Letter, ROWS};
use std::collections::HashMap;
use std::time::Duration;
use strum::IntoEnumIterator;

pub const PRESS_HIGHLIGHT: Duration = Duration::from_millis(150);
const KEY_SPACING: i32 = 8;

/// Maps a physical key press to a typing action. Chords with Ctrl, Alt or Super
/// are left to the desktop.
pub fn classify(key: gdk::Key, modifiers: gdk::ModifierType) -> KeyAction {
    let chord = gdk::ModifierType::CONTROL_MASK
        | gdk::ModifierType::ALT_MASK
        | gdk::ModifierType::SUPER_MASK;
    if modifiers.intersects(chord) {
        return KeyAction::Ignored;
    }

    if key == gdk::Key::BackSpace {
        KeyAction::Backspace
    } else if key == gdk::Key::Return || key == gdk::Key::KP_Enter || key == gdk::Key::ISO_Enter
    {
        KeyAction::Confirm
    } else if key == gdk::Key::space {
        KeyAction::Space
    } else {
        key.to_unicode()
            .and_then(Letter::new)
            .map_or(KeyAction::Ignored, KeyAction::Letter)
    }
}

/// The on-screen keyboard: three staggered rows of letter keys.
pub struct Keyboard {
    pub root: gtk::Box,
    keys: HashMap<Letter, gtk::Label>,
}

impl Keyboard {
    pub fn new() -> Self {
        let root = gtk::Box::builder()
            .orientation(gtk::Orientation::Vertical)
            .spacing(KEY_SPACING)
            .halign(gtk::Align::Center)
            .valign(gtk::Align::Center)
            .build();
        root.add_css_class("keyboard");

        let mut keys = HashMap::new();
        for row in ROWS {
            let row_box = gtk::Box::builder()
                .orientation(gtk::Orientation::Horizontal)
                .spacing(KEY_SPACING)
                .halign(gtk::Align::Center)
                .build();

            for letter in row.chars().filter_map(Letter::new) {
                let label = gtk::Label::new(Some(&letter.to_string()));
                label.add_css_class("key");
                row_box.append(&label);
                keys.insert(letter, label);
            }
            root.append(&row_box);
        }

        let keyboard = Self { root, keys };
        keyboard.set_fade(FadeState::default());
        keyboard
    }

    /// Briefly marks the key as pressed.
    pub fn press(&self, letter: Letter) {
        let Some(key) = self.keys.get(&letter) else {
            return;
        };
        key.add_css_class("pressed");
        let key = key.clone();
        glib::timeout_add_local_once(PRESS_HIGHLIGHT, move || {
            key.remove_css_class("pressed");
        });
    }

    /// Swaps the `fade-*` class so the stylesheet's opacity transition runs.
    pub fn set_fade(&self, state: FadeState) {
        for other in FadeState::iter().filter(|s| *s != state) {
            self.root.remove_css_class(&format!("fade-{other}"));
        }
        self.root.add_css_class(&format!("fade-{state}"));
    }

    /// Key centres expressed in `target`'s coordinate space.
    pub fn layout<'a>(&'a self, target: &'a gtk::DrawingArea) -> WidgetLayout<'a> {
        WidgetLayout {
            keys: &self.keys,
            target,
        }
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

pub struct WidgetLayout<'a> {
    keys: &'a HashMap<Letter, gtk::Label>,
    target: &'a gtk::DrawingArea,
}

impl LayoutProvider for WidgetLayout<'_> {
    fn positions_of(&self, letters: &[Letter]) -> HashMap<Letter, Point> {
        letters
            .iter()
            .filter_map(|&letter| {
                let key = self.keys.get(&letter).filter(|k| k.is_mapped())?;
                let (x, y) = key.translate_coordinates(
                    self.target,
                    key.width() as f64 / 2.0,
                    key.height() as f64 / 2.0,
                )?;
                Some((letter, Point::new(x, y)))
            })
            .collect()
    }
}
