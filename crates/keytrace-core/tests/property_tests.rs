use keytrace_core::export::{Viewport, render_svg};
use keytrace_core::fade::{FADE_DELAY, FadeState, ManualTimers, REVEAL_DELAY};
use keytrace_core::geometry::{GridLayout, KeyPositionRegistry};
use keytrace_core::keys::{KeyAction, Letter};
use keytrace_core::session::Session;
use keytrace_core::settings::LineSettings;
use keytrace_core::trace::TracePath;
use proptest::prelude::*;
use std::time::Duration;

// --- STRATEGIES ---

fn arb_letter() -> impl Strategy<Value = char> {
    prop::char::range('a', 'z').prop_flat_map(|c| prop_oneof![Just(c), Just(c.to_ascii_uppercase())])
}

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![4 => arb_letter(), 1 => Just(' ')], 0..40)
        .prop_map(|chars| chars.into_iter().collect())
}

fn replay(session: &mut Session, timers: &mut ManualTimers, text: &str) {
    for c in text.chars() {
        session.handle_key(KeyAction::from_char(c), timers);
    }
}

fn grid() -> KeyPositionRegistry {
    let mut registry = KeyPositionRegistry::new();
    registry.recalculate(&GridLayout::default());
    registry
}

proptest! {
    #[test]
    fn prop_letters_replay_exactly(chars in prop::collection::vec(arb_letter(), 2..40)) {
        let text: String = chars.iter().collect();
        let mut session = Session::default();
        let mut timers = ManualTimers::new();
        replay(&mut session, &mut timers, &text);

        let letters: String = session.sequence().letters().iter().map(|l| l.as_char()).collect();
        prop_assert_eq!(letters, text.to_ascii_uppercase());
        prop_assert_eq!(session.sequence().display_text().as_str(), text.to_ascii_lowercase());
    }

    #[test]
    fn prop_backspace_inverts_letter(prefix in arb_text(), letter in arb_letter()) {
        let mut session = Session::default();
        let mut timers = ManualTimers::new();
        replay(&mut session, &mut timers, &prefix);
        let before = session.sequence().clone();

        session.handle_key(KeyAction::from_char(letter), &mut timers);
        session.handle_key(KeyAction::Backspace, &mut timers);

        prop_assert_eq!(session.sequence(), &before);
    }

    #[test]
    fn prop_space_is_idempotent(prefix in arb_text()) {
        let mut session = Session::default();
        let mut timers = ManualTimers::new();
        replay(&mut session, &mut timers, &prefix);

        session.handle_key(KeyAction::Space, &mut timers);
        let once = session.sequence().clone();
        session.handle_key(KeyAction::Space, &mut timers);

        prop_assert_eq!(session.sequence(), &once);
    }

    #[test]
    fn prop_letters_never_outnumber_display(text in arb_text(), backspaces in 0usize..10) {
        let mut session = Session::default();
        let mut timers = ManualTimers::new();
        replay(&mut session, &mut timers, &text);
        for _ in 0..backspaces {
            session.handle_key(KeyAction::Backspace, &mut timers);
        }

        let display = session.sequence().display_text();
        let non_space = display.chars().filter(|c| *c != ' ').count();
        prop_assert!(session.sequence().len() <= non_space);
        prop_assert!(!display.starts_with(' '));
        prop_assert!(!display.contains("  "));
    }

    #[test]
    fn prop_clear_restores_initial_state(text in arb_text(), confirm in any::<bool>()) {
        let mut session = Session::default();
        let mut timers = ManualTimers::new();
        replay(&mut session, &mut timers, &text);
        if confirm {
            session.handle_key(KeyAction::Confirm, &mut timers);
        }

        session.clear(&mut timers);
        session.clear(&mut timers);

        prop_assert!(session.sequence().is_empty());
        prop_assert!(session.sequence().display_text().is_empty());
        prop_assert_eq!(session.fade().state(), FadeState::Active);
        prop_assert!(!session.fade().export_visible());
        prop_assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn prop_export_counts(chars in prop::collection::vec(arb_letter(), 2..30)) {
        let registry = grid();
        let letters: Vec<Letter> = chars.iter().filter_map(|&c| Letter::new(c)).collect();

        prop_assert_eq!(TracePath::build(&letters, &registry).line_count(), letters.len() - 1);

        let svg = render_svg(&letters, &registry, &LineSettings::default(), Viewport::new(800.0, 400.0))
            .unwrap()
            .to_string();
        prop_assert_eq!(svg.matches("<circle").count(), letters.len());
    }

    #[test]
    fn prop_fade_timeline(c in arb_letter(), t in 0u64..6000) {
        let mut session = Session::default();
        let mut timers = ManualTimers::new();
        session.handle_key(KeyAction::from_char(c), &mut timers);

        let t = Duration::from_millis(t);
        timers.advance_to(t, |timers, handle| {
            session.timer_fired(handle, timers);
        });

        let expected = if t < FADE_DELAY {
            FadeState::Active
        } else if t < FADE_DELAY + REVEAL_DELAY {
            FadeState::Fading
        } else {
            FadeState::Revealed
        };
        prop_assert_eq!(session.fade().state(), expected);
    }
}
