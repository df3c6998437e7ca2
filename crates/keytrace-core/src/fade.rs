//! Keyboard fade-out and export reveal, driven by typing inactivity.
//!
//! After an edit the keyboard stays fully opaque for [`FADE_DELAY`], dims for
//! [`REVEAL_DELAY`], then the export controls appear. Hovering the keyboard holds it
//! in [`FadeState::Active`]; confirming jumps straight to [`FadeState::Confirmed`].

use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter};

pub const FADE_DELAY: Duration = Duration::from_millis(2000);
pub const REVEAL_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum FadeState {
    #[default]
    Active,
    Fading,
    Revealed,
    Confirmed,
}

impl FadeState {
    pub fn opacity(self) -> f64 {
        match self {
            Self::Active => 1.0,
            Self::Fading | Self::Revealed => 0.3,
            Self::Confirmed => 0.1,
        }
    }

    pub fn export_visible(self) -> bool {
        matches!(self, Self::Revealed | Self::Confirmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum TimerRole {
    Fade,
    Reveal,
}

/// One-shot, cancelable timers. The host reports a fired timer back through
/// [`FadeController::timer_fired`] with the handle returned here.
pub trait Timers {
    fn schedule(&mut self, role: TimerRole, delay: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Default)]
pub struct FadeController {
    state: FadeState,
    hovering: bool,
    fade_timer: Option<TimerHandle>,
    reveal_timer: Option<TimerHandle>,
}

impl FadeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FadeState {
        self.state
    }

    pub fn opacity(&self) -> f64 {
        self.state.opacity()
    }

    pub fn export_visible(&self) -> bool {
        self.state.export_visible()
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// A mutating edit happened. The countdown only restarts when there is
    /// something left to fade.
    pub fn on_input(&mut self, has_content: bool, timers: &mut impl Timers) {
        if self.hovering {
            return;
        }
        self.restart(has_content, timers);
    }

    pub fn pointer_enter(&mut self, timers: &mut impl Timers) {
        self.cancel_all(timers);
        self.set_state(FadeState::Active);
        self.hovering = true;
    }

    pub fn pointer_leave(&mut self, has_content: bool, timers: &mut impl Timers) {
        self.hovering = false;
        if has_content {
            self.restart(true, timers);
        }
    }

    pub fn confirm(&mut self, timers: &mut impl Timers) {
        self.cancel_all(timers);
        self.set_state(FadeState::Confirmed);
    }

    pub fn reset(&mut self, timers: &mut impl Timers) {
        self.cancel_all(timers);
        self.set_state(FadeState::Active);
    }

    /// Returns true when the state changed. Handles that are no longer pending are
    /// ignored.
    pub fn timer_fired(&mut self, handle: TimerHandle, timers: &mut impl Timers) -> bool {
        if self.fade_timer == Some(handle) {
            self.fade_timer = None;
            if self.hovering || self.state != FadeState::Active {
                return false;
            }
            self.set_state(FadeState::Fading);
            self.reveal_timer = Some(timers.schedule(TimerRole::Reveal, REVEAL_DELAY));
            true
        } else if self.reveal_timer == Some(handle) {
            self.reveal_timer = None;
            if self.hovering || self.state != FadeState::Fading {
                return false;
            }
            self.set_state(FadeState::Revealed);
            true
        } else {
            log::trace!("Ignoring stale timer {}", handle.id());
            false
        }
    }

    fn restart(&mut self, countdown: bool, timers: &mut impl Timers) {
        self.cancel_all(timers);
        self.set_state(FadeState::Active);
        if countdown {
            self.fade_timer = Some(timers.schedule(TimerRole::Fade, FADE_DELAY));
        }
    }

    fn cancel_all(&mut self, timers: &mut impl Timers) {
        for handle in [self.fade_timer.take(), self.reveal_timer.take()]
            .into_iter()
            .flatten()
        {
            timers.cancel(handle);
        }
    }

    fn set_state(&mut self, state: FadeState) {
        if self.state != state {
            log::debug!("Fade state {} -> {}", self.state, state);
            self.state = state;
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: TimerHandle,
    role: TimerRole,
    deadline: Duration,
}

/// Virtual clock for driving [`Timers`] deterministically.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, role: TimerRole) -> bool {
        self.pending.iter().any(|p| p.role == role)
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to its
    /// deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= until)
            .min_by_key(|(_, p)| (p.deadline, p.handle))
            .map(|(i, _)| i)?;
        let due = self.pending.remove(idx);
        self.now = self.now.max(due.deadline);
        Some(due.handle)
    }

    /// Fires every timer due up to `until` in deadline order, including ones
    /// scheduled by `fire` itself, then leaves the clock at `until`.
    pub fn advance_to(&mut self, until: Duration, mut fire: impl FnMut(&mut Self, TimerHandle)) {
        while let Some(handle) = self.pop_due(until) {
            fire(self, handle);
        }
        self.now = self.now.max(until);
    }
}

impl Timers for ManualTimers {
    fn schedule(&mut self, role: TimerRole, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push(Pending {
            handle,
            role,
            deadline: self.now + delay,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|p| p.handle != handle);
    }
}
