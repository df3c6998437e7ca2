use glib::SourceId;
use keytrace_core::fade::{TimerHandle, TimerRole, Timers};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

type Sources = Rc<RefCell<HashMap<TimerHandle, SourceId>>>;

/// [`Timers`] on the GLib main loop. Fired handles are passed to `on_fire`, which
/// should route them back into the session.
pub struct GlibTimers {
    next_id: u64,
    sources: Sources,
    on_fire: Rc<dyn Fn(TimerHandle)>,
}

impl GlibTimers {
    pub fn new(on_fire: impl Fn(TimerHandle) + 'static) -> Self {
        Self {
            next_id: 0,
            sources: Rc::default(),
            on_fire: Rc::new(on_fire),
        }
    }
}

impl Timers for GlibTimers {
    fn schedule(&mut self, role: TimerRole, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);

        let sources = self.sources.clone();
        let on_fire = self.on_fire.clone();
        let source = glib::timeout_add_local_once(delay, move || {
            // one-shot sources are gone once fired; forget the id before anyone cancels it
            sources.borrow_mut().remove(&handle);
            on_fire(handle);
        });
        self.sources.borrow_mut().insert(handle, source);

        log::trace!("Scheduled {} timer {} in {:?}", role, handle.id(), delay);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let source = self.sources.borrow_mut().remove(&handle);
        if let Some(source) = source {
            source.remove();
        }
    }
}

impl Drop for GlibTimers {
    fn drop(&mut self) {
        for (_, source) in self.sources.borrow_mut().drain() {
            source.remove();
        }
    }
}
