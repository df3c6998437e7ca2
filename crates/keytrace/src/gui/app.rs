use crate::config;
use crate::events::AppEvent;
use crate::export;
use crate::gui::keyboard::{self, Keyboard};
use crate::gui::theme;
use crate::gui::trace;
use crate::sys::timers::GlibTimers;
use gtk::prelude::*;
use gtk4 as gtk;
use keytrace_core::export::ExportFormat;
use keytrace_core::fade::TimerHandle;
use keytrace_core::keys::KeyAction;
use keytrace_core::session::{KeyOutcome, Session};
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Lets GTK finish allocating before key positions are read back.
pub const LAYOUT_SETTLE: Duration = Duration::from_millis(10);

pub struct AppModel {
    pub session: Rc<RefCell<Session>>,
    timers: GlibTimers,
    keyboard: Keyboard,
    css: gtk::CssProvider,
    drawing_area: gtk::DrawingArea,
    display_text: String,
    export_visible: bool,
}

#[derive(Debug)]
pub enum AppMsg {
    Key(KeyAction),
    PointerEnter,
    PointerLeave,
    TimerFired(TimerHandle),
    ScheduleRelayout,
    Relayout,
    Export(ExportFormat),
    Clear,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Session, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("keytrace"),
            set_default_size: (1100, 700),
            add_css_class: "keytrace-window",

            add_controller = gtk::EventControllerKey {
                set_propagation_phase: gtk::PropagationPhase::Capture,
                connect_key_pressed[sender] => move |_, key, _, modifiers| {
                    match keyboard::classify(key, modifiers) {
                        KeyAction::Ignored => glib::Propagation::Proceed,
                        action => {
                            sender.input(AppMsg::Key(action));
                            glib::Propagation::Stop
                        }
                    }
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "keytrace-drawing-area",

                    connect_resize[sender] => move |_, _, _| {
                        sender.input(AppMsg::ScheduleRelayout);
                    },
                },

                add_overlay = &gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::Start,
                    set_margin_top: 24,
                    set_spacing: 12,

                    gtk::Label {
                        add_css_class: "keytrace-text",
                        #[watch]
                        set_label: &model.display_text,
                    },

                    gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,
                        set_halign: gtk::Align::Center,
                        set_spacing: 8,

                        gtk::Button {
                            set_label: "Export SVG",
                            set_focusable: false,
                            #[watch]
                            set_visible: model.export_visible,
                            connect_clicked => AppMsg::Export(ExportFormat::Svg),
                        },

                        gtk::Button {
                            set_label: "Export PNG",
                            set_focusable: false,
                            #[watch]
                            set_visible: model.export_visible,
                            connect_clicked => AppMsg::Export(ExportFormat::Png),
                        },

                        gtk::Button {
                            set_label: "Clear",
                            set_focusable: false,
                            connect_clicked => AppMsg::Clear,
                        },
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (session, rx) = init;

        let css = theme::load_css(&session.settings().keyboard);
        let session = Rc::new(RefCell::new(session));

        let timer_sender = sender.input_sender().clone();
        let timers = GlibTimers::new(move |handle| timer_sender.emit(AppMsg::TimerFired(handle)));

        let model = AppModel {
            session,
            timers,
            keyboard: Keyboard::new(),
            css,
            drawing_area: gtk::DrawingArea::default(),
            display_text: String::new(),
            export_visible: false,
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        widgets.overlay.add_overlay(&model.keyboard.root);
        let hover = gtk::EventControllerMotion::new();
        {
            let sender = sender.clone();
            hover.connect_enter(move |_, _, _| sender.input(AppMsg::PointerEnter));
        }
        {
            let sender = sender.clone();
            hover.connect_leave(move |_| sender.input(AppMsg::PointerLeave));
        }
        model.keyboard.root.add_controller(hover);

        let state_draw = model.session.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, _, _| {
                if let Err(e) = trace::draw(cr, &state_draw.borrow()) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Key(action) => {
                let outcome = self
                    .session
                    .borrow_mut()
                    .handle_key(action, &mut self.timers);
                if let KeyAction::Letter(letter) = action {
                    self.keyboard.press(letter);
                }
                self.apply(outcome, &sender);
            }
            AppMsg::PointerEnter => self.session.borrow_mut().pointer_enter(&mut self.timers),
            AppMsg::PointerLeave => self.session.borrow_mut().pointer_leave(&mut self.timers),
            AppMsg::TimerFired(handle) => {
                self.session
                    .borrow_mut()
                    .timer_fired(handle, &mut self.timers);
            }
            AppMsg::ScheduleRelayout => {
                let sender = sender.clone();
                glib::timeout_add_local_once(LAYOUT_SETTLE, move || {
                    sender.input(AppMsg::Relayout);
                });
            }
            AppMsg::Relayout => {
                self.session
                    .borrow_mut()
                    .relayout(&self.keyboard.layout(&self.drawing_area));
                self.drawing_area.queue_draw();
            }
            AppMsg::Export(format) => self.export(format),
            AppMsg::Clear => {
                self.session.borrow_mut().clear(&mut self.timers);
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(settings) => {
                    theme::reload_css(&self.css, &settings.keyboard);
                    self.session.borrow_mut().set_settings(settings);
                    sender.input(AppMsg::ScheduleRelayout);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
        self.sync();
    }
}

impl AppModel {
    fn apply(&self, outcome: KeyOutcome, sender: &ComponentSender<Self>) {
        if outcome.should_relayout {
            sender.input(AppMsg::ScheduleRelayout);
        } else if outcome.should_redraw {
            self.drawing_area.queue_draw();
        }
    }

    /// Mirrors session state into the fields the view watches.
    fn sync(&mut self) {
        let session = self.session.borrow();
        self.display_text = session.sequence().display_text().to_string();
        self.export_visible = session.fade().export_visible();
        self.keyboard.set_fade(session.fade().state());
    }

    fn export(&self, format: ExportFormat) {
        let (width, height) = (self.drawing_area.width(), self.drawing_area.height());
        match export::export(&self.session.borrow(), format, width, height) {
            Ok(Some(path)) => log::info!("Exported {}", path.display()),
            Ok(None) => log::debug!("Nothing to export as {}", format),
            Err(e) => log::error!("Failed to export {}: {}", format, e),
        }
    }
}
