use keytrace::config;
use keytrace::gui::app::AppModel;
use keytrace::sys::runtime;
use keytrace_core::session::Session;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    if let Err(e) = config::write_default_config() {
        log::warn!("Could not write default config: {}", e);
    }
    let settings = config::load_or_default();
    let session = Session::new(settings);

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.troia.keytrace");

    app.run::<AppModel>((session, rx));
}
