mod api;
mod app;
mod config;
mod error;
mod format;
mod hooks;
mod icons;
mod layout;
mod models;
mod notify;
mod pages;
mod session;
mod storage;

use app::App;
use config::CONFIG;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(CONFIG.log_level));
    log::info!("starting finance tracker against {}", CONFIG.backend_url);

    yew::Renderer::<App>::new().render();
}
