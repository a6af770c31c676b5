mod card;
mod charsets;
mod components;
mod constants;
mod geometry;
mod grid;
mod model;
mod state;
mod util;

fn main() {
    console_error_panic_hook::set_once();
    util::init_logging();
    yew::Renderer::<components::app::App>::new().render();
}
