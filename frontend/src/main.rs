use crate::app::App;

mod app;
mod components;
mod pages;
mod platform;
mod tops_sheet;

fn main() {
    platform::init_logger();
    yew::Renderer::<App>::new().render();
}
