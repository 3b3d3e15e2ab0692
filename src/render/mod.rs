mod canvas;
mod color;
mod counter;
mod layout;
mod renderer;

pub use canvas::{Dot, Frame, blank, blend_pixel, draw_dot};
pub use color::{Palette, hsv_to_rgb};
pub use counter::{CounterStyle, counter_alpha, counter_text};
pub use layout::{Layout, Placement};
pub use renderer::{
    RenderSettings, Renderer, TrailStyle, fade_fraction, is_visible, notes_played, render,
    visible_range,
};
