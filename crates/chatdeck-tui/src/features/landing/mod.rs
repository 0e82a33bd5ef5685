//! Landing view shown while no session is active.

mod render;

pub use render::render_landing;
