//! Composer feature: draft editing, image attachment, send.

mod render;
mod text_buffer;
mod update;

pub use render::{composer_height, render_composer};
pub use text_buffer::TextBuffer;
pub use update::{abandon_image_load, handle_key, handle_paste, submit};
