//! Sidebar feature: collapsed rail, search field and session list.

mod render;
mod state;
mod update;

pub use render::{render_sidebar, sidebar_width};
pub use state::SidebarState;
pub use update::{handle_list_key, handle_search_key, handle_search_paste};
