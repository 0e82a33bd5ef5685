pub mod composer;
pub mod landing;
pub mod sidebar;
pub mod transcript;
