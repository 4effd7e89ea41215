pub mod client;
pub mod image;
pub mod query;
pub mod types;

pub use client::*;
pub use image::resolve_image_url;
pub use query::*;
pub use types::*;
