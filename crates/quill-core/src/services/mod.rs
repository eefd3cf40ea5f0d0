//! Application services built on the ports.

mod blog;

pub use blog::{BlogService, BlogTarget};
