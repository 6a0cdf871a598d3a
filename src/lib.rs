//! Page logic for the portfolio site: the dropdown, the quote button, and the
//! handful of backend calls that fill in shows, the upload form and the
//! image gallery.
//!
//! Handlers are generic over [`Dom`] and [`Backend`] so the same flow runs in
//! the browser (`portfolio-page`) and natively against [`Document`].

pub mod backend;
#[cfg(feature = "cli")]
pub mod config;
pub mod dom;
pub mod markers;
pub mod page;

#[cfg(test)]
mod test_utils;

pub use backend::Backend;
#[cfg(feature = "cli")]
pub use backend::HttpBackend;
#[cfg(feature = "cli")]
pub use config::Config;
pub use dom::{Document, Dom, Visibility};
pub use markers::Marker;
pub use page::{DEFAULT_SHOW_COUNT, Page, QUOTES};
