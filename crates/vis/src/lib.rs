//! [popvis]'s visualization library.
//!
//! [popvis]: https://github.com/nelusnegur/popvis
//!
//! Turns the filtered population views into chart descriptions, keeps each
//! session's page in sync with its route and controls, and renders the
//! dashboard pages.
//!
//! **WARNING**: This library is popvis' internal visualization library and
//! there are no plans to stabilize it. The API may break at any time without notice.

pub(crate) mod id;

pub mod aggregate;
pub mod chart;
pub mod controller;
pub mod error;
pub mod layout;
pub mod render;
pub mod route;
pub mod session;

pub use crate::id::Id;
