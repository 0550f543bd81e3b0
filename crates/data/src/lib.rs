//! [popvis]'s dataset library.
//!
//! Loads the population-by-year/sex/ethnicity table and derives the three
//! immutable views the dashboard pages are built from.
//!
//! [popvis]: https://github.com/nelusnegur/popvis

mod read;

pub mod dataset;
pub mod error;
pub mod record;
pub mod view;

pub use crate::dataset::Dataset;
pub use crate::read::RecordReader;
pub use crate::view::Views;
