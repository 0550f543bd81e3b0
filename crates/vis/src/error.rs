//! Defines the error types that this crate uses.

use std::error::Error;
use std::fmt::Display;
use std::io::Error as IoError;

use crate::render::error::RenderError;

/// The result type that uses [VisError] as the error type.
pub type Result<T> = std::result::Result<T, VisError>;

/// The error type for generating the dashboard pages.
#[derive(Debug)]
pub enum VisError {
    /// A [std::io::Error] encountered while creating the output directory.
    Io(IoError),

    /// A [RenderError] encountered while rendering a page.
    Render(RenderError),
}

impl Error for VisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            VisError::Io(error) => Some(error),
            VisError::Render(error) => Some(error),
        }
    }
}

impl Display for VisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let vis_error = "vis error:";

        match self {
            VisError::Io(error) => write!(f, "{vis_error} I/O error: {error}"),
            VisError::Render(error) => write!(f, "{vis_error} render error: {error}"),
        }
    }
}

impl From<IoError> for VisError {
    fn from(error: IoError) -> Self {
        VisError::Io(error)
    }
}

impl From<RenderError> for VisError {
    fn from(error: RenderError) -> Self {
        VisError::Render(error)
    }
}

/// The requested year has no records in the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownYear {
    pub year: i32,
}

impl Display for UnknownYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown year: there are no records for {}", self.year)
    }
}

impl Error for UnknownYear {}

/// The reference year used to anchor the trend annotation has no record.
///
/// This is recoverable: the chart is rendered without the annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencePointMissing {
    pub year: i32,
}

impl Display for ReferencePointMissing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "reference point missing: there is no overall record for {}", self.year)
    }
}

impl Error for ReferencePointMissing {}
