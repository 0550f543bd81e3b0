use std::convert::From;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io;
use std::sync::Arc;

use crate::view::ViewKind;

/// The error type for loading and validating a population dataset.
///
/// Both variants are fatal: a dataset that fails to load or validate
/// cannot back any page.
#[derive(Debug, Clone)]
pub enum DataError {
    /// The source could not be read or parsed.
    Load(DataLoadError),

    /// The source was parsed, but its content does not match the expected schema.
    Schema(SchemaError),
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Load(error) => Display::fmt(error, f),
            DataError::Schema(error) => Display::fmt(error, f),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DataError::Load(error) => Some(error),
            DataError::Schema(error) => Some(error),
        }
    }
}

impl From<DataLoadError> for DataError {
    fn from(error: DataLoadError) -> Self {
        DataError::Load(error)
    }
}

impl From<SchemaError> for DataError {
    fn from(error: SchemaError) -> Self {
        DataError::Schema(error)
    }
}

/// The error type for reading the delimited source table.
#[derive(Debug, Clone)]
pub enum DataLoadError {
    /// A [`std::io::Error`] encountered while opening or reading the source.
    Io(Arc<io::Error>),

    /// A [`csv::Error`] encountered while decoding the source.
    Csv(Arc<csv::Error>),

    /// The header row does not contain a required column.
    MissingColumn { name: &'static str },

    /// A field could not be parsed into the column's type.
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },
}

impl Display for DataLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let load_error = "data load error:";

        match self {
            DataLoadError::Io(error) => write!(f, "{load_error} I/O error: {error}"),
            DataLoadError::Csv(error) => write!(f, "{load_error} CSV error: {error}"),
            DataLoadError::MissingColumn { name } => {
                write!(f, "{load_error} the required \"{name}\" column is missing")
            }
            DataLoadError::InvalidValue {
                line,
                column,
                value,
            } => write!(
                f,
                "{load_error} line {line}: \"{value}\" is not a valid value for the \"{column}\" column"
            ),
        }
    }
}

impl Error for DataLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DataLoadError::Io(error) => Some(error.as_ref()),
            DataLoadError::Csv(error) => Some(error.as_ref()),
            DataLoadError::MissingColumn { .. } => None,
            DataLoadError::InvalidValue { .. } => None,
        }
    }
}

impl From<io::Error> for DataLoadError {
    fn from(error: io::Error) -> Self {
        DataLoadError::Io(Arc::new(error))
    }
}

impl From<csv::Error> for DataLoadError {
    fn from(error: csv::Error) -> Self {
        DataLoadError::Csv(Arc::new(error))
    }
}

/// The error type for a dataset whose content no longer matches the
/// expected category vocabulary or view invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A record carries a negative population.
    NegativePopulation { line: u64, population: f64 },

    /// A derived view has no records.
    EmptyView(ViewKind),

    /// The overall view holds more than one record for the year.
    DuplicateYear { year: i32 },

    /// The categories present for the year differ from the other years of the view.
    UnevenPartition { view: ViewKind, year: i32 },
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let schema_error = "schema error:";

        match self {
            SchemaError::NegativePopulation { line, population } => write!(
                f,
                "{schema_error} line {line}: the population {population} is negative"
            ),
            SchemaError::EmptyView(view) => write!(
                f,
                "{schema_error} the {view} view is empty; the source no longer matches the expected categories"
            ),
            SchemaError::DuplicateYear { year } => write!(
                f,
                "{schema_error} the {view} view has more than one record for {year}",
                view = ViewKind::Overall
            ),
            SchemaError::UnevenPartition { view, year } => write!(
                f,
                "{schema_error} the {view} view has a different set of categories for {year}"
            ),
        }
    }
}

impl Error for SchemaError {}
