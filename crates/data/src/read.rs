use std::io::Read;

use csv::StringRecord;
use csv::StringRecordsIntoIter;
use csv::Trim;

use crate::error::DataError;
use crate::error::DataLoadError;
use crate::error::SchemaError;
use crate::record::Ethnicity;
use crate::record::Record;
use crate::record::Sex;

const YEAR_COLUMN: &str = "year";
const SEX_COLUMN: &str = "sex";
const ETHNICITY_COLUMN: &str = "ethnicity";
const POPULATION_COLUMN: &str = "population";

/// Positions of the required columns within a row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    year: usize,
    sex: usize,
    ethnicity: usize,
    population: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Columns, DataLoadError> {
        let position = |name: &'static str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or(DataLoadError::MissingColumn { name })
        };

        Ok(Self {
            year: position(YEAR_COLUMN)?,
            sex: position(SEX_COLUMN)?,
            ethnicity: position(ETHNICITY_COLUMN)?,
            population: position(POPULATION_COLUMN)?,
        })
    }
}

/// An iterator that decodes [`Record`]s from a delimited table with a header row.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct RecordReader<R> {
    rows: StringRecordsIntoIter<R>,
    columns: Columns,
}

impl<R: Read> RecordReader<R> {
    pub fn new(source: R) -> Result<RecordReader<R>, DataLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(source);

        let columns = Columns::locate(reader.headers()?)?;
        let rows = reader.into_records();

        Ok(Self { rows, columns })
    }

    fn decode(&self, row: &StringRecord) -> Result<Record, DataError> {
        let line = row.position().map_or(0, |p| p.line());
        let field = |index: usize| row.get(index).unwrap_or_default();

        let year = field(self.columns.year);
        let year: i32 = year.parse().map_err(|_| DataLoadError::InvalidValue {
            line,
            column: YEAR_COLUMN,
            value: year.to_owned(),
        })?;

        let population = field(self.columns.population);
        let population = population
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| DataLoadError::InvalidValue {
                line,
                column: POPULATION_COLUMN,
                value: population.to_owned(),
            })?;

        if population < 0.0 {
            return Err(SchemaError::NegativePopulation { line, population }.into());
        }

        let sex = Sex::from(field(self.columns.sex));
        let ethnicity = Ethnicity::from(field(self.columns.ethnicity));

        Ok(Record::new(year, sex, ethnicity, population))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record, DataError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self.rows.next()? {
            Ok(row) => Some(self.decode(&row)),
            Err(error) => Some(Err(DataLoadError::from(error).into())),
        }
    }
}
