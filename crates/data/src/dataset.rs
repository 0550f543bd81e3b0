use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use tracing::debug;
use tracing::info;

use crate::error::DataError;
use crate::error::DataLoadError;
use crate::error::SchemaError;
use crate::read::RecordReader;
use crate::record::Record;
use crate::view::Views;

/// The population table, loaded once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Reads the dataset from a delimited source with a header row.
    pub fn load<R: Read>(source: R) -> Result<Dataset, DataError> {
        let records = RecordReader::new(source)?.collect::<Result<Vec<Record>, DataError>>()?;
        info!(records = records.len(), "population dataset loaded");

        Ok(Self { records })
    }

    /// Reads the dataset from a file on the local file system.
    pub fn open(path: &Path) -> Result<Dataset, DataError> {
        debug!(path = %path.display(), "opening population dataset");
        let file = File::open(path).map_err(DataLoadError::from)?;

        Self::load(BufReader::new(file))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Derives the overall, by-sex and by-ethnicity views.
    ///
    /// Fails if any view would be empty, which means the source no longer
    /// carries the `both`/`overall` aggregate labels, or if a view breaks
    /// its per-year invariant.
    pub fn derive_views(&self) -> Result<Views, SchemaError> {
        let views = Views::derive(&self.records)?;

        info!(
            overall = views.overall.records().len(),
            by_sex = views.by_sex.records().len(),
            by_ethnicity = views.by_ethnicity.records().len(),
            "derived population views"
        );

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SOURCE: &str = "year,sex,ethnicity,population
1980,both,overall,13000000
1980,male,overall,6600000
1980,female,overall,6400000
1980,both,bumi_malay,7000000
1980,both,chinese,4200000
2020,both,overall,32000000
2020,male,overall,16500000
2020,female,overall,15500000
2020,both,bumi_malay,20000000
2020,both,chinese,7000000
";

    #[test]
    fn load_and_derive_views() -> Result<(), DataError> {
        let dataset = Dataset::load(Cursor::new(SOURCE))?;
        let views = dataset.derive_views()?;

        assert_eq!(dataset.records().len(), 10);
        assert_eq!(views.overall.records().len(), 2);
        assert_eq!(views.by_sex.records().len(), 4);
        assert_eq!(views.by_ethnicity.years(), &[1980, 2020]);

        Ok(())
    }

    #[test]
    fn open_missing_file() {
        let result = Dataset::open(Path::new("/nonexistent/population.csv"));

        assert!(matches!(result, Err(DataError::Load(DataLoadError::Io(_)))));
    }
}
