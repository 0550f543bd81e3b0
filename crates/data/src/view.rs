use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

use crate::error::SchemaError;
use crate::record::Ethnicity;
use crate::record::Record;
use crate::record::Sex;

/// Identifies one of the three filtered views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    Overall,
    BySex,
    ByEthnicity,
}

impl Display for ViewKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Overall => write!(f, "overall"),
            ViewKind::BySex => write!(f, "by-sex"),
            ViewKind::ByEthnicity => write!(f, "by-ethnicity"),
        }
    }
}

/// Records where `sex = "both"` and `ethnicity = "overall"`, one per year.
#[derive(Debug, Clone)]
pub struct OverallView {
    records: Vec<Record>,
}

impl OverallView {
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

/// Records where `ethnicity = "overall"` and `sex != "both"`.
#[derive(Debug, Clone)]
pub struct BySexView {
    records: Vec<Record>,
}

impl BySexView {
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

/// Records where `ethnicity != "overall"`.
#[derive(Debug, Clone)]
pub struct ByEthnicityView {
    records: Vec<Record>,
    years: Vec<i32>,
}

impl ByEthnicityView {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The distinct years of the view in ascending order.
    pub fn years(&self) -> &[i32] {
        &self.years
    }
}

/// The three filtered views derived from a dataset.
#[derive(Debug, Clone)]
pub struct Views {
    pub overall: OverallView,
    pub by_sex: BySexView,
    pub by_ethnicity: ByEthnicityView,
}

impl Views {
    pub(crate) fn derive(records: &[Record]) -> Result<Views, SchemaError> {
        let overall: Vec<Record> = records
            .iter()
            .filter(|r| r.sex == Sex::Both && r.ethnicity == Ethnicity::Overall)
            .cloned()
            .collect();

        let by_sex: Vec<Record> = records
            .iter()
            .filter(|r| r.ethnicity == Ethnicity::Overall && r.sex != Sex::Both)
            .cloned()
            .collect();

        let by_ethnicity: Vec<Record> = records
            .iter()
            .filter(|r| r.ethnicity != Ethnicity::Overall)
            .cloned()
            .collect();

        non_empty(ViewKind::Overall, &overall)?;
        non_empty(ViewKind::BySex, &by_sex)?;
        non_empty(ViewKind::ByEthnicity, &by_ethnicity)?;

        one_per_year(&overall)?;
        fixed_partition(ViewKind::BySex, &by_sex, |r| r.sex.label())?;
        fixed_partition(ViewKind::ByEthnicity, &by_ethnicity, |r| r.ethnicity.label())?;

        let years = by_ethnicity
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<i32>>()
            .into_iter()
            .collect();

        Ok(Self {
            overall: OverallView { records: overall },
            by_sex: BySexView { records: by_sex },
            by_ethnicity: ByEthnicityView {
                records: by_ethnicity,
                years,
            },
        })
    }
}

fn non_empty(view: ViewKind, records: &[Record]) -> Result<(), SchemaError> {
    if records.is_empty() {
        Err(SchemaError::EmptyView(view))
    } else {
        Ok(())
    }
}

fn one_per_year(records: &[Record]) -> Result<(), SchemaError> {
    let mut seen = BTreeSet::new();

    match records.iter().find(|r| !seen.insert(r.year)) {
        Some(duplicate) => Err(SchemaError::DuplicateYear {
            year: duplicate.year,
        }),
        None => Ok(()),
    }
}

fn fixed_partition<'a, F>(view: ViewKind, records: &'a [Record], category: F) -> Result<(), SchemaError>
where
    F: Fn(&'a Record) -> &'a str,
{
    let mut partitions: BTreeMap<i32, BTreeSet<&str>> = BTreeMap::new();

    for record in records {
        partitions
            .entry(record.year)
            .or_default()
            .insert(category(record));
    }

    let mut partitions = partitions.into_iter();
    let Some((_, expected)) = partitions.next() else {
        return Ok(());
    };

    match partitions.find(|(_, categories)| *categories != expected) {
        Some((year, _)) => Err(SchemaError::UnevenPartition { view, year }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, sex: &str, ethnicity: &str, population: f64) -> Record {
        Record::new(year, Sex::from(sex), Ethnicity::from(ethnicity), population)
    }

    fn sample() -> Vec<Record> {
        vec![
            record(1981, "both", "overall", 14000.0),
            record(1980, "both", "overall", 13000.0),
            record(1980, "male", "overall", 6600.0),
            record(1980, "female", "overall", 6400.0),
            record(1981, "male", "overall", 7100.0),
            record(1981, "female", "overall", 6900.0),
            record(1981, "both", "chinese", 4300.0),
            record(1981, "both", "indian", 1200.0),
            record(1980, "both", "chinese", 4200.0),
            record(1980, "both", "indian", 1100.0),
        ]
    }

    #[test]
    fn derive_disjoint_views() -> Result<(), SchemaError> {
        let views = Views::derive(&sample())?;

        assert_eq!(views.overall.records().len(), 2);
        assert_eq!(views.by_sex.records().len(), 4);
        assert_eq!(views.by_ethnicity.records().len(), 4);
        assert!(views.by_sex.records().iter().all(|r| r.sex != Sex::Both));
        assert!(
            views
                .by_ethnicity
                .records()
                .iter()
                .all(|r| r.ethnicity != Ethnicity::Overall)
        );

        Ok(())
    }

    #[test]
    fn sort_ethnicity_years() -> Result<(), SchemaError> {
        let views = Views::derive(&sample())?;

        assert_eq!(views.by_ethnicity.years(), &[1980, 1981]);

        Ok(())
    }

    #[test]
    fn reject_missing_aggregate_labels() {
        let records: Vec<Record> = sample()
            .into_iter()
            .filter(|r| r.sex != Sex::Both || r.ethnicity != Ethnicity::Overall)
            .collect();

        assert_eq!(
            Views::derive(&records).unwrap_err(),
            SchemaError::EmptyView(ViewKind::Overall)
        );
    }

    #[test]
    fn reject_empty_ethnicity_view() {
        let records: Vec<Record> = sample()
            .into_iter()
            .filter(|r| r.ethnicity == Ethnicity::Overall)
            .collect();

        assert_eq!(
            Views::derive(&records).unwrap_err(),
            SchemaError::EmptyView(ViewKind::ByEthnicity)
        );
    }

    #[test]
    fn reject_duplicate_overall_year() {
        let mut records = sample();
        records.push(record(1980, "both", "overall", 13100.0));

        assert_eq!(
            Views::derive(&records).unwrap_err(),
            SchemaError::DuplicateYear { year: 1980 }
        );
    }

    #[test]
    fn reject_uneven_partition() {
        let mut records = sample();
        records.push(record(1981, "both", "others", 300.0));

        assert_eq!(
            Views::derive(&records).unwrap_err(),
            SchemaError::UnevenPartition {
                view: ViewKind::ByEthnicity,
                year: 1981
            }
        );
    }
}
