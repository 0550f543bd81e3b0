//! Pure reshaping of the filtered views into the series each chart needs.

use std::collections::BTreeSet;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

use popvis_data::record::Record;
use popvis_data::view::ByEthnicityView;
use popvis_data::view::BySexView;
use popvis_data::view::OverallView;
use serde::Serialize;

use crate::error::ReferencePointMissing;
use crate::error::UnknownYear;

/// The year the trend chart annotation is anchored at.
pub const REFERENCE_YEAR: i32 = 2020;

const COMBINED_LABEL: &str = "Combined";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub population: f64,
}

impl From<&Record> for TrendPoint {
    fn from(record: &Record) -> Self {
        Self {
            year: record.year,
            population: record.population,
        }
    }
}

/// The overall population per year and the point at [`REFERENCE_YEAR`], if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
    pub points: Vec<TrendPoint>,
    pub reference: Result<TrendPoint, ReferencePointMissing>,
}

pub fn trend_series(view: &OverallView) -> Trend {
    let mut points: Vec<TrendPoint> = view.records().iter().map(TrendPoint::from).collect();
    points.sort_by_key(|point| point.year);

    let reference = points
        .iter()
        .find(|point| point.year == REFERENCE_YEAR)
        .copied()
        .ok_or(ReferencePointMissing {
            year: REFERENCE_YEAR,
        });

    Trend { points, reference }
}

/// A bar of the sex breakdown: a single sex or the synthesized sum of all of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BarCategory {
    Sex(Arc<str>),
    Combined,
}

impl BarCategory {
    pub fn label(&self) -> &str {
        match self {
            BarCategory::Sex(label) => label,
            BarCategory::Combined => COMBINED_LABEL,
        }
    }
}

impl Display for BarCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub year: i32,
    pub category: BarCategory,
    pub population: f64,
}

/// Rows ordered by year, then by sex in first-seen order, with the
/// combined row last within each year.
#[derive(Debug, Clone, PartialEq)]
pub struct SexBreakdown {
    rows: Vec<BreakdownRow>,
}

impl SexBreakdown {
    pub fn rows(&self) -> &[BreakdownRow] {
        &self.rows
    }

    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|row| row.year).collect();
        years.dedup();
        years
    }

    pub fn year(&self, year: i32) -> impl Iterator<Item = &BreakdownRow> {
        self.rows.iter().filter(move |row| row.year == year)
    }

    pub fn combined(&self, year: i32) -> Option<f64> {
        self.year(year)
            .find(|row| row.category == BarCategory::Combined)
            .map(|row| row.population)
    }
}

/// Reshapes the by-sex view into one bar per sex plus a combined bar.
///
/// With `year` set only that year's rows are returned; otherwise every
/// year is returned for an animated presentation.
pub fn sex_breakdown(view: &BySexView, year: Option<i32>) -> Result<SexBreakdown, UnknownYear> {
    let records = view.records();

    let years: Vec<i32> = match year {
        Some(year) if records.iter().any(|r| r.year == year) => vec![year],
        Some(year) => return Err(UnknownYear { year }),
        None => distinct_years(records),
    };

    let categories = first_seen(records.iter().map(|r| r.sex.label()));
    let mut rows = Vec::with_capacity(years.len() * (categories.len() + 1));

    for year in years {
        let mut combined = 0.0;

        for category in &categories {
            let matching = records
                .iter()
                .filter(|r| r.year == year && r.sex.label() == &**category);

            let mut population = None;
            for record in matching {
                *population.get_or_insert(0.0) += record.population;
            }

            if let Some(population) = population {
                combined += population;
                rows.push(BreakdownRow {
                    year,
                    category: BarCategory::Sex(Arc::clone(category)),
                    population,
                });
            }
        }

        rows.push(BreakdownRow {
            year,
            category: BarCategory::Combined,
            population: combined,
        });
    }

    Ok(SexBreakdown { rows })
}

/// The population of each ethnicity for a single year, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EthnicityShares {
    pub year: i32,
    shares: Vec<(Arc<str>, f64)>,
}

impl EthnicityShares {
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.shares
            .iter()
            .map(|(ethnicity, population)| (&**ethnicity, *population))
    }

    pub fn get(&self, ethnicity: &str) -> Option<f64> {
        self.iter()
            .find(|(label, _)| *label == ethnicity)
            .map(|(_, population)| population)
    }

    pub fn total(&self) -> f64 {
        self.shares.iter().map(|(_, population)| population).sum()
    }

    /// The fraction of the year total held by `ethnicity`.
    pub fn share(&self, ethnicity: &str) -> Option<f64> {
        let total = self.total();

        self.get(ethnicity)
            .map(|population| if total > 0.0 { population / total } else { 0.0 })
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

pub fn ethnicity_shares(view: &ByEthnicityView, year: i32) -> Result<EthnicityShares, UnknownYear> {
    if view.years().binary_search(&year).is_err() {
        return Err(UnknownYear { year });
    }

    let mut shares: Vec<(Arc<str>, f64)> = Vec::new();

    for record in view.records().iter().filter(|r| r.year == year) {
        let label = record.ethnicity.label();

        match shares.iter_mut().find(|(ethnicity, _)| &**ethnicity == label) {
            Some((_, population)) => *population += record.population,
            None => shares.push((Arc::from(label), record.population)),
        }
    }

    Ok(EthnicityShares { year, shares })
}

fn distinct_years(records: &[Record]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<i32>>()
        .into_iter()
        .collect()
}

fn first_seen<'a, I>(labels: I) -> Vec<Arc<str>>
where
    I: Iterator<Item = &'a str>,
{
    let mut categories: Vec<Arc<str>> = Vec::new();

    for label in labels {
        if !categories.iter().any(|c| &**c == label) {
            categories.push(Arc::from(label));
        }
    }

    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use popvis_data::Dataset;
    use popvis_data::Views;
    use std::io::Cursor;

    const SOURCE: &str = "year,sex,ethnicity,population
1980,both,overall,13000000
1980,male,overall,6600000
1980,female,overall,6400000
1980,both,bumi_malay,7100000
1980,both,chinese,4300000
1980,both,indian,1100000
2020,female,overall,15500000.5
2020,both,overall,32000000
2020,male,overall,16500000.25
2020,both,bumi_malay,20000000
2020,both,chinese,7000000
2020,both,indian,2000000
2000,both,overall,23000000
2000,male,overall,11800000
2000,female,overall,11200000
2000,both,bumi_malay,13000000
2000,both,chinese,5600000
2000,both,indian,1700000
";

    fn views(source: &str) -> Views {
        Dataset::load(Cursor::new(source.to_owned()))
            .and_then(|dataset| Ok(dataset.derive_views()?))
            .unwrap()
    }

    #[test]
    fn trend_is_sorted_with_one_point_per_year() {
        let views = views(SOURCE);
        let trend = trend_series(&views.overall);

        let years: Vec<i32> = trend.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![1980, 2000, 2020]);

        for point in &trend.points {
            let record = views
                .overall
                .records()
                .iter()
                .find(|r| r.year == point.year)
                .unwrap();
            assert_eq!(point.population, record.population);
        }
    }

    #[test]
    fn trend_locates_reference_point() {
        let trend = trend_series(&views(SOURCE).overall);

        assert_eq!(
            trend.reference,
            Ok(TrendPoint {
                year: 2020,
                population: 32000000.0
            })
        );
    }

    #[test]
    fn trend_without_reference_year() {
        let source: String = SOURCE
            .lines()
            .filter(|line| !line.starts_with("2020"))
            .map(|line| format!("{line}\n"))
            .collect();

        let trend = trend_series(&views(&source).overall);

        assert_eq!(trend.points.len(), 2);
        assert_eq!(trend.reference, Err(ReferencePointMissing { year: 2020 }));
    }

    #[test]
    fn combined_equals_sum_of_sexes() -> Result<(), UnknownYear> {
        let views = views(SOURCE);

        for year in [1980, 2000, 2020] {
            let breakdown = sex_breakdown(&views.by_sex, Some(year))?;
            let sum: f64 = breakdown
                .rows()
                .iter()
                .filter(|row| row.category != BarCategory::Combined)
                .map(|row| row.population)
                .sum();

            assert_eq!(breakdown.combined(year), Some(sum));
        }

        Ok(())
    }

    #[test]
    fn multi_year_breakdown_ordering() -> Result<(), UnknownYear> {
        let breakdown = sex_breakdown(&views(SOURCE).by_sex, None)?;

        let rows: Vec<(i32, &str)> = breakdown
            .rows()
            .iter()
            .map(|row| (row.year, row.category.label()))
            .collect();

        assert_eq!(
            rows,
            vec![
                (1980, "male"),
                (1980, "female"),
                (1980, "Combined"),
                (2000, "male"),
                (2000, "female"),
                (2000, "Combined"),
                (2020, "male"),
                (2020, "female"),
                (2020, "Combined"),
            ]
        );
        assert_eq!(breakdown.years(), vec![1980, 2000, 2020]);

        Ok(())
    }

    #[test]
    fn breakdown_of_unknown_year() {
        let result = sex_breakdown(&views(SOURCE).by_sex, Some(1999));

        assert_eq!(result, Err(UnknownYear { year: 1999 }));
    }

    #[test]
    fn shares_conserve_year_total() -> Result<(), UnknownYear> {
        let views = views(SOURCE);

        for &year in views.by_ethnicity.years() {
            let shares = ethnicity_shares(&views.by_ethnicity, year)?;
            let expected: f64 = views
                .by_ethnicity
                .records()
                .iter()
                .filter(|r| r.year == year)
                .map(|r| r.population)
                .sum();

            assert_eq!(shares.total(), expected);
            assert_eq!(shares.len(), 3);
        }

        Ok(())
    }

    #[test]
    fn shares_are_idempotent() -> Result<(), UnknownYear> {
        let views = views(SOURCE);

        let first = ethnicity_shares(&views.by_ethnicity, 2000)?;
        let second = ethnicity_shares(&views.by_ethnicity, 2000)?;

        assert_eq!(first, second);
        assert_eq!(first.get("chinese"), Some(5600000.0));
        assert_eq!(first.share("indian"), Some(1700000.0 / 20300000.0));

        Ok(())
    }

    #[test]
    fn shares_of_unknown_year() {
        let views = views(SOURCE);

        assert_eq!(
            ethnicity_shares(&views.by_ethnicity, 1990),
            Err(UnknownYear { year: 1990 })
        );
    }
}
