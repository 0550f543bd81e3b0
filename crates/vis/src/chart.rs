//! Rendering-agnostic chart descriptions.

use std::sync::Arc;

use serde::Serialize;

use crate::aggregate::EthnicityShares;
use crate::aggregate::SexBreakdown;
use crate::aggregate::Trend;

pub(crate) const TREND_TITLE: &str = "Population in Millions Over The Years";
pub(crate) const SEX_BREAKDOWN_TITLE: &str = "Population in Millions by Sex and Year";
pub(crate) const ETHNICITY_TITLE: &str = "Population Distribution by Ethnicity";
const REFERENCE_ANNOTATION: &str = "Population drop due to COVID-19";

/// Identifies the chart a page owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartId {
    Trend,
    SexBreakdown,
    EthnicityShares,
}

impl ChartId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartId::Trend => "trend",
            ChartId::SexBreakdown => "sex-breakdown",
            ChartId::EthnicityShares => "ethnicity-shares",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
    Bar,
    Pie,
}

/// How a series is drawn within its chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStyle {
    Markers,
    Line,
    Bars,
    Slices,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Coordinate {
    Year(i32),
    Category(Arc<str>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: Coordinate,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub style: SeriesStyle,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: i32,
    pub y: f64,
    pub text: String,
}

/// One step of an animated chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub name: String,
    pub series: Vec<Series>,
}

/// The data and display metadata of a single chart.
///
/// Holds derived values only; turning it into drawing calls is left to the
/// rendering boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub kind: ChartKind,
    pub title: String,
    pub series: Vec<Series>,
    pub annotations: Vec<Annotation>,
    pub frames: Vec<Frame>,
}

impl ChartSpec {
    /// A scatter of the yearly population with a trend line through it.
    ///
    /// The reference annotation is omitted when the reference year is missing.
    pub fn trend(trend: &Trend) -> ChartSpec {
        let points: Vec<Point> = trend
            .points
            .iter()
            .map(|p| Point {
                x: Coordinate::Year(p.year),
                y: p.population,
            })
            .collect();

        let annotations = trend
            .reference
            .iter()
            .map(|p| Annotation {
                x: p.year,
                y: p.population,
                text: String::from(REFERENCE_ANNOTATION),
            })
            .collect();

        Self {
            id: ChartId::Trend,
            kind: ChartKind::Scatter,
            title: String::from(TREND_TITLE),
            series: vec![
                Series {
                    name: String::from("population"),
                    style: SeriesStyle::Markers,
                    points: points.clone(),
                },
                Series {
                    name: String::from("Trendline"),
                    style: SeriesStyle::Line,
                    points,
                },
            ],
            annotations,
            frames: Vec::new(),
        }
    }

    /// Bars per sex and the combined bar, animated by year.
    ///
    /// The first year is shown initially; every year becomes a frame.
    pub fn sex_breakdown(breakdown: &SexBreakdown) -> ChartSpec {
        let frames: Vec<Frame> = breakdown
            .years()
            .into_iter()
            .map(|year| Frame {
                name: year.to_string(),
                series: vec![bars(breakdown, year)],
            })
            .collect();

        let series = frames
            .first()
            .map(|frame| frame.series.clone())
            .unwrap_or_default();

        Self {
            id: ChartId::SexBreakdown,
            kind: ChartKind::Bar,
            title: String::from(SEX_BREAKDOWN_TITLE),
            series,
            annotations: Vec::new(),
            frames,
        }
    }

    /// A pie of the ethnicity shares of a single year.
    pub fn ethnicity_shares(shares: &EthnicityShares) -> ChartSpec {
        let points = shares
            .iter()
            .map(|(ethnicity, population)| Point {
                x: Coordinate::Category(Arc::from(ethnicity)),
                y: population,
            })
            .collect();

        Self {
            id: ChartId::EthnicityShares,
            kind: ChartKind::Pie,
            title: format!("{ETHNICITY_TITLE} in {year}", year = shares.year),
            series: vec![Series {
                name: shares.year.to_string(),
                style: SeriesStyle::Slices,
                points,
            }],
            annotations: Vec::new(),
            frames: Vec::new(),
        }
    }
}

fn bars(breakdown: &SexBreakdown, year: i32) -> Series {
    let points = breakdown
        .year(year)
        .map(|row| Point {
            x: Coordinate::Category(Arc::from(row.category.label())),
            y: row.population,
        })
        .collect();

    Series {
        name: String::from("population"),
        style: SeriesStyle::Bars,
        points,
    }
}
