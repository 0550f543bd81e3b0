//! The static table mapping each route to its chart and controls.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

use popvis_data::Views;
use serde::Serialize;

use crate::aggregate;
use crate::chart::ChartId;
use crate::chart::ChartKind;
use crate::chart::ChartSpec;
use crate::chart::ETHNICITY_TITLE;
use crate::chart::SEX_BREAKDOWN_TITLE;
use crate::chart::TREND_TITLE;
use crate::error::UnknownYear;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteKey {
    Home,
    BySex,
    ByEthnicity,
}

impl RouteKey {
    pub const DEFAULT: RouteKey = RouteKey::Home;

    pub fn parse(key: &str) -> Option<RouteKey> {
        PAGES
            .iter()
            .find(|page| page.key == key || page.path == key)
            .map(|page| page.route)
    }

    pub fn page(&self) -> &'static Page {
        match self {
            RouteKey::Home => &PAGES[0],
            RouteKey::BySex => &PAGES[1],
            RouteKey::ByEthnicity => &PAGES[2],
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.page().key
    }
}

impl Display for RouteKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static metadata of a dashboard page.
#[derive(Debug)]
pub struct Page {
    pub route: RouteKey,
    pub key: &'static str,
    pub path: &'static str,
    pub nav_label: &'static str,
    pub file_name: &'static str,
    pub chart: ChartId,
    pub kind: ChartKind,
    pub title: &'static str,
    pub controls: &'static [ControlId],
}

pub static PAGES: [Page; 3] = [
    Page {
        route: RouteKey::Home,
        key: "home",
        path: "/",
        nav_label: "Home Page",
        file_name: "index.html",
        chart: ChartId::Trend,
        kind: ChartKind::Scatter,
        title: TREND_TITLE,
        controls: &[],
    },
    Page {
        route: RouteKey::BySex,
        key: "by-sex",
        path: "/page-1",
        nav_label: "By Sex",
        file_name: "by-sex.html",
        chart: ChartId::SexBreakdown,
        kind: ChartKind::Bar,
        title: SEX_BREAKDOWN_TITLE,
        controls: &[],
    },
    Page {
        route: RouteKey::ByEthnicity,
        key: "by-ethnicity",
        path: "/page-2",
        nav_label: "By Ethnicity",
        file_name: "by-ethnicity.html",
        chart: ChartId::EthnicityShares,
        kind: ChartKind::Pie,
        title: ETHNICITY_TITLE,
        controls: &[ControlId::YearSlider],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlId {
    YearSlider,
}

impl ControlId {
    pub fn parse(id: &str) -> Option<ControlId> {
        match id {
            "year-slider" => Some(ControlId::YearSlider),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlId::YearSlider => "year-slider",
        }
    }
}

impl Display for ControlId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Slider,
}

/// A secondary input a page exposes, with its valid values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
    pub id: ControlId,
    pub kind: ControlKind,
    pub domain: Vec<i32>,
    pub default: i32,
}

impl Control {
    pub fn accepts(&self, value: i32) -> bool {
        self.domain.contains(&value)
    }
}

/// The current values of a page's controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ControlValues {
    pub year: Option<i32>,
}

impl ControlValues {
    pub fn set(&mut self, id: ControlId, value: i32) {
        match id {
            ControlId::YearSlider => self.year = Some(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Page(RouteKey),
    NotFound,
}

/// Resolves route keys to pages and produces each page's chart.
#[derive(Debug, Clone)]
pub struct ViewResolver {
    views: Arc<Views>,
}

impl ViewResolver {
    pub fn new(views: Arc<Views>) -> ViewResolver {
        Self { views }
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    /// Unknown keys resolve to [`Resolution::NotFound`].
    pub fn resolve(&self, key: &str) -> Resolution {
        RouteKey::parse(key).map_or(Resolution::NotFound, Resolution::Page)
    }

    pub fn controls(&self, route: RouteKey) -> Vec<Control> {
        route
            .page()
            .controls
            .iter()
            .filter_map(|&id| self.control(id))
            .collect()
    }

    fn control(&self, id: ControlId) -> Option<Control> {
        match id {
            ControlId::YearSlider => {
                let domain = self.views.by_ethnicity.years().to_vec();
                let default = *domain.first()?;

                Some(Control {
                    id,
                    kind: ControlKind::Slider,
                    domain,
                    default,
                })
            }
        }
    }

    pub fn defaults(&self, route: RouteKey) -> ControlValues {
        let mut values = ControlValues::default();

        for control in self.controls(route) {
            values.set(control.id, control.default);
        }

        values
    }

    /// Runs the page's aggregation and builds its chart.
    pub fn chart(&self, route: RouteKey, values: &ControlValues) -> Result<ChartSpec, UnknownYear> {
        match route {
            RouteKey::Home => {
                let trend = aggregate::trend_series(&self.views.overall);
                Ok(ChartSpec::trend(&trend))
            }
            RouteKey::BySex => {
                let breakdown = aggregate::sex_breakdown(&self.views.by_sex, None)?;
                Ok(ChartSpec::sex_breakdown(&breakdown))
            }
            RouteKey::ByEthnicity => {
                let year = match values.year {
                    Some(year) => year,
                    None => self.defaults(route).year.unwrap_or_default(),
                };
                let shares = aggregate::ethnicity_shares(&self.views.by_ethnicity, year)?;
                Ok(ChartSpec::ethnicity_shares(&shares))
            }
        }
    }
}
