use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

use serde::Serialize;

const BOTH_SEXES: &str = "both";
const OVERALL_ETHNICITY: &str = "overall";

/// A single row of the population table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub year: i32,
    pub sex: Sex,
    pub ethnicity: Ethnicity,
    pub population: f64,
}

impl Record {
    pub fn new(year: i32, sex: Sex, ethnicity: Ethnicity, population: f64) -> Record {
        Self {
            year,
            sex,
            ethnicity,
            population,
        }
    }
}

/// The `sex` column: either the aggregate over all sexes or a single category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "Arc<str>")]
pub enum Sex {
    Both,
    Category(Arc<str>),
}

impl Sex {
    pub fn label(&self) -> &str {
        match self {
            Sex::Both => BOTH_SEXES,
            Sex::Category(name) => name,
        }
    }
}

impl From<&str> for Sex {
    fn from(value: &str) -> Self {
        if value == BOTH_SEXES {
            Sex::Both
        } else {
            Sex::Category(Arc::from(value))
        }
    }
}

impl From<Sex> for Arc<str> {
    fn from(sex: Sex) -> Self {
        match sex {
            Sex::Both => Arc::from(BOTH_SEXES),
            Sex::Category(name) => name,
        }
    }
}

impl Display for Sex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The `ethnicity` column: either the aggregate over all groups or a single group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "Arc<str>")]
pub enum Ethnicity {
    Overall,
    Category(Arc<str>),
}

impl Ethnicity {
    pub fn label(&self) -> &str {
        match self {
            Ethnicity::Overall => OVERALL_ETHNICITY,
            Ethnicity::Category(name) => name,
        }
    }
}

impl From<&str> for Ethnicity {
    fn from(value: &str) -> Self {
        if value == OVERALL_ETHNICITY {
            Ethnicity::Overall
        } else {
            Ethnicity::Category(Arc::from(value))
        }
    }
}

impl From<Ethnicity> for Arc<str> {
    fn from(ethnicity: Ethnicity) -> Self {
        match ethnicity {
            Ethnicity::Overall => Arc::from(OVERALL_ETHNICITY),
            Ethnicity::Category(name) => name,
        }
    }
}

impl Display for Ethnicity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_aggregate_labels() {
        assert_eq!(Sex::from("both"), Sex::Both);
        assert_eq!(Ethnicity::from("overall"), Ethnicity::Overall);
    }

    #[test]
    fn keep_other_labels_verbatim() {
        assert_eq!(Sex::from("female").label(), "female");
        assert_eq!(
            Ethnicity::from("bumi_malay"),
            Ethnicity::Category(Arc::from("bumi_malay"))
        );
        assert_eq!(Sex::from("Both"), Sex::Category(Arc::from("Both")));
    }
}
