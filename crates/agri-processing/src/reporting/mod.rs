//! Charts and summary tables for the two report audiences.
//!
//! Charts are written as JSON chart specifications (`<name>.json`) that any
//! plotting front end can render; tabular summaries are written as CSV.

mod chart;
mod generator;
mod model_plot;
mod stats;

pub use chart::{ChartKind, ChartSpec, ReferenceLine};
pub use generator::{ReportGenerator, chart_names};
pub use model_plot::{actual_vs_predicted_chart, feature_importance_chart};
pub use stats::{CorrelationMatrix, correlation_matrix, describe, quantile};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who the report is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Full report including descriptive statistics.
    Analyst,
    /// Report without descriptive statistics.
    Breeder,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analyst => "analyst",
            Self::Breeder => "breeder",
        }
    }

    /// Parse free text from the prompt; anything unrecognised is `None`.
    pub fn from_input(input: &str) -> Option<Self> {
        input.trim_end_matches(['\r', '\n']).parse().ok()
    }

    pub fn includes_descriptives(&self) -> bool {
        matches!(self, Self::Analyst)
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = String;

    /// Exact, case-sensitive match on `analyst` or `breeder`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analyst" => Ok(Self::Analyst),
            "breeder" => Ok(Self::Breeder),
            other => Err(format!("Unknown user type '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_parsing_is_exact() {
        assert_eq!("analyst".parse::<Audience>(), Ok(Audience::Analyst));
        assert_eq!("breeder".parse::<Audience>(), Ok(Audience::Breeder));
        assert!("Analyst".parse::<Audience>().is_err());
        assert!(" breeder".parse::<Audience>().is_err());
        assert!("farmer".parse::<Audience>().is_err());
    }

    #[test]
    fn test_prompt_input_drops_line_ending_only() {
        assert_eq!(Audience::from_input("breeder\n"), Some(Audience::Breeder));
        assert_eq!(Audience::from_input("analyst\r\n"), Some(Audience::Analyst));
        assert_eq!(Audience::from_input("analyst \n"), None);
        assert_eq!(Audience::from_input(""), None);
    }
}
