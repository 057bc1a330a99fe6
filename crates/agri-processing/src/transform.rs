//! Derived and coerced columns of the merged table.

use crate::error::{PipelineError, Result};
use crate::geo::ContinentResolver;
use crate::types::{CONTINENT, COUNTRY};
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Add a nullable `Continent` column resolved from `Country`.
///
/// Lookup failures become nulls and never abort the run. Only a missing
/// `Country` column is an error. An existing `Continent` column is replaced.
pub fn map_continent(mut df: DataFrame, resolver: &dyn ContinentResolver) -> Result<DataFrame> {
    let countries = df
        .column(COUNTRY)
        .map_err(|_| PipelineError::missing_column(COUNTRY))?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let mut cache: HashMap<&str, Option<&'static str>> = HashMap::new();
    let mut unresolved = 0usize;
    let continents: Vec<Option<&'static str>> = countries
        .str()?
        .into_iter()
        .map(|country| {
            let resolved = country.and_then(|name| {
                *cache
                    .entry(name)
                    .or_insert_with(|| resolver.resolve_continent(name).map(|c| c.display_name()))
            });
            if resolved.is_none() {
                unresolved += 1;
            }
            resolved
        })
        .collect();

    if unresolved > 0 {
        warn!(
            "{} of {} row(s) have no continent for their country",
            unresolved,
            continents.len()
        );
    }
    debug!("Resolved continents for {} distinct countries", cache.len());

    df.with_column(Series::new(CONTINENT.into(), continents))?;
    Ok(df)
}

/// Distinct countries whose `Continent` is null, sorted.
pub fn unresolved_countries(df: &DataFrame) -> Result<Vec<String>> {
    let countries = df
        .column(COUNTRY)
        .map_err(|_| PipelineError::missing_column(COUNTRY))?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let continents = df
        .column(CONTINENT)
        .map_err(|_| PipelineError::missing_column(CONTINENT))?
        .as_materialized_series()
        .clone();

    let missing: BTreeSet<String> = countries
        .str()?
        .into_iter()
        .zip(continents.str()?.into_iter())
        .filter(|(_, continent)| continent.is_none())
        .filter_map(|(country, _)| country.map(str::to_string))
        .collect();
    Ok(missing.into_iter().collect())
}

/// Replace `placeholder` with `0` in `column`, then make the column `Int64`.
///
/// Any other value that is not an integer is a conversion error naming the
/// column, the zero-based row and the offending text. Nulls are rejected the
/// same way. Float columns are accepted only where every value is whole.
pub fn replace_column_data(mut df: DataFrame, column: &str, placeholder: &str) -> Result<DataFrame> {
    let series = df
        .column(column)
        .map_err(|_| PipelineError::missing_column(column))?
        .as_materialized_series()
        .clone();

    let values = match series.dtype() {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => integers(column, &series)?,
        DataType::Float32 | DataType::Float64 => whole_floats(column, &series)?,
        _ => parse_text(column, &series.cast(&DataType::String)?, placeholder)?,
    };

    df.replace(column, Series::new(column.into(), values))?;
    Ok(df)
}

fn conversion_error(column: &str, row: usize, value: impl Into<String>) -> PipelineError {
    PipelineError::Conversion {
        column: column.to_string(),
        row,
        value: value.into(),
    }
}

fn integers(column: &str, series: &Series) -> Result<Vec<i64>> {
    let cast = series.cast(&DataType::Int64)?;
    cast.i64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.ok_or_else(|| conversion_error(column, row, "null")))
        .collect()
}

fn whole_floats(column: &str, series: &Series) -> Result<Vec<i64>> {
    let cast = series.cast(&DataType::Float64)?;
    cast.f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(x)
                if x.is_finite()
                    && x.fract() == 0.0
                    && x >= i64::MIN as f64
                    && x < i64::MAX as f64 =>
            {
                Ok(x as i64)
            }
            Some(x) => Err(conversion_error(column, row, x.to_string())),
            None => Err(conversion_error(column, row, "null")),
        })
        .collect()
}

fn parse_text(column: &str, series: &Series, placeholder: &str) -> Result<Vec<i64>> {
    let mut substituted = 0usize;
    let values = series
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(text) if text == placeholder => {
                substituted += 1;
                Ok(0)
            }
            Some(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| conversion_error(column, row, text)),
            None => Err(conversion_error(column, row, "null")),
        })
        .collect::<Result<Vec<i64>>>()?;

    debug!(
        "Replaced {} placeholder value(s) {:?} in '{}'",
        substituted, placeholder, column
    );
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Continent, CountryCatalog};
    use pretty_assertions::assert_eq;

    struct FakeResolver;

    impl ContinentResolver for FakeResolver {
        fn resolve_continent(&self, country: &str) -> Option<Continent> {
            match country {
                "Kenya" => Some(Continent::Africa),
                "Peru" => Some(Continent::SouthAmerica),
                _ => None,
            }
        }
    }

    fn continents(df: &DataFrame) -> Vec<Option<String>> {
        df.column(CONTINENT)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn test_map_continent_with_fake_resolver() {
        let df = df!(
            "Country" => [Some("Kenya"), Some("Atlantis"), None, Some("Peru")],
            "Year" => [2000i64, 2000, 2000, 2001]
        )
        .unwrap();
        let out = map_continent(df, &FakeResolver).unwrap();

        assert_eq!(out.width(), 3);
        assert_eq!(
            continents(&out),
            vec![
                Some("Africa".to_string()),
                None,
                None,
                Some("South America".to_string())
            ]
        );
        assert_eq!(unresolved_countries(&out).unwrap(), vec!["Atlantis".to_string()]);
    }

    #[test]
    fn test_map_continent_with_catalog() {
        let df = df!("Country" => ["Germany", "Atlantis", "Côte D'Ivoire"]).unwrap();
        let out = map_continent(df, &CountryCatalog::new()).unwrap();
        assert_eq!(
            continents(&out),
            vec![Some("Europe".to_string()), None, Some("Africa".to_string())]
        );
    }

    #[test]
    fn test_map_continent_requires_country() {
        let df = df!("country" => ["Kenya"]).unwrap();
        let err = map_continent(df, &FakeResolver).unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_ERROR");
    }

    #[test]
    fn test_placeholder_becomes_zero() {
        let df = df!("rain" => ["..", "1083", " 42 "]).unwrap();
        let out = replace_column_data(df, "rain", "..").unwrap();
        let values: Vec<Option<i64>> = out.column("rain").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(0), Some(1083), Some(42)]);
    }

    #[test]
    fn test_non_numeric_residue_is_conversion_error() {
        let df = df!("rain" => ["1083", "n/a", ".."]).unwrap();
        match replace_column_data(df, "rain", "..").unwrap_err() {
            PipelineError::Conversion { column, row, value } => {
                assert_eq!((column.as_str(), row, value.as_str()), ("rain", 1, "n/a"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decimal_text_is_rejected() {
        let df = df!("rain" => ["12.5"]).unwrap();
        assert!(matches!(
            replace_column_data(df, "rain", ".."),
            Err(PipelineError::Conversion { .. })
        ));
    }

    #[test]
    fn test_numeric_columns_are_coerced() {
        let df = df!("a" => [1i32, 2], "b" => [3.0f64, 4.0], "c" => [1.5f64, 2.0]).unwrap();
        let df = replace_column_data(df, "a", "..").unwrap();
        let df = replace_column_data(df, "b", "..").unwrap();
        assert_eq!(df.column("a").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("b").unwrap().i64().unwrap().get(1), Some(4));
        assert!(replace_column_data(df, "c", "..").is_err());
    }

    #[test]
    fn test_float_beyond_integer_range_is_conversion_error() {
        let df = df!("r" => [5.0f64, 1e20]).unwrap();
        match replace_column_data(df, "r", "..").unwrap_err() {
            PipelineError::Conversion { column, row, .. } => {
                assert_eq!(column, "r");
                assert_eq!(row, 1);
            }
            other => panic!("unexpected error: {other}"),
        }

        let df = df!("r" => [-1e19f64]).unwrap();
        assert_eq!(
            replace_column_data(df, "r", "..").unwrap_err().error_code(),
            "CONVERSION_ERROR"
        );
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let df = df!("rain" => [".."]).unwrap();
        let err = replace_column_data(df, "average_rain_fall (mm/year)", "..").unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_ERROR");
    }
}
