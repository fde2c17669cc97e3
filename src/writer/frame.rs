//! Builds one polars `DataFrame` out of a [`WeatherBatch`].
//!
//! The table's columns are the union of every record's fields in first-seen
//! order. Each column gets one type reconciled across all records:
//!
//! | values seen (nulls ignored) | column type |
//! |---|---|
//! | only booleans | `Boolean` |
//! | only integers | `Int64` |
//! | integers and floats | `Float64` |
//! | anything else, or only nulls | `String` |
//!
//! Records without a field contribute a null to that column.

use crate::types::batch::WeatherBatch;
use crate::types::record::COUNTRY_CODE_FIELD;
use crate::writer::error::WriteError;
use polars::prelude::*;
use serde_json::Value;

/// Derived column flagging UK observations with 1, everything else with 0.
pub const IF_UK_COLUMN: &str = "ifUK";

const UK_COUNTRY_CODE: &str = "GB";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Null,
    Boolean,
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => ColumnKind::Null,
            Value::Bool(_) => ColumnKind::Boolean,
            Value::Number(n) if n.as_i64().is_some() => ColumnKind::Integer,
            Value::Number(_) => ColumnKind::Float,
            _ => ColumnKind::Text,
        }
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (ColumnKind::Null, kind) | (kind, ColumnKind::Null) => kind,
            (a, b) if a == b => a,
            (ColumnKind::Integer, ColumnKind::Float) | (ColumnKind::Float, ColumnKind::Integer) => {
                ColumnKind::Float
            }
            _ => ColumnKind::Text,
        }
    }
}

/// Builds the table for `batch` and appends the [`IF_UK_COLUMN`] column.
pub fn batch_to_frame(batch: &WeatherBatch) -> Result<DataFrame, WriteError> {
    let columns = batch
        .column_names()
        .into_iter()
        .map(|name| build_column(batch, name))
        .collect::<Vec<_>>();

    let df = DataFrame::new(columns).map_err(|source| WriteError::FrameBuild {
        records: batch.len(),
        source,
    })?;

    with_if_uk(df)
}

fn build_column(batch: &WeatherBatch, name: &str) -> Column {
    let values: Vec<Option<&Value>> = batch
        .iter()
        .map(|record| record.get(name).filter(|v| !v.is_null()))
        .collect();

    let kind = values
        .iter()
        .flatten()
        .fold(ColumnKind::Null, |kind, v| kind.merge(ColumnKind::of(v)));

    let series = match kind {
        ColumnKind::Boolean => Series::new(
            name.into(),
            values
                .iter()
                .map(|v| v.and_then(Value::as_bool))
                .collect::<Vec<_>>(),
        ),
        ColumnKind::Integer => Series::new(
            name.into(),
            values
                .iter()
                .map(|v| v.and_then(Value::as_i64))
                .collect::<Vec<_>>(),
        ),
        ColumnKind::Float => Series::new(
            name.into(),
            values
                .iter()
                .map(|v| v.and_then(Value::as_f64))
                .collect::<Vec<_>>(),
        ),
        ColumnKind::Null | ColumnKind::Text => Series::new(
            name.into(),
            values
                .iter()
                .map(|v| v.map(value_as_text))
                .collect::<Vec<_>>(),
        ),
    };

    Column::from(series)
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Appends `ifUK`: 1 where the country code is exactly "GB", else 0.
///
/// Null and absent country codes count as "not GB", as does a batch where no
/// record reported a country at all.
pub fn with_if_uk(df: DataFrame) -> Result<DataFrame, WriteError> {
    let flag = if df.get_column_index(COUNTRY_CODE_FIELD).is_some() {
        when(
            col(COUNTRY_CODE_FIELD)
                .cast(DataType::String)
                .eq(lit(UK_COUNTRY_CODE))
                .fill_null(lit(false)),
        )
        .then(lit(1i64))
        .otherwise(lit(0i64))
    } else {
        lit(0i64)
    };

    df.lazy()
        .with_column(flag.alias(IF_UK_COLUMN))
        .collect()
        .map_err(|source| WriteError::DeriveColumn {
            column: IF_UK_COLUMN,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::CityWeatherRecord;
    use serde_json::json;

    fn batch(rows: Vec<(&str, Value)>) -> WeatherBatch {
        rows.into_iter()
            .map(|(city, body)| match body {
                Value::Object(map) => CityWeatherRecord::new(city, map),
                _ => panic!("test fixture must be an object"),
            })
            .collect()
    }

    fn if_uk(df: &DataFrame) -> Vec<Option<i64>> {
        df.column(IF_UK_COLUMN)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn one_row_per_record_with_union_columns() {
        let df = batch_to_frame(&batch(vec![
            ("London", json!({"main_temp": 11.6, "sys_country": "GB"})),
            ("Lima", json!({"main_temp": 19.2, "rain_1h": 0.4, "sys_country": "PE"})),
        ]))
        .unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names(),
            ["main_temp", "sys_country", "city", "rain_1h", "ifUK"]
        );
        assert_eq!(df.column("rain_1h").unwrap().null_count(), 1);
        let cities: Vec<Option<&str>> = df.column("city").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(cities, [Some("London"), Some("Lima")]);
    }

    #[test]
    fn if_uk_is_one_only_for_exact_gb() {
        let df = batch_to_frame(&batch(vec![
            ("London", json!({"sys_country": "GB"})),
            ("Paris", json!({"sys_country": "FR"})),
            ("Edinburgh", json!({"sys_country": "gb"})),
            ("Nowhere", json!({"sys_country": null})),
            ("Atlantis", json!({})),
        ]))
        .unwrap();

        assert_eq!(if_uk(&df), [Some(1), Some(0), Some(0), Some(0), Some(0)]);
    }

    #[test]
    fn if_uk_is_zero_when_no_record_has_a_country() {
        let df = batch_to_frame(&batch(vec![
            ("Tokyo", json!({"main_temp": 20})),
            ("Seoul", json!({"main_temp": 18})),
        ]))
        .unwrap();

        assert_eq!(if_uk(&df), [Some(0), Some(0)]);
    }

    #[test]
    fn column_types_are_reconciled() {
        let df = batch_to_frame(&batch(vec![
            ("A", json!({"ints": 1, "mixed_num": 1, "flag": true, "mixed": 5, "empty": null})),
            ("B", json!({"ints": 2, "mixed_num": 2.5, "flag": false, "mixed": "five", "empty": null})),
        ]))
        .unwrap();

        assert_eq!(df.column("ints").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("mixed_num").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("flag").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("mixed").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("empty").unwrap().dtype(), &DataType::String);

        let mixed: Vec<Option<&str>> = df.column("mixed").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(mixed, [Some("5"), Some("five")]);
        let floats: Vec<Option<f64>> = df.column("mixed_num").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(floats, [Some(1.0), Some(2.5)]);
    }

    #[test]
    fn merge_rules() {
        use ColumnKind as K;
        assert_eq!(K::Null.merge(K::Integer), K::Integer);
        assert_eq!(K::Float.merge(K::Null), K::Float);
        assert_eq!(K::Integer.merge(K::Float), K::Float);
        assert_eq!(K::Boolean.merge(K::Integer), K::Text);
        assert_eq!(K::Text.merge(K::Float), K::Text);
    }
}
