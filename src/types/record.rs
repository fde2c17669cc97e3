//! The flattened, per-city row produced by the collector.

use serde_json::{Map, Value};

/// Name of the field holding the city the record was requested for.
pub const CITY_FIELD: &str = "city";

/// Flattened field holding the ISO country code reported by the weather API.
pub const COUNTRY_CODE_FIELD: &str = "sys_country";

/// One flattened weather observation for a single requested city.
///
/// Field values are always JSON scalars (null, bool, number or string); nested
/// objects have already been flattened into `parent_child` keys and arrays
/// carried as their JSON text. The `city` field is always the last one set and
/// holds the city name as it was requested, not as the API spelled it.
///
/// Records are immutable once built; the writer only reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct CityWeatherRecord {
    fields: Map<String, Value>,
}

impl CityWeatherRecord {
    /// Builds a record from already-flattened fields, appending the `city` field.
    ///
    /// A `city` key already present in `fields` is overwritten with `city`.
    pub fn new(city: &str, mut fields: Map<String, Value>) -> Self {
        fields.insert(CITY_FIELD.to_string(), Value::String(city.to_string()));
        Self { fields }
    }

    /// The city name this record was requested for.
    pub fn city(&self) -> &str {
        self.fields
            .get(CITY_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
