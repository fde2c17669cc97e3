use crate::types::record::CityWeatherRecord;

/// All records collected during one run, in the order the cities were requested.
///
/// A batch is turned into a single table when written, so its schema is the
/// union of every record's fields (see [`WeatherBatch::column_names`]). Records
/// that lack a field simply contribute a null for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherBatch {
    records: Vec<CityWeatherRecord>,
}

impl WeatherBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CityWeatherRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[CityWeatherRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CityWeatherRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cities that made it into the batch, in order.
    pub fn cities(&self) -> Vec<&str> {
        self.records.iter().map(CityWeatherRecord::city).collect()
    }

    /// Union of all field names, ordered by first appearance across the batch.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            for name in record.field_names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

impl FromIterator<CityWeatherRecord> for WeatherBatch {
    fn from_iter<I: IntoIterator<Item = CityWeatherRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a WeatherBatch {
    type Item = &'a CityWeatherRecord;
    type IntoIter = std::slice::Iter<'a, CityWeatherRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
