// Personal record history keyed by exercise name
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single personal record as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: String,
    pub weight: f64,
}

/// PR history for every exercise, kept in the order the server sent it.
///
/// The key order matters: it is the order of the selector options and the
/// first key is the one rendered on startup. A JSON object with a repeated
/// key keeps the last records in the position of the first occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    entries: Vec<(String, Vec<Record>)>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, records: Vec<Record>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = records,
            None => self.entries.push((name, records)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Record]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r.as_slice())
    }

    /// Exercise names in iteration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, records) in &self.entries {
            map.serialize_entry(name, records)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DatasetVisitor;

        impl<'de> Visitor<'de> for DatasetVisitor {
            type Value = Dataset;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of exercise names to PR records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Dataset, A::Error> {
                let mut dataset = Dataset::new();
                while let Some((name, records)) = access.next_entry::<String, Vec<Record>>()? {
                    dataset.insert(name, records);
                }
                Ok(dataset)
            }
        }

        deserializer.deserialize_map(DatasetVisitor)
    }
}
