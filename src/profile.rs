use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fields every fresh profile starts with. Mirrors the scaffold users see
/// before they customize anything.
pub const DEFAULT_FIELDS: [&str; 10] = [
    "Full Name",
    "Email",
    "Phone",
    "Street Address",
    "City",
    "State",
    "Zip Code",
    "Country",
    "LinkedIn URL",
    "Portfolio URL",
];

/// The user's reusable personal-data mapping: field label -> value.
///
/// Insertion order is preserved because it is the display order in any
/// settings surface; it carries no other meaning. Serializes as a plain
/// JSON/YAML object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    entries: Vec<(String, String)>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// A profile seeded with the default field labels, all empty.
    pub fn scaffold() -> Self {
        Self {
            entries: DEFAULT_FIELDS
                .iter()
                .map(|k| (k.to_string(), String::new()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or overwrite a field, preserving position on overwrite.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != key);
        self.entries.len() != before
    }

    /// Side channel for the "save captured value" flow: keys by the captured
    /// control's label, falling back to a generic name when none was found.
    pub fn save_captured(&mut self, label: Option<&str>, value: &str) {
        let key = match label {
            Some(l) if !l.is_empty() => l,
            _ => "New Field",
        };
        self.set(key, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Profile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Profile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProfileVisitor;

        impl<'de> Visitor<'de> for ProfileVisitor {
            type Value = Profile;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field labels to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Profile, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    entries.push((k, v));
                }
                Ok(Profile { entries })
            }
        }

        deserializer.deserialize_map(ProfileVisitor)
    }
}

impl FromIterator<(String, String)> for Profile {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
