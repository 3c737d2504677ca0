// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A single register reading taken in a single environment.

/// Ordered `(field, value)` pairs, both already formatted for display.
///
/// The order is the order in which the fields were authored and is what
/// drives the row order of a register's table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the value of the first entry called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (n, v) in iter {
            fields.push(n, v);
        }
        fields
    }
}

/// One register as seen by one environment.
///
/// `fields` never contains the register's own name; the environment label is
/// attached to the observation, not stored among its fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    environment: String,
    register_name: String,
    fields: Fields,
}

impl Observation {
    pub fn new(
        environment: impl Into<String>,
        register_name: impl Into<String>,
        fields: Fields,
    ) -> Self {
        Self { environment: environment.into(), register_name: register_name.into(), fields }
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn register_name(&self) -> &str {
        &self.register_name
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_authored_order() {
        let fields: Fields = [("bits", "0x0"), ("m", "1"), ("a", "0")].into_iter().collect();
        assert_eq!(fields.names().collect::<Vec<_>>(), ["bits", "m", "a"]);
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_fields_get_returns_first_match() {
        let mut fields = Fields::new();
        fields.push("m", "1");
        fields.push("m", "2");
        assert_eq!(fields.get("m"), Some("1"));
        assert_eq!(fields.get("c"), None);
        assert!(!fields.contains("c"));
    }
}
