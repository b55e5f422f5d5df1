//! The host page's search form as seen by the overlay.
//!
//! The host owns the real input elements; the overlay keeps an ordered copy of
//! their `(name, value)` pairs so requests can be built from them and the query
//! field can be cleared when the popup closes.

use serde::{Deserialize, Serialize};

/// Name of the form field that carries the page size.
pub const MAXIMUM_RECORDS_FIELD: &str = "maximumRecords";

/// Name of the form field whose value selects the search scope.
pub const RESOURCE_FIELD: &str = "resource";

/// One input of the host form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered snapshot of the host form's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostForm {
    /// Inputs in document order.
    pub fields: Vec<FormField>,

    /// Name of the input holding the query text.
    pub query_field: String,
}

impl HostForm {
    /// Creates a form with the given query field name and no inputs.
    #[must_use]
    pub fn new(query_field: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            query_field: query_field.into(),
        }
    }

    /// Appends an input, builder style.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FormField::new(name, value));
        self
    }

    /// Value of the first input named `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Sets the first input named `name`, appending it when absent.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(FormField::new(name, value)),
        }
    }

    /// Current query text; empty when the query input is missing.
    #[must_use]
    pub fn query(&self) -> &str {
        self.value(&self.query_field).unwrap_or_default()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let name = self.query_field.clone();
        self.set_value(&name, query);
    }

    /// Page size from the `maximumRecords` input, if present and positive.
    #[must_use]
    pub fn maximum_records(&self) -> Option<u64> {
        self.value(MAXIMUM_RECORDS_FIELD)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|size| *size > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_round_trips_through_named_field() {
        let mut form = HostForm::new("query").with_field("query", "rust");
        assert_eq!(form.query(), "rust");
        form.set_query("");
        assert_eq!(form.query(), "");
        assert_eq!(form.fields.len(), 1);
    }

    #[test]
    fn missing_query_field_is_created_on_write() {
        let mut form = HostForm::new("q");
        assert_eq!(form.query(), "");
        form.set_query("yacy");
        assert_eq!(form.fields, vec![FormField::new("q", "yacy")]);
    }

    #[test]
    fn maximum_records_requires_a_positive_number() {
        let form = HostForm::new("query").with_field(MAXIMUM_RECORDS_FIELD, " 25 ");
        assert_eq!(form.maximum_records(), Some(25));

        let zero = HostForm::new("query").with_field(MAXIMUM_RECORDS_FIELD, "0");
        assert_eq!(zero.maximum_records(), None);

        let junk = HostForm::new("query").with_field(MAXIMUM_RECORDS_FIELD, "ten");
        assert_eq!(junk.maximum_records(), None);
    }
}
