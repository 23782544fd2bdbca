//! Sort field and direction.

use serde::{Deserialize, Serialize};

/// Sort direction as spelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order.
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    /// Descending order.
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    /// Wire spelling (`ASC` or `DESC`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{other}', expected ASC or DESC")),
        }
    }
}

/// Sort specification sent as the JSON pair `[field, order]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    /// Field to order by.
    pub field: String,
    /// Direction of the ordering.
    pub order: SortOrder,
}

impl Sort {
    /// Build a sort specification.
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// JSON text of the `sort` query parameter, e.g. `["id","ASC"]`.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::json!([self.field, self.order.as_str()]).to_string()
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::new("id", SortOrder::Asc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_sorts_by_id_ascending() {
        assert_eq!(Sort::default().to_json(), r#"["id","ASC"]"#);
    }

    #[rstest]
    fn field_names_are_json_escaped() {
        let sort = Sort::new("name\"x", SortOrder::Desc);
        assert_eq!(sort.to_json(), r#"["name\"x","DESC"]"#);
    }

    #[rstest]
    #[case("asc", SortOrder::Asc)]
    #[case(" DESC ", SortOrder::Desc)]
    fn parses_case_insensitively(#[case] raw: &str, #[case] expected: SortOrder) {
        assert_eq!(raw.parse::<SortOrder>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_orders() {
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
