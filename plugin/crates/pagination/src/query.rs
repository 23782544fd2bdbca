//! Query-string encoding for list and ad hoc GET requests.

use serde_json::{Map, Value};
use url::Url;

use crate::{ItemRange, Sort};

/// The three JSON-encoded query parameters of a list request.
///
/// # Examples
/// ```
/// use pagination::{ItemRange, ListQueryParams, Pagination, Sort};
/// use serde_json::Map;
///
/// let range = ItemRange::from_pagination(Pagination::default())?;
/// let params = ListQueryParams::new(&Sort::default(), range, &Map::new());
/// assert_eq!(params.range, "[0,9]");
/// assert_eq!(params.filter, "{}");
/// # Ok::<(), pagination::PaginationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQueryParams {
    /// JSON object of filter criteria.
    pub filter: String,
    /// JSON pair `[start, end]`.
    pub range: String,
    /// JSON pair `[field, order]`.
    pub sort: String,
}

impl ListQueryParams {
    /// Encode the sort, range, and filter values as JSON strings.
    #[must_use]
    pub fn new(sort: &Sort, range: ItemRange, filter: &Map<String, Value>) -> Self {
        Self {
            filter: Value::Object(filter.clone()).to_string(),
            range: range.to_json(),
            sort: sort.to_json(),
        }
    }

    /// Query pairs in key order.
    #[must_use]
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("filter", self.filter.as_str()),
            ("range", self.range.as_str()),
            ("sort", self.sort.as_str()),
        ]
    }

    /// Append the pairs to `url`, keeping any query already present.
    pub fn apply(&self, url: &mut Url) {
        url.query_pairs_mut().extend_pairs(self.pairs());
    }
}

/// Append an arbitrary JSON mapping to `url` as query parameters.
///
/// Keys are emitted in sorted order. Strings are written raw, numbers and
/// booleans as their text, arrays as one pair per element, `null` as a bare
/// key, and nested objects as their JSON text. An empty mapping leaves the URL
/// untouched.
///
/// # Examples
/// ```
/// use pagination::append_query;
/// use serde_json::json;
/// use url::Url;
///
/// let mut url = Url::parse("https://ik.example/api/templates")?;
/// let params = json!({"status": "ready", "ids": [1, 2]});
/// append_query(&mut url, params.as_object().expect("object"));
/// assert_eq!(url.query(), Some("ids=1&ids=2&status=ready"));
/// # Ok::<(), url::ParseError>(())
/// ```
pub fn append_query(url: &mut Url, params: &Map<String, Value>) {
    if params.is_empty() {
        return;
    }
    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort();

    let mut pairs = url.query_pairs_mut();
    for key in keys {
        let Some(value) = params.get(key) else {
            continue;
        };
        match value {
            Value::Null => {
                pairs.append_key_only(key);
            }
            Value::Array(items) => {
                for item in items {
                    match scalar_text(item) {
                        Some(text) => pairs.append_pair(key, &text),
                        None => pairs.append_key_only(key),
                    };
                }
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    pairs.append_pair(key, &text);
                }
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}
