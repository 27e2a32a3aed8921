//! URL query string encoding
//!
//! Providers describe their parameters as an ordered list of name/value
//! pairs; this module turns that list into a percent-encoded query string.
//! Entries set to [`QueryValue::None`] or the empty string are dropped, so
//! "caller never set this" and "caller set it to empty" both stay off the
//! wire. Key order is preserved as given and nothing is deduplicated.

use std::fmt::Write;

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Comma-joined in the encoded output, e.g. a viewbox `[l, t, r, b]`.
    Numbers(Vec<f64>),
    /// Unset; the pair is omitted entirely.
    None,
}

impl QueryValue {
    /// Render the value as the string that will be percent-encoded,
    /// or `None` if the pair should be dropped.
    fn render(&self) -> Option<String> {
        match self {
            QueryValue::Str(s) if s.is_empty() => None,
            QueryValue::Str(s) => Some(s.clone()),
            QueryValue::Int(n) => Some(n.to_string()),
            QueryValue::Float(f) => Some(f.to_string()),
            QueryValue::Bool(b) => Some(b.to_string()),
            QueryValue::Numbers(ns) => Some(
                ns.iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            QueryValue::None => None,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Str(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Str(s)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Int(n)
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        QueryValue::Int(n as i64)
    }
}

impl From<f64> for QueryValue {
    fn from(f: f64) -> Self {
        QueryValue::Float(f)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Bool(b)
    }
}

impl From<Vec<f64>> for QueryValue {
    fn from(ns: Vec<f64>) -> Self {
        QueryValue::Numbers(ns)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => QueryValue::None,
        }
    }
}

/// Ordered builder for query parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryPairs {
    pairs: Vec<(String, QueryValue)>,
}

impl QueryPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair; insertion order is the wire order.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> &mut Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode into `key=value&...`, skipping unset/empty entries.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.pairs {
            let Some(rendered) = value.render() else {
                continue;
            };
            if !out.is_empty() {
                out.push('&');
            }
            let _ = write!(
                out,
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&rendered)
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_in_insertion_order() {
        let mut pairs = QueryPairs::new();
        pairs
            .push("q", "cape town")
            .push("limit", 10u32)
            .push("bounded", true);
        assert_eq!(pairs.encode(), "q=cape%20town&limit=10&bounded=true");
    }

    #[test]
    fn skips_none_and_empty_strings() {
        let mut pairs = QueryPairs::new();
        pairs
            .push("a", QueryValue::None)
            .push("b", "")
            .push("c", "kept")
            .push("d", None::<&str>);
        assert_eq!(pairs.encode(), "c=kept");
    }

    #[test]
    fn joins_number_arrays_with_commas() {
        let mut pairs = QueryPairs::new();
        pairs.push("viewbox", vec![-0.5, 51.2, 0.2, 51.7]);
        assert_eq!(pairs.encode(), "viewbox=-0.5%2C51.2%2C0.2%2C51.7");
    }

    #[test]
    fn percent_encodes_keys_and_values() {
        let mut pairs = QueryPairs::new();
        pairs.push("accept-language", "de,gb").push("q", "a&b=c");
        assert_eq!(pairs.encode(), "accept-language=de%2Cgb&q=a%26b%3Dc");
    }

    #[test]
    fn does_not_deduplicate_keys() {
        let mut pairs = QueryPairs::new();
        pairs.push("k", "one").push("k", "two");
        assert_eq!(pairs.encode(), "k=one&k=two");
    }
}
