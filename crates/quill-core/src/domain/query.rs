//! Listing queries, passed through to the platform unchanged.

use std::fmt;

use serde_json::{Value, json};

use super::PostStatus;

/// A single filter, sort or window expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Equal { attribute: String, values: Vec<Value> },
    NotEqual { attribute: String, values: Vec<Value> },
    Search { attribute: String, term: String },
    OrderAsc(String),
    OrderDesc(String),
    Limit(u32),
    Offset(u32),
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equal {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    pub fn not_equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::NotEqual {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    pub fn search(attribute: impl Into<String>, term: impl Into<String>) -> Self {
        Self::Search {
            attribute: attribute.into(),
            term: term.into(),
        }
    }

    pub fn order_asc(attribute: impl Into<String>) -> Self {
        Self::OrderAsc(attribute.into())
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Self::OrderDesc(attribute.into())
    }

    pub fn limit(n: u32) -> Self {
        Self::Limit(n)
    }

    pub fn offset(n: u32) -> Self {
        Self::Offset(n)
    }

    /// Default listing filter: posts whose status is `active`.
    /// Built fresh on every call so callers can never share or mutate it.
    pub fn active_posts() -> Vec<Query> {
        vec![Self::equal("status", PostStatus::Active.as_str())]
    }

    pub fn method(&self) -> &'static str {
        match self {
            Self::Equal { .. } => "equal",
            Self::NotEqual { .. } => "notEqual",
            Self::Search { .. } => "search",
            Self::OrderAsc(_) => "orderAsc",
            Self::OrderDesc(_) => "orderDesc",
            Self::Limit(_) => "limit",
            Self::Offset(_) => "offset",
        }
    }

    /// JSON form understood by the platform's `queries[]` parameter.
    pub fn to_value(&self) -> Value {
        let method = self.method();
        match self {
            Self::Equal { attribute, values } | Self::NotEqual { attribute, values } => {
                json!({ "method": method, "attribute": attribute, "values": values })
            }
            Self::Search { attribute, term } => {
                json!({ "method": method, "attribute": attribute, "values": [term] })
            }
            Self::OrderAsc(attribute) | Self::OrderDesc(attribute) => {
                json!({ "method": method, "attribute": attribute })
            }
            Self::Limit(n) | Self::Offset(n) => json!({ "method": method, "values": [n] }),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_single_active_equal() {
        let queries = Query::active_posts();
        assert_eq!(queries, vec![Query::equal("status", "active")]);
    }

    #[test]
    fn test_equal_renders_platform_json() {
        let rendered = Query::equal("status", "active").to_value();
        assert_eq!(
            rendered,
            json!({ "method": "equal", "attribute": "status", "values": ["active"] })
        );
    }

    #[test]
    fn test_window_and_order_render() {
        assert_eq!(
            Query::limit(25).to_value(),
            json!({ "method": "limit", "values": [25] })
        );
        assert_eq!(
            Query::order_desc("$createdAt").to_value(),
            json!({ "method": "orderDesc", "attribute": "$createdAt" })
        );
    }
}
