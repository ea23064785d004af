//! Request building blocks for entity queries.

use serde::Serialize;
use serde_json::Value;

/// A single `(field, relation, value)` filter triple.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    pub field: String,
    pub relation: String,
    pub value: Value,
}

impl FilterExpression {
    pub fn new(field: impl Into<String>, relation: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            relation: relation.into(),
            value: value.into(),
        }
    }
}

/// A conjunction of filter expressions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub expressions: Vec<FilterExpression>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expression, builder style.
    pub fn with(mut self, field: impl Into<String>, relation: impl Into<String>, value: impl Into<Value>) -> Self {
        self.expressions
            .push(FilterExpression::new(field, relation, value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Array-of-arrays form expected by the `_search` endpoint.
    pub fn serialize(&self) -> Vec<Value> {
        self.expressions
            .iter()
            .map(|f| {
                Value::Array(vec![
                    Value::String(f.field.clone()),
                    Value::String(f.relation.clone()),
                    f.value.clone(),
                ])
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortParam {
    pub field: String,
    pub direction: SortDirection,
}

impl SortParam {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Serialize sort parameters as a comma-joined list, descending fields prefixed with `-`.
pub fn serialize_sort(params: &[SortParam]) -> String {
    params
        .iter()
        .map(|p| match p.direction {
            SortDirection::Ascending => p.field.clone(),
            SortDirection::Descending => format!("-{}", p.field),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Page selection for search requests. Zero values are omitted on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageParam {
    #[serde(skip_serializing_if = "is_zero")]
    pub size: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub number: u32,
}

impl PageParam {
    pub fn new(size: u32, number: u32) -> Self {
        Self { size, number }
    }
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Body of a `POST /entity/{type}/_search` request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchRequest {
    pub filters: Vec<Value>,
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageParam>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sort: String,
}

impl SearchRequest {
    pub fn new(filters: &Filters, fields: &[&str], page: Option<PageParam>, sort: &[SortParam]) -> Self {
        Self {
            filters: filters.serialize(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            page,
            sort: serialize_sort(sort),
        }
    }
}
