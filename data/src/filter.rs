use dcg_error::Result;
use itertools::Itertools;

use crate::{configuration_error, value::Value};

/// A node of a filter tree. Composite nodes join their children, leaves
/// compare one property against bound values.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Equal { property: String, value: Value },
    GreaterThan { property: String, value: Value },
    LessThan { property: String, value: Value },
    In { property: String, values: Vec<Value> },
    Like { property: String, value: Value },
}

impl Filter {
    pub fn equal<V: Into<Value>>(property: &str, value: V) -> Self {
        Self::Equal {
            property: property.to_owned(),
            value: value.into(),
        }
    }

    pub fn greater_than<V: Into<Value>>(property: &str, value: V) -> Self {
        Self::GreaterThan {
            property: property.to_owned(),
            value: value.into(),
        }
    }

    pub fn less_than<V: Into<Value>>(property: &str, value: V) -> Self {
        Self::LessThan {
            property: property.to_owned(),
            value: value.into(),
        }
    }

    pub fn in_values(property: &str, values: Vec<Value>) -> Self {
        Self::In {
            property: property.to_owned(),
            values,
        }
    }

    pub fn like<V: Into<Value>>(property: &str, value: V) -> Self {
        Self::Like {
            property: property.to_owned(),
            value: value.into(),
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::And(_) => "AND",
            Self::Or(_) => "OR",
            Self::Equal { .. } => "=",
            Self::GreaterThan { .. } => ">",
            Self::LessThan { .. } => "<",
            Self::In { .. } => "IN",
            Self::Like { .. } => "LIKE",
        }
    }

    /// Reads one node of the wire form:
    /// `{"operation": "AND", "children": [...]}`,
    /// `{"operation": "=", "property": "age", "value": 30}`,
    /// `{"operation": "IN", "property": "id", "values": [1, 2]}`.
    pub fn from_json(node: &serde_json::Value) -> Result<Self> {
        let object = node
            .as_object()
            .ok_or_else(|| configuration_error(format!("Error processing sub filter: {node}")))?;
        let operation = object
            .get("operation")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| configuration_error(format!("Error processing sub filter: {node}")))?;

        match operation {
            "AND" | "OR" => {
                let children = match object.get("childs") {
                    Some(childs) => {
                        dcg_log::deprecated(
                            "filter key 'childs' is deprecated, use 'children' instead",
                        );
                        Some(childs)
                    }
                    None => object.get("children"),
                };
                let children = match children {
                    None | Some(serde_json::Value::Null) => Vec::new(),
                    Some(serde_json::Value::Array(children)) => children
                        .iter()
                        .map(Self::from_json)
                        .collect::<Result<Vec<_>>>()?,
                    Some(_) => {
                        return Err(configuration_error(format!(
                            "Error processing sub filter: {node}"
                        )))
                    }
                };
                if operation == "AND" {
                    Ok(Self::And(children))
                } else {
                    Ok(Self::Or(children))
                }
            }
            "=" | ">" | "<" | "LIKE" => {
                let property = Self::property_of(node, object)?;
                let value = object
                    .get("value")
                    .map(Value::from_serde_json)
                    .unwrap_or(Value::Null);
                Ok(match operation {
                    "=" => Self::Equal { property, value },
                    ">" => Self::GreaterThan { property, value },
                    "<" => Self::LessThan { property, value },
                    _ => Self::Like { property, value },
                })
            }
            "IN" => {
                let property = Self::property_of(node, object)?;
                let values = object
                    .get("values")
                    .and_then(serde_json::Value::as_array)
                    .ok_or_else(|| {
                        configuration_error(format!("Error processing sub filter: {node}"))
                    })?
                    .iter()
                    .map(Value::from_serde_json)
                    .collect();
                Ok(Self::In { property, values })
            }
            _ => Err(configuration_error(format!(
                "Error processing filter array {node}"
            ))),
        }
    }

    fn property_of(
        node: &serde_json::Value,
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<String> {
        object
            .get("property")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| configuration_error(format!("Error processing sub filter: {node}")))
    }

    /// Renders the node as a WHERE fragment and appends its bound values to
    /// `params` in placeholder order. Properties are emitted verbatim.
    pub fn compile(&self, params: &mut Vec<Value>) -> String {
        match self {
            Self::And(children) => compile_group("AND", children, params),
            Self::Or(children) => compile_group("OR", children, params),
            Self::Equal { property, value }
            | Self::GreaterThan { property, value }
            | Self::LessThan { property, value } => {
                params.push(value.clone());
                format!("({property} {} ?)", self.operation())
            }
            Self::In { property, values } => {
                params.extend(values.iter().cloned());
                format!("({property} IN ({}))", values.iter().map(|_| "?").join(","))
            }
            Self::Like { property, value } => {
                params.push(like_pattern(value));
                format!("({property} LIKE ?)")
            }
        }
    }
}

/// Translates the editor wildcards `*` and `?` into `%` and `_`.
fn like_pattern(value: &Value) -> Value {
    match value {
        Value::String(pattern) => Value::String(pattern.replace('*', "%").replace('?', "_")),
        _ => value.clone(),
    }
}

/// Joins the fragments of `children` with `operation`. Children rendering to
/// nothing are skipped and nested composites are parenthesised, so
/// `a AND (b OR c)` keeps its grouping.
fn compile_group(operation: &str, children: &[Filter], params: &mut Vec<Value>) -> String {
    children
        .iter()
        .map(|child| {
            let fragment = child.compile(params);
            match child {
                Filter::And(_) | Filter::Or(_) if !fragment.is_empty() => format!("({fragment})"),
                _ => fragment,
            }
        })
        .filter(|fragment| !fragment.is_empty())
        .join(&format!(" {operation} "))
}

/// The top level of a filter list is an implicit AND.
pub fn compile_where(filters: &[Filter], params: &mut Vec<Value>) -> String {
    compile_group("AND", filters, params)
}

pub fn from_json_list(nodes: &serde_json::Value) -> Result<Vec<Filter>> {
    nodes
        .as_array()
        .ok_or_else(|| configuration_error(format!("Error processing filter array {nodes}")))?
        .iter()
        .map(Filter::from_json)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn leaves_bind_their_values() {
        let mut params = Vec::new();
        let sql = compile_where(
            &[
                Filter::greater_than("age", 30),
                Filter::in_values("id", vec![Value::from(1), Value::from(2), Value::from(3)]),
                Filter::like("name", "A%"),
            ],
            &mut params,
        );
        assert_eq!(sql, "(age > ?) AND (id IN (?,?,?)) AND (name LIKE ?)");
        assert_eq!(
            params,
            vec![
                Value::from(30),
                Value::from(1),
                Value::from(2),
                Value::from(3),
                Value::from("A%")
            ]
        );
    }

    #[test]
    fn like_translates_wildcards() {
        let mut params = Vec::new();
        let sql = Filter::like("name", "Jo?n*").compile(&mut params);
        assert_eq!(sql, "(name LIKE ?)");
        assert_eq!(params, vec![Value::from("Jo_n%")]);
    }

    #[test]
    fn nested_groups_keep_precedence() {
        let mut params = Vec::new();
        let sql = compile_where(
            &[
                Filter::equal("a", 1),
                Filter::Or(vec![Filter::equal("b", 2), Filter::equal("c", 3)]),
            ],
            &mut params,
        );
        assert_eq!(sql, "(a = ?) AND ((b = ?) OR (c = ?))");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn empty_groups_compile_to_nothing() {
        let mut params = Vec::new();
        assert_eq!(compile_where(&[], &mut params), "");
        assert_eq!(
            compile_where(&[Filter::And(vec![Filter::Or(vec![])])], &mut params),
            ""
        );
        assert_eq!(
            compile_where(&[Filter::Or(vec![]), Filter::equal("a", 1)], &mut params),
            "(a = ?)"
        );
        assert_eq!(params, vec![Value::from(1)]);
    }

    #[test]
    fn parses_wire_nodes() {
        let filters = from_json_list(&json!([
            {"operation": "OR", "children": [
                {"operation": "=", "property": "name", "value": "Ann"},
                {"operation": "IN", "property": "id", "values": [4, 5]}
            ]},
            {"operation": "<", "property": "age", "value": 65}
        ]))
        .unwrap();

        assert_eq!(
            filters,
            vec![
                Filter::Or(vec![
                    Filter::equal("name", "Ann"),
                    Filter::in_values("id", vec![Value::from(4), Value::from(5)]),
                ]),
                Filter::less_than("age", 65),
            ]
        );
    }

    #[test]
    fn childs_is_still_accepted() {
        let filter = Filter::from_json(&json!({
            "operation": "AND",
            "childs": [{"operation": "LIKE", "property": "name", "value": "%n"}]
        }))
        .unwrap();
        assert_eq!(filter, Filter::And(vec![Filter::like("name", "%n")]));
    }

    #[test]
    fn rejects_malformed_nodes() {
        let unknown = Filter::from_json(&json!({"operation": "BETWEEN", "property": "a"}));
        assert!(unknown.unwrap_err().is_configuration());

        assert!(Filter::from_json(&json!("age > 3")).is_err());
        assert!(Filter::from_json(&json!({"operation": "="})).is_err());
        assert!(Filter::from_json(&json!({"operation": "IN", "property": "id"})).is_err());
        assert!(from_json_list(&json!({"operation": "="})).is_err());
    }
}
