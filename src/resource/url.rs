//! URL building for generated methods

use crate::error::CallError;
use serde_json::{Map, Value};

/// Build a method name from an action and a resource.
///
/// Resources may carry a path prefix; only the last segment is used.
/// `("list", "channels/sections")` gives `listSections`.
pub fn method_name(action: &str, resource: &str) -> String {
    let leaf = resource.rsplit('/').next().unwrap_or(resource);
    let mut chars = leaf.chars();
    match chars.next() {
        Some(first) => format!("{}{}{}", action, first.to_uppercase(), chars.as_str()),
        None => action.to_string(),
    }
}

/// Build a resource URL.
///
/// Each parent is followed by the path segment supplied for it, in order.
/// The leaf resource comes next, then its identifier when one more segment
/// is available.
pub fn resource_url(
    method: &str,
    base: &str,
    parents: &[String],
    resource: &str,
    path: &[String],
) -> Result<String, CallError> {
    let mut segments = path.iter();
    let mut nodes: Vec<String> = Vec::with_capacity(parents.len() * 2 + 2);

    for parent in parents {
        let Some(id) = segments.next() else {
            return Err(CallError::MissingPathArgument {
                method: method.to_string(),
                resource: parent.clone(),
            });
        };
        nodes.push(parent.clone());
        nodes.push(urlencoding::encode(id).into_owned());
    }

    nodes.push(resource.to_string());
    if let Some(id) = segments.next() {
        nodes.push(urlencoding::encode(id).into_owned());
    }

    if let Some(extra) = segments.next() {
        return Err(CallError::UnexpectedPathArgument {
            method: method.to_string(),
            segment: extra.clone(),
        });
    }

    Ok(format!("{}{}", base, nodes.join("/")))
}

/// Join raw path segments onto the base URL
pub fn join_path(base: &str, path: &[String]) -> String {
    let encoded: Vec<String> = path
        .iter()
        .map(|s| urlencoding::encode(s).into_owned())
        .collect();
    format!("{}{}", base, encoded.join("/"))
}

/// Flatten a query parameter object into key/value pairs.
///
/// Arrays repeat the key, nested objects are sent as compact JSON, nulls are
/// dropped.
pub fn query_pairs(params: Option<&Map<String, Value>>) -> Vec<(String, String)> {
    let Some(params) = params else {
        return Vec::new();
    };

    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(v) = scalar_to_string(item) {
                        pairs.push((key.clone(), v));
                    }
                }
            },
            other => {
                if let Some(v) = scalar_to_string(other) {
                    pairs.push((key.clone(), v));
                }
            },
        }
    }
    pairs
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
