//! Call arguments
//!
//! Generated methods take a flat list of [`Arg`]s. Segments become URL path
//! components, everything else is body data or query parameters depending on
//! the action.

use crate::error::CallError;
use serde_json::{Map, Value};

/// A single positional argument to a generated method
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Path segment (resource or parent identifier)
    Segment(String),
    /// JSON value used as body or query parameters. Only objects and arrays
    /// are accepted when the call is classified.
    Object(Value),
    /// Placeholder that occupies a data/params slot without sending anything
    Null,
}

impl Arg {
    /// Parse a command line argument.
    ///
    /// `{...}` and `[...]` are JSON, `null` is [`Arg::Null`], `true`/`false`
    /// are booleans (rejected when classified), anything else is a path
    /// segment.
    pub fn parse_cli(raw: &str) -> anyhow::Result<Self> {
        let trimmed = raw.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            let value: Value = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("Invalid JSON argument {:?}: {}", raw, e))?;
            return Ok(Arg::Object(value));
        }
        match raw {
            "null" => return Ok(Arg::Null),
            "true" => return Ok(Arg::Object(Value::Bool(true))),
            "false" => return Ok(Arg::Object(Value::Bool(false))),
            _ => {},
        }
        Ok(Arg::Segment(raw.to_string()))
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Segment(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Segment(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Segment(value.clone())
    }
}

macro_rules! segment_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Segment(value.to_string())
                }
            }
        )*
    };
}

segment_from_number!(i32, i64, u32, u64, usize, f64);

impl From<Map<String, Value>> for Arg {
    fn from(value: Map<String, Value>) -> Self {
        Arg::Object(Value::Object(value))
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Arg::Null,
            Value::String(s) => Arg::Segment(s),
            Value::Number(n) => Arg::Segment(n.to_string()),
            other => Arg::Object(other),
        }
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Arg::Null)
    }
}

/// Arguments split into path, body and query parts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub path: Vec<String>,
    pub data: Option<Value>,
    pub params: Option<Map<String, Value>>,
}

/// Split raw call arguments.
///
/// Segments keep their relative order in `path`. Non-segment arguments fill
/// the data slot first when `carries_body` is set, then the params slot.
/// Scalars wrapped in [`Arg::Object`] (booleans) are neither, and fail with
/// [`CallError::InvalidArgument`].
pub fn classify(method: &str, args: &[Arg], carries_body: bool) -> Result<Classified, CallError> {
    let max = if carries_body { 2 } else { 1 };
    let mut classified = Classified::default();
    let mut others = 0;

    for arg in args {
        let value = match arg {
            Arg::Segment(s) => {
                classified.path.push(s.clone());
                continue;
            },
            Arg::Object(v @ (Value::Object(_) | Value::Array(_))) => Some(v),
            Arg::Object(v) => {
                return Err(CallError::InvalidArgument {
                    method: method.to_string(),
                    value: v.to_string(),
                })
            },
            Arg::Null => None,
        };

        others += 1;
        if others > max {
            continue;
        }

        if carries_body && others == 1 {
            classified.data = value.cloned();
        } else {
            classified.params = match value {
                None => None,
                Some(Value::Object(map)) => Some(map.clone()),
                Some(_) => {
                    return Err(CallError::InvalidParams {
                        method: method.to_string(),
                    })
                },
            };
        }
    }

    if others > max {
        return Err(CallError::TooManyArguments {
            method: method.to_string(),
            max,
            count: others,
        });
    }

    Ok(classified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_become_segments() {
        assert_eq!(Arg::from(42u64), Arg::Segment("42".to_string()));
        assert_eq!(Arg::from(json!(7)), Arg::Segment("7".to_string()));
    }

    #[test]
    fn test_booleans_are_not_segments() {
        let arg = Arg::from(json!(true));
        assert_eq!(arg, Arg::Object(json!(true)));

        let args = [arg, Arg::from(json!({"part": "id"}))];
        let err = classify("listVideos", &args, false).unwrap_err();
        assert_eq!(
            err,
            CallError::InvalidArgument {
                method: "listVideos".to_string(),
                value: "true".to_string()
            }
        );

        let err = classify("insertVideos", &[Arg::from(json!(false))], true).unwrap_err();
        assert!(matches!(err, CallError::InvalidArgument { .. }));
    }

    #[test]
    fn test_none_becomes_null() {
        assert_eq!(Arg::from(None::<&str>), Arg::Null);
        assert_eq!(Arg::from(Some("abc")), Arg::Segment("abc".to_string()));
    }

    #[test]
    fn test_read_args_use_object_as_params() {
        let args = [Arg::from("abc"), Arg::from(json!({"part": "snippet"}))];
        let c = classify("listVideos", &args, false).unwrap();
        assert_eq!(c.path, vec!["abc"]);
        assert_eq!(c.data, None);
        assert_eq!(c.params.unwrap()["part"], "snippet");
    }

    #[test]
    fn test_write_args_fill_data_then_params() {
        let args = [
            Arg::from(json!({"title": "t"})),
            Arg::from("id-1"),
            Arg::from(json!({"part": "snippet"})),
        ];
        let c = classify("updateVideos", &args, true).unwrap();
        assert_eq!(c.path, vec!["id-1"]);
        assert_eq!(c.data, Some(json!({"title": "t"})));
        assert_eq!(c.params.unwrap()["part"], "snippet");
    }

    #[test]
    fn test_null_placeholder_skips_data_slot() {
        let args = [Arg::Null, Arg::from(json!({"id": "v", "rating": "like"}))];
        let c = classify("post", &args, true).unwrap();
        assert_eq!(c.data, None);
        assert_eq!(c.params.unwrap()["rating"], "like");
    }

    #[test]
    fn test_too_many_non_path_args() {
        let args = [Arg::Null, Arg::Null];
        let err = classify("listVideos", &args, false).unwrap_err();
        assert_eq!(
            err,
            CallError::TooManyArguments {
                method: "listVideos".to_string(),
                max: 1,
                count: 2
            }
        );
    }

    #[test]
    fn test_array_params_are_rejected() {
        let err = classify("listVideos", &[Arg::from(json!(["a"]))], false).unwrap_err();
        assert!(matches!(err, CallError::InvalidParams { .. }));
    }

    #[test]
    fn test_array_body_is_allowed() {
        let c = classify("insertItems", &[Arg::from(json!([1, 2]))], true).unwrap();
        assert_eq!(c.data, Some(json!([1, 2])));
    }

    #[test]
    fn test_parse_cli() {
        assert_eq!(Arg::parse_cli("abc").unwrap(), Arg::Segment("abc".to_string()));
        assert_eq!(Arg::parse_cli("null").unwrap(), Arg::Null);
        assert_eq!(Arg::parse_cli("true").unwrap(), Arg::Object(json!(true)));
        assert_eq!(Arg::parse_cli("false").unwrap(), Arg::Object(json!(false)));
        assert_eq!(
            Arg::parse_cli(r#"{"part":"id"}"#).unwrap(),
            Arg::Object(json!({"part": "id"}))
        );
        assert!(Arg::parse_cli("{not json").is_err());
    }
}
