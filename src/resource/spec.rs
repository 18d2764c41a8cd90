//! Service specifications
//!
//! A [`Spec`] declares which actions each resource supports. Resources can
//! nest sub-resources, which end up below their parent in the URL path.
//! Specs are built in code with the builder methods, or loaded from a
//! YAML/JSON [`ServiceDescriptor`] file.

use anyhow::{Context, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A verb supported by a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    List,
    Get,
    Insert,
    Update,
    Patch,
    Delete,
    Set,
    Unset,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::List,
        Action::Get,
        Action::Insert,
        Action::Update,
        Action::Patch,
        Action::Delete,
        Action::Set,
        Action::Unset,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Get => "get",
            Action::Insert => "insert",
            Action::Update => "update",
            Action::Patch => "patch",
            Action::Delete => "delete",
            Action::Set => "set",
            Action::Unset => "unset",
        }
    }

    /// HTTP method used for this action
    pub fn http_method(self) -> Method {
        match self {
            Action::List | Action::Get => Method::GET,
            Action::Insert | Action::Set | Action::Unset => Method::POST,
            Action::Update => Method::PUT,
            Action::Patch => Method::PATCH,
            Action::Delete => Method::DELETE,
        }
    }

    /// Whether the first non-path argument is sent as the request body
    pub fn carries_body(self) -> bool {
        matches!(self, Action::Insert | Action::Update | Action::Patch)
    }

    /// Path suffix appended after the resource URL
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            Action::Set => Some("set"),
            Action::Unset => Some("unset"),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown action: {}", s))
    }
}

/// One entry in a resource's action list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Action(Action),
    Nested(Spec),
}

/// Value of a resource key in a spec file: a list of entries, or a nested
/// spec holding only sub-resources
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResourceValue {
    Entries(Vec<Entry>),
    Nested(Spec),
}

impl From<ResourceValue> for Vec<Entry> {
    fn from(value: ResourceValue) -> Self {
        match value {
            ResourceValue::Entries(entries) => entries,
            ResourceValue::Nested(spec) => vec![Entry::Nested(spec)],
        }
    }
}

/// Mapping from resource name to its actions and sub-resources
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, ResourceValue>")]
pub struct Spec {
    resources: BTreeMap<String, Vec<Entry>>,
}

impl From<BTreeMap<String, ResourceValue>> for Spec {
    fn from(raw: BTreeMap<String, ResourceValue>) -> Self {
        Spec {
            resources: raw
                .into_iter()
                .map(|(name, value)| (name, value.into()))
                .collect(),
        }
    }
}

impl Spec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare actions for a resource
    pub fn resource(
        mut self,
        name: impl Into<String>,
        actions: impl IntoIterator<Item = Action>,
    ) -> Self {
        self.resources
            .entry(name.into())
            .or_default()
            .extend(actions.into_iter().map(Entry::Action));
        self
    }

    /// Declare sub-resources living below `name`
    pub fn nested(mut self, name: impl Into<String>, spec: Spec) -> Self {
        self.resources
            .entry(name.into())
            .or_default()
            .push(Entry::Nested(spec));
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        self.resources
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse spec YAML")
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse spec JSON")
    }
}

/// A complete service description, as stored in spec files
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceDescriptor {
    pub api: String,
    pub version: String,
    #[serde(default)]
    pub server: Option<String>,
    pub resources: Spec,
}

impl ServiceDescriptor {
    /// Parse a descriptor. YAML is a superset of JSON, so both formats work.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse service descriptor")
    }

    /// Load a descriptor from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read spec file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid spec file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_http_methods() {
        assert_eq!(Action::List.http_method(), Method::GET);
        assert_eq!(Action::Get.http_method(), Method::GET);
        assert_eq!(Action::Insert.http_method(), Method::POST);
        assert_eq!(Action::Update.http_method(), Method::PUT);
        assert_eq!(Action::Patch.http_method(), Method::PATCH);
        assert_eq!(Action::Delete.http_method(), Method::DELETE);
        assert_eq!(Action::Set.http_method(), Method::POST);
        assert_eq!(Action::Unset.http_method(), Method::POST);
    }

    #[test]
    fn test_only_write_actions_carry_body() {
        let writes: Vec<Action> = Action::ALL.into_iter().filter(|a| a.carries_body()).collect();
        assert_eq!(writes, vec![Action::Insert, Action::Update, Action::Patch]);
    }

    #[test]
    fn test_action_round_trips_through_str() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
        assert!("rate".parse::<Action>().is_err());
    }

    #[test]
    fn test_builder_merges_entries_for_same_resource() {
        let spec = Spec::new()
            .resource("videos", [Action::List])
            .resource("videos", [Action::Delete]);
        let (_, entries) = spec.entries().next().unwrap();
        assert_eq!(
            entries,
            &[Entry::Action(Action::List), Entry::Action(Action::Delete)]
        );
    }

    #[test]
    fn test_parse_nested_yaml() {
        let spec = Spec::from_yaml_str(
            r#"
videos: [list, insert]
channels:
  - list
  - sections: [list, delete]
"#,
        )
        .unwrap();

        let expected = Spec::new()
            .resource("videos", [Action::List, Action::Insert])
            .resource("channels", [Action::List])
            .nested(
                "channels",
                Spec::new().resource("sections", [Action::List, Action::Delete]),
            );
        assert_eq!(spec, expected);
    }

    #[test]
    fn test_parse_json_spec() {
        let spec = Spec::from_json_str(r#"{"watermarks": ["set", "unset"]}"#).unwrap();
        assert_eq!(spec, Spec::new().resource("watermarks", [Action::Set, Action::Unset]));
    }

    #[test]
    fn test_parse_nested_map_yaml() {
        let spec = Spec::from_yaml_str(
            r#"
channels:
  sections: [list]
  subscriptions:
    items: [delete]
"#,
        )
        .unwrap();

        let expected = Spec::new().nested(
            "channels",
            Spec::new()
                .resource("sections", [Action::List])
                .nested("subscriptions", Spec::new().resource("items", [Action::Delete])),
        );
        assert_eq!(spec, expected);
    }

    #[test]
    fn test_parse_nested_map_json() {
        let spec = Spec::from_json_str(r#"{"channels": {"sections": ["list"]}}"#).unwrap();
        assert_eq!(
            spec,
            Spec::new().nested("channels", Spec::new().resource("sections", [Action::List]))
        );
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert!(Spec::from_yaml_str("videos: [list, rate]").is_err());
    }

    #[test]
    fn test_descriptor_parses_server_override() {
        let desc = ServiceDescriptor::parse(
            "api: youtube\nversion: v3\nserver: http://localhost:8080\nresources:\n  search: [list]\n",
        )
        .unwrap();
        assert_eq!(desc.api, "youtube");
        assert_eq!(desc.version, "v3");
        assert_eq!(desc.server.as_deref(), Some("http://localhost:8080"));
        assert!(!desc.resources.is_empty());
    }
}
