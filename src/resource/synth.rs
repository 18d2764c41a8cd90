//! Method synthesis
//!
//! Walks a [`Spec`] once and resolves every declared action into a
//! [`MethodDef`], keyed by its generated name.

use super::args::{classify, Arg};
use super::spec::{Action, Entry, Spec};
use super::url::{method_name, query_pairs, resource_url};
use crate::api::http::ApiRequest;
use crate::error::CallError;
use std::collections::BTreeMap;

/// A resolved method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    pub action: Action,
    pub resource: String,
    /// Ancestor resources, outermost first
    pub parents: Vec<String>,
}

impl MethodDef {
    /// Human readable path, e.g. `channels/{channels}/sections/{id?}`
    pub fn path_template(&self) -> String {
        let mut nodes: Vec<String> = Vec::new();
        for parent in &self.parents {
            nodes.push(parent.clone());
            nodes.push(format!("{{{}}}", parent.rsplit('/').next().unwrap_or(parent)));
        }
        nodes.push(self.resource.clone());
        nodes.push("{id?}".to_string());
        if let Some(suffix) = self.action.suffix() {
            nodes.push(suffix.to_string());
        }
        nodes.join("/")
    }

    /// Turn call arguments into a request against `base`
    pub fn build_request(&self, base: &str, args: &[Arg]) -> Result<ApiRequest, CallError> {
        let classified = classify(&self.name, args, self.action.carries_body())?;
        let mut url = resource_url(
            &self.name,
            base,
            &self.parents,
            &self.resource,
            &classified.path,
        )?;
        if let Some(suffix) = self.action.suffix() {
            url.push('/');
            url.push_str(suffix);
        }

        Ok(ApiRequest {
            method: self.action.http_method(),
            url,
            query: query_pairs(classified.params.as_ref()),
            body: classified.data,
        })
    }
}

/// Resolve every action in `spec` into a method table
pub fn synthesize(spec: &Spec) -> Result<BTreeMap<String, MethodDef>, CallError> {
    let mut methods = BTreeMap::new();
    walk(spec, &[], &mut methods)?;
    Ok(methods)
}

fn walk(
    spec: &Spec,
    parents: &[String],
    methods: &mut BTreeMap<String, MethodDef>,
) -> Result<(), CallError> {
    for (resource, entries) in spec.entries() {
        for entry in entries {
            match entry {
                Entry::Nested(children) => {
                    let mut chain = parents.to_vec();
                    chain.push(resource.to_string());
                    walk(children, &chain, methods)?;
                },
                Entry::Action(action) => {
                    let name = method_name(action.as_str(), resource);
                    if methods.contains_key(&name) {
                        return Err(CallError::DuplicateMethod(name));
                    }
                    methods.insert(
                        name.clone(),
                        MethodDef {
                            name,
                            action: *action,
                            resource: resource.to_string(),
                            parents: parents.to_vec(),
                        },
                    );
                },
            }
        }
    }
    Ok(())
}
