//! Generated service client
//!
//! A [`Service`] binds an API name and version to the method table
//! synthesized from its [`Spec`], and sends the resulting requests.

use super::auth::{AuthMode, Credentials};
use super::http::{ApiHttpClient, ApiRequest};
use crate::error::CallError;
use crate::resource::args::{classify, Arg};
use crate::resource::spec::{ServiceDescriptor, Spec};
use crate::resource::synth::{synthesize, MethodDef};
use crate::resource::url::{join_path, query_pairs};
use anyhow::{Context, Result};
use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Google APIs base URL
pub const DEFAULT_SERVER: &str = "https://www.googleapis.com";

/// Client for one API, with one method per declared resource action
#[derive(Clone, Debug)]
pub struct Service {
    api: String,
    version: String,
    url: String,
    methods: Arc<BTreeMap<String, MethodDef>>,
    http: ApiHttpClient,
    credentials: Credentials,
    auth_mode: AuthMode,
}

/// Builder for [`Service`]
pub struct ServiceBuilder {
    api: String,
    version: String,
    spec: Spec,
    server: Option<String>,
    credentials: Option<Credentials>,
    auth_mode: AuthMode,
    http: Option<ApiHttpClient>,
}

impl ServiceBuilder {
    pub fn spec(mut self, spec: Spec) -> Self {
        self.spec = spec;
        self
    }

    /// Override the base host (defaults to [`DEFAULT_SERVER`])
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Use an isolated credential store instead of the process-wide one
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    pub fn http_client(mut self, http: ApiHttpClient) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<Service> {
        let server = self.server.as_deref().unwrap_or(DEFAULT_SERVER);
        url::Url::parse(server).with_context(|| format!("Invalid server URL: {}", server))?;

        let url = format!(
            "{}/{}/{}/",
            server.trim_end_matches('/'),
            self.api,
            self.version
        );

        let methods = synthesize(&self.spec)?;
        let http = match self.http {
            Some(http) => http,
            None => ApiHttpClient::new()?,
        };

        tracing::info!(
            "Service {} {} ready with {} methods at {}",
            self.api,
            self.version,
            methods.len(),
            url
        );

        Ok(Service {
            api: self.api,
            version: self.version,
            url,
            methods: Arc::new(methods),
            http,
            credentials: self
                .credentials
                .unwrap_or_else(|| Credentials::global().clone()),
            auth_mode: self.auth_mode,
        })
    }
}

impl Service {
    /// Create a service on the default server using the process-wide token
    pub fn new(api: &str, version: &str, spec: Spec) -> Result<Self> {
        Self::builder(api, version).spec(spec).build()
    }

    pub fn builder(api: &str, version: &str) -> ServiceBuilder {
        ServiceBuilder {
            api: api.to_string(),
            version: version.to_string(),
            spec: Spec::new(),
            server: None,
            credentials: None,
            auth_mode: AuthMode::default(),
            http: None,
        }
    }

    /// Start a builder from a loaded spec file
    pub fn from_descriptor(descriptor: ServiceDescriptor) -> ServiceBuilder {
        let builder = Self::builder(&descriptor.api, &descriptor.version).spec(descriptor.resources);
        match descriptor.server {
            Some(server) => builder.server(server),
            None => builder,
        }
    }

    pub fn api(&self) -> &str {
        &self.api
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Base URL, always ending with `/`
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDef> {
        self.methods.values()
    }

    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.get(name)
    }

    /// Build the request a generated method would send, without sending it
    pub fn prepare(&self, name: &str, args: &[Arg]) -> Result<ApiRequest> {
        let method = self
            .method(name)
            .ok_or_else(|| CallError::UnknownMethod(name.to_string()))?;
        Ok(method.build_request(&self.url, args)?)
    }

    /// Invoke a generated method, e.g. `call("listVideos", &[params.into()])`
    pub async fn call(&self, name: &str, args: &[Arg]) -> Result<Value> {
        let request = self.prepare(name, args)?;
        self.send(&request).await
    }

    /// GET `<base>/<segments...>` with an optional params object
    pub async fn get(&self, args: &[Arg]) -> Result<Value> {
        let request = self.raw_request(Method::GET, args, false)?;
        self.send(&request).await
    }

    /// POST `<base>/<segments...>` with optional data and params objects
    pub async fn post(&self, args: &[Arg]) -> Result<Value> {
        let request = self.raw_request(Method::POST, args, true)?;
        self.send(&request).await
    }

    fn raw_request(&self, method: Method, args: &[Arg], carries_body: bool) -> Result<ApiRequest> {
        let classified = classify(method.as_str(), args, carries_body)?;
        Ok(ApiRequest {
            url: join_path(&self.url, &classified.path),
            query: query_pairs(classified.params.as_ref()),
            body: classified.data,
            method,
        })
    }

    /// Sign a request with the current token and send it
    pub async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let token = self.credentials.token();
        if token.is_none() {
            tracing::debug!("No access token set, sending unauthenticated request");
        }

        match (self.auth_mode, token) {
            (AuthMode::QueryParam, Some(token)) => {
                let mut signed = request.clone();
                signed.set_query("access_token", token);
                self.http.execute(&signed, None).await
            },
            (AuthMode::Header, Some(token)) => self.http.execute(request, Some(token.as_str())).await,
            (_, None) => self.http.execute(request, None).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::spec::Action;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn youtube() -> Service {
        let spec = Spec::new()
            .resource("videos", [Action::List, Action::Insert, Action::Delete])
            .resource("thumbnails", [Action::Set]);
        Service::builder("youtube", "v3")
            .spec(spec)
            .credentials(Credentials::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_base_url() {
        let service = youtube();
        assert_eq!(service.url(), "https://www.googleapis.com/youtube/v3/");
        assert_eq!(service.api(), "youtube");
        assert_eq!(service.version(), "v3");
    }

    #[test]
    fn test_server_trailing_slash_is_trimmed() {
        let service = Service::builder("drive", "v2")
            .server("http://127.0.0.1:9000/")
            .credentials(Credentials::new())
            .build()
            .unwrap();
        assert_eq!(service.url(), "http://127.0.0.1:9000/drive/v2/");
    }

    #[test]
    fn test_invalid_server_is_rejected() {
        let result = Service::builder("drive", "v2").server("not a url").build();
        assert_err!(result);
    }

    #[test]
    fn test_generated_method_names() {
        let service = youtube();
        let names: Vec<&str> = service.methods().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["deleteVideos", "insertVideos", "listVideos", "setThumbnails"]
        );
    }

    #[test]
    fn test_prepare_delete() {
        let req = assert_ok!(youtube().prepare("deleteVideos", &["abc".into()]));
        assert_eq!(req.method, Method::DELETE);
        assert_eq!(req.url, "https://www.googleapis.com/youtube/v3/videos/abc");
    }

    #[test]
    fn test_prepare_unknown_method() {
        let err = youtube().prepare("rateVideos", &[]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CallError>(),
            Some(&CallError::UnknownMethod("rateVideos".to_string()))
        );
    }

    #[test]
    fn test_raw_post_request() {
        let req = youtube()
            .raw_request(
                Method::POST,
                &["videos".into(), "rate".into(), Arg::Null, Arg::from(json!({"id": "v1"}))],
                true,
            )
            .unwrap();
        assert_eq!(req.url, "https://www.googleapis.com/youtube/v3/videos/rate");
        assert_eq!(req.body, None);
        assert_eq!(req.query, vec![("id".to_string(), "v1".to_string())]);
    }

    #[test]
    fn test_from_descriptor_uses_server() {
        let desc = ServiceDescriptor::parse(
            "api: youtube\nversion: v3\nserver: http://localhost:1234\nresources:\n  search: [list]\n",
        )
        .unwrap();
        let service = Service::from_descriptor(desc)
            .credentials(Credentials::new())
            .build()
            .unwrap();
        assert_eq!(service.url(), "http://localhost:1234/youtube/v3/");
        assert!(service.method("listSearch").is_some());
    }
}
