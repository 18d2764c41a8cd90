//! Declarative client generator for Google-style REST APIs.
//!
//! Describe an API's resources and the actions each supports, and get a
//! [`Service`] whose methods (`listVideos`, `insertPlaylists`, ...) build
//! the URL, sign the request and return the JSON response.
//!
//! ```no_run
//! use gapi::resource::{Action, Spec};
//! use gapi::Service;
//!
//! # async fn run() -> anyhow::Result<()> {
//! gapi::init("ya29.access-token");
//!
//! let spec = Spec::new()
//!     .resource("playlists", [Action::List, Action::Insert])
//!     .nested("playlists", Spec::new().resource("items", [Action::List]));
//! let service = Service::new("youtube", "v3", spec)?;
//!
//! // GET https://www.googleapis.com/youtube/v3/playlists/PL123/items
//! let items = service.call("listItems", &["PL123".into()]).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod resource;

pub use api::auth::{init, AuthMode, Credentials};
pub use api::service::{Service, ServiceBuilder, DEFAULT_SERVER};
pub use error::{ApiError, CallError};
