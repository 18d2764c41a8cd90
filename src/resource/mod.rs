//! Resource abstraction layer
//!
//! This module turns a declarative description of an API's resources into
//! callable methods. Specs are plain data, so a new API only needs a new
//! table, not new code.
//!
//! # Architecture
//!
//! - [`spec`] - Resource/action tables and spec file loading
//! - [`synth`] - Resolves a spec into named methods
//! - [`args`] - Splits call arguments into path, body and query parts
//! - [`url`] - Method naming and URL building
//! - [`fetcher`] - Pagination over list methods
//!
//! # Example
//!
//! ```no_run
//! use gapi::resource::{Action, Spec};
//! use gapi::Service;
//! use serde_json::json;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let spec = Spec::new().resource("videos", [Action::List, Action::Delete]);
//!     let youtube = Service::new("youtube", "v3", spec)?;
//!     let videos = youtube
//!         .call("listVideos", &[json!({"part": "snippet", "chart": "mostPopular"}).into()])
//!         .await?;
//!     println!("{}", videos);
//!     Ok(())
//! }
//! ```

pub mod args;
pub mod fetcher;
pub mod spec;
pub mod synth;
pub mod url;

pub use args::Arg;
pub use fetcher::{list_all, paginate};
pub use spec::{Action, Entry, ServiceDescriptor, Spec};
pub use synth::MethodDef;
