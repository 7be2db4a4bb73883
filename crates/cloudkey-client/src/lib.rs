//! # CloudKey Client SDK
//!
//! A client SDK for the CloudKey media-management API.
//!
//! ## Features
//!
//! - **Sessions**: Basic-auth credentials or anonymous access
//! - **Impersonation**: Act as another user for every subsequent call
//! - **Media**: Create, inspect and delete media objects
//! - **Metadata**: Per-media string key/value pairs
//! - **Uploads**: Signed upload URLs and direct file uploads
//!
//! Every call is a single round trip. Server faults are mapped onto a
//! closed set of error kinds (see [`ErrorKind`]).
//!
//! ## Example
//!
//! ```rust,ignore
//! use cloudkey_client::{CloudKey, MediaId, SetMetaRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cloudkey = CloudKey::new("username", "password")?;
//!
//!     let me = cloudkey.user().whoami().await?;
//!     println!("Logged in as {}", me.username);
//!
//!     let media = cloudkey.media().create().await?;
//!     cloudkey
//!         .media()
//!         .set_meta(SetMetaRequest::new(media.id.clone()).key("title").value("Holidays"))
//!         .await?;
//!
//!     let title = cloudkey.media().get_meta(&media.id, "title").await?;
//!     println!("Title: {}", title.value);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod file;
mod media;
mod session;
mod transport;
mod types;
mod user;

pub use client::CloudKey;
pub use config::Config;
pub use error::{CloudKeyError, ErrorKind, Result};
pub use file::FileApi;
pub use media::MediaApi;
pub use session::{Credentials, Session};
pub use transport::{HttpTransport, Transport};
pub use types::*;
pub use user::UserApi;
