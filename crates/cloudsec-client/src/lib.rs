//! Cloud firewall-group API client
//!
//! A Rust client library for the provider's security-group REST API.
//! Provides type-safe models and operations for listing, creating,
//! authorizing, revoking and deleting firewall groups.
//!
//! # Example
//!
//! ```no_run
//! use cloudsec_client::{CloudSecClient, CloudSecClientTrait, Filter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client
//! let client = CloudSecClient::new(
//!     "https://cloudsec.internal".to_string(),
//!     "your-api-token".to_string(),
//! )?;
//!
//! // List all groups owned by a cluster, following pagination
//! let owned = client
//!     .list_security_groups(
//!         "vpc-1",
//!         &[Filter::tag("netops.stratoform.io/cluster/demo", "owned")],
//!         true,
//!     )
//!     .await?;
//!
//! for group in owned {
//!     client.delete_security_group(&group.group_id).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Typed errors**: not-found and failed-dependency are distinguishable
//!   from transient API failures
//! - **Pagination**: continuation-token listing via the `fetch_all` flag
//! - **Mocking**: `test-util` feature provides an in-memory mock with an
//!   ordered call log and injectable failures

pub mod client;
pub mod error;
#[path = "trait.rs"]
pub mod cloud_trait;
pub mod models;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::CloudSecClient;
pub use cloud_trait::CloudSecClientTrait;
pub use error::CloudSecError;
pub use models::*;
#[cfg(feature = "test-util")]
pub use mock::MockCloudSecClient;
