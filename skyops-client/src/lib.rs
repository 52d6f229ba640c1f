//! REST client for SkyOps entities.
//!
//! [`ClientFactory`] hands out one [`EntityClient`] per top-level kind. Each
//! client lists, fetches, saves and deletes entities, hydrating responses
//! through the shared [`SchemaRegistry`](skyops_schema::SchemaRegistry).
//! Saves validate first and never touch the network for an invalid entity.
//!
//! ```no_run
//! # async fn demo() -> skyops_client::ClientResult<()> {
//! use std::sync::Arc;
//! use skyops_client::{ClientConfig, ClientFactory, Credentials, ListQuery, SortOrder};
//! use skyops_schema::SchemaRegistry;
//! use skyops_types::EntityKind;
//!
//! let mut factory = ClientFactory::new(
//!     ClientConfig::new("https://api.example.org"),
//!     Credentials::bearer("token"),
//!     Arc::new(SchemaRegistry::new()),
//! )?;
//! factory.fetch_registry().await?;
//!
//! let vehicles = factory.client(EntityKind::Vehicle)?;
//! let page = vehicles
//!     .list(&ListQuery::new().take(10).order_by("vehicleName", SortOrder::Asc))
//!     .await?;
//! println!("{} of {}", page.items.len(), page.count);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod query;
mod store;

pub use client::{ClientFactory, EntityClient, Page, SavePhase};
pub use config::{ClientConfig, Credentials, default_endpoint};
pub use error::{ClientError, ClientResult, UNKNOWN_ERROR, parse_backend_messages};
pub use query::{ListParameters, ListQuery, SortOrder, build_list_parameters};
pub use store::EntityStore;
