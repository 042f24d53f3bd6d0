#![deny(clippy::all, clippy::pedantic)]
#![deny(missing_docs)]
#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]
//! # webhose
//!
//! webhose is a convenient wrapper library around the webhose news and
//! content search API.
//!
//! This library can:
//! - build query strings from structured filters with [`Query`]
//! - run searches with a [`Client`]
//! - decode results into typed [`Post`]s and [`Thread`]s
//! - walk every result page lazily with [`Posts`]
//!
//! ## Example: Printing the titles of every matching post.
//!
//! ```rust,no_run
//! # type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
//! use webhose::query::{ListField, Query};
//! use webhose::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::with_token("my-token");
//!     let query = Query::new()
//!         .all_terms("ipod")
//!         .language("english")
//!         .list(ListField::SiteType, "news");
//!
//!     let page = client.search(&query, None, None).await?;
//!     println!("{} results", page.total_results());
//!
//!     // fetches following pages as needed
//!     let mut posts = page.into_posts(&client);
//!     while let Some(post) = posts.next().await? {
//!         println!("{}", post.title().unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`Query`]: crate::models::query::Query
//! [`Post`]:  crate::models::post::Post
//! [`Thread`]: crate::models::thread::Thread
//! [`Posts`]: crate::models::response::Posts

/// Client module contains [`Client`] for running searches.
pub mod client;

/// Contains [`Error`]s that can be thrown by the library.
///
/// [`Error`]: crate::error::Error
pub mod error;

pub mod global;

pub(crate) mod models;

pub(crate) mod result;

pub use client::{Client, ClientBuilder};
pub use error::Error;
pub use models::*;
pub use result::Result;
