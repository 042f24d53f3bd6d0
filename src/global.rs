//! Process-wide default [`Client`].
//!
//! These functions share one lazily created client, so a token set with
//! [`configure`] applies to every later [`search`]. Prefer creating a
//! [`Client`] and passing it around when more than one token is in play.

use std::fmt::Display;

use once_cell::sync::Lazy;
use reqwest::IntoUrl;
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::{models::response::Response, result::Result, Client};

static DEFAULT: Lazy<RwLock<Client>> = Lazy::new(|| RwLock::new(Client::from_env()));

/// Sets the token used by [`search`] when no token is passed explicitly.
pub async fn configure(token: impl Into<String>) {
    DEFAULT.write().await.set_token(token);
}

/// Runs a search with the default client. See [`Client::search`].
///
/// # Errors
///
/// Same as [`Client::search`].
pub async fn search(
    query: impl Display,
    token: Option<&str>,
    since: Option<&str>,
) -> Result<Response> {
    DEFAULT.read().await.search(query, token, since).await
}

/// Fetches a result page with the default client. See [`Client::get`].
///
/// # Errors
///
/// Same as [`Client::get`].
pub async fn get(url: impl IntoUrl) -> Result<Response> {
    DEFAULT.read().await.get(url).await
}

/// Borrows the default client, e.g. to walk every page of a search.
///
/// The guard holds a read lock on the default client: [`configure`]
/// waits until every guard is dropped, so calling it from the task that
/// still holds one never returns. Keep the guard in its own scope:
///
/// ```rust,no_run
/// # async fn run() -> webhose::Result<()> {
/// let titles = {
///     let client = webhose::global::client().await;
///     let mut posts = client.search("cats", None, None).await?.into_posts(&client);
///     let mut titles = Vec::new();
///     while let Some(post) = posts.next().await? {
///         titles.push(post.thread().title_full().to_string());
///     }
///     titles
/// };
/// webhose::global::configure("another-token").await;
/// # drop(titles);
/// # Ok(())
/// # }
/// ```
pub async fn client() -> RwLockReadGuard<'static, Client> {
    DEFAULT.read().await
}
