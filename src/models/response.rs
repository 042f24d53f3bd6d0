use std::{ops::Deref, vec};

use futures::Stream;
use serde::Deserialize;
use url::Url;

use crate::{error::Error, models::post::Post, result::Result, Client};

/// Wire format of one page of search results.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage {
    total_results: u64,
    next: String,
    requests_left: i64,
    more_results_available: u64,
    posts: Vec<Post>,
}

/// One page of search results.
///
/// A `Response` is an immutable snapshot of the page it was built from.
/// It dereferences to the posts of that page; use [`Response::into_posts`]
/// to walk every following page as well.
#[derive(Debug, Clone)]
pub struct Response {
    total_results: u64,
    more_results_available: u64,
    requests_left: i64,
    posts: Vec<Post>,
    url: Url,
    next: Url,
    next_ts: Option<String>,
}

impl Response {
    /// Decodes a page. `request_url` is the URL the page was fetched
    /// from and is used to resolve the relative `next` link.
    pub(crate) fn from_body(request_url: &Url, body: &str) -> Result<Self> {
        let raw: RawPage = serde_json::from_str(body)?;
        let next = request_url.join(&raw.next)?;
        let next_ts = extract_next_ts(&next);

        log::debug!(
            "page decoded: {} posts, {} total, {} more, {} requests left",
            raw.posts.len(),
            raw.total_results,
            raw.more_results_available,
            raw.requests_left
        );

        Ok(Self {
            total_results: raw.total_results,
            more_results_available: raw.more_results_available,
            requests_left: raw.requests_left,
            posts: raw.posts,
            url: request_url.clone(),
            next,
            next_ts,
        })
    }

    /// Returns the total number of results matching the query.
    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    /// Returns how many results remain after this page.
    pub fn more_results_available(&self) -> u64 {
        self.more_results_available
    }

    /// Returns whether another page can be fetched.
    pub fn has_more(&self) -> bool {
        self.more_results_available > 0
    }

    /// Returns the remaining request quota of the token.
    pub fn requests_left(&self) -> i64 {
        self.requests_left
    }

    /// Returns the URL this page was fetched from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the absolute URL of the next page.
    pub fn next(&self) -> &Url {
        &self.next
    }

    /// Returns the `ts` cursor of the next page (if the link carries one).
    ///
    /// Passing it as `since` to [`Client::search`] resumes the search
    /// from the next page.
    pub fn next_ts(&self) -> Option<&str> {
        self.next_ts.as_deref()
    }

    /// Fetches the page after this one.
    ///
    /// # Errors
    ///
    /// This function will return an error if the request fails or the
    /// API answers with a malformed page.
    pub async fn next_page(&self, client: &Client) -> Result<Response> {
        client.get(self.next.clone()).await
    }

    /// Turns this page into a cursor over its posts and the posts of all
    /// following pages.
    pub fn into_posts(self, client: &Client) -> Posts<'_> {
        Posts::new(client, self)
    }
}

impl Deref for Response {
    type Target = Vec<Post>;

    fn deref(&self) -> &Self::Target {
        &self.posts
    }
}

fn extract_next_ts(next: &Url) -> Option<String> {
    next.query_pairs()
        .find(|(key, _)| key == "ts")
        .map(|(_, value)| value.into_owned())
}

/// Forward-only cursor over the posts of a search, across pages.
///
/// Pages are fetched lazily: a request is only made once every post of
/// the current page has been handed out. Pages without posts are skipped.
/// Iteration ends once a page reports no more results, a page links back
/// to itself, or a fetch fails.
///
/// The cursor owns its state, so the [`Response`] it was created from is
/// left untouched; walking a clone of that response again starts over
/// from the first page.
#[derive(Debug)]
pub struct Posts<'a> {
    client: &'a Client,
    current: vec::IntoIter<Post>,
    next: Option<Url>,
    total_results: u64,
    more_results_available: u64,
    requests_left: i64,
    next_ts: Option<String>,
}

impl<'a> Posts<'a> {
    fn new(client: &'a Client, page: Response) -> Self {
        let mut posts = Self {
            client,
            current: Vec::new().into_iter(),
            next: None,
            total_results: 0,
            more_results_available: 0,
            requests_left: 0,
            next_ts: None,
        };
        posts.advance(page);
        posts
    }

    fn advance(&mut self, page: Response) {
        let stuck = page.has_more() && page.next == page.url;
        if stuck {
            log::warn!(
                "page {} links to itself with {} results left, stopping",
                page.url.path(),
                page.more_results_available
            );
        }
        let exhausted = !page.has_more() || stuck;
        self.total_results = page.total_results;
        self.more_results_available = page.more_results_available;
        self.requests_left = page.requests_left;
        self.next_ts = page.next_ts;
        self.next = if exhausted { None } else { Some(page.next) };
        self.current = page.posts.into_iter();
    }

    /// Returns the next post, fetching the following page when the
    /// current one is drained. `Ok(None)` means the search is exhausted.
    ///
    /// # Errors
    ///
    /// This function will return an error if fetching a page fails.
    /// The cursor is exhausted afterwards.
    #[allow(clippy::should_implement_trait)]
    pub async fn next(&mut self) -> Result<Option<Post>> {
        loop {
            if let Some(post) = self.current.next() {
                return Ok(Some(post));
            }
            let Some(url) = self.next.take() else {
                return Ok(None);
            };
            log::debug!("fetching next page of {}", url.path());
            let page = self.client.get(url).await?;
            self.advance(page);
        }
    }

    /// Returns whether more pages remain to be fetched.
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Total results, as reported by the most recently fetched page.
    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    /// Remaining results, as reported by the most recently fetched page.
    pub fn more_results_available(&self) -> u64 {
        self.more_results_available
    }

    /// Request quota, as reported by the most recently fetched page.
    pub fn requests_left(&self) -> i64 {
        self.requests_left
    }

    /// `ts` cursor of the most recently fetched page's `next` link.
    pub fn next_ts(&self) -> Option<&str> {
        self.next_ts.as_deref()
    }

    /// Converts the cursor into a [`Stream`] of posts.
    pub fn into_stream(self) -> impl Stream<Item = Result<Post>> + 'a {
        futures::stream::try_unfold(self, |mut posts| async move {
            Ok::<_, Error>(posts.next().await?.map(|post| (post, posts)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Response;
    use crate::{error::Error, models::post::tests::sample};
    use serde_json::json;
    use url::Url;

    fn request_url() -> Url {
        Url::parse("http://webhose.io/search?q=cats&token=secret").unwrap()
    }

    #[test]
    fn decodes_page_and_resolves_next() {
        let body = json!({
            "totalResults": 250,
            "moreResultsAvailable": 150,
            "requestsLeft": 999,
            "next": "/search?token=secret&format=json&ts=1464771600000&q=cats",
            "posts": [sample("a"), sample("b")]
        });
        let page = Response::from_body(&request_url(), &body.to_string()).unwrap();
        assert_eq!(page.total_results(), 250);
        assert_eq!(page.more_results_available(), 150);
        assert!(page.has_more());
        assert_eq!(page.requests_left(), 999);
        assert_eq!(page.len(), 2);
        assert_eq!(page[1].uuid(), Some("b"));
        assert_eq!(
            page.next().as_str(),
            "http://webhose.io/search?token=secret&format=json&ts=1464771600000&q=cats"
        );
        assert_eq!(page.next_ts(), Some("1464771600000"));
    }

    #[test]
    fn absolute_next_is_kept() {
        let body = json!({
            "totalResults": 0,
            "moreResultsAvailable": 0,
            "requestsLeft": 5,
            "next": "https://api.example.com/search?q=cats",
            "posts": []
        });
        let page = Response::from_body(&request_url(), &body.to_string()).unwrap();
        assert!(!page.has_more());
        assert!(page.is_empty());
        assert_eq!(page.next().host_str(), Some("api.example.com"));
        assert_eq!(page.next_ts(), None);
    }

    #[test]
    fn missing_field_is_malformed() {
        let body = json!({ "totalResults": 1, "posts": [] });
        let err = Response::from_body(&request_url(), &body.to_string()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
