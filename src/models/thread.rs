use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{de_null_default, de_timestamp, macros::str_opt_ref};

/// The thread and site a [`Post`] was published in.
///
/// A `Thread` is only ever obtained through its post; the API has no
/// separate endpoint for it.
///
/// [`Post`]: crate::post::Post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Unique thread identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uuid: Option<String>,

    /// Thread URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,

    /// Full host name of the site, e.g. `edition.cnn.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    site_full: Option<String>,

    /// Domain of the site, e.g. `cnn.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    site: Option<String>,

    /// URL of the site section the thread was found in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    site_section: Option<String>,

    /// Title of the site section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    section_title: Option<String>,

    /// Possibly truncated thread title.
    #[serde(default, deserialize_with = "de_null_default")]
    title: String,

    /// Untruncated thread title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title_full: Option<String>,

    /// Publication time, normalized to UTC.
    #[serde(deserialize_with = "de_timestamp")]
    published: DateTime<Utc>,

    /// Number of replies in the thread.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    replies_count: Option<u32>,

    /// Number of distinct participants in the thread.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    participants_count: Option<u32>,

    /// `news`, `blogs` or `discussions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    site_type: Option<String>,

    /// Country code of the site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    spam_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    main_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    performance_score: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    domain_rank: Option<u64>,

    /// Social network share counters, passed through as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    social: Option<Value>,

    /// Fields the API returned that are not modeled above.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Thread {
    /// Returns the thread identifier (if present).
    pub fn uuid(&self) -> Option<&str> {
        str_opt_ref!(self.uuid)
    }

    /// Returns the thread URL (if present).
    pub fn url(&self) -> Option<&str> {
        str_opt_ref!(self.url)
    }

    /// Returns the full host name of the site (if present).
    pub fn site_full(&self) -> Option<&str> {
        str_opt_ref!(self.site_full)
    }

    /// Returns the domain of the site (if present).
    pub fn site(&self) -> Option<&str> {
        str_opt_ref!(self.site)
    }

    /// Returns the site section URL (if present).
    pub fn site_section(&self) -> Option<&str> {
        str_opt_ref!(self.site_section)
    }

    /// Returns the site section title (if present).
    pub fn section_title(&self) -> Option<&str> {
        str_opt_ref!(self.section_title)
    }

    /// Returns the thread title as sent by the API.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the full thread title, falling back to [`Thread::title`].
    pub fn title_full(&self) -> &str {
        self.title_full.as_deref().unwrap_or(&self.title)
    }

    /// Returns the publication time in UTC.
    pub fn published(&self) -> DateTime<Utc> {
        self.published
    }

    /// Returns the number of replies (if present).
    pub fn replies_count(&self) -> Option<u32> {
        self.replies_count
    }

    /// Returns the number of participants (if present).
    pub fn participants_count(&self) -> Option<u32> {
        self.participants_count
    }

    /// Returns the site type (if present).
    pub fn site_type(&self) -> Option<&str> {
        str_opt_ref!(self.site_type)
    }

    /// Returns the site's country code (if present).
    pub fn country(&self) -> Option<&str> {
        str_opt_ref!(self.country)
    }

    /// Returns the spam score between 0 and 1 (if present).
    pub fn spam_score(&self) -> Option<f64> {
        self.spam_score
    }

    /// Returns the URL of the thread's main image (if present).
    pub fn main_image(&self) -> Option<&str> {
        str_opt_ref!(self.main_image)
    }

    /// Returns the virality score (if present).
    pub fn performance_score(&self) -> Option<u32> {
        self.performance_score
    }

    /// Returns the site's popularity rank (if present).
    pub fn domain_rank(&self) -> Option<u64> {
        self.domain_rank
    }

    /// Returns social share counters as raw JSON (if present).
    pub fn social(&self) -> Option<&Value> {
        self.social.as_ref()
    }

    /// Returns a raw field the crate does not model.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::Thread;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn title_full_falls_back_to_title() {
        let thread: Thread = serde_json::from_value(json!({
            "title": "Short title",
            "published": "2016-06-01T10:00:00.000+03:00",
            "site_section": "http://example.com/world",
            "country": "US",
        }))
        .unwrap();
        assert_eq!(thread.title_full(), "Short title");
        assert_eq!(thread.site_section(), Some("http://example.com/world"));
        assert_eq!(thread.section_title(), None);
        assert_eq!(thread.country(), Some("US"));
        assert_eq!(
            thread.published(),
            Utc.with_ymd_and_hms(2016, 6, 1, 7, 0, 0).unwrap()
        );
    }

    #[test]
    fn title_full_wins_when_present() {
        let thread: Thread = serde_json::from_value(json!({
            "title": "Short",
            "title_full": "Short title, but longer",
            "published": "2016-06-01T10:00:00.000+00:00",
            "site_categories": ["tech"],
        }))
        .unwrap();
        assert_eq!(thread.title_full(), "Short title, but longer");
        assert_eq!(thread.extra("site_categories"), Some(&json!(["tech"])));
    }

    #[test]
    fn null_title_decodes_as_empty() {
        let thread: Thread = serde_json::from_value(json!({
            "title": null,
            "title_full": null,
            "published": "2016-06-01T10:00:00.000+00:00",
        }))
        .unwrap();
        assert_eq!(thread.title(), "");
        assert_eq!(thread.title_full(), "");
    }

    #[test]
    fn missing_published_is_an_error() {
        let res: Result<Thread, _> = serde_json::from_value(json!({ "title": "x" }));
        assert!(res.is_err());
    }
}
