use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{de_null_default, de_timestamp, macros::str_opt_ref, thread::Thread};

/// A single search result: one post (article, blog entry, comment).
///
/// Timestamps are parsed while decoding and normalized to UTC; the
/// named entities the API extracted are lifted out of the nested
/// `entities` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique post identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uuid: Option<String>,

    /// Post URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,

    /// Position of the post inside its thread (0 for the first post).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ord_in_thread: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,

    /// Publication time, normalized to UTC.
    #[serde(deserialize_with = "de_timestamp")]
    published: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    /// Text fragment with the matched terms highlighted.
    #[serde(
        rename = "highlightText",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    highlight_text: Option<String>,

    /// Title with the matched terms highlighted.
    #[serde(
        rename = "highlightTitle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    highlight_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,

    /// Links found in the post body.
    #[serde(default, deserialize_with = "de_null_default")]
    external_links: Vec<String>,

    /// Review rating, for review sites.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating: Option<f64>,

    /// Crawl time, normalized to UTC.
    #[serde(deserialize_with = "de_timestamp")]
    crawled: DateTime<Utc>,

    entities: Entities,

    thread: Thread,

    /// Fields the API returned that are not modeled above.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Named entities the API extracted from a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default, deserialize_with = "de_null_default")]
    persons: Vec<Entity>,
    #[serde(default, deserialize_with = "de_null_default")]
    organizations: Vec<Entity>,
    #[serde(default, deserialize_with = "de_null_default")]
    locations: Vec<Entity>,
}

/// A person, organization or location mentioned in a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sentiment: Option<String>,
}

impl Entity {
    /// Returns the entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `positive`, `negative` or `none` (if present).
    pub fn sentiment(&self) -> Option<&str> {
        str_opt_ref!(self.sentiment)
    }
}

impl Post {
    /// Returns the post identifier (if present).
    pub fn uuid(&self) -> Option<&str> {
        str_opt_ref!(self.uuid)
    }

    /// Returns the post URL (if present).
    pub fn url(&self) -> Option<&str> {
        str_opt_ref!(self.url)
    }

    /// Returns the position of the post in its thread (if present).
    pub fn ord_in_thread(&self) -> Option<u32> {
        self.ord_in_thread
    }

    /// Returns the author's name (if present).
    pub fn author(&self) -> Option<&str> {
        str_opt_ref!(self.author)
    }

    /// Returns the publication time in UTC.
    pub fn published(&self) -> DateTime<Utc> {
        self.published
    }

    /// Returns the crawl time in UTC.
    pub fn crawled(&self) -> DateTime<Utc> {
        self.crawled
    }

    /// Returns the post title (if present).
    pub fn title(&self) -> Option<&str> {
        str_opt_ref!(self.title)
    }

    /// Returns the post body (if present).
    pub fn text(&self) -> Option<&str> {
        str_opt_ref!(self.text)
    }

    /// Returns the highlighted text fragment (if present).
    pub fn highlight_text(&self) -> Option<&str> {
        str_opt_ref!(self.highlight_text)
    }

    /// Returns the highlighted title (if present).
    pub fn highlight_title(&self) -> Option<&str> {
        str_opt_ref!(self.highlight_title)
    }

    /// Returns the post language (if present).
    pub fn language(&self) -> Option<&str> {
        str_opt_ref!(self.language)
    }

    /// Returns links found in the post body.
    pub fn external_links(&self) -> &[String] {
        &self.external_links
    }

    /// Returns the review rating (if present).
    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    /// Returns the persons mentioned in the post.
    pub fn persons(&self) -> &[Entity] {
        &self.entities.persons
    }

    /// Returns the locations mentioned in the post.
    pub fn locations(&self) -> &[Entity] {
        &self.entities.locations
    }

    /// Returns the organizations mentioned in the post.
    pub fn organizations(&self) -> &[Entity] {
        &self.entities.organizations
    }

    /// Returns the thread the post belongs to.
    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    /// Returns a raw field the crate does not model.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::Post;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    pub(crate) fn sample(uuid: &str) -> Value {
        json!({
            "uuid": uuid,
            "url": format!("http://example.com/{uuid}"),
            "ord_in_thread": 0,
            "author": "Jane Doe",
            "published": "2016-06-01T10:00:00.000+03:00",
            "title": "Cats take over",
            "text": "Cats everywhere.",
            "highlightText": "<em>Cats</em> everywhere.",
            "language": "english",
            "external_links": ["http://cats.example.com"],
            "entities": {
                "persons": [{ "name": "jane doe", "sentiment": "positive" }],
                "organizations": [{ "name": "cat council", "sentiment": "none" }],
                "locations": [{ "name": "paris", "sentiment": "none" }]
            },
            "rating": null,
            "crawled": "2016-06-01T11:30:00.000+03:00",
            "thread": {
                "uuid": "t-1",
                "site": "example.com",
                "section_title": "World",
                "title": "Cats take over",
                "published": "2016-06-01T10:00:00.000+03:00",
                "country": "FR"
            }
        })
    }

    #[test]
    fn derived_fields() {
        let post: Post = serde_json::from_value(sample("p-1")).unwrap();
        assert_eq!(
            post.published(),
            Utc.with_ymd_and_hms(2016, 6, 1, 7, 0, 0).unwrap()
        );
        assert_eq!(
            post.crawled(),
            Utc.with_ymd_and_hms(2016, 6, 1, 8, 30, 0).unwrap()
        );
        assert_eq!(post.persons()[0].name(), "jane doe");
        assert_eq!(post.persons()[0].sentiment(), Some("positive"));
        assert_eq!(post.organizations()[0].name(), "cat council");
        assert_eq!(post.locations()[0].name(), "paris");
        assert_eq!(post.highlight_text(), Some("<em>Cats</em> everywhere."));
        assert_eq!(post.external_links(), ["http://cats.example.com"]);
        assert_eq!(post.rating(), None);
        assert_eq!(post.thread().title_full(), "Cats take over");
        assert_eq!(post.thread().country(), Some("FR"));
    }

    #[test]
    fn unknown_fields_are_kept() {
        let mut raw = sample("p-2");
        raw["new_api_field"] = json!(42);
        let post: Post = serde_json::from_value(raw).unwrap();
        assert_eq!(post.extra("new_api_field"), Some(&json!(42)));
    }

    #[test]
    fn null_lists_decode_as_empty() {
        let mut raw = sample("p-5");
        raw["external_links"] = Value::Null;
        raw["entities"]["persons"] = Value::Null;
        let post: Post = serde_json::from_value(raw).unwrap();
        assert!(post.external_links().is_empty());
        assert!(post.persons().is_empty());
        assert_eq!(post.locations()[0].name(), "paris");
    }

    #[test]
    fn missing_external_links_decode_as_empty() {
        let mut raw = sample("p-6");
        raw.as_object_mut().unwrap().remove("external_links");
        let post: Post = serde_json::from_value(raw).unwrap();
        assert!(post.external_links().is_empty());
    }

    #[test]
    fn missing_entities_is_an_error() {
        let mut raw = sample("p-3");
        raw.as_object_mut().unwrap().remove("entities");
        assert!(serde_json::from_value::<Post>(raw).is_err());
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let mut raw = sample("p-4");
        raw["crawled"] = json!("last tuesday");
        let err = serde_json::from_value::<Post>(raw).unwrap_err();
        assert!(err.to_string().contains("last tuesday"));
    }
}
