use chrono::{DateTime, Utc};

/// [`Post`](post::Post) and the entities extracted from it.
pub mod post;
/// [`Query`](query::Query) builder and its filter tables.
pub mod query;
/// Result pages and the [`Posts`](response::Posts) cursor.
pub mod response;
/// [`Thread`](thread::Thread) context of a post.
pub mod thread;

/// Parses an API timestamp such as `2016-06-01T10:00:00.000+03:00` and
/// normalizes it to UTC.
///
/// # Errors
///
/// Returns an error if `value` is not an RFC 3339 timestamp.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

pub(crate) fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: String = serde::Deserialize::deserialize(deserializer)?;
    parse_timestamp(&value)
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp `{value}`: {e}")))
}

pub(crate) fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    // `null` and a missing key both mean "empty"
    let value = <Option<T> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

pub(crate) mod macros {
    macro_rules! str_opt_ref {
        ($x:expr) => {
            $x.as_ref().map(|x| x.as_ref())
        };
    }

    pub(crate) use str_opt_ref;
}
