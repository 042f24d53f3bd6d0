use std::{collections::BTreeMap, fmt};

use crate::{error::Error, result::Result};

macro_rules! field_table {
    (
        $(#[$meta:meta])*
        $table:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => ($name:literal, $key:literal),
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $table {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $table {
            /// Every field of the table, in rendering order.
            pub const ALL: &'static [$table] = &[$($table::$variant),+];

            /// The snake_case name accepted by [`Query::set`].
            pub fn name(self) -> &'static str {
                match self {
                    $($table::$variant => $name,)+
                }
            }

            /// The key written into the rendered query string.
            pub fn key(self) -> &'static str {
                match self {
                    $($table::$variant => $key,)+
                }
            }

            /// Looks a field up by its snake_case name.
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|field| field.name() == name)
            }
        }

        impl fmt::Display for $table {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

field_table! {
    /// Single valued filters, rendered as `key:value`.
    DirectField {
        /// Post title.
        Title => ("title", "title"),
        /// Post body text.
        Text => ("text", "text"),
        /// Post URL.
        Url => ("url", "url"),
        /// URL of the containing thread.
        ThreadUrl => ("thread_url", "thread.url"),
        /// Full site name of the containing thread.
        ThreadSiteFull => ("thread_site_full", "thread.site_full"),
        /// Virality score, e.g. `>5`.
        PerformanceScore => ("performance_score", "performance_score"),
        /// Spam score, e.g. `<0.5`.
        SpamScore => ("spam_score", "spam_score"),
        /// Site popularity rank, e.g. `<1000`.
        DomainRank => ("domain_rank", "domain_rank"),
        /// Number of replies in the thread.
        ThreadRepliesCount => ("thread_replies_count", "thread.replies_count"),
        /// Number of participants in the thread.
        ThreadParticipantsCount => ("thread_participants_count", "thread.participants_count"),
        /// Publication time, e.g. `>1451606400000`.
        Published => ("published", "published"),
        /// Crawl time.
        Crawled => ("crawled", "crawled"),
        /// Review rating.
        Rating => ("rating", "rating"),
    }
}

field_table! {
    /// Multi valued filters, rendered as an OR group of `key:value` terms.
    ListField {
        /// Site domain, e.g. `cnn.com`.
        Site => ("site", "site"),
        /// Site type: `news`, `blogs`, `discussions`.
        SiteType => ("site_type", "site_type"),
        /// Site category, e.g. `tech`.
        SiteCategory => ("site_category", "site_category"),
        /// Top level domain suffix, e.g. `uk`.
        SiteSuffix => ("site_suffix", "site_suffix"),
        /// Full host name, e.g. `edition.cnn.com`.
        SiteFull => ("site_full", "site_full"),
        /// Post author.
        Author => ("author", "author"),
        /// Person mentioned in the post.
        Person => ("person", "person"),
        /// Organization mentioned in the post.
        Organization => ("organization", "organization"),
        /// Location mentioned in the post.
        Location => ("location", "location"),
        /// Post identifier.
        Uuid => ("uuid", "uuid"),
    }
}

/// One or more values for a [`ListField`].
///
/// A single string converts into a one element list, so
/// `query.list(ListField::Site, "cnn.com")` and
/// `query.list(ListField::Site, ["cnn.com"])` are the same filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(Vec<String>);

impl Values {
    fn into_inner(self) -> Vec<String> {
        self.0.into_iter().filter(|v| !v.is_empty()).collect()
    }
}

impl From<&str> for Values {
    fn from(value: &str) -> Self {
        Values(vec![value.to_string()])
    }
}

impl From<String> for Values {
    fn from(value: String) -> Self {
        Values(vec![value])
    }
}

impl<S: Into<String>> From<Vec<S>> for Values {
    fn from(values: Vec<S>) -> Self {
        Values(values.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Values {
    fn from(values: [S; N]) -> Self {
        Values(values.into_iter().map(Into::into).collect())
    }
}

/// Structured search filters, rendered into a single webhose query string.
///
/// Fields that are not set (or set to an empty string or empty list)
/// never appear in the output. The output order is fixed and does not
/// depend on the order the setters were called in.
///
/// ```rust
/// use webhose::query::{ListField, Query};
///
/// let query = Query::new()
///     .all_terms("ipod")
///     .exclude("nano")
///     .list(ListField::Site, ["cnn.com", "bbc.co.uk"]);
///
/// assert_eq!(
///     query.to_string(),
///     "ipod -nano (site:cnn.com OR site:bbc.co.uk)"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    all_terms: Option<String>,
    exact_phrase: Option<String>,
    some_terms: Option<String>,
    exclude: Option<String>,
    is_first: bool,
    thread_title: Option<String>,
    thread_section_title: Option<String>,
    language: Option<String>,
    thread_country: Option<String>,
    direct: BTreeMap<DirectField, String>,
    lists: BTreeMap<ListField, Vec<String>>,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    Some(value.into()).filter(|v| !v.is_empty())
}

fn parse_flag(field: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        _ => Err(Error::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

impl Query {
    /// Creates a query with no filters set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a query from `(name, value)` pairs using the snake_case
    /// field names.
    ///
    /// # Errors
    ///
    /// Fails on the first unrecognized name or invalid flag value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::new();
        for (name, value) in pairs {
            query.set(name.as_ref(), value.as_ref())?;
        }
        Ok(query)
    }

    /// Sets one filter by its snake_case name.
    ///
    /// A value given for a list field replaces that field with a one
    /// element list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] when `name` is not a recognized
    /// filter, and [`Error::InvalidValue`] when `is_first` is not a boolean.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "all_terms" => self.all_terms = non_empty(value),
            "exact_phrase" => self.exact_phrase = non_empty(value),
            "some_terms" => self.some_terms = non_empty(value),
            "exclude" => self.exclude = non_empty(value),
            "is_first" => self.is_first = parse_flag(name, value)?,
            "thread_title" => self.thread_title = non_empty(value),
            "thread_section_title" => self.thread_section_title = non_empty(value),
            "language" => self.language = non_empty(value),
            "thread_country" => self.thread_country = non_empty(value),
            _ => {
                if let Some(field) = DirectField::from_name(name) {
                    self.set_direct(field, value);
                } else if let Some(field) = ListField::from_name(name) {
                    self.set_list(field, value.into());
                } else {
                    return Err(Error::UnknownField(name.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Terms that must all appear, passed through verbatim.
    #[must_use]
    pub fn all_terms(mut self, value: impl Into<String>) -> Self {
        self.all_terms = non_empty(value);
        self
    }

    /// A phrase that must appear exactly.
    #[must_use]
    pub fn exact_phrase(mut self, value: impl Into<String>) -> Self {
        self.exact_phrase = non_empty(value);
        self
    }

    /// Space separated words of which at least one must appear.
    #[must_use]
    pub fn some_terms(mut self, value: impl Into<String>) -> Self {
        self.some_terms = non_empty(value);
        self
    }

    /// A term that must not appear.
    #[must_use]
    pub fn exclude(mut self, value: impl Into<String>) -> Self {
        self.exclude = non_empty(value);
        self
    }

    /// Restricts results to the first post of each thread.
    #[must_use]
    pub fn is_first(mut self, value: bool) -> Self {
        self.is_first = value;
        self
    }

    /// Filters on the thread title.
    #[must_use]
    pub fn thread_title(mut self, value: impl Into<String>) -> Self {
        self.thread_title = non_empty(value);
        self
    }

    /// Filters on the title of the site section.
    #[must_use]
    pub fn thread_section_title(mut self, value: impl Into<String>) -> Self {
        self.thread_section_title = non_empty(value);
        self
    }

    /// Filters on post language, e.g. `english`.
    #[must_use]
    pub fn language(mut self, value: impl Into<String>) -> Self {
        self.language = non_empty(value);
        self
    }

    /// Filters on the thread's country code, e.g. `US`.
    #[must_use]
    pub fn thread_country(mut self, value: impl Into<String>) -> Self {
        self.thread_country = non_empty(value);
        self
    }

    /// Sets a single valued filter.
    #[must_use]
    pub fn direct(mut self, field: DirectField, value: impl Into<String>) -> Self {
        self.set_direct(field, value);
        self
    }

    /// Sets a multi valued filter. An empty list clears the field.
    #[must_use]
    pub fn list(mut self, field: ListField, values: impl Into<Values>) -> Self {
        self.set_list(field, values.into());
        self
    }

    /// Shorthand for `list(ListField::Site, values)`.
    #[must_use]
    pub fn site(self, values: impl Into<Values>) -> Self {
        self.list(ListField::Site, values)
    }

    /// Returns the value of a single valued filter, if set.
    pub fn direct_value(&self, field: DirectField) -> Option<&str> {
        self.direct.get(&field).map(String::as_str)
    }

    /// Returns the values of a multi valued filter. Empty when unset.
    pub fn list_values(&self, field: ListField) -> &[String] {
        self.lists.get(&field).map_or(&[][..], Vec::as_slice)
    }

    fn set_direct(&mut self, field: DirectField, value: impl Into<String>) {
        match non_empty(value) {
            Some(value) => self.direct.insert(field, value),
            None => self.direct.remove(&field),
        };
    }

    fn set_list(&mut self, field: ListField, values: Values) {
        let values = values.into_inner();
        if values.is_empty() {
            self.lists.remove(&field);
        } else {
            self.lists.insert(field, values);
        }
    }

    /// Renders the filters into a webhose query string.
    pub fn query_string(&self) -> String {
        let mut qs = Vec::new();
        if let Some(terms) = &self.all_terms {
            qs.push(terms.clone());
        }
        if let Some(phrase) = &self.exact_phrase {
            qs.push(format!("\"{phrase}\""));
        }
        if let Some(terms) = &self.some_terms {
            qs.push(format!("({})", terms.replace(' ', " OR ")));
        }
        if let Some(term) = &self.exclude {
            qs.push(format!("-{term}"));
        }
        if self.is_first {
            qs.push("is_first:true".to_string());
        }
        if let Some(title) = &self.thread_title {
            qs.push(format!("thread.title:({title})"));
        }
        if let Some(title) = &self.thread_section_title {
            qs.push(format!("thread.section_title:({title})"));
        }
        if let Some(language) = &self.language {
            qs.push(format!("language:({language})"));
        }
        if let Some(country) = &self.thread_country {
            qs.push(format!("thread.country:{country}"));
        }
        qs.extend(
            self.direct
                .iter()
                .map(|(field, value)| format!("{field}:{value}")),
        );
        qs.extend(
            self.lists
                .iter()
                .map(|(field, values)| list_string(*field, values)),
        );
        qs.join(" ")
    }
}

fn list_string(field: ListField, values: &[String]) -> String {
    let terms: Vec<String> = values.iter().map(|v| format!("{field}:{v}")).collect();
    format!("({})", terms.join(" OR "))
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BESPOKE: &[&str] = &[
        "all_terms",
        "exact_phrase",
        "some_terms",
        "exclude",
        "is_first",
        "thread_title",
        "thread_section_title",
        "language",
        "thread_country",
    ];

    #[test]
    fn all_terms_verbatim() {
        assert_eq!(Query::new().all_terms("cats").to_string(), "cats");
    }

    #[test]
    fn exact_phrase_is_quoted() {
        assert_eq!(
            Query::new().exact_phrase("hello world").to_string(),
            "\"hello world\""
        );
    }

    #[test]
    fn some_terms_become_or_group() {
        assert_eq!(Query::new().some_terms("a b c").to_string(), "(a OR b OR c)");
    }

    #[test]
    fn exclude_is_negated() {
        assert_eq!(Query::new().exclude("nano").to_string(), "-nano");
    }

    #[test]
    fn single_site_is_normalized_to_list() {
        let query = Query::new().site("cnn.com");
        assert_eq!(query.list_values(ListField::Site), ["cnn.com"]);
        assert_eq!(query.to_string(), "(site:cnn.com)");
    }

    #[test]
    fn site_list_renders_or_group() {
        let query = Query::new().site(vec!["a", "b"]);
        assert_eq!(query.to_string(), "(site:a OR site:b)");
    }

    #[test]
    fn empty_list_is_unset() {
        let query = Query::new()
            .site("cnn.com")
            .list(ListField::Site, Vec::<String>::new());
        assert_eq!(query.to_string(), "");
        assert!(query.list_values(ListField::Site).is_empty());
    }

    #[test]
    fn empty_query_renders_nothing() {
        assert_eq!(Query::new().to_string(), "");
        assert_eq!(
            Query::new().all_terms("").exclude("").is_first(false).to_string(),
            ""
        );
    }

    #[test]
    fn scoped_fields_render_with_their_keys() {
        let query = Query::new()
            .is_first(true)
            .thread_title("election")
            .thread_section_title("politics")
            .language("english")
            .thread_country("US");
        assert_eq!(
            query.to_string(),
            "is_first:true thread.title:(election) thread.section_title:(politics) \
             language:(english) thread.country:US"
        );
    }

    #[test]
    fn order_is_fixed_not_insertion() {
        let query = Query::new()
            .list(ListField::Author, "jane")
            .direct(DirectField::SpamScore, "<0.5")
            .direct(DirectField::Title, "ipod")
            .thread_country("GB")
            .exclude("nano")
            .all_terms("apple");
        assert_eq!(
            query.to_string(),
            "apple -nano thread.country:GB title:ipod spam_score:<0.5 (author:jane)"
        );
    }

    #[test]
    fn dotted_direct_keys() {
        let query = Query::new()
            .direct(DirectField::ThreadRepliesCount, ">10")
            .direct(DirectField::ThreadUrl, "example.com/t/1");
        assert_eq!(
            query.to_string(),
            "thread.url:example.com/t/1 thread.replies_count:>10"
        );
    }

    #[test]
    fn lists_render_in_table_order() {
        let query = Query::new()
            .list(ListField::Location, ["paris", "berlin"])
            .list(ListField::SiteType, "news");
        assert_eq!(
            query.to_string(),
            "(site_type:news) (location:paris OR location:berlin)"
        );
    }

    #[test]
    fn set_by_name_matches_builder() {
        let built = Query::new()
            .all_terms("cats")
            .is_first(true)
            .direct(DirectField::ThreadSiteFull, "www.example.com")
            .site("cnn.com");
        let mut named = Query::new();
        named.set("all_terms", "cats").unwrap();
        named.set("is_first", "true").unwrap();
        named.set("thread_site_full", "www.example.com").unwrap();
        named.set("site", "cnn.com").unwrap();
        assert_eq!(built, named);
    }

    #[test]
    fn from_pairs_rejects_unknown_names() {
        let err = Query::from_pairs([("all_terms", "cats"), ("colour", "red")]).unwrap_err();
        assert!(matches!(err, Error::UnknownField(name) if name == "colour"));
    }

    #[test]
    fn bad_flag_is_rejected() {
        let err = Query::new().set("is_first", "maybe").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { field, .. } if field == "is_first"));
    }

    #[test]
    fn field_names_do_not_collide() {
        let mut names: Vec<&str> = BESPOKE.to_vec();
        names.extend(DirectField::ALL.iter().map(|f| f.name()));
        names.extend(ListField::ALL.iter().map(|f| f.name()));
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn every_table_name_is_settable() {
        for field in DirectField::ALL {
            let mut query = Query::new();
            query.set(field.name(), "x").unwrap();
            assert_eq!(query.to_string(), format!("{}:x", field.key()));
        }
        for field in ListField::ALL {
            let mut query = Query::new();
            query.set(field.name(), "x").unwrap();
            assert_eq!(query.to_string(), format!("({}:x)", field.key()));
        }
    }
}
