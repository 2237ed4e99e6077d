//! Driven port for the on-device contact store.
//!
//! The store is a keyed collection of contacts with observable queries. Each
//! query stream emits the current snapshot as soon as it is polled and again
//! after every mutation, ordered by name ascending.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::domain::Contact;

use super::define_port_error;

/// Live sequence of contact lists produced by a store query.
pub type ContactStream = BoxStream<'static, Vec<Contact>>;

/// Wildcard marker wrapped around search queries.
pub const WILDCARD: char = '%';

/// Single-character wildcard honoured by [`SearchPattern::matches`].
pub const SINGLE_WILDCARD: char = '_';

/// Case-insensitive `LIKE` pattern matched against name, last name, and phone.
///
/// # Examples
/// ```
/// use contacts::domain::Contact;
/// use contacts::domain::ports::SearchPattern;
///
/// let pattern = SearchPattern::contains("LOVE");
/// assert_eq!(pattern.as_str(), "%LOVE%");
/// assert!(pattern.matches(&Contact::new("Ada", "Lovelace", "8095550100", "")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchPattern(String);

impl SearchPattern {
    /// Wrap `query` with wildcards on both ends.
    pub fn contains(query: &str) -> Self {
        Self(format!("{WILDCARD}{query}{WILDCARD}"))
    }

    /// Raw pattern including wildcard markers.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether any searchable field of `contact` matches.
    pub fn matches(&self, contact: &Contact) -> bool {
        let pattern = fold(&self.0);
        [&contact.name, &contact.last_name, &contact.phone]
            .into_iter()
            .any(|field| like(&pattern, &fold(field)))
    }
}

impl AsRef<str> for SearchPattern {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

fn fold(raw: &str) -> Vec<char> {
    raw.chars().flat_map(char::to_lowercase).collect()
}

// Iterative wildcard match with single-star backtracking.
fn like(pattern: &[char], text: &[char]) -> bool {
    let (mut p, mut t) = (0_usize, 0_usize);
    let mut resume: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(&WILDCARD) => {
                resume = Some((p, t));
                p += 1;
            }
            Some(&c) if c == SINGLE_WILDCARD || Some(&c) == text.get(t) => {
                p += 1;
                t += 1;
            }
            _ => match resume {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    resume = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern
        .get(p..)
        .is_some_and(|rest| rest.iter().all(|&c| c == WILDCARD))
}

define_port_error! {
    /// Errors raised by local store adapters.
    pub enum ContactStoreError {
        /// Durable storage could not be read or written.
        Io("contact store io failed") => Unknown,
        /// Stored rows could not be encoded or decoded.
        Serialization("contact store serialization failed") => Unknown,
    }
}

/// Port for the local persisted contact store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocalContactStore: Send + Sync {
    /// Observe every contact, ordered by name ascending.
    fn observe_all(&self) -> ContactStream;

    /// Observe contacts whose name, last name, or phone match `pattern`.
    fn observe_search(&self, pattern: &SearchPattern) -> ContactStream;

    /// Insert or replace a contact by id.
    ///
    /// A contact with id `0` receives a fresh identity; the stored row is
    /// returned either way.
    async fn upsert(&self, contact: &Contact) -> Result<Contact, ContactStoreError>;

    /// Remove the row with `contact.id`. Missing rows are ignored.
    async fn delete(&self, contact: &Contact) -> Result<(), ContactStoreError>;

    /// Remove every row whose id appears in `contacts`.
    async fn delete_many(&self, contacts: &[Contact]) -> Result<(), ContactStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ada() -> Contact {
        Contact::new("Ada", "Lovelace", "8095550100", "")
    }

    #[rstest]
    #[case("ada")]
    #[case("LOVE")]
    #[case("555")]
    #[case("")]
    #[case("a_a")]
    fn matches_any_searchable_field(#[case] query: &str) {
        assert!(SearchPattern::contains(query).matches(&ada()));
    }

    #[rstest]
    #[case("grace")]
    #[case("999")]
    #[case("https")]
    fn rejects_non_matching_queries(#[case] query: &str) {
        let contact = Contact::new("Ada", "Lovelace", "8095550100", "https://img/ada");
        assert!(
            !SearchPattern::contains(query).matches(&contact),
            "image url is not searchable"
        );
    }

    #[rstest]
    #[case("%", "", true)]
    #[case("a%c", "abbbc", true)]
    #[case("a%c", "abbbd", false)]
    #[case("%b%", "abc", true)]
    #[case("_b_", "abc", true)]
    #[case("_b", "abc", false)]
    #[case("%%", "x", true)]
    #[case("abc", "ab", false)]
    fn like_follows_sql_wildcards(#[case] pattern: &str, #[case] text: &str, #[case] expected: bool) {
        assert_eq!(like(&fold(pattern), &fold(text)), expected);
    }

    #[rstest]
    fn store_errors_format_messages() {
        assert_eq!(
            ContactStoreError::io("disk full").to_string(),
            "contact store io failed: disk full"
        );
        assert_eq!(
            ContactStoreError::serialization("bad row").to_string(),
            "contact store serialization failed: bad row"
        );
    }
}
