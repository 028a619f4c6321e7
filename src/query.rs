//! Query component and its key-value pairs.

use alloc::{
    borrow::Cow,
    collections::{btree_map::Entry, BTreeMap},
    string::String,
    vec::Vec,
};
use core::{fmt, iter::FusedIterator, slice, str::Split};
use ref_cast::{ref_cast_custom, RefCastCustom};

#[cfg(feature = "serde")]
use serde::{ser::SerializeMap, Serialize, Serializer};

/// A validated [query] component, without the leading `'?'`.
///
/// [query]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.4
///
/// A query is split on `'&'` into segments, each of which is split at its
/// first `'='` into a key and a value. A segment without `'='` is a key
/// with an empty value. Every key of a parsed query is non-empty, so a
/// parsed query is never empty either.
///
/// No percent-decoding is performed.
///
/// # Examples
///
/// ```
/// use plain_uri::Uri;
///
/// let uri = Uri::parse("http://example.com/?lang=en&lang=fr&debug")?;
/// let query = uri.query().unwrap();
/// assert_eq!(query.as_str(), "lang=en&lang=fr&debug");
/// assert!(query
///     .pairs()
///     .eq([("lang", "en"), ("lang", "fr"), ("debug", "")]));
///
/// let map = query.to_map();
/// assert_eq!(map.get("lang"), Some("en,fr"));
/// assert_eq!(map.get("debug"), Some(""));
/// # Ok::<_, plain_uri::ParseError>(())
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct Query {
    inner: str,
}

impl Query {
    #[ref_cast_custom]
    #[inline]
    pub(crate) const fn new_validated(query: &str) -> &Query;

    /// Returns the query component as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns an iterator over the key-value pairs in input order.
    ///
    /// Duplicate keys are yielded as many times as they appear.
    pub fn pairs(&self) -> Pairs<'_> {
        Pairs {
            inner: self.inner.split('&'),
        }
    }

    /// Collects the key-value pairs into a [`QueryMap`].
    ///
    /// Values of a repeated key are joined with `','` in input order.
    pub fn to_map(&self) -> QueryMap<'_> {
        self.pairs().collect()
    }
}

impl PartialEq for Query {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Query {}

impl PartialEq<str> for Query {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl fmt::Debug for Query {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for Query {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// An iterator over the key-value pairs of a [`Query`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Pairs<'a> {
    inner: Split<'a, char>,
}

impl<'a> Iterator for Pairs<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|seg| seg.split_once('=').unwrap_or((seg, "")))
    }
}

impl FusedIterator for Pairs<'_> {}

/// A mapping from query keys to values.
///
/// Keys are kept in order of first appearance. A value that appears once
/// borrows from the query, while the values of a repeated key are joined
/// with `','` into an owned string, e.g., `a=1&a=2` maps `a` to `1,2`.
///
/// An empty `QueryMap` is returned for a URI without a query.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct QueryMap<'a> {
    entries: Vec<(&'a str, Cow<'a, str>)>,
    // Key to position in `entries`.
    index: BTreeMap<&'a str, usize>,
}

impl<'a> QueryMap<'a> {
    /// Creates an empty `QueryMap`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Inserts a pair, joining the value onto an existing one with `','`.
    fn insert(&mut self, key: &'a str, value: &'a str) {
        match self.index.entry(key) {
            Entry::Occupied(e) => {
                let joined: &mut String = self.entries[*e.get()].1.to_mut();
                joined.push(',');
                joined.push_str(value);
            }
            Entry::Vacant(e) => {
                e.insert(self.entries.len());
                self.entries.push((key, Cow::Borrowed(value)));
            }
        }
    }

    /// Returns the value for the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_ref())
    }

    /// Checks whether the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the keys in order of first appearance.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Returns an iterator over the entries in order of first appearance.
    pub fn iter(&self) -> Iter<'_, 'a> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for QueryMap<'a> {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut map = QueryMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<'a> IntoIterator for QueryMap<'a> {
    type Item = (&'a str, Cow<'a, str>);
    type IntoIter = alloc::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'m, 'a> IntoIterator for &'m QueryMap<'a> {
    type Item = (&'a str, &'m str);
    type IntoIter = Iter<'m, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for QueryMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(feature = "serde")]
impl Serialize for QueryMap<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// An iterator over the entries of a [`QueryMap`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'m, 'a> {
    inner: slice::Iter<'m, (&'a str, Cow<'a, str>)>,
}

impl<'m, 'a> Iterator for Iter<'m, 'a> {
    type Item = (&'a str, &'m str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (*k, v.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_, '_> {}

impl FusedIterator for Iter<'_, '_> {}
