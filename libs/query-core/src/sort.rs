use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::QueryError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    /// `"desc"` in any case selects descending order, anything else ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

/// Comparable projection of an entity attribute.
///
/// Values of one field always share a variant; `Null` sorts before anything.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Time(DateTime<Utc>),
}

impl SortValue {
    pub fn text(s: &str) -> Self {
        Self::Text(s.to_owned())
    }

    pub fn opt_text(s: Option<&str>) -> Self {
        s.map_or(Self::Null, Self::text)
    }
}

type Extractor<T> = fn(&T) -> SortValue;

/// Whitelist of sortable fields for one entity type.
///
/// Lookup is case-insensitive, so `createdAt` and `createdat` resolve to the
/// same key.
pub struct SortFields<T> {
    fields: Vec<(&'static str, Extractor<T>)>,
}

impl<T> Default for SortFields<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T> SortFields<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, extract: Extractor<T>) -> Self {
        self.fields.push((name, extract));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(n, _)| *n)
    }

    /// Resolve `name` (as sent by the client) with the given direction.
    pub fn resolve(&self, name: &str, dir: SortDir) -> Result<SortKey<T>, QueryError> {
        let wanted = name.trim();
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(wanted))
            .map(|(n, extract)| SortKey {
                field: *n,
                dir,
                extract: *extract,
            })
            .ok_or_else(|| QueryError::invalid_sort_field(wanted))
    }
}

/// A resolved single-key ordering.
pub struct SortKey<T> {
    field: &'static str,
    dir: SortDir,
    extract: Extractor<T>,
}

impl<T> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SortKey<T> {}

impl<T> std::fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortKey")
            .field("field", &self.field)
            .field("dir", &self.dir)
            .finish()
    }
}

impl<T> SortKey<T> {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn dir(&self) -> SortDir {
        self.dir
    }

    pub fn value_of(&self, item: &T) -> SortValue {
        (self.extract)(item)
    }

    /// Stable in-place sort. Equal keys keep their incoming relative order in
    /// both directions.
    pub fn sort(&self, items: &mut Vec<T>) {
        let mut keyed: Vec<(SortValue, T)> =
            items.drain(..).map(|it| (self.value_of(&it), it)).collect();
        keyed.sort_by(|(a, _), (b, _)| self.dir.apply(a.cmp(b)));
        items.extend(keyed.into_iter().map(|(_, it)| it));
    }
}
