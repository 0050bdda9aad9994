//! Predicate builder.
//!
//! Every rule is an owned closure; [`Filter::matches`] ANDs them. Absent or
//! blank criteria add nothing, so an empty filter matches every entity.

use std::collections::BTreeSet;

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

pub struct Filter<T> {
    rules: Vec<Predicate<T>>,
}

impl<T: 'static> Default for Filter<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

/// Treat `None`, `""` and whitespace-only strings as "no criterion".
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl<T: 'static> Filter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary rule.
    pub fn and(mut self, rule: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Exact, case-sensitive string equality.
    pub fn text_eq(self, value: Option<&str>, get: fn(&T) -> Option<&str>) -> Self {
        match present(value) {
            Some(v) => {
                let wanted = v.to_owned();
                self.and(move |e| get(e) == Some(wanted.as_str()))
            }
            None => self,
        }
    }

    /// Case-insensitive substring match.
    pub fn contains_ci(self, value: Option<&str>, get: fn(&T) -> Option<&str>) -> Self {
        match present(value) {
            Some(v) => {
                let needle = v.to_lowercase();
                self.and(move |e| get(e).is_some_and(|s| s.to_lowercase().contains(&needle)))
            }
            None => self,
        }
    }

    /// Case-sensitive substring match.
    pub fn contains(self, value: Option<&str>, get: fn(&T) -> Option<&str>) -> Self {
        match present(value) {
            Some(v) => {
                let needle = v.to_owned();
                self.and(move |e| get(e).is_some_and(|s| s.contains(needle.as_str())))
            }
            None => self,
        }
    }

    /// Exact equality on a copyable value (ids, flags).
    pub fn equals<V>(self, value: Option<V>, get: fn(&T) -> V) -> Self
    where
        V: PartialEq + Send + Sync + 'static,
    {
        match value {
            Some(wanted) => self.and(move |e| get(e) == wanted),
            None => self,
        }
    }

    /// Inclusive range; each bound applies only when present.
    pub fn range<V>(self, min: Option<V>, max: Option<V>, get: fn(&T) -> V) -> Self
    where
        V: PartialOrd + Send + Sync + 'static,
    {
        let this = match min {
            Some(lo) => self.and(move |e| get(e) >= lo),
            None => self,
        };
        match max {
            Some(hi) => this.and(move |e| get(e) <= hi),
            None => this,
        }
    }

    /// Token membership: the entity's tag set holds a tag equal to `value`.
    pub fn has_tag(self, value: Option<&str>, get: fn(&T) -> &BTreeSet<String>) -> Self {
        match present(value) {
            Some(v) => {
                let tag = v.to_owned();
                self.and(move |e| get(e).contains(&tag))
            }
            None => self,
        }
    }

    /// Boolean derived from a count: `true` keeps `n > 0`, `false` keeps `n == 0`.
    pub fn nonzero(self, flag: Option<bool>, get: fn(&T) -> i64) -> Self {
        match flag {
            Some(true) => self.and(move |e| get(e) > 0),
            Some(false) => self.and(move |e| get(e) == 0),
            None => self,
        }
    }

    /// Soft-delete gate: when `active_only` is set, hide inactive entities.
    pub fn active_only(self, active_only: bool, get: fn(&T) -> bool) -> Self {
        if active_only {
            self.and(get)
        } else {
            self
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn matches(&self, entity: &T) -> bool {
        self.rules.iter().all(|rule| rule(entity))
    }
}
