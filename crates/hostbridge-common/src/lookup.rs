//! Tri-state lookup result.
//!
//! Every slot operation answers with one of three outcomes:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | `Absent` | the capability does not exist on this member |
//! | `Null` | the capability exists and produced a null value |
//! | `Value(v)` | the capability exists and produced `v` |
//!
//! `Absent` and `Null` are distinct values, so a caller can always tell
//! "doesn't exist" apart from "exists and is empty".

/// Result of reading, writing, or invoking a member.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lookup<T> {
    /// No such capability.
    #[default]
    Absent,
    /// The capability exists; its value is null.
    Null,
    /// The capability exists and produced a value.
    Value(T),
}

impl<T> Lookup<T> {
    /// Wrap a nullable value as a present result.
    #[inline]
    pub fn present(value: Option<T>) -> Self {
        match value {
            Some(v) => Lookup::Value(v),
            None => Lookup::Null,
        }
    }

    #[inline]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    #[inline]
    pub const fn is_present(&self) -> bool {
        !self.is_absent()
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Lookup::Null)
    }

    /// Borrow the value, if one was produced.
    #[inline]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Lookup::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Take the value, if one was produced.
    #[inline]
    pub fn into_value(self) -> Option<T> {
        match self {
            Lookup::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Collapse into nested options: `None` when absent, `Some(None)` when null.
    #[inline]
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Lookup::Absent => None,
            Lookup::Null => Some(None),
            Lookup::Value(v) => Some(Some(v)),
        }
    }

    #[inline]
    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Lookup::Absent => Lookup::Absent,
            Lookup::Null => Lookup::Null,
            Lookup::Value(v) => Lookup::Value(v),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Absent => Lookup::Absent,
            Lookup::Null => Lookup::Null,
            Lookup::Value(v) => Lookup::Value(f(v)),
        }
    }

    /// Fall through to `f` only when this result is absent.
    ///
    /// A present-null result does not fall through.
    pub fn or_else(self, f: impl FnOnce() -> Lookup<T>) -> Lookup<T> {
        match self {
            Lookup::Absent => f(),
            present => present,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        Lookup::present(value)
    }
}

#[cfg(test)]
#[path = "../tests/lookup_tests.rs"]
mod tests;
