//! # Method Flags
//!
//! HTTP methods as single-bit flags. A [`MethodFlag`] names exactly one method
//! (what an incoming request carries); a [`MethodSet`] is any combination of
//! them (what a route is registered under).
//!
//! ```rust
//! use maskrouter::method::{MethodFlag, MethodSet};
//!
//! let set = MethodFlag::Get | MethodFlag::Post;
//! assert!(set.contains(MethodFlag::Get));
//! assert!(!set.contains(MethodFlag::Delete));
//! assert_eq!(set.names(), vec!["GET", "POST"]);
//! ```

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// A single HTTP method understood by the router.
///
/// The discriminants are the bit values routes are tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MethodFlag {
    Get = 2,
    Post = 4,
    Put = 8,
    Delete = 16,
    Head = 32,
    Patch = 64,
    Options = 128,
}

impl MethodFlag {
    /// Every method in canonical output order.
    pub const ALL: [MethodFlag; 7] = [
        MethodFlag::Get,
        MethodFlag::Post,
        MethodFlag::Put,
        MethodFlag::Delete,
        MethodFlag::Head,
        MethodFlag::Patch,
        MethodFlag::Options,
    ];

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Canonical upper-case method name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MethodFlag::Get => "GET",
            MethodFlag::Post => "POST",
            MethodFlag::Put => "PUT",
            MethodFlag::Delete => "DELETE",
            MethodFlag::Head => "HEAD",
            MethodFlag::Patch => "PATCH",
            MethodFlag::Options => "OPTIONS",
        }
    }

    fn from_bits(bits: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.bits() == bits)
    }
}

impl fmt::Display for MethodFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a method string is not one of the seven supported methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethodError {
    /// The rejected method string
    pub method: String,
}

impl fmt::Display for UnknownMethodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unsupported HTTP method '{}'. Expected one of GET, POST, PUT, DELETE, HEAD, PATCH, OPTIONS",
            self.method
        )
    }
}

impl std::error::Error for UnknownMethodError {}

impl FromStr for MethodFlag {
    type Err = UnknownMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethodError {
                method: s.to_string(),
            })
    }
}

impl From<MethodFlag> for http::Method {
    fn from(flag: MethodFlag) -> Self {
        match flag {
            MethodFlag::Get => http::Method::GET,
            MethodFlag::Post => http::Method::POST,
            MethodFlag::Put => http::Method::PUT,
            MethodFlag::Delete => http::Method::DELETE,
            MethodFlag::Head => http::Method::HEAD,
            MethodFlag::Patch => http::Method::PATCH,
            MethodFlag::Options => http::Method::OPTIONS,
        }
    }
}

impl TryFrom<&http::Method> for MethodFlag {
    type Error = UnknownMethodError;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

/// A combination of [`MethodFlag`]s stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodSet(u8);

impl MethodSet {
    pub const EMPTY: MethodSet = MethodSet(0);

    /// Every supported method
    #[must_use]
    pub fn all() -> Self {
        MethodFlag::ALL.into_iter().collect()
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `flag` is present in this set.
    #[inline]
    #[must_use]
    pub const fn contains(self, flag: MethodFlag) -> bool {
        (self.0 & flag.bits()) == flag.bits()
    }

    /// The method this set consists of, if it holds exactly one.
    #[must_use]
    pub fn as_single(self) -> Option<MethodFlag> {
        MethodFlag::from_bits(self.0)
    }

    #[must_use]
    pub fn insert(self, flag: MethodFlag) -> Self {
        MethodSet(self.0 | flag.bits())
    }

    #[must_use]
    pub const fn union(self, other: MethodSet) -> Self {
        MethodSet(self.0 | other.0)
    }

    /// Member methods in canonical order (GET, POST, PUT, DELETE, HEAD, PATCH, OPTIONS)
    pub fn iter(self) -> impl Iterator<Item = MethodFlag> {
        MethodFlag::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    /// Member method names in canonical order
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        if let Some(single) = self.as_single() {
            return vec![single.as_str()];
        }
        self.iter().map(MethodFlag::as_str).collect()
    }
}

impl From<MethodFlag> for MethodSet {
    fn from(flag: MethodFlag) -> Self {
        MethodSet(flag.bits())
    }
}

impl FromIterator<MethodFlag> for MethodSet {
    fn from_iter<I: IntoIterator<Item = MethodFlag>>(iter: I) -> Self {
        iter.into_iter().fold(MethodSet::EMPTY, MethodSet::insert)
    }
}

impl BitOr for MethodFlag {
    type Output = MethodSet;

    fn bitor(self, rhs: MethodFlag) -> MethodSet {
        MethodSet(self.bits() | rhs.bits())
    }
}

impl BitOr<MethodFlag> for MethodSet {
    type Output = MethodSet;

    fn bitor(self, rhs: MethodFlag) -> MethodSet {
        self.insert(rhs)
    }
}

impl BitOr for MethodSet {
    type Output = MethodSet;

    fn bitor(self, rhs: MethodSet) -> MethodSet {
        self.union(rhs)
    }
}

impl BitOrAssign<MethodFlag> for MethodSet {
    fn bitor_assign(&mut self, rhs: MethodFlag) {
        *self = self.insert(rhs);
    }
}

impl BitOrAssign for MethodSet {
    fn bitor_assign(&mut self, rhs: MethodSet) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_distinct_bits() {
        let mut seen = 0u8;
        for m in MethodFlag::ALL {
            assert_eq!(m.bits().count_ones(), 1);
            assert_eq!(seen & m.bits(), 0);
            seen |= m.bits();
        }
    }

    #[test]
    fn test_parse_method() {
        assert_eq!("GET".parse::<MethodFlag>(), Ok(MethodFlag::Get));
        assert_eq!("OPTIONS".parse::<MethodFlag>(), Ok(MethodFlag::Options));
        assert!("get".parse::<MethodFlag>().is_err());
        assert!("TRACE".parse::<MethodFlag>().is_err());
    }

    #[test]
    fn test_http_method_conversion() {
        let m: http::Method = MethodFlag::Patch.into();
        assert_eq!(m, http::Method::PATCH);
        assert_eq!(MethodFlag::try_from(&http::Method::HEAD), Ok(MethodFlag::Head));
        assert!(MethodFlag::try_from(&http::Method::TRACE).is_err());
    }

    #[test]
    fn test_set_contains_and_single() {
        let set = MethodFlag::Get | MethodFlag::Post;
        assert!(set.contains(MethodFlag::Get));
        assert!(set.contains(MethodFlag::Post));
        assert!(!set.contains(MethodFlag::Put));
        assert_eq!(set.as_single(), None);
        assert_eq!(MethodSet::from(MethodFlag::Put).as_single(), Some(MethodFlag::Put));
        assert!(MethodSet::EMPTY.is_empty());
    }

    #[test]
    fn test_names_canonical_order() {
        let set = MethodFlag::Options | MethodFlag::Delete | MethodFlag::Get;
        assert_eq!(set.names(), vec!["GET", "DELETE", "OPTIONS"]);
        assert_eq!(set.to_string(), "GET|DELETE|OPTIONS");
        assert_eq!(MethodSet::all().names().len(), 7);
    }
}
