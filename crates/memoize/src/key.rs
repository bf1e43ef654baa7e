//! Cache keys for heterogeneous argument lists
//!
//! A [`CallKey`] captures a call's positional arguments in order and its
//! named arguments as a name-sorted map, so two keys are equal exactly when
//! the positional sequences match and the named name/value sets match.

use std::collections::BTreeMap;

/// One argument value
///
/// Values of different kinds never compare equal: `Int(1)`, `UInt(1)`,
/// `F32` of `1.0` and `Float` of `1.0` are four distinct keys. Integers are
/// widened within their signedness, so `1i8` and `1i64` are the same key
/// while `1i64` and `1u64` are not. Floats are held as their bit pattern, so
/// `0.0` and `-0.0` differ and a NaN matches only the same NaN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arg {
    /// No value
    Unit,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// `f32` bit pattern
    F32(u32),
    /// `f64` bit pattern
    Float(u64),
    /// Character
    Char(char),
    /// UTF-8 string
    Str(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Ordered sequence of arguments
    Seq(Vec<Arg>),
}

impl Arg {
    /// Build a float argument
    pub fn float(value: f64) -> Self {
        Arg::Float(value.to_bits())
    }

    /// Get the float value back, if this is a float argument
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Arg::F32(bits) => Some(f64::from(f32::from_bits(*bits))),
            Arg::Float(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::$variant(value as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int, i64: i8, i16, i32, i64, isize);
impl_from_int!(UInt, u64: u8, u16, u32, u64, usize);

impl From<()> for Arg {
    fn from(_: ()) -> Self {
        Arg::Unit
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::F32(value.to_bits())
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::float(value)
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<&[u8]> for Arg {
    fn from(value: &[u8]) -> Self {
        Arg::Bytes(value.to_vec())
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(values: Vec<T>) -> Self {
        Arg::Seq(values.into_iter().map(Into::into).collect())
    }
}

/// Key built from a call's positional and named arguments
///
/// ```
/// use memoize::CallKey;
///
/// let a = CallKey::new().arg(41.5).arg("north").named("limit", 10).named("strict", true);
/// let b = CallKey::new().arg(41.5).arg("north").named("strict", true).named("limit", 10);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CallKey {
    positional: Vec<Arg>,
    named: BTreeMap<String, Arg>,
}

impl CallKey {
    /// Create an empty key (a call with no arguments)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Arg>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a named argument; a repeated name keeps the last value
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    /// Positional arguments in call order
    pub fn positional(&self) -> &[Arg] {
        &self.positional
    }

    /// Look up a named argument
    pub fn get_named(&self, name: &str) -> Option<&Arg> {
        self.named.get(name)
    }

    /// Named arguments sorted by name
    pub fn named_args(&self) -> impl Iterator<Item = (&str, &Arg)> {
        self.named.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Total number of arguments
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    /// Check if the call had no arguments
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

impl<A: Into<Arg>> FromIterator<A> for CallKey {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self {
            positional: iter.into_iter().map(Into::into).collect(),
            named: BTreeMap::new(),
        }
    }
}
