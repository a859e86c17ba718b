//! Lowering of argument tuples into hashable cache keys
//!
//! Arguments are compared by value: two calls whose arguments are `==` land
//! on the same entry. Floats are keyed by their bit pattern, with `-0.0`
//! folded into `0.0` so that it matches `0.0` the way `==` does. NaN is never
//! equal to itself and is rejected.

use super::errors::KeyError;
use crate::ephemeris::{Body, HouseSystem, Location, SiderealMode};

/// A hashable representation of one argument
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Unit,
    Bool(bool),
    Int(i128),
    Float(u64),
    Char(char),
    Str(Box<str>),
    Opt(Option<Box<KeyPart>>),
    Seq(Vec<KeyPart>),
    /// A named variant of a crate enum
    Tag(&'static str, &'static str),
}

/// Types usable as memoized function arguments
pub trait CacheKey {
    fn cache_key(&self) -> Result<KeyPart, KeyError>;
}

fn float_key(value: f64) -> Result<KeyPart, KeyError> {
    if value.is_nan() {
        return Err(KeyError("NaN is not comparable".to_string()));
    }
    let value = if value == 0.0 { 0.0 } else { value };
    Ok(KeyPart::Float(value.to_bits()))
}

impl CacheKey for f64 {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        float_key(*self)
    }
}

impl CacheKey for f32 {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        float_key(f64::from(*self))
    }
}

macro_rules! int_keys {
    ($($t:ty),*) => {
        $(
            impl CacheKey for $t {
                fn cache_key(&self) -> Result<KeyPart, KeyError> {
                    Ok(KeyPart::Int(*self as i128))
                }
            }
        )*
    };
}

int_keys!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl CacheKey for () {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Unit)
    }
}

impl CacheKey for bool {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Bool(*self))
    }
}

impl CacheKey for char {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Char(*self))
    }
}

impl CacheKey for str {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Str(self.into()))
    }
}

impl CacheKey for String {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        self.as_str().cache_key()
    }
}

impl<T: CacheKey + ?Sized> CacheKey for &T {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        (**self).cache_key()
    }
}

impl<T: CacheKey> CacheKey for Option<T> {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        match self {
            Some(value) => Ok(KeyPart::Opt(Some(Box::new(value.cache_key()?)))),
            None => Ok(KeyPart::Opt(None)),
        }
    }
}

impl<T: CacheKey> CacheKey for [T] {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        self.iter()
            .map(CacheKey::cache_key)
            .collect::<Result<Vec<_>, _>>()
            .map(KeyPart::Seq)
    }
}

impl<T: CacheKey> CacheKey for Vec<T> {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        self.as_slice().cache_key()
    }
}

impl<T: CacheKey, const N: usize> CacheKey for [T; N] {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        self.as_slice().cache_key()
    }
}

macro_rules! tuple_keys {
    ($(($($name:ident),+)),+) => {
        $(
            impl<$($name: CacheKey),+> CacheKey for ($($name,)+) {
                #[allow(non_snake_case)]
                fn cache_key(&self) -> Result<KeyPart, KeyError> {
                    let ($($name,)+) = self;
                    Ok(KeyPart::Seq(vec![$($name.cache_key()?),+]))
                }
            }
        )+
    };
}

tuple_keys!((A), (A, B), (A, B, C), (A, B, C, D), (A, B, C, D, E));

impl CacheKey for Body {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Tag("Body", self.name()))
    }
}

impl CacheKey for SiderealMode {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Tag("SiderealMode", self.name()))
    }
}

impl CacheKey for HouseSystem {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        let name = match self {
            HouseSystem::Equal => "Equal",
            HouseSystem::WholeSign => "WholeSign",
            HouseSystem::Porphyry => "Porphyry",
        };
        Ok(KeyPart::Tag("HouseSystem", name))
    }
}

impl CacheKey for Location {
    fn cache_key(&self) -> Result<KeyPart, KeyError> {
        (self.latitude, self.longitude, self.altitude).cache_key()
    }
}
