// Copyright 2017 Dmytro Milinevskyi <dmilinevskyi@gmail.com>

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

// http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::sync::Arc;

use crate::render::fmt_float;

/// A single argument of a log message.
///
/// Arbitrary types are captured through [display](#method.display)
/// and formatted only when the message is rendered.
#[derive(Clone)]
pub enum Value {
    /// Absent value, rendered as `<nil>`.
    Nil,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Unicode character.
    Char(char),
    /// String.
    Str(String),
    /// Any displayable value.
    Display(Arc<dyn fmt::Display + Send + Sync>),
}

impl Value {
    /// Captures any displayable value.
    ///
    /// The value is formatted when the message is rendered, not before.
    pub fn display<T: fmt::Display + Send + Sync + 'static>(value: T) -> Self {
        Value::Display(Arc::new(value))
    }

    /// Name of the value type as shown in the rendering error markers.
    pub fn type_name(&self) -> &'static str {
        match *self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float64",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Display(_) => "display",
        }
    }

    /// Guesses the type of a formatted opaque value.
    pub(crate) fn parse(text: String) -> Value {
        if let Ok(v) = text.parse() {
            return Value::Int(v);
        }
        if let Ok(v) = text.parse() {
            return Value::UInt(v);
        }
        if let Ok(v) = text.parse() {
            return Value::Float(v);
        }
        match text.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Str(text),
        }
    }

    #[inline]
    pub(crate) fn as_int(&self) -> Option<i64> {
        match *self {
            Value::Int(v) => Some(v),
            Value::UInt(v) if v <= i64::MAX as u64 => Some(v as i64),
            Value::Char(v) => Some(v as i64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Nil => f.write_str("<nil>"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Float(v) => f.write_str(&fmt_float(v, 'g', None, false)),
            Value::Char(v) => write!(f, "{}", v),
            Value::Str(ref v) => f.write_str(v),
            Value::Display(ref v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Nil => f.write_str("Nil"),
            Value::Bool(v) => f.debug_tuple("Bool").field(&v).finish(),
            Value::Int(v) => f.debug_tuple("Int").field(&v).finish(),
            Value::UInt(v) => f.debug_tuple("UInt").field(&v).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(&v).finish(),
            Value::Char(v) => f.debug_tuple("Char").field(&v).finish(),
            Value::Str(ref v) => f.debug_tuple("Str").field(v).finish(),
            // Debug output must not format the value ahead of rendering.
            Value::Display(_) => f.write_str("Display(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (&Value::Nil, &Value::Nil) => true,
            (&Value::Bool(a), &Value::Bool(b)) => a == b,
            (&Value::Int(a), &Value::Int(b)) => a == b,
            (&Value::UInt(a), &Value::UInt(b)) => a == b,
            (&Value::Float(a), &Value::Float(b)) => a == b,
            (&Value::Char(a), &Value::Char(b)) => a == b,
            (&Value::Str(ref a), &Value::Str(ref b)) => a == b,
            (&Value::Display(ref a), &Value::Display(ref b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! __value_from {
    ($variant:ident, $target:ty, $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                #[inline(always)]
                fn from(orig: $ty) -> Value {
                    Value::$variant(orig as $target)
                }
            }
        )*
    };
}

__value_from!(Int, i64, i8, i16, i32, i64, isize);
__value_from!(UInt, u64, u8, u16, u32, u64, usize);
__value_from!(Float, f64, f32, f64);

impl From<bool> for Value {
    #[inline(always)]
    fn from(orig: bool) -> Value {
        Value::Bool(orig)
    }
}

impl From<char> for Value {
    #[inline(always)]
    fn from(orig: char) -> Value {
        Value::Char(orig)
    }
}

impl<'a> From<&'a str> for Value {
    #[inline(always)]
    fn from(orig: &'a str) -> Value {
        Value::Str(orig.to_string())
    }
}

impl From<String> for Value {
    #[inline(always)]
    fn from(orig: String) -> Value {
        Value::Str(orig)
    }
}

impl<'a> From<&'a String> for Value {
    #[inline(always)]
    fn from(orig: &'a String) -> Value {
        Value::Str(orig.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(orig: Option<T>) -> Value {
        match orig {
            Some(v) => v.into(),
            None => Value::Nil,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from(42), Value::Int(42));
        assert_eq!(Value::from(42u8), Value::UInt(42));
        assert_eq!(Value::from(1.5f32), Value::Float(1.5));
        assert_eq!(Value::from("foo"), Value::Str("foo".to_string()));
        assert_eq!(Value::from(&"foo".to_string()), Value::Str("foo".to_string()));
        assert_eq!(Value::from('x'), Value::Char('x'));
        assert_eq!(Value::from(None::<i32>), Value::Nil);
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Nil.to_string(), "<nil>");
        assert_eq!(Value::from(-7).to_string(), "-7");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(1e6).to_string(), "1e+06");
        assert_eq!(Value::from(100000.0).to_string(), "100000");
        assert_eq!(Value::display(std::net::Ipv4Addr::LOCALHOST).to_string(), "127.0.0.1");
    }

    #[test]
    fn test_value_display_lazy() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Hits(Arc<AtomicUsize>);

        impl fmt::Display for Hits {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                self.0.fetch_add(1, Ordering::SeqCst);
                f.write_str("hit")
            }
        }

        let hits = Arc::new(AtomicUsize::new(0));
        let value = Value::display(Hits(hits.clone()));
        let copy = value.clone();
        assert_eq!(format!("{:?}", value), "Display(..)");
        assert!(value == copy);
        assert!(value != Value::display(Hits(hits.clone())));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(value.to_string(), "hit");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_value_parse() {
        assert_eq!(Value::parse("-7".to_string()), Value::Int(-7));
        assert_eq!(Value::parse("18446744073709551615".to_string()), Value::UInt(u64::MAX));
        assert_eq!(Value::parse("2.5".to_string()), Value::Float(2.5));
        assert_eq!(Value::parse("true".to_string()), Value::Bool(true));
        assert_eq!(Value::parse("abc".to_string()), Value::Str("abc".to_string()));
    }

    #[test]
    fn test_value_as_int() {
        assert_eq!(Value::from(-3).as_int(), Some(-3));
        assert_eq!(Value::from(3u8).as_int(), Some(3));
        assert_eq!(Value::from('A').as_int(), Some(65));
        assert_eq!(Value::from(u64::MAX).as_int(), None);
        assert_eq!(Value::from("3").as_int(), None);
    }

    #[test]
    fn test_value_type_name() {
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::from(1).type_name(), "int");
        assert_eq!(Value::from(1u32).type_name(), "uint");
        assert_eq!(Value::from(1.0).type_name(), "float64");
        assert_eq!(Value::display(1).type_name(), "display");
    }
}
