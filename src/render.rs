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

//! Rendering of the user message.
//!
//! A message is rendered either by substituting the arguments into a
//! printf-style template([sprintf](fn.sprintf.html)) or by joining the
//! string forms of the arguments([sprint](fn.sprint.html)).
//!
//! Rendering never fails. A mismatch between the template and the arguments
//! is reported inline in the resulting string:
//!
//! | Problem               | Output                      |
//! |-----------------------|-----------------------------|
//! | missing argument      | `%!s(MISSING)`              |
//! | wrong argument type   | `%!d(string=foo)`           |
//! | nil argument          | `%!d(<nil>)`                |
//! | unused arguments      | `%!(EXTRA int=1, string=x)` |
//! | trailing `%`          | `%!(NOVERB)`                |
//! | non-integer `*` width | `%!(BADWIDTH)`              |
//! | bad `*` precision     | `%!(BADPREC)`               |
//! | precision over 65535  | `%!(BADPREC)`               |
//! | opaque value mismatch | `%!d(display=127.0.0.1)`    |
//!
//! # Example
//!
//! ```rust
//! use logrecord::render::sprintf;
//! use logrecord::Value;
//!
//! let args = vec![Value::from("alice"), Value::from(3)];
//! assert_eq!(sprintf("%s has %03d items", &args), "alice has 003 items");
//! assert_eq!(sprintf("%s and %s", &args[..1]), "alice and %!s(MISSING)");
//! ```

use std::fmt::Write;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use crate::value::Value;

const PREALLOC: usize = 128;
const MAX_WIDTH: usize = 1_000_000;
// std refuses to format with a precision above u16::MAX
const MAX_PREC: usize = u16::MAX as usize;

/// The message part of a log record along with the way to render it.
#[derive(PartialEq, Clone, Debug)]
pub enum Message {
    /// Positional substitution of `args` into the printf-style `format`.
    Template {
        /// The template.
        format: String,
        /// The arguments.
        args: Vec<Value>,
    },
    /// Concatenation of the string forms of `args`.
    Concat {
        /// The arguments.
        args: Vec<Value>,
    },
}

impl Message {
    /// Picks the rendering strategy.
    ///
    /// The `format` is dropped when `use_format` is `false`
    /// as it takes no part in the rendering.
    pub fn new<S: Into<String>>(format: S, use_format: bool, args: Vec<Value>) -> Self {
        if use_format {
            Message::Template {
                format: format.into(),
                args: args,
            }
        } else {
            Message::Concat { args: args }
        }
    }

    /// The template, if any.
    pub fn format(&self) -> Option<&str> {
        match *self {
            Message::Template { ref format, .. } => Some(format),
            Message::Concat { .. } => None,
        }
    }

    /// The arguments.
    pub fn args(&self) -> &[Value] {
        match *self {
            Message::Template { ref args, .. } | Message::Concat { ref args } => args,
        }
    }

    /// Whether the message is rendered from a template.
    pub fn use_format(&self) -> bool {
        match *self {
            Message::Template { .. } => true,
            Message::Concat { .. } => false,
        }
    }
}

/// Type of the message rendering function.
pub type Renderer = Arc<dyn Fn(&Message) -> String + Send + Sync>;

/// Renders the message according to its strategy.
pub fn render(message: &Message) -> String {
    match *message {
        Message::Template { ref format, ref args } => sprintf(format, args),
        Message::Concat { ref args } => sprint(args),
    }
}

/// Joins the string forms of the arguments with a single space.
///
/// ```rust
/// use logrecord::render::sprint;
/// use logrecord::Value;
///
/// assert_eq!(sprint(&[Value::from("value="), Value::from(42)]), "value= 42");
/// ```
pub fn sprint(args: &[Value]) -> String {
    let mut out = String::with_capacity(PREALLOC);
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}", arg);
    }
    out
}

#[derive(Default, Clone, Copy, Debug)]
struct Spec {
    plus: bool,
    minus: bool,
    sharp: bool,
    space: bool,
    zero: bool,
    width: Option<usize>,
    prec: Option<usize>,
}

fn parse_num(chars: &mut Peekable<Chars>) -> Option<usize> {
    let mut num: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        num = Some(num.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
    }
    num
}

fn star_arg(args: &[Value], next: &mut usize, max: usize) -> Option<i64> {
    let arg = args.get(*next)?;
    *next += 1;
    arg.as_int()
        .filter(|num| num.unsigned_abs() <= max as u64)
}

/// Substitutes the arguments into the printf-style template.
///
/// Supported verbs:
///
/// - `%v` the default form of any value
/// - `%s` strings, `%q` quoted strings and characters
/// - `%d`, `%b`, `%o`, `%O`, `%x`, `%X` integers (`%x`/`%X` also hex-encode strings)
/// - `%c` characters, `%U` Unicode code points
/// - `%e`, `%E`, `%f`, `%F`, `%g`, `%G` floats
/// - `%t` booleans
/// - `%%` the percent sign
///
/// The flags `+`, `-`, `#`, ` `, `0`, the width and the precision
/// are accepted in between as in `%-8.3f`; `*` takes them from the arguments.
pub fn sprintf(format: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(format.len() + PREALLOC);
    let mut next = 0;
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '+' => spec.plus = true,
                '-' => {
                    spec.minus = true;
                    spec.zero = false;
                }
                '#' => spec.sharp = true,
                ' ' => spec.space = true,
                '0' => spec.zero = !spec.minus,
                _ => break,
            }
            chars.next();
        }

        if chars.peek() == Some(&'*') {
            chars.next();
            match star_arg(args, &mut next, MAX_WIDTH) {
                Some(width) => {
                    if width < 0 {
                        spec.minus = true;
                        spec.zero = false;
                    }
                    spec.width = Some(width.unsigned_abs() as usize);
                }
                None => out.push_str("%!(BADWIDTH)"),
            }
        } else {
            spec.width = parse_num(&mut chars).filter(|width| *width <= MAX_WIDTH);
        }

        if chars.peek() == Some(&'.') {
            chars.next();
            if chars.peek() == Some(&'*') {
                chars.next();
                match star_arg(args, &mut next, MAX_PREC) {
                    Some(prec) if prec >= 0 => spec.prec = Some(prec as usize),
                    Some(_) => spec.prec = None,
                    None => out.push_str("%!(BADPREC)"),
                }
            } else {
                match parse_num(&mut chars).unwrap_or(0) {
                    prec if prec <= MAX_PREC => spec.prec = Some(prec),
                    _ => out.push_str("%!(BADPREC)"),
                }
            }
        }

        let verb = match chars.next() {
            Some(verb) => verb,
            None => {
                out.push_str("%!(NOVERB)");
                break;
            }
        };

        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.get(next) {
            None => {
                let _ = write!(out, "%!{}(MISSING)", verb);
            }
            Some(arg) => {
                next += 1;
                if !fmt_arg(&mut out, verb, &spec, arg) {
                    bad_verb(&mut out, verb, arg);
                }
            }
        }
    }

    if next < args.len() {
        out.push_str("%!(EXTRA ");
        for (idx, arg) in args[next..].iter().enumerate() {
            if idx > 0 {
                out.push_str(", ");
            }
            match *arg {
                Value::Nil => out.push_str("<nil>"),
                _ => {
                    let _ = write!(out, "{}={}", arg.type_name(), arg);
                }
            }
        }
        out.push(')');
    }

    out
}

fn bad_verb(out: &mut String, verb: char, arg: &Value) {
    let _ = match *arg {
        Value::Nil => write!(out, "%!{}(<nil>)", verb),
        _ => write!(out, "%!{}({}={})", verb, arg.type_name(), arg),
    };
}

/// Writes a single argument, returns `false` if the verb doesn't apply to it.
fn fmt_arg(out: &mut String, verb: char, spec: &Spec, arg: &Value) -> bool {
    match *arg {
        Value::Nil => match verb {
            'v' => pad(out, "<nil>", spec),
            _ => return false,
        },
        Value::Bool(v) => match verb {
            'v' | 't' => pad(out, if v { "true" } else { "false" }, spec),
            _ => return false,
        },
        Value::Int(v) => return fmt_integer(out, verb, spec, v < 0, v.unsigned_abs()),
        Value::UInt(v) => return fmt_integer(out, verb, spec, false, v),
        Value::Char(v) => match verb {
            'v' | 'c' => pad(out, v.encode_utf8(&mut [0; 4]), spec),
            _ => return fmt_integer(out, verb, spec, false, v as u64),
        },
        Value::Float(v) => match verb {
            'v' | 'e' | 'E' | 'f' | 'F' | 'g' | 'G' => {
                let verb = if verb == 'v' { 'g' } else { verb };
                let num = fmt_float(v, verb, spec.prec, spec.sharp);
                let (sign, digits) = split_sign(&num);
                let sign = match sign {
                    "" if spec.plus => "+",
                    "" if spec.space => " ",
                    _ => sign,
                };
                pad_number(out, sign, "", digits, spec, v.is_finite());
            }
            _ => return false,
        },
        Value::Str(ref v) => match verb {
            'v' | 's' => match spec.prec {
                Some(prec) => pad_str(out, &v.chars().take(prec).collect::<String>(), spec),
                None => pad_str(out, v, spec),
            },
            'q' => pad_str(out, &quote(v.chars(), '"'), spec),
            'x' | 'X' => {
                let mut hex = String::with_capacity(v.len() * 2 + 2);
                if spec.sharp {
                    hex.push_str(if verb == 'x' { "0x" } else { "0X" });
                }
                for b in v.bytes() {
                    let _ = if verb == 'x' {
                        write!(hex, "{:02x}", b)
                    } else {
                        write!(hex, "{:02X}", b)
                    };
                }
                pad_str(out, &hex, spec);
            }
            _ => return false,
        },
        Value::Display(ref v) => {
            let text = v.to_string();
            let value = match verb {
                'v' | 's' | 'q' | 'x' | 'X' => Value::Str(text),
                _ => Value::parse(text),
            };
            if !fmt_arg(out, verb, spec, &value) {
                let _ = write!(out, "%!{}(display={})", verb, value);
            }
        }
    }
    true
}

fn fmt_integer(out: &mut String, verb: char, spec: &Spec, neg: bool, mag: u64) -> bool {
    let (digits, prefix) = match verb {
        'v' | 'd' => (mag.to_string(), ""),
        'b' => (format!("{:b}", mag), if spec.sharp { "0b" } else { "" }),
        'o' => (format!("{:o}", mag), if spec.sharp { "0" } else { "" }),
        'O' => (format!("{:o}", mag), "0o"),
        'x' => (format!("{:x}", mag), if spec.sharp { "0x" } else { "" }),
        'X' => (format!("{:X}", mag), if spec.sharp { "0X" } else { "" }),
        'c' => {
            pad(out, as_char(neg, mag).encode_utf8(&mut [0; 4]), spec);
            return true;
        }
        'q' => {
            pad(out, &quote(std::iter::once(as_char(neg, mag)), '\''), spec);
            return true;
        }
        'U' => {
            pad(out, &format!("U+{:04X}", mag), spec);
            return true;
        }
        _ => return false,
    };

    let digits = match spec.prec {
        Some(0) if mag == 0 => String::new(),
        Some(prec) if prec > digits.len() => {
            let mut padded = "0".repeat(prec - digits.len());
            padded.push_str(&digits);
            padded
        }
        _ => digits,
    };
    // "0" prefix of the octal form is redundant with a leading zero digit
    let prefix = if prefix == "0" && digits.starts_with('0') { "" } else { prefix };

    let sign = if neg {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    };
    pad_number(out, sign, prefix, &digits, spec, spec.prec.is_none());
    true
}

#[inline]
fn as_char(neg: bool, mag: u64) -> char {
    if neg || mag > u32::MAX as u64 {
        return char::REPLACEMENT_CHARACTER;
    }
    std::char::from_u32(mag as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[inline]
fn split_sign(num: &str) -> (&str, &str) {
    if num.starts_with('-') || num.starts_with('+') {
        num.split_at(1)
    } else {
        ("", num)
    }
}

fn pad(out: &mut String, s: &str, spec: &Spec) {
    let len = s.chars().count();
    let fill = match spec.width {
        Some(width) if width > len => width - len,
        _ => {
            out.push_str(s);
            return;
        }
    };
    if spec.minus {
        out.push_str(s);
        out.extend(std::iter::repeat(' ').take(fill));
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(s);
    }
}

/// Strings are padded with zeros under the `0` flag.
fn pad_str(out: &mut String, s: &str, spec: &Spec) {
    let len = s.chars().count();
    match spec.width {
        Some(width) if width > len && spec.zero && !spec.minus => {
            out.extend(std::iter::repeat('0').take(width - len));
            out.push_str(s);
        }
        _ => pad(out, s, spec),
    }
}

/// Quotes and escapes the way Go's `strconv.Quote` does.
fn quote<I: Iterator<Item = char>>(chars: I, delim: char) -> String {
    let mut quoted = String::with_capacity(PREALLOC);
    quoted.push(delim);
    for c in chars {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\x07' => quoted.push_str("\\a"),
            '\x08' => quoted.push_str("\\b"),
            '\x0c' => quoted.push_str("\\f"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\x0b' => quoted.push_str("\\v"),
            c if c == delim => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if (c as u32) < 0x80 && c.is_control() => {
                let _ = write!(quoted, "\\x{:02x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(quoted, "\\u{:04x}", c as u32);
            }
            c => quoted.push(c),
        }
    }
    quoted.push(delim);
    quoted
}

fn pad_number(out: &mut String, sign: &str, prefix: &str, digits: &str, spec: &Spec, zero_ok: bool) {
    let len = sign.chars().count() + prefix.len() + digits.chars().count();
    match spec.width {
        Some(width) if width > len && spec.zero && !spec.minus && zero_ok => {
            out.push_str(sign);
            out.push_str(prefix);
            out.extend(std::iter::repeat('0').take(width - len));
            out.push_str(digits);
        }
        _ => {
            let mut num = String::with_capacity(len);
            num.push_str(sign);
            num.push_str(prefix);
            num.push_str(digits);
            pad(out, &num, spec);
        }
    }
}

/// Formats a float for the verbs `e`, `E`, `f`, `F`, `g` and `G`.
///
/// Without precision `g` yields the shortest representation that
/// switches to the exponent form when the exponent is below -4 or above 5.
pub(crate) fn fmt_float(v: f64, verb: char, prec: Option<usize>, sharp: bool) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let upper = verb.is_ascii_uppercase();
    match verb.to_ascii_lowercase() {
        'e' => exp_form(&format!("{:.*e}", prec.unwrap_or(6), v), upper),
        'f' => format!("{:.*}", prec.unwrap_or(6), v),
        _ => match prec {
            None => {
                let sci = format!("{:e}", v);
                match exponent(&sci) {
                    exp if exp < -4 || exp >= 6 => exp_form(&sci, upper),
                    _ => format!("{}", v),
                }
            }
            Some(prec) => {
                let prec = prec.max(1);
                let sci = format!("{:.*e}", prec - 1, v);
                let exp = exponent(&sci);
                if exp < -4 || exp >= prec as i32 {
                    let sci = exp_form(&sci, upper);
                    if sharp {
                        return sci;
                    }
                    let at = sci.find(|c: char| c == 'e' || c == 'E').unwrap_or(sci.len());
                    let (mantissa, tail) = sci.split_at(at);
                    format!("{}{}", trim_zeros(mantissa), tail)
                } else {
                    let num = format!("{:.*}", (prec as i32 - 1 - exp).max(0) as usize, v);
                    if sharp {
                        num
                    } else {
                        trim_zeros(&num).to_string()
                    }
                }
            }
        },
    }
}

#[inline]
fn exponent(sci: &str) -> i32 {
    sci.rsplit('e')
        .next()
        .and_then(|exp| exp.parse().ok())
        .unwrap_or(0)
}

/// Rewrites `1.5e3` as `1.5e+03`.
fn exp_form(sci: &str, upper: bool) -> String {
    let at = sci.rfind('e').unwrap_or(sci.len());
    let mantissa = &sci[..at];
    let exp = exponent(sci);
    format!(
        "{}{}{}{:02}",
        mantissa,
        if upper { 'E' } else { 'e' },
        if exp < 0 { '-' } else { '+' },
        exp.abs()
    )
}

#[inline]
fn trim_zeros(num: &str) -> &str {
    if num.contains('.') {
        num.trim_end_matches('0').trim_end_matches('.')
    } else {
        num
    }
}
