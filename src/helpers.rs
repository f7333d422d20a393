// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::path::Path;

/// Returns the last component of the `path`.
///
/// ```rust
/// assert_eq!(logrecord::helpers::file_name("src/app/main.rs"), "main.rs");
/// ```
pub fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

#[doc(hidden)]
pub fn function_name(name: &'static str) -> &'static str {
    let mut name = name.strip_suffix("::__f").unwrap_or(name);
    while let Some(outer) = name.strip_suffix("::{{closure}}") {
        name = outer;
    }
    name
}

/// Expands to the path of the enclosing function.
///
/// Closures are attributed to the function they are defined in.
///
/// ```rust
/// #[macro_use]
/// extern crate logrecord;
///
/// fn main() {
///     assert!(this_function!().ends_with("::main"));
/// }
/// ```
#[macro_export]
macro_rules! this_function {
    () => {{
        fn __f() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::helpers::function_name(__type_name_of(__f))
    }};
}

/// Creates a [LogRecord](struct.LogRecord.html) for the current call site.
///
/// The file path, the file name, the line and the function are captured
/// at the place of the invocation.
///
/// The `name, level => format, args...` form substitutes the arguments
/// into the template, the `name, level; args...` form joins them.
///
/// Arguments are converted with [Value::from](enum.Value.html).
///
/// # Example
///
/// ```rust
/// #[macro_use]
/// extern crate logrecord;
/// use logrecord::LogLevel;
///
/// fn main() {
///     let record = log_record!("app", LogLevel::INFO => "User %s logged in", "alice");
///     assert_eq!(record.msg().as_str(), "User alice logged in");
///     assert!(record.func_name().ends_with("::main"));
///
///     let record = log_record!("app", LogLevel::DEBUG; "value=", 42);
///     assert_eq!(record.msg().as_str(), "value= 42");
/// }
/// ```
#[macro_export]
macro_rules! log_record {
    ($name:expr, $level:expr => $format:expr $(, $arg:expr)* $(,)?) => {
        $crate::LogRecord::new(
            $name, $level,
            file!(), $crate::helpers::file_name(file!()), line!(), $crate::this_function!(),
            $format, true, vec![$($crate::Value::from($arg)),*],
        )
    };
    ($name:expr, $level:expr; $($arg:expr),* $(,)?) => {
        $crate::LogRecord::new(
            $name, $level,
            file!(), $crate::helpers::file_name(file!()), line!(), $crate::this_function!(),
            "", false, vec![$($crate::Value::from($arg)),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::levels::LogLevel;

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("src/helpers.rs"), "helpers.rs");
        assert_eq!(file_name("helpers.rs"), "helpers.rs");
        assert_eq!(file_name(""), "");
    }

    #[test]
    fn test_function_name() {
        assert_eq!(function_name("foo::bar::__f"), "foo::bar");
        assert_eq!(function_name("foo::bar::{{closure}}::{{closure}}::__f"), "foo::bar");
        assert_eq!(function_name("foo"), "foo");

        assert_eq!(this_function!(), "logrecord::helpers::tests::test_function_name");
        let closure = || this_function!();
        assert_eq!(closure(), "logrecord::helpers::tests::test_function_name");
    }

    #[test]
    fn test_log_record() {
        let line = line!() + 1;
        let record = log_record!("wp", LogLevel::NOTICE => "%d%%", 50);
        assert_eq!(record.name(), "wp");
        assert_eq!(record.level(), LogLevel::NOTICE);
        assert_eq!(record.path_name(), file!());
        assert_eq!(record.file_name(), "helpers.rs");
        assert_eq!(record.line_no(), line);
        assert_eq!(record.func_name(), "logrecord::helpers::tests::test_log_record");
        assert_eq!(record.msg().as_str(), "50%");

        let record = log_record!("wp", LogLevel::ERROR => "plain");
        assert_eq!(record.msg().as_str(), "plain");

        let user = String::from("bob");
        let record = log_record!("wp", LogLevel::WARN; &user, 'x', 2.5, Some(1u8), None::<bool>,);
        assert!(!record.use_format());
        assert_eq!(record.msg().as_str(), "bob x 2.5 1 <nil>");

        let record = log_record!("wp", LogLevel::WARN;);
        assert_eq!(record.msg().as_str(), "");
    }
}
