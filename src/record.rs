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

use chrono::prelude::*;

use parking_lot::Mutex;

use serde_json::json;

use std::fmt;
use std::sync::Arc;

use crate::levels::LogLevel;
use crate::render::{self, Message, Renderer};
use crate::value::Value;

const ASC_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

struct RecordLazyMeta {
    msg: Option<Arc<String>>,
    asc_time: Option<Arc<String>>,
}

impl RecordLazyMeta {
    #[inline(always)]
    fn new() -> Self {
        RecordLazyMeta {
            msg: None,
            asc_time: None,
        }
    }

    fn mk_msg(&mut self, message: &Message, renderer: Option<&Renderer>) -> Arc<String> {
        if let Some(ref msg) = self.msg {
            return msg.clone();
        }
        let msg = Arc::new(match renderer {
            Some(renderer) => renderer(message),
            None => render::render(message),
        });
        self.msg = Some(msg.clone());
        msg
    }

    fn mk_asc_time(&mut self, ts: &DateTime<Utc>) -> Arc<String> {
        if let Some(ref asc_time) = self.asc_time {
            return asc_time.clone();
        }
        let asc_time = Arc::new(ts.format(ASC_TIME_FORMAT).to_string());
        self.asc_time = Some(asc_time.clone());
        asc_time
    }
}

/// Log record that holds information where log was recorded
/// and the message details.
///
/// The message is rendered on the first request and stays the same
/// for the rest of the record's life.
/// The record may be shared between threads, the message is rendered only once anyway.
///
/// # Example
///
/// ```rust
/// use logrecord::{LogLevel, LogRecord, Value};
///
/// let record = LogRecord::new(
///     "app", LogLevel::INFO,
///     "/src/app/main.rs", "main.rs", 42, "app::main",
///     "User %s logged in", true, vec![Value::from("alice")],
/// );
/// assert!(!record.is_rendered());
/// assert_eq!(record.msg().as_str(), "User alice logged in");
/// assert_eq!(
///     record.to_string(),
///     "<LogRecord: app, INFO, /src/app/main.rs, 42, \"User alice logged in\">"
/// );
/// ```
pub struct LogRecord {
    created: DateTime<Utc>,
    name: String,
    level: LogLevel,
    path_name: String,
    file_name: String,
    line_no: u32,
    func_name: String,
    message: Message,
    renderer: Option<Renderer>,
    lazy: Mutex<RecordLazyMeta>,
}

impl LogRecord {
    /// Creates a record stamped with the current time.
    ///
    /// If `use_format` is set the `args` are substituted into the printf-style `format`,
    /// otherwise the string forms of the `args` are joined with a space and `format` is ignored.
    /// See the [render](render/index.html) module for the details.
    ///
    /// Nothing is rendered at this point.
    #[allow(clippy::too_many_arguments)]
    pub fn new(name: &str, level: LogLevel,
               path_name: &str, file_name: &str, line_no: u32, func_name: &str,
               format: &str, use_format: bool, args: Vec<Value>) -> Self {
        LogRecord {
            created: Utc::now(),
            name: name.to_string(),
            level: level,
            path_name: path_name.to_string(),
            file_name: file_name.to_string(),
            line_no: line_no,
            func_name: func_name.to_string(),
            message: Message::new(format, use_format, args),
            renderer: None,
            lazy: Mutex::new(RecordLazyMeta::new()),
        }
    }

    /// Same as [new](#method.new) but renders the message with the given `renderer`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use logrecord::{LogLevel, LogRecord, Message};
    /// use std::sync::Arc;
    ///
    /// let record = LogRecord::with_renderer(
    ///     "app", LogLevel::WARN, "src/lib.rs", "lib.rs", 1, "app",
    ///     "disk is full", true, Vec::new(),
    ///     Arc::new(|msg: &Message| msg.format().unwrap_or_default().to_uppercase()),
    /// );
    /// assert_eq!(record.msg().as_str(), "DISK IS FULL");
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn with_renderer(name: &str, level: LogLevel,
                         path_name: &str, file_name: &str, line_no: u32, func_name: &str,
                         format: &str, use_format: bool, args: Vec<Value>,
                         renderer: Renderer) -> Self {
        let mut record = Self::new(name, level, path_name, file_name, line_no, func_name,
                                   format, use_format, args);
        record.renderer = Some(renderer);
        record
    }

    /// Creation time.
    #[inline(always)]
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Name of the logger.
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Log level of the record.
    #[inline(always)]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// File path.
    #[inline(always)]
    pub fn path_name(&self) -> &str {
        &self.path_name
    }

    /// File name.
    #[inline(always)]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Line number.
    #[inline(always)]
    pub fn line_no(&self) -> u32 {
        self.line_no
    }

    /// Function name.
    #[inline(always)]
    pub fn func_name(&self) -> &str {
        &self.func_name
    }

    /// Message template, `None` if the message is a concatenation of the arguments.
    #[inline(always)]
    pub fn format(&self) -> Option<&str> {
        self.message.format()
    }

    /// Whether the message is rendered from the template.
    #[inline(always)]
    pub fn use_format(&self) -> bool {
        self.message.use_format()
    }

    /// Message arguments.
    #[inline(always)]
    pub fn args(&self) -> &[Value] {
        self.message.args()
    }

    /// Message template and arguments.
    #[inline(always)]
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Whether the message has been rendered already.
    pub fn is_rendered(&self) -> bool {
        self.lazy.lock().msg.is_some()
    }

    /// Returns user log message as a formatted string.
    ///
    /// The message is rendered on the first call only.
    pub fn msg(&self) -> Arc<String> {
        let mut lazy = self.lazy.lock();
        lazy.mk_msg(&self.message, self.renderer.as_ref())
    }

    /// Returns creation time as `YYYY-MM-DD HH:MM:SS,mmm` in UTC.
    pub fn asc_time(&self) -> Arc<String> {
        let mut lazy = self.lazy.lock();
        lazy.mk_asc_time(&self.created)
    }

    /// Returns a short description of the record for diagnostics.
    ///
    /// Renders the message if it hasn't been rendered yet.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Returns the record as a JSON object.
    ///
    /// Renders the message if it hasn't been rendered yet.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "created": self.created.to_rfc3339_opts(SecondsFormat::Micros, true),
            "asctime": self.asc_time().as_str(),
            "name": self.name,
            "level": self.level.to_string(),
            "pathname": self.path_name,
            "filename": self.file_name,
            "lineno": self.line_no,
            "funcname": self.func_name,
            "message": self.msg().as_str(),
        })
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<LogRecord: {}, {}, {}, {}, \"{}\">",
               self.name, self.level, self.path_name, self.line_no, self.msg())
    }
}

impl fmt::Debug for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rendered = self.lazy.lock().msg.clone();
        f.debug_struct("LogRecord")
            .field("created", &self.created)
            .field("name", &self.name)
            .field("level", &self.level)
            .field("path_name", &self.path_name)
            .field("file_name", &self.file_name)
            .field("line_no", &self.line_no)
            .field("func_name", &self.func_name)
            .field("message", &self.message)
            .field("rendered", &rendered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    fn record(format: &str, use_format: bool, args: Vec<Value>) -> LogRecord {
        LogRecord::new("app", LogLevel::INFO, "/src/app/main.rs", "main.rs", 42, "app::main",
                       format, use_format, args)
    }

    fn counting(format: &str, use_format: bool, args: Vec<Value>) -> (LogRecord, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let renderer: Renderer = {
            let count = count.clone();
            Arc::new(move |msg: &Message| {
                count.fetch_add(1, Ordering::SeqCst);
                render::render(msg)
            })
        };
        let record = LogRecord::with_renderer("app", LogLevel::INFO, "/src/app/main.rs", "main.rs", 42,
                                              "app::main", format, use_format, args, renderer);
        (record, count)
    }

    #[test]
    fn test_record_template() {
        let record = record("User %s logged in", true, vec![Value::from("alice")]);
        assert!(record.use_format());
        assert_eq!(record.format(), Some("User %s logged in"));
        assert_eq!(record.msg().as_str(), "User alice logged in");
    }

    #[test]
    fn test_record_concat() {
        let record = record("ignored %d", false, vec![Value::from("value="), Value::from(42)]);
        assert!(!record.use_format());
        assert_eq!(record.format(), None);
        assert_eq!(record.args(), &[Value::from("value="), Value::from(42)][..]);
        assert_eq!(record.msg().as_str(), "value= 42");
    }

    #[test]
    fn test_record_degraded() {
        let record = record("%s and %s", true, vec![Value::from("only-one")]);
        let msg = record.msg();
        assert!(msg.contains("%!s(MISSING)"));
        assert_eq!(msg.as_str(), "only-one and %!s(MISSING)");
    }

    #[test]
    fn test_record_metadata() {
        let before = Utc::now();
        let record = record("", true, Vec::new());
        let after = Utc::now();

        assert_eq!(record.name(), "app");
        assert_eq!(record.level(), LogLevel::INFO);
        assert_eq!(record.path_name(), "/src/app/main.rs");
        assert_eq!(record.file_name(), "main.rs");
        assert_eq!(record.line_no(), 42);
        assert_eq!(record.func_name(), "app::main");
        assert!(before <= record.created() && record.created() <= after);
        assert_eq!(record.msg().as_str(), "");
    }

    #[test]
    fn test_record_render_once() {
        let (record, count) = counting("%d-%d", true, vec![Value::from(1), Value::from(2)]);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!record.is_rendered());

        let first = record.msg();
        let second = record.msg();
        assert_eq!(first.as_str(), "1-2");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(record.is_rendered());

        record.describe();
        record.to_json();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_record_lazy_args() {
        struct Items(Arc<AtomicUsize>);

        impl fmt::Display for Items {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                self.0.fetch_add(1, Ordering::SeqCst);
                write!(f, "7")
            }
        }

        let hits = Arc::new(AtomicUsize::new(0));
        let record = record("%d items", true, vec![Value::display(Items(hits.clone()))]);
        let _ = format!("{:?}", record);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        assert_eq!(record.msg().as_str(), "7 items");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(record.msg().as_str(), "7 items");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_record_huge_precision() {
        let record = record("%.70000f|%.*e", true,
                            vec![Value::from(1.5), Value::from(1 << 20), Value::from(2.0)]);
        assert_eq!(record.msg().as_str(), "%!(BADPREC)1.500000|%!(BADPREC)2.000000e+00");
    }

    #[test]
    fn test_record_render_once_threads() {
        let thqty = 16;
        let (record, count) = counting("%s:%d", false, vec![Value::from("n"), Value::from(7)]);
        let record = Arc::new(record);
        let barrier = Arc::new(Barrier::new(thqty));

        let mut threads = Vec::new();
        for _ in 0..thqty {
            let record = record.clone();
            let barrier = barrier.clone();
            threads.push(thread::spawn(move || {
                barrier.wait();
                record.msg()
            }));
        }

        let msgs: Vec<_> = threads.into_iter().map(|th| th.join().unwrap()).collect();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        for msg in &msgs {
            assert!(Arc::ptr_eq(msg, &msgs[0]));
        }
        assert_eq!(msgs[0].as_str(), "n 7");
    }

    #[test]
    fn test_record_created_fixed() {
        let record = record("%v", true, vec![Value::from(1)]);
        let created = record.created();
        record.msg();
        thread::sleep(std::time::Duration::from_millis(2));
        record.describe();
        assert_eq!(record.created(), created);
    }

    #[test]
    fn test_record_same_inputs() {
        let args = vec![Value::from("x"), Value::from(1.5), Value::Nil];
        let a = record("%s %.2f %v", true, args.clone());
        let b = record("%s %.2f %v", true, args);
        assert_eq!(a.msg(), b.msg());
        assert_eq!(a.msg().as_str(), "x 1.50 <nil>");
    }

    #[test]
    fn test_record_describe() {
        let (record, count) = counting("User %s logged in", true, vec![Value::from("alice")]);
        let descr = record.describe();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(descr.contains("app"));
        assert!(descr.contains("INFO"));
        assert!(descr.contains("/src/app/main.rs"));
        assert!(descr.contains("42"));
        assert!(descr.contains("User alice logged in"));
        assert_eq!(descr, "<LogRecord: app, INFO, /src/app/main.rs, 42, \"User alice logged in\">");
        assert_eq!(descr, format!("{}", record));
    }

    #[test]
    fn test_record_debug() {
        let (record, count) = counting("%d", true, vec![Value::from(5)]);
        let dbg = format!("{:?}", record);
        assert!(dbg.contains("rendered: None"));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        record.msg();
        assert!(format!("{:?}", record).contains("rendered: Some(\"5\")"));
    }

    #[test]
    fn test_record_asc_time() {
        let record = record("", true, Vec::new());
        let asc_time = record.asc_time();
        assert_eq!(*asc_time, record.created().format("%Y-%m-%d %H:%M:%S,%3f").to_string());
        assert_eq!(asc_time.len(), "2017-01-01 00:00:00,000".len());
        assert!(Arc::ptr_eq(&asc_time, &record.asc_time()));
        assert!(!record.is_rendered());
    }

    #[test]
    fn test_record_json() {
        let record = record("%s=%d", true, vec![Value::from("a"), Value::from(1)]);
        let json = record.to_json();
        assert_eq!(json["name"], "app");
        assert_eq!(json["level"], "INFO");
        assert_eq!(json["pathname"], "/src/app/main.rs");
        assert_eq!(json["filename"], "main.rs");
        assert_eq!(json["lineno"], 42);
        assert_eq!(json["funcname"], "app::main");
        assert_eq!(json["message"], "a=1");
        assert_eq!(json["asctime"], record.asc_time().as_str());
        let created: DateTime<Utc> = json["created"].as_str().unwrap().parse().unwrap();
        assert_eq!(created.timestamp_micros(), record.created().timestamp_micros());
    }
}
