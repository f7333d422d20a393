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

#![warn(missing_docs)]

//! # Logrecord - the log record with a lazily rendered message
//!
//! A [LogRecord](struct.LogRecord.html) is created every time something is logged.
//! It keeps the logger name, the [level](levels/enum.LogLevel.html),
//! the place where the log was recorded and the message template with its arguments.
//!
//! The message is not rendered when the record is created.
//! It's rendered once, on the first request, and the result is kept for the record's life.
//! Records that nobody reads never pay for the formatting.
//!
//! The message is rendered either by substituting the arguments
//! into a printf-style template or by joining the string forms of the arguments.
//! See the [render](render/index.html) module for the template syntax.
//!
//! Rendering never fails: bad templates and mismatching arguments
//! are reported inline in the message.
//!
//! # Example
//!
//! ```rust
//! #[macro_use]
//! extern crate logrecord;
//! use logrecord::LogLevel;
//!
//! fn main() {
//!     let record = log_record!("app", LogLevel::INFO => "%s has %d new messages", "alice", 3);
//!     assert!(!record.is_rendered());
//!
//!     assert_eq!(record.msg().as_str(), "alice has 3 new messages");
//!     assert!(record.is_rendered());
//!
//!     let record = log_record!("app", LogLevel::ERROR => "%s and %s", "only-one");
//!     assert_eq!(record.msg().as_str(), "only-one and %!s(MISSING)");
//! }
//! ```
//!
//! Records are `Send` and `Sync` so a single record may be handed to several
//! handlers running in different threads.

/// Call site helpers.
#[macro_use]
pub mod helpers;

/// Definition of the log levels.
pub mod levels;
#[doc(inline)]
pub use levels::{LevelError, LogLevel};

/// Definition of the message arguments.
pub mod value;
#[doc(inline)]
pub use value::Value;

pub mod render;
#[doc(inline)]
pub use render::{Message, Renderer};

/// Definition of the log record entry.
pub mod record;
#[doc(inline)]
pub use record::LogRecord;

mod facade;
