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

use crate::helpers::file_name;
use crate::record::LogRecord;
use crate::value::Value;

const UNKNOWN: &str = "<unknown>";

impl LogRecord {
    /// Creates a record from the [log](https://docs.rs/log) crate record.
    ///
    /// The target becomes the logger name and the module path the function name.
    ///
    /// The `log` arguments don't outlive the logging call
    /// so the message is captured as a single argument right away.
    pub fn from_log(record: &log::Record) -> Self {
        let path = record.file().unwrap_or(UNKNOWN);
        LogRecord::new(
            record.target(),
            record.level().into(),
            path,
            file_name(path),
            record.line().unwrap_or(0),
            record.module_path().unwrap_or(UNKNOWN),
            "",
            false,
            vec![Value::Str(record.args().to_string())],
        )
    }
}

impl<'a, 'b> From<&'b log::Record<'a>> for LogRecord {
    #[inline(always)]
    fn from(orig: &'b log::Record<'a>) -> LogRecord {
        LogRecord::from_log(orig)
    }
}
