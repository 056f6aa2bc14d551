mod worklog;

pub use worklog::{value_text, FieldShape, RawWorklog, WorklogList};
