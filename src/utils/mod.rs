pub(crate) mod datetime;
pub(crate) mod log_sanitizer;
