//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical across drivers and tests.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Series identifiers
pub const FIELD_TABLE: &str = "table";
pub const FIELD_METRIC: &str = "metric";
pub const FIELD_SYMBOL: &str = "symbol";

// Row counts
pub const FIELD_ROWS: &str = "rows";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
