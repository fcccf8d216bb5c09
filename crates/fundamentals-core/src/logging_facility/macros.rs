//! Canonical logging macros
//!
//! Callers must depend on `fundamentals-core-types` and `tracing`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use fundamentals_core::log_op_start;
/// log_op_start!("point_get");
/// log_op_start!("point_get", symbol = "AAPL");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = fundamentals_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = fundamentals_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use fundamentals_core::log_op_end;
/// log_op_end!("point_set", duration_ms = 3, rows = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = fundamentals_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = fundamentals_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// `$err` is anything exposing `kind()` and `code()`, such as `FundError`.
///
/// # Example
///
/// ```
/// # use fundamentals_core::{log_op_error, errors::FundError};
/// let err = FundError::EmptyDates;
/// log_op_error!("point_get", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let err_ref = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = fundamentals_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?err_ref.kind(),
            err_code = err_ref.code(),
            error = %err_ref,
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let err_ref = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = fundamentals_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?err_ref.kind(),
            err_code = err_ref.code(),
            error = %err_ref,
            $($field)*
        );
    }};
}
