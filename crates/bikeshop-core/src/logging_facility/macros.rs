//! Canonical logging macros
//!
//! Every controller operation is bracketed by a start event and exactly one
//! of an end or an end_error event.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use bikeshop_core::log_op_start;
/// log_op_start!("owner.insert");
/// log_op_start!("bike.delete", bike_id = 7);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {{
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    }};
    ($op:expr, $($field:tt)*) => {{
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    }};
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use bikeshop_core::log_op_end;
/// log_op_end!("owner.refresh", duration_ms = 3, row_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {{
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    }};
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    }};
}

/// Log an operation error
///
/// `$err` is an `ExError` or a reference to one. Validation failures are
/// expected user input and log at `warn`; everything else at `error`.
///
/// # Example
///
/// ```
/// # use bikeshop_core::log_op_error;
/// # use bikeshop_core::errors::not_found;
/// let err = not_found("bike", 7);
/// log_op_error!("bike.delete", &err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {
        $crate::log_op_error!($op, $err, duration_ms = $duration,)
    };
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: &$crate::errors::ExError = &$err;
        if ex_err.kind().is_validation() {
            tracing::warn!(
                component = module_path!(),
                op = $op,
                event = $crate::core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ex_err.kind().name(),
                err_code = ex_err.code(),
                $($field)*
            );
        } else {
            tracing::error!(
                component = module_path!(),
                op = $op,
                event = $crate::core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ex_err.kind().name(),
                err_code = ex_err.code(),
                $($field)*
            );
        }
    }};
}
