pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Fails with an `InvalidArgument` error for argument `$name` unless the predicate
/// holds.
///
/// Without a message, the text of the predicate becomes the message:
///
/// ```
/// use sectorbuf_common::{Result, verify_arg};
///
/// fn sectors(count: usize) -> Result<usize> {
///     verify_arg!(count, count > 0);
///     Ok(count)
/// }
///
/// assert_eq!(
///     sectors(0).unwrap_err().to_string(),
///     "invalid argument count: count > 0"
/// );
/// ```
#[macro_export]
macro_rules! verify_arg {
    ($name:ident, $expr:expr) => {
        $crate::verify_arg!($name, $expr, "{}", stringify!($expr))
    };
    ($name:ident, $expr:expr, $($arg:tt)+) => {{
        if !($expr) {
            return Err($crate::error::Error::invalid_arg(
                stringify!($name),
                format!($($arg)+),
            ));
        }
    }};
}

/// Fails with an `OutOfRange` error carrying the formatted message unless the
/// predicate holds.
#[macro_export]
macro_rules! verify_range {
    ($expr:expr, $($arg:tt)+) => {{
        if !($expr) {
            return Err($crate::error::Error::out_of_range(format!($($arg)+)));
        }
    }};
}
