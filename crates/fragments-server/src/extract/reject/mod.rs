//! Request extractors whose rejections use the error envelope.
//!
//! Drop-in replacements for their `axum` counterparts; a rejection becomes a
//! [`handler::Error`](crate::handler::Error) instead of a plain-text body.

mod enhanced_path;
mod enhanced_query;
mod raw_body;

pub use self::enhanced_path::Path;
pub use self::enhanced_query::Query;
pub use self::raw_body::RawBody;

/// Keeps rejection details short enough to echo back.
fn sanitize_error_message(message: &str) -> String {
    message
        .lines()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(150)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_limits_lines_and_length() {
        assert_eq!(sanitize_error_message("a\nb\nc"), "a b");
        assert_eq!(sanitize_error_message(&"x".repeat(500)).len(), 150);
    }
}
