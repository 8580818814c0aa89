//! Result type alias for medanon

use super::errors::MedAnonError;

/// Result type alias for medanon operations
///
/// # Examples
///
/// ```
/// use medanon::domain::result::Result;
/// use medanon::domain::errors::MedAnonError;
///
/// fn failing_function() -> Result<()> {
///     Err(MedAnonError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MedAnonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
