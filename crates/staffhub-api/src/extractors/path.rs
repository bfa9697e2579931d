//! Typed path parameter helpers.

use uuid::Uuid;

use staffhub_core::error::AppError;

use crate::error::ApiError;

/// Parses an identifier from a path segment.
pub fn parse_id<T: From<Uuid>>(raw: &str) -> Result<T, ApiError> {
    Uuid::parse_str(raw.trim())
        .map(T::from)
        .map_err(|_| AppError::validation(format!("Invalid ID: {raw}")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffhub_core::types::TaskId;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        let parsed: TaskId = parse_id(&id.to_string()).unwrap();
        assert_eq!(parsed.into_uuid(), id);
        assert!(parse_id::<Uuid>("not-a-uuid").is_err());
    }
}
