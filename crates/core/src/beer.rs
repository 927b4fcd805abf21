//! Beer-domain rules shared by the repository and the usecase layer.

use validator::ValidationErrors;

use crate::error::CoreError;
use crate::types::DbId;

/// Entity name used in [`CoreError::NotFound`].
pub const ENTITY: &str = "Beer";

/// An update or image attach must target a stored row.
pub fn validate_id(id: DbId) -> Result<(), CoreError> {
    if id <= 0 {
        return Err(CoreError::Validation("invalid beer ID provided".into()));
    }
    Ok(())
}

/// Reject blank values for required text fields.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Flatten `validator` output into a single [`CoreError::Validation`].
///
/// Field names are sorted so the message is stable.
pub fn from_validation_errors(errors: &ValidationErrors) -> CoreError {
    let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
    fields.sort_unstable();
    CoreError::Validation(format!("invalid fields: {}", fields.join(", ")))
}

/// Build a `LIKE` pattern matching `fragment` anywhere in the column.
///
/// `%`, `_` and the escape character itself are escaped so the fragment is
/// matched literally.
pub fn name_filter_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use validator::{Validate, ValidationErrors};

    use super::*;

    #[test]
    fn zero_and_negative_ids_are_rejected() {
        assert_matches!(validate_id(0), Err(CoreError::Validation(_)));
        assert_matches!(validate_id(-3), Err(CoreError::Validation(_)));
        assert!(validate_id(1).is_ok());
    }

    #[test]
    fn blank_required_field_is_rejected() {
        assert_matches!(require_non_empty("name", "   "), Err(CoreError::Validation(msg)) if msg == "name must not be empty");
        assert!(require_non_empty("name", "Lager").is_ok());
    }

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 1))]
        name: String,
        #[validate(length(min = 1))]
        category: String,
    }

    #[test]
    fn validation_errors_list_fields_in_order() {
        let form = Form {
            name: String::new(),
            category: String::new(),
        };
        let errors: ValidationErrors = form.validate().unwrap_err();
        assert_matches!(
            from_validation_errors(&errors),
            CoreError::Validation(msg) if msg == "invalid fields: category, name"
        );
    }

    #[test]
    fn pattern_wraps_fragment() {
        assert_eq!(name_filter_pattern("Lag"), "%Lag%");
    }

    #[test]
    fn pattern_escapes_like_metacharacters() {
        assert_eq!(name_filter_pattern("100%"), "%100\\%%");
        assert_eq!(name_filter_pattern("a_b"), "%a\\_b%");
        assert_eq!(name_filter_pattern("x\\y"), "%x\\\\y%");
    }
}
