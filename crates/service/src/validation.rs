//! Declarative request validation run by the transport before the service.

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::errors::ServiceError;

/// Validate `input`, reporting every offending field path.
///
/// ```
/// use service::question::dto::QuestionCreationDto;
/// use service::validation::validate_input;
/// let err = validate_input(&QuestionCreationDto::default()).unwrap_err();
/// assert_eq!(err.to_string(), "validation error: field validation error, missing fields: [body]");
/// ```
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input.validate().map_err(|errors| {
        let mut fields = Vec::new();
        collect_fields("", &errors, &mut fields);
        fields.sort();
        ServiceError::Validation(format!("field validation error, missing fields: [{}]", fields.join(", ")))
    })
}

fn collect_fields(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() { field.to_string() } else { format!("{prefix}.{field}") };
        match kind {
            ValidationErrorsKind::Field(_) => out.push(path),
            ValidationErrorsKind::Struct(inner) => collect_fields(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect_fields(&format!("{path}[{idx}]"), inner, out);
                }
            }
        }
    }
}
