//! Request body extraction with validation.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use stockroom_core::error::CoreError;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// JSON body extractor that also runs the body's `validator` rules.
///
/// Malformed JSON or a wrong content type produce `400 BAD_REQUEST`. A body
/// with missing, unknown, or mistyped fields, or one that parses but breaks
/// a rule, produces `400 VALIDATION_ERROR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(reject)?;
        value
            .validate()
            .map_err(|errors| AppError::Core(CoreError::Validation(describe(&errors))))?;
        Ok(ValidatedJson(value))
    }
}

fn reject(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(err) => AppError::Core(CoreError::Validation(err.body_text())),
        other => AppError::BadRequest(other.body_text()),
    }
}

/// Flatten validation errors into one message, preferring each rule's
/// custom message over its code.
fn describe(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages.sort();
    messages.join("; ")
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let field: &str = field.as_ref();
        let path = if prefix.is_empty() {
            field.to_string()
        } else if field == "__all__" {
            prefix.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    match &err.message {
                        Some(msg) => out.push(msg.to_string()),
                        None => out.push(format!("{path}: {}", err.code)),
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}
