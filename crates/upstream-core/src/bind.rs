//! Model binding: mapping accumulated form values onto a typed record.
//!
//! Binding never fails with an error. Coercion problems and validation
//! violations are collected into a per-field message map on [`BoundModel`],
//! and validity is observed as a boolean; the caller decides what an invalid
//! model means for the request.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use validator::Validate;

use crate::form::FormValues;

/// A failed assignment of one form value onto one model field.
#[derive(Debug, Clone)]
pub struct BindError {
    pub message: String,
}

impl BindError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Assignment descriptor for a bindable record shape.
///
/// Implementations match on the field name, coerce the string value to the
/// field's declared type (see [`parse_field`]), and must ignore unknown
/// fields by returning `Ok(())`. For repeated keys `assign` is called once
/// per value, in order of occurrence.
pub trait BindModel: Default {
    fn assign(&mut self, field: &str, value: &str) -> Result<(), BindError>;
}

/// Parse one form value into a field's declared type.
pub fn parse_field<T>(field: &str, value: &str) -> Result<T, BindError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|err| BindError::new(format!("invalid value `{value}` for `{field}`: {err}")))
}

/// A model populated from form values, plus its validity.
#[derive(Debug)]
pub struct BoundModel<T> {
    model: T,
    errors: BTreeMap<String, Vec<String>>,
}

impl<T> BoundModel<T> {
    /// Whether binding and validation both succeeded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn model(&self) -> &T {
        &self.model
    }

    #[must_use]
    pub fn into_model(self) -> T {
        self.model
    }

    /// Field name to human-readable violation messages, for invalid models.
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    #[must_use]
    pub fn into_parts(self) -> (T, BTreeMap<String, Vec<String>>) {
        (self.model, self.errors)
    }
}

/// Populate a `T` from accumulated form values and validate it.
///
/// Each accumulated value is assigned through [`BindModel::assign`] in
/// insertion order; unknown keys are silently ignored by the model.
/// Declared [`Validate`] constraints then run against the populated
/// instance. Both coercion failures and constraint violations land in the
/// error map rather than aborting.
pub fn bind<T>(form: &FormValues) -> BoundModel<T>
where
    T: BindModel + Validate,
{
    let mut model = T::default();
    let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (field, values) in form.iter() {
        for value in values {
            if let Err(err) = model.assign(field, value) {
                errors.entry(field.to_string()).or_default().push(err.message);
            }
        }
    }

    if let Err(validation) = model.validate() {
        for (field, field_errors) in validation.field_errors() {
            let messages = errors.entry(field.to_string()).or_default();
            for err in field_errors {
                messages.push(
                    err.message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| format!("validation failed: {}", err.code)),
                );
            }
        }
    }

    BoundModel { model, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::Limits;
    use validator::Validate;

    #[derive(Debug, Default, Validate)]
    struct Profile {
        id: i32,
        name: String,
    }

    impl BindModel for Profile {
        fn assign(&mut self, field: &str, value: &str) -> Result<(), BindError> {
            match field {
                "id" => self.id = parse_field(field, value)?,
                "name" => self.name = value.to_string(),
                _ => {}
            }
            Ok(())
        }
    }

    #[derive(Debug, Default, Validate)]
    struct StrictProfile {
        id: i32,
        #[validate(length(min = 5, message = "name must be at least 5 characters"))]
        name: String,
        #[validate(required(message = "email is required"))]
        email: Option<String>,
    }

    impl BindModel for StrictProfile {
        fn assign(&mut self, field: &str, value: &str) -> Result<(), BindError> {
            match field {
                "id" => self.id = parse_field(field, value)?,
                "name" => self.name = value.to_string(),
                "email" => self.email = Some(value.to_string()),
                _ => {}
            }
            Ok(())
        }
    }

    fn form_with(pairs: &[(&str, &str)]) -> FormValues {
        let mut form = FormValues::new(&Limits::default());
        for (key, value) in pairs {
            form.append(key, (*value).to_string()).unwrap();
        }
        form
    }

    #[test]
    fn test_bind_valid_model() {
        let form = form_with(&[("name", "mr-x"), ("id", "42")]);
        let bound = bind::<Profile>(&form);
        assert!(bound.is_valid());
        assert_eq!(bound.model().id, 42);
        assert_eq!(bound.model().name, "mr-x");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let form = form_with(&[("id", "7"), ("color", "teal")]);
        let bound = bind::<Profile>(&form);
        assert!(bound.is_valid());
        assert_eq!(bound.model().id, 7);
    }

    #[test]
    fn test_coercion_failure_is_data_not_error() {
        let form = form_with(&[("id", "forty-two"), ("name", "mr-x")]);
        let bound = bind::<Profile>(&form);
        assert!(!bound.is_valid());
        let messages = &bound.errors()["id"];
        assert!(messages[0].contains("forty-two"));
        // The rest of the model still bound.
        assert_eq!(bound.model().name, "mr-x");
    }

    #[test]
    fn test_validation_failure_collects_messages() {
        let form = form_with(&[("id", "42"), ("name", "mr-x")]);
        let bound = bind::<StrictProfile>(&form);
        assert!(!bound.is_valid());
        assert_eq!(
            bound.errors()["name"],
            vec!["name must be at least 5 characters".to_string()]
        );
        assert_eq!(bound.errors()["email"], vec!["email is required".to_string()]);
        assert_eq!(bound.model().id, 42);
    }

    #[test]
    fn test_valid_strict_model() {
        let form = form_with(&[("id", "42"), ("name", "mister-x"), ("email", "x@example.com")]);
        let bound = bind::<StrictProfile>(&form);
        assert!(bound.is_valid(), "errors: {:?}", bound.errors());
        let (model, errors) = bound.into_parts();
        assert_eq!(model.email.as_deref(), Some("x@example.com"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_repeated_values_assigned_in_order() {
        let form = form_with(&[("name", "first"), ("name", "second")]);
        let bound = bind::<Profile>(&form);
        // Last assignment wins for a scalar field.
        assert_eq!(bound.model().name, "second");
    }
}
