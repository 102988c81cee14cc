use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("domain entity `{entity}` not found")]
    NotFound { entity: &'static str },
    #[error("`{field}` is invalid: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Reject blank values for a required text field.
pub fn ensure_present(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Accept `#rgb` and `#rrggbb` colour literals only.
pub fn ensure_hex_colour(value: &str, field: &'static str) -> Result<(), DomainError> {
    let digits = value
        .strip_prefix('#')
        .ok_or_else(|| DomainError::validation(field, "colour must start with `#`"))?;

    if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DomainError::validation(
            field,
            format!("`{value}` is not a hex colour"),
        ));
    }
    Ok(())
}
