//! Person fields shared by students and instructors.
//!
//! # Responsibility
//! - Hold validated `name`, `age` and `email`.
//! - Own the field validation rules used by every write path.
//!
//! # Invariants
//! - `age >= 0`.
//! - `email` has a `local@domain.tld` shape (not full RFC 5322).
//! - `name` is never blank.

use crate::model::EntityKind;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Field-level validation failure. Raised before anything reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidAge(i64),
    InvalidEmail(String),
    MissingField(&'static str),
    DuplicateId { kind: EntityKind, id: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAge(age) => write!(f, "invalid age `{age}`: must be non-negative"),
            Self::InvalidEmail(email) => write!(f, "invalid email format: `{email}`"),
            Self::MissingField(field) => write!(f, "required field `{field}` is empty"),
            Self::DuplicateId { kind, id } => write!(f, "{kind} id already exists: {id}"),
        }
    }
}

impl Error for ValidationError {}

/// Checks the non-negative age rule.
pub fn validate_age(age: i64) -> Result<(), ValidationError> {
    if age < 0 {
        return Err(ValidationError::InvalidAge(age));
    }
    Ok(())
}

/// Checks the lightweight `local@domain.tld` email rule.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

/// Rejects empty or whitespace-only values for required fields.
pub fn require_non_blank(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Validates the three person fields together.
pub fn validate_person_fields(name: &str, age: i64, email: &str) -> Result<(), ValidationError> {
    require_non_blank(name, "name")?;
    validate_age(age)?;
    validate_email(email)
}

/// Scalar person data. Identity lives on the concrete subtype IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    name: String,
    age: i64,
    email: String,
}

impl Person {
    /// Builds a person after validating every field.
    pub fn new(
        name: impl Into<String>,
        age: i64,
        email: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let email = email.into();
        validate_person_fields(&name, age, &email)?;
        Ok(Self { name, age, email })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i64 {
        self.age
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Capability set shared by [`Student`](crate::model::student::Student) and
/// [`Instructor`](crate::model::instructor::Instructor).
pub trait PersonLike {
    /// Underlying person fields.
    fn person(&self) -> &Person;

    /// Subtype identifier (`student_id` or `instructor_id`).
    fn id(&self) -> &str;

    /// Single-line self-introduction.
    fn introduce(&self) -> String;

    fn name(&self) -> &str {
        self.person().name()
    }

    fn age(&self) -> i64 {
        self.person().age()
    }

    fn email(&self) -> &str {
        self.person().email()
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_email, Person, ValidationError};

    #[test]
    fn email_rule_accepts_simple_addresses() {
        assert!(validate_email("alice@uni.edu").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());
    }

    #[test]
    fn email_rule_rejects_missing_parts() {
        for bad in [
            "",
            "alice",
            "alice@",
            "alice@uni",
            "@uni.edu",
            "alice uni@edu",
            "alice@uni.edu junk",
            "a@b.c@d",
        ] {
            assert!(
                matches!(validate_email(bad), Err(ValidationError::InvalidEmail(_))),
                "`{bad}` should be rejected"
            );
        }
    }

    #[test]
    fn person_rejects_negative_age_and_blank_name() {
        assert_eq!(
            Person::new("Alice", -1, "alice@uni.edu").unwrap_err(),
            ValidationError::InvalidAge(-1)
        );
        assert_eq!(
            Person::new("  ", 20, "alice@uni.edu").unwrap_err(),
            ValidationError::MissingField("name")
        );
    }
}
