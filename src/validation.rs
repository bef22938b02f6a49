//! Declarative request field checks.
//!
//! Handlers run every check for a body through one [`Checks`] collector and
//! then call [`Checks::finish`], so the client sees all violations at once.

use uuid::Uuid;

use crate::error::{AppError, FieldError};

/// Collects field violations for one request body.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, param: &'static str, msg: &str) {
        self.errors.push(FieldError {
            param,
            msg: msg.to_string(),
        });
    }

    /// Value must be present and not blank.
    pub fn required<'a>(
        &mut self,
        param: &'static str,
        value: Option<&'a str>,
        msg: &str,
    ) -> Option<&'a str> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.fail(param, msg);
                None
            }
        }
    }

    /// Value must be present and look like an email address.
    pub fn email<'a>(
        &mut self,
        param: &'static str,
        value: Option<&'a str>,
        msg: &str,
    ) -> Option<&'a str> {
        match value {
            Some(v) if is_email(v) => Some(v),
            _ => {
                self.fail(param, msg);
                None
            }
        }
    }

    /// Value must be present and at least `min` characters long.
    pub fn min_len<'a>(
        &mut self,
        param: &'static str,
        value: Option<&'a str>,
        min: usize,
        msg: &str,
    ) -> Option<&'a str> {
        match value {
            Some(v) if v.chars().count() >= min => Some(v),
            _ => {
                self.fail(param, msg);
                None
            }
        }
    }

    /// Value must be present and one of `allowed`.
    pub fn one_of<'a>(
        &mut self,
        param: &'static str,
        value: Option<&'a str>,
        allowed: &[&str],
        msg: &str,
    ) -> Option<&'a str> {
        match value {
            Some(v) if allowed.contains(&v) => Some(v),
            _ => {
                self.fail(param, msg);
                None
            }
        }
    }

    /// Value must be present and parse as an entity id.
    pub fn id(&mut self, param: &'static str, value: Option<&str>, msg: &str) -> Option<Uuid> {
        match value.and_then(|v| Uuid::parse_str(v.trim()).ok()) {
            Some(id) => Some(id),
            None => {
                self.fail(param, msg);
                None
            }
        }
    }

    /// The collected violations as an error, for callers that already know
    /// a check failed.
    pub fn into_error(self) -> AppError {
        AppError::Validation(self.errors)
    }

    /// `Err(AppError::Validation)` if any check failed.
    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// Minimal address shape check: `local@domain.tld` with no whitespace.
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
        && labels.last().is_some_and(|tld| tld.chars().count() >= 2)
}

/// Parse an id taken from the URL path.
///
/// An unparseable id can never match a stored entity, so it is reported as
/// "not found" rather than as a bad request.
pub fn parse_path_id(raw: &str, entity: &'static str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(entity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_email("a@x.com"));
        assert!(is_email("first.last+tag@mail.example.org"));

        assert!(!is_email(""));
        assert!(!is_email("no-at-sign.com"));
        assert!(!is_email("@x.com"));
        assert!(!is_email("a@x"));
        assert!(!is_email("a@x.c"));
        assert!(!is_email("a@@x.com"));
        assert!(!is_email("a b@x.com"));
        assert!(!is_email("a@x..com"));
    }

    #[test]
    fn collects_every_violation() {
        let mut checks = Checks::new();
        checks.required("name", Some("   "), "Name is required");
        checks.email("email", Some("nope"), "Please include a valid email");
        checks.min_len(
            "password",
            Some("12345"),
            6,
            "Please enter a password with 6 or more characters",
        );

        match checks.finish() {
            Err(AppError::Validation(errors)) => {
                let params: Vec<_> = errors.iter().map(|e| e.param).collect();
                assert_eq!(params, vec!["name", "email", "password"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn passing_checks_return_values() {
        let mut checks = Checks::new();
        assert_eq!(checks.required("name", Some("A"), "x"), Some("A"));
        assert_eq!(checks.min_len("password", Some("secret1"), 6, "x"), Some("secret1"));
        assert_eq!(
            checks.one_of("role", Some("admin"), &["author", "admin"], "Invalid role"),
            Some("admin")
        );
        assert!(checks.finish().is_ok());
    }

    #[test]
    fn missing_values_fail() {
        let mut checks = Checks::new();
        checks.required("title", None, "Title is required");
        checks.id("category", None, "Category is required");
        checks.one_of("role", Some("editor"), &["author", "admin"], "Invalid role");
        assert!(matches!(checks.finish(), Err(AppError::Validation(e)) if e.len() == 3));
    }

    #[test]
    fn min_len_counts_characters_not_bytes() {
        let mut checks = Checks::new();
        assert!(checks.min_len("password", Some("éééééé"), 6, "x").is_some());
        assert!(checks.finish().is_ok());
    }

    #[test]
    fn ids() {
        let id = Uuid::new_v4();
        let mut checks = Checks::new();
        assert_eq!(checks.id("category", Some(&id.to_string()), "x"), Some(id));
        assert!(checks.finish().is_ok());

        assert!(matches!(
            parse_path_id("not-a-uuid", "Blog"),
            Err(AppError::NotFound("Blog"))
        ));
        assert_eq!(parse_path_id(&id.to_string(), "Blog").unwrap(), id);
    }
}
