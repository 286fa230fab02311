//! Signup form validation, run before anything is sent to the identity
//! provider.

use serde::Deserialize;
use std::collections::HashMap;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Body of `POST /user/create`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm: Option<String>,
}

/// A signup that passed every rule
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSignup {
    pub email: String,
    pub password: String,
}

/// Password complexity: length, a digit, an uppercase and a lowercase letter.
/// Returns the first rule that fails.
pub fn password_problem(password: &str) -> Option<&'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some("Too short");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one number");
    }
    if !password.chars().any(char::is_uppercase) {
        return Some("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(char::is_lowercase) {
        return Some("Password must contain at least one lowercase letter");
    }
    None
}

impl SignupForm {
    /// Check every field and collect all failures keyed by field name
    pub fn validate(self) -> Result<ValidSignup, HashMap<String, String>> {
        let mut errors = HashMap::new();

        let email = self.email.map(|e| e.trim().to_string()).unwrap_or_default();
        if email.is_empty() {
            errors.insert("email".to_string(), "This field is required".to_string());
        } else if !email.contains('@') {
            errors.insert("email".to_string(), "Invalid email address".to_string());
        }

        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            errors.insert("password".to_string(), "This field is required".to_string());
        } else if let Some(problem) = password_problem(&password) {
            errors.insert("password".to_string(), problem.to_string());
        }

        if let Some(confirm) = &self.confirm {
            if *confirm != password {
                errors.insert("confirm".to_string(), "Password mismatch".to_string());
            }
        }

        if errors.is_empty() {
            Ok(ValidSignup { email, password })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str, confirm: Option<&str>) -> SignupForm {
        SignupForm {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            confirm: confirm.map(str::to_string),
        }
    }

    #[test]
    fn accepts_complex_password() {
        let valid = form(" snack@example.com ", "Cheetos123", Some("Cheetos123")).validate().unwrap();
        assert_eq!(valid.email, "snack@example.com");
    }

    #[test]
    fn password_rules_report_first_failure() {
        assert_eq!(password_problem("Ab1"), Some("Too short"));
        assert_eq!(password_problem("Cheetosss"), Some("Password must contain at least one number"));
        assert_eq!(password_problem("cheetos123"), Some("Password must contain at least one uppercase letter"));
        assert_eq!(password_problem("CHEETOS123"), Some("Password must contain at least one lowercase letter"));
        assert_eq!(password_problem("Cheetos123"), None);
    }

    #[test]
    fn collects_every_field_error() {
        let errors = SignupForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));
    }

    #[test]
    fn confirm_must_match() {
        let errors = form("snack@example.com", "Cheetos123", Some("Cheetos124")).validate().unwrap_err();
        assert_eq!(errors.get("confirm").map(String::as_str), Some("Password mismatch"));
    }
}
