//! Field validation for the registration, login and password forms.
//!
//! Rules and messages match what the backend's other clients show, so they are
//! kept exactly as listed here. Validation is pure: no I/O, no state, and the
//! same input always produces the same map.
//!
//! The `regex` crate has no look-around, so the password rule is the allowed
//! character class plus separate letter/digit presence checks.

use crate::api::{LoginForm, RegistrationForm};
use regex::Regex;
use std::{collections::BTreeMap, fmt};

const USERNAME_PATTERN: &str = r"^[a-zA-Z0-9_]{3,20}$";
const PHONE_PATTERN: &str = r"^[+]?[0-9\s\-()]{10,}$";
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PASSWORD_CHARSET_PATTERN: &str = r"^[A-Za-z0-9@$!%*#?&]{8,}$";

// Length limits are in UTF-16 code units, the unit browsers count.
const NAME_MIN_UNITS: usize = 2;
const NAME_MAX_UNITS: usize = 50;
const IDENTIFIER_MIN_UNITS: usize = 3;
const LOGIN_PASSWORD_MIN_UNITS: usize = 6;

const EMAIL_REQUIRED: &str = "Email is required";
const EMAIL_INVALID: &str = "Please enter a valid email address";
const PASSWORD_REQUIRED: &str = "Password is required";
const PASSWORD_WEAK: &str =
    "Password must be at least 8 characters with at least one letter and one number";

/// Form fields that can carry a validation error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Username,
    Phone,
    Email,
    Password,
    Identifier,
}

impl Field {
    /// Wire name of the field, as used in request bodies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Username => "username",
            Self::Phone => "phNum",
            Self::Email => "mail",
            Self::Password => "password",
            Self::Identifier => "identifier",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field → message map. A field is valid exactly when it has no entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, &'static str>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }

    /// Drops the error for a field the user just edited.
    pub fn clear_field(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn check(&mut self, field: Field, result: Option<&'static str>) {
        if let Some(message) = result {
            self.insert(field, message);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (field, message)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn matches(pattern: &str, value: &str) -> bool {
    Regex::new(pattern).is_ok_and(|regex| regex.is_match(value))
}

#[derive(Clone, Copy)]
enum NameField {
    First,
    Last,
}

fn check_name(value: &str, which: NameField) -> Option<&'static str> {
    let (required, short, long) = match which {
        NameField::First => (
            "First name is required",
            "First name must be at least 2 characters",
            "First name must be less than 50 characters",
        ),
        NameField::Last => (
            "Last name is required",
            "Last name must be at least 2 characters",
            "Last name must be less than 50 characters",
        ),
    };

    let trimmed = value.trim();
    let len = utf16_len(trimmed);
    if trimmed.is_empty() {
        Some(required)
    } else if len < NAME_MIN_UNITS {
        Some(short)
    } else if len > NAME_MAX_UNITS {
        Some(long)
    } else {
        None
    }
}

fn check_username(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some("Username is required")
    } else if !matches(USERNAME_PATTERN, trimmed) {
        Some("Username must be 3-20 characters and contain only letters, numbers, and underscores")
    } else {
        None
    }
}

fn check_phone(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some("Phone number is required")
    } else if !matches(PHONE_PATTERN, trimmed) {
        Some("Please enter a valid phone number")
    } else {
        None
    }
}

fn strong_password(password: &str) -> bool {
    matches(PASSWORD_CHARSET_PATTERN, password)
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Validates a registration form. Returns only the failing fields.
#[must_use]
pub fn validate_registration(form: &RegistrationForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.check(Field::FirstName, check_name(&form.first_name, NameField::First));
    errors.check(Field::LastName, check_name(&form.last_name, NameField::Last));
    errors.check(Field::Username, check_username(&form.username));
    errors.check(Field::Phone, check_phone(&form.phone));
    errors.check(Field::Email, validate_email(&form.email));
    errors.check(Field::Password, validate_password(&form.password));
    errors
}

/// Validates a login form.
///
/// The password rule here is deliberately looser than registration's: accounts
/// created before the current rule must still be able to sign in.
#[must_use]
pub fn validate_login(form: &LoginForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let identifier = form.identifier.trim();
    if identifier.is_empty() {
        errors.insert(Field::Identifier, "Email or username is required");
    } else if utf16_len(identifier) < IDENTIFIER_MIN_UNITS {
        errors.insert(Field::Identifier, "Please enter a valid email or username");
    }

    if form.password.is_empty() {
        errors.insert(Field::Password, PASSWORD_REQUIRED);
    } else if utf16_len(&form.password) < LOGIN_PASSWORD_MIN_UNITS {
        errors.insert(Field::Password, "Password must be at least 6 characters");
    }

    errors
}

#[must_use]
pub fn validate_email(email: &str) -> Option<&'static str> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        Some(EMAIL_REQUIRED)
    } else if !matches(EMAIL_PATTERN, trimmed) {
        Some(EMAIL_INVALID)
    } else {
        None
    }
}

/// Registration-strength password check. The value is not trimmed.
#[must_use]
pub fn validate_password(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some(PASSWORD_REQUIRED)
    } else if !strong_password(password) {
        Some(PASSWORD_WEAK)
    } else {
        None
    }
}

#[must_use]
pub fn validate_password_match(password: &str, confirm: &str) -> Option<&'static str> {
    if confirm.is_empty() {
        Some("Please confirm your password")
    } else if password != confirm {
        Some("Passwords do not match")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada_l".to_string(),
            phone: "+44 (20) 7946-0958".to_string(),
            email: "ada@example.com".to_string(),
            password: "abc12345".to_string(),
        }
    }

    fn login(identifier: &str, password: &str) -> LoginForm {
        LoginForm {
            identifier: identifier.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn valid_registration_has_no_errors() {
        let errors = validate_registration(&valid_form());
        assert!(errors.is_empty(), "unexpected errors: {errors}");
    }

    #[test]
    fn empty_registration_reports_every_field_as_required() {
        let errors = validate_registration(&RegistrationForm::default());
        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get(Field::FirstName), Some("First name is required"));
        assert_eq!(errors.get(Field::LastName), Some("Last name is required"));
        assert_eq!(errors.get(Field::Username), Some("Username is required"));
        assert_eq!(errors.get(Field::Phone), Some("Phone number is required"));
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert_eq!(errors.get(Field::Password), Some("Password is required"));
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut form = valid_form();
        form.first_name = "   ".to_string();
        form.email = "\t".to_string();
        let errors = validate_registration(&form);
        assert_eq!(errors.get(Field::FirstName), Some("First name is required"));
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn name_length_bounds_use_trimmed_value() {
        let mut form = valid_form();
        form.first_name = " A ".to_string();
        form.last_name = "x".repeat(51);
        let errors = validate_registration(&form);
        assert_eq!(
            errors.get(Field::FirstName),
            Some("First name must be at least 2 characters")
        );
        assert_eq!(
            errors.get(Field::LastName),
            Some("Last name must be less than 50 characters")
        );

        form.first_name = "  Al  ".to_string();
        form.last_name = "x".repeat(50);
        assert!(validate_registration(&form).is_empty());
    }

    #[test]
    fn username_format() {
        let longest = "u".repeat(20);
        let too_long = "u".repeat(21);
        let cases = [
            ("ab", false),
            ("abc", true),
            ("a_b_c_123", true),
            ("with space", false),
            ("dash-name", false),
            (longest.as_str(), true),
            (too_long.as_str(), false),
        ];
        for (username, ok) in cases {
            let mut form = valid_form();
            form.username = username.to_string();
            let errors = validate_registration(&form);
            assert_eq!(!errors.contains(Field::Username), ok, "username {username:?}");
        }
    }

    #[test]
    fn phone_format() {
        let cases = [
            ("0123456789", true),
            ("+1 (555) 010-9999", true),
            ("12345", false),
            ("++1234567890", false),
            ("555-CALL-NOW", false),
            ("   0123456789  ", true),
        ];
        for (phone, ok) in cases {
            let mut form = valid_form();
            form.phone = phone.to_string();
            let errors = validate_registration(&form);
            assert_eq!(!errors.contains(Field::Phone), ok, "phone {phone:?}");
        }
    }

    #[test]
    fn password_needs_letter_and_digit() {
        let mut form = valid_form();
        form.password = "abcdefgh".to_string();
        assert_eq!(
            validate_registration(&form).get(Field::Password),
            Some(PASSWORD_WEAK)
        );

        form.password = "abc12345".to_string();
        assert!(validate_registration(&form).is_empty());

        for weak in ["12345678", "abc1234", "abc 12345", "abc12345~"] {
            assert_eq!(validate_password(weak), Some(PASSWORD_WEAK), "{weak:?}");
        }
        assert_eq!(validate_password("P@ss#w0rd!"), None);
    }

    #[test]
    fn each_field_fails_independently() {
        let broken: [(Field, fn(&mut RegistrationForm)); 6] = [
            (Field::FirstName, |f| f.first_name = "A".to_string()),
            (Field::LastName, |f| f.last_name = String::new()),
            (Field::Username, |f| f.username = "no!".to_string()),
            (Field::Phone, |f| f.phone = "123".to_string()),
            (Field::Email, |f| f.email = "nobody".to_string()),
            (Field::Password, |f| f.password = "short1".to_string()),
        ];
        for (field, breaker) in broken {
            let mut form = valid_form();
            breaker(&mut form);
            let errors = validate_registration(&form);
            assert_eq!(errors.len(), 1, "{field}: {errors}");
            assert!(errors.contains(field));
        }
    }

    #[test]
    fn login_identifier_too_short() {
        let errors = validate_login(&login("ab", "abcdef"));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::Identifier),
            Some("Please enter a valid email or username")
        );
    }

    #[test]
    fn login_password_too_short() {
        let errors = validate_login(&login("abc", "abcde"));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn login_accepts_passwords_registration_would_reject() {
        assert!(validate_login(&login("ada_l", "abcdef")).is_empty());
        assert!(validate_password("abcdef").is_some());
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login(&login("  ", ""));
        assert_eq!(errors.get(Field::Identifier), Some("Email or username is required"));
        assert_eq!(errors.get(Field::Password), Some("Password is required"));
    }

    #[test]
    fn email_helper() {
        assert_eq!(validate_email(""), Some(EMAIL_REQUIRED));
        assert_eq!(validate_email("user@host"), Some(EMAIL_INVALID));
        assert_eq!(validate_email("us er@host.com"), Some(EMAIL_INVALID));
        assert_eq!(validate_email(" user@host.com "), None);
    }

    #[test]
    fn lengths_count_utf16_units() {
        let login = validate_login(&LoginForm {
            identifier: "ada".to_string(),
            password: "😀😀😀".to_string(),
        });
        assert!(login.is_empty());

        let short = validate_login(&LoginForm {
            identifier: "😀".to_string(),
            password: "😀😀".to_string(),
        });
        assert_eq!(
            short.get(Field::Identifier),
            Some("Please enter a valid email or username")
        );
        assert_eq!(
            short.get(Field::Password),
            Some("Password must be at least 6 characters")
        );

        let mut form = valid_form();
        form.first_name = "😀".to_string();
        form.last_name = "😀".repeat(30);
        let errors = validate_registration(&form);
        assert_eq!(errors.get(Field::FirstName), None);
        assert_eq!(
            errors.get(Field::LastName),
            Some("Last name must be less than 50 characters")
        );

        form.last_name = "😀".repeat(25);
        assert_eq!(validate_registration(&form).get(Field::LastName), None);
    }

    #[test]
    fn password_match_helper() {
        assert_eq!(
            validate_password_match("abc12345", ""),
            Some("Please confirm your password")
        );
        assert_eq!(
            validate_password_match("abc12345", "abc12346"),
            Some("Passwords do not match")
        );
        assert_eq!(validate_password_match("abc12345", "abc12345"), None);
    }

    #[test]
    fn clearing_a_field_keeps_the_rest() {
        let mut errors = validate_registration(&RegistrationForm::default());
        errors.clear_field(Field::Email);
        assert!(!errors.contains(Field::Email));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn display_lists_wire_names() {
        let errors = validate_login(&login("", ""));
        assert_eq!(
            errors.to_string(),
            "password: Password is required; identifier: Email or username is required"
        );
    }
}
