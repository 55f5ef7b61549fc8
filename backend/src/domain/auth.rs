//! Authentication primitives: login credentials and registration passwords.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::FieldViolation;

/// Minimum accepted password length in characters.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace.
///
/// # Examples
/// ```
/// use travel_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("admin", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reasons a registration password is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordValidationError {
    /// Shorter than [`PASSWORD_MIN`].
    TooShort { min: usize },
    /// Made of digits only.
    EntirelyNumeric,
    /// Confirmation differs from the password.
    ConfirmationMismatch,
}

impl FieldViolation for PasswordValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::TooShort { .. } | Self::EntirelyNumeric => "password",
            Self::ConfirmationMismatch => "passwordConfirmation",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "password_too_short",
            Self::EntirelyNumeric => "password_entirely_numeric",
            Self::ConfirmationMismatch => "password_mismatch",
        }
    }
}

impl fmt::Display for PasswordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { min } => {
                write!(f, "password must contain at least {min} characters")
            }
            Self::EntirelyNumeric => write!(f, "password must not be entirely numeric"),
            Self::ConfirmationMismatch => write!(f, "passwords do not match"),
        }
    }
}

impl std::error::Error for PasswordValidationError {}

/// Plaintext password accepted at registration, zeroed on drop.
///
/// # Examples
/// ```
/// use travel_backend::domain::NewPassword;
///
/// assert!(NewPassword::confirm("s3cure-enough", "s3cure-enough").is_ok());
/// assert!(NewPassword::confirm("12345678", "12345678").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Validate a password against its confirmation.
    pub fn confirm(password: &str, confirmation: &str) -> Result<Self, PasswordValidationError> {
        if password.chars().count() < PASSWORD_MIN {
            return Err(PasswordValidationError::TooShort { min: PASSWORD_MIN });
        }
        if password.chars().all(|c| c.is_ascii_digit()) {
            return Err(PasswordValidationError::EntirelyNumeric);
        }
        if password != confirmation {
            return Err(PasswordValidationError::ConfirmationMismatch);
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    /// Plaintext value, for hashing only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin  ", "secret")]
    #[case("alice", "correct horse battery staple")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    #[case("short1", "short1", PasswordValidationError::TooShort { min: PASSWORD_MIN })]
    #[case("1234567890", "1234567890", PasswordValidationError::EntirelyNumeric)]
    #[case("long-enough", "long-enougH", PasswordValidationError::ConfirmationMismatch)]
    fn rejected_passwords(
        #[case] password: &str,
        #[case] confirmation: &str,
        #[case] expected: PasswordValidationError,
    ) {
        let err = NewPassword::confirm(password, confirmation).expect_err("must be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn mismatch_points_at_confirmation_field() {
        let err = NewPassword::confirm("long-enough", "different")
            .expect_err("mismatch must be rejected");
        assert_eq!(err.field(), "passwordConfirmation");
    }

    #[rstest]
    fn accepted_password_is_exposed_for_hashing() {
        let password = NewPassword::confirm("hunter2-plus", "hunter2-plus").expect("valid");
        assert_eq!(password.expose(), "hunter2-plus");
    }
}
