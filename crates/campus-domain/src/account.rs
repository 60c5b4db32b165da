//! Account domain types.

use serde::{Deserialize, Serialize};

/// Whether an account may sign in. Accounts are never deleted, only disabled.
///
/// Stored as `i16` in the `status` column (0 = Disabled, 1 = Active); serde
/// uses the snake_case name (`"disabled"`, `"active"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Disabled = 0,
    Active = 1,
}

impl AccountStatus {
    /// Convert from the stored column value. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Disabled),
            1 => Some(Self::Active),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// Administrator privilege level.
///
/// Numeric form is `u8` (0 = Admin, 1 = SuperAdmin), used by the `role` column
/// and session responses; serde uses the snake_case name (`"admin"`, `"super_admin"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Admin = 0,
    SuperAdmin = 1,
}

impl AdminRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Admin),
            1 => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl PartialOrd for AdminRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AdminRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_u8().cmp(&other.as_u8())
    }
}

/// Errors raised when an account field fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountFieldError {
    #[error("username must be 3-32 characters of letters, digits, '_', '.' or '-'")]
    InvalidUsername,
    #[error("password must be at least 8 characters")]
    PasswordTooShort,
    #[error("phone number must be 5-20 digits, optionally prefixed with '+'")]
    InvalidPhone,
}

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_username(username: &str) -> Result<(), AccountFieldError> {
    let len_ok = (3..=32).contains(&username.len());
    let chars_ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if len_ok && chars_ok {
        Ok(())
    } else {
        Err(AccountFieldError::InvalidUsername)
    }
}

pub fn validate_password(password: &str) -> Result<(), AccountFieldError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountFieldError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), AccountFieldError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if (5..=20).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AccountFieldError::InvalidPhone)
    }
}
