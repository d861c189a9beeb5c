//! Unified error codes for the ProLibr prompt library
//!
//! Error codes are shared between the server, the client crate, and any
//! frontend consuming the API. They are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Prompt errors
//! - 4xxx: Category errors
//! - 5xxx: Execution errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,
    /// OAuth code exchange with the identity provider failed
    OAuthExchangeFailed = 1006,
    /// OAuth state parameter missing or unknown
    OAuthStateMismatch = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Caller is not the owner of the resource
    NotResourceOwner = 2002,

    // ==================== 3xxx: Prompt ====================
    /// Prompt not found
    PromptNotFound = 3001,
    /// Too many tags supplied
    TagLimitExceeded = 3002,
    /// Tag name exceeds the length limit
    TagNameTooLong = 3003,
    /// Template variables / model parameters must be a JSON object
    TemplateVariablesInvalid = 3004,

    // ==================== 4xxx: Category ====================
    /// Category not found
    CategoryNotFound = 4001,
    /// Category name already exists
    CategoryNameExists = 4002,
    /// Category still has dependent prompts
    CategoryHasPrompts = 4003,

    // ==================== 5xxx: Execution ====================
    /// Execution not found
    ExecutionNotFound = 5001,
    /// Quality rating outside 1-5
    RatingOutOfRange = 5002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Too many requests
    RateLimited = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::OAuthExchangeFailed => "Sign-in with the identity provider failed",
            ErrorCode::OAuthStateMismatch => "Sign-in state mismatch, please retry",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::NotResourceOwner => "You do not own this resource",

            // Prompt
            ErrorCode::PromptNotFound => "Prompt not found",
            ErrorCode::TagLimitExceeded => "Too many tags",
            ErrorCode::TagNameTooLong => "Tag name is too long",
            ErrorCode::TemplateVariablesInvalid => "Template variables must be a JSON object",

            // Category
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::CategoryHasPrompts => "Category still has prompts assigned to it",

            // Execution
            ErrorCode::ExecutionNotFound => "Execution not found",
            ErrorCode::RatingOutOfRange => "Quality rating must be between 1 and 5",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::RateLimited => "Too many requests",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1006 => Ok(ErrorCode::OAuthExchangeFailed),
            1007 => Ok(ErrorCode::OAuthStateMismatch),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::NotResourceOwner),

            // Prompt
            3001 => Ok(ErrorCode::PromptNotFound),
            3002 => Ok(ErrorCode::TagLimitExceeded),
            3003 => Ok(ErrorCode::TagNameTooLong),
            3004 => Ok(ErrorCode::TemplateVariablesInvalid),

            // Category
            4001 => Ok(ErrorCode::CategoryNotFound),
            4002 => Ok(ErrorCode::CategoryNameExists),
            4003 => Ok(ErrorCode::CategoryHasPrompts),

            // Execution
            5001 => Ok(ErrorCode::ExecutionNotFound),
            5002 => Ok(ErrorCode::RatingOutOfRange),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::RateLimited),

            other => Err(InvalidErrorCode(other)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::PromptNotFound.code(), 3001);
        assert_eq!(ErrorCode::CategoryHasPrompts.code(), 4003);
        assert_eq!(ErrorCode::RateLimited.code(), 9004);
    }

    #[test]
    fn test_try_from_round_trip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::SessionExpired,
            ErrorCode::NotResourceOwner,
            ErrorCode::PromptNotFound,
            ErrorCode::CategoryHasPrompts,
            ErrorCode::RatingOutOfRange,
            ErrorCode::RateLimited,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_unknown() {
        assert_eq!(ErrorCode::try_from(12345), Err(InvalidErrorCode(12345)));
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::PromptNotFound).unwrap();
        assert_eq!(json, "3001");
        let code: ErrorCode = serde_json::from_str("4003").unwrap();
        assert_eq!(code, ErrorCode::CategoryHasPrompts);
    }
}
