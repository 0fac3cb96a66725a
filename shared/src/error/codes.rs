//! Unified error codes for the cluster gateway
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: License errors
//! - 8xxx: Account (user/role) errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so API clients can match on
/// them without parsing messages.
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
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// No route registered for method + path
    RouteNotFound = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// No token in header, query or cookie
    TokenNotFound = 1008,
    /// Delegated request without an asserted identity
    IdentityMissing = 1009,
    /// Strategy header names an unknown or disabled strategy
    UnsupportedAuthType = 1010,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Cannot create or modify the admin user
    CannotModifyAdmin = 2004,
    /// Cannot delete the admin user
    CannotDeleteAdmin = 2005,
    /// Cannot create, rename or delete the admin role
    CannotModifyAdminRole = 2006,

    // ==================== 3xxx: License ====================
    /// License missing or rejected
    LicenseInvalid = 3001,
    /// License has expired
    LicenseExpired = 3005,

    // ==================== 8xxx: Account ====================
    /// User not found
    UserNotFound = 8001,
    /// Username already exists
    UsernameExists = 8002,
    /// Role not found
    RoleNotFound = 8101,
    /// Role name already exists
    RoleNameExists = 8102,
    /// Role capability above the permitted ceiling
    CapabilityOutOfRange = 8105,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Store (persistence collaborator) failure
    StoreError = 9002,
    /// Identity platform unreachable or misbehaving
    UpstreamError = 9003,
    /// Configuration error
    ConfigError = 9005,
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

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::RouteNotFound => "Route not found",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Incorrect credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::TokenNotFound => "Token not found",
            ErrorCode::IdentityMissing => "Asserted identity not found",
            ErrorCode::UnsupportedAuthType => "Unsupported authentication type",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::CannotModifyAdmin => "Cannot create or modify administrator user",
            ErrorCode::CannotDeleteAdmin => "Cannot delete administrator user",
            ErrorCode::CannotModifyAdminRole => "Cannot create, modify or delete administrator role",

            // License
            ErrorCode::LicenseInvalid => "License is missing or invalid",
            ErrorCode::LicenseExpired => "License has expired",

            // Account
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::RoleNotFound => "Role not found",
            ErrorCode::RoleNameExists => "Role name already exists",
            ErrorCode::CapabilityOutOfRange => "Role capability exceeds the permitted maximum",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StoreError => "Store error",
            ErrorCode::UpstreamError => "Identity platform error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
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
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::RouteNotFound),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1008 => Ok(ErrorCode::TokenNotFound),
            1009 => Ok(ErrorCode::IdentityMissing),
            1010 => Ok(ErrorCode::UnsupportedAuthType),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2004 => Ok(ErrorCode::CannotModifyAdmin),
            2005 => Ok(ErrorCode::CannotDeleteAdmin),
            2006 => Ok(ErrorCode::CannotModifyAdminRole),

            // License
            3001 => Ok(ErrorCode::LicenseInvalid),
            3005 => Ok(ErrorCode::LicenseExpired),

            // Account
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UsernameExists),
            8101 => Ok(ErrorCode::RoleNotFound),
            8102 => Ok(ErrorCode::RoleNameExists),
            8105 => Ok(ErrorCode::CapabilityOutOfRange),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StoreError),
            9003 => Ok(ErrorCode::UpstreamError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
