//! The `{success, data | message}` response envelope.

use serde::{Deserialize, Serialize};

use crate::storage::RegistryError;

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_CONFLICT: u16 = 409;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Uniform API response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A response body paired with the status a transport should send.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub status: u16,
    pub body: ApiResponse<T>,
}

impl<T> Reply<T> {
    pub fn ok(data: T) -> Self {
        Self::with_data(STATUS_OK, data)
    }

    pub fn created(data: T) -> Self {
        Self::with_data(STATUS_CREATED, data)
    }

    /// A successful reply carrying only a message.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK,
            body: ApiResponse {
                success: true,
                data: None,
                message: Some(message.into()),
            },
        }
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiResponse {
                success: false,
                data: None,
                message: Some(message.into()),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::failure(STATUS_BAD_REQUEST, message)
    }

    pub fn forbidden() -> Self {
        Self::failure(STATUS_FORBIDDEN, "Insufficient privileges")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(STATUS_NOT_FOUND, message)
    }

    /// Map a registry failure: key collisions are conflicts, everything
    /// else is an internal error. The registry message is passed through.
    pub fn from_registry_error(err: &RegistryError) -> Self {
        let status = if err.is_duplicate_key() {
            STATUS_CONFLICT
        } else {
            STATUS_INTERNAL_ERROR
        };
        Self::failure(status, err.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.body.success
    }

    fn with_data(status: u16, data: T) -> Self {
        Self {
            status,
            body: ApiResponse {
                success: true,
                data: Some(data),
                message: None,
            },
        }
    }
}
