//! Admin domain module.
//!
//! Thin controllers mapping registry operations onto list/get/create/
//! update/delete endpoints. Each returns a [`Reply`] carrying the uniform
//! [`ApiResponse`] envelope and a status code; binding them to routes is up
//! to the embedding transport.
//!
//! Reads are open to everyone. Mutations require a privileged [`Caller`].

mod envelope;
mod prompts;
mod resources;

pub use envelope::{
    ApiResponse, Reply, STATUS_BAD_REQUEST, STATUS_CONFLICT, STATUS_CREATED, STATUS_FORBIDDEN,
    STATUS_INTERNAL_ERROR, STATUS_NOT_FOUND, STATUS_OK,
};
pub use prompts::PromptAdmin;
pub use resources::{DEFAULT_MIME_TYPE, ResourceAdmin};

/// Identity of the caller, as established by the surrounding auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub privileged: bool,
}

impl Caller {
    pub fn admin() -> Self {
        Self { privileged: true }
    }

    pub fn anonymous() -> Self {
        Self { privileged: false }
    }
}

/// Missing, empty or whitespace-only.
fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn is_cleared(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().is_empty())
}
