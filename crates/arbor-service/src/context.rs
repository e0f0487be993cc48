//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use arbor_auth::Principal;

/// Context for the current authenticated request.
///
/// Built at the authentication boundary and passed into every service
/// method, so each operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The verified principal.
    pub principal: Principal,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            request_time: Utc::now(),
        }
    }

    /// Context for a bare principal id, with no profile fields.
    pub fn for_user(id: impl Into<String>) -> Self {
        Self::new(Principal::new(id))
    }

    /// The owner every hierarchy call is scoped to.
    pub fn owner(&self) -> &str {
        &self.principal.id
    }
}
