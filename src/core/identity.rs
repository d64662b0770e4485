//! Session identity for ownership gating
//!
//! The identity is an explicit value constructed once at startup and handed
//! to the view controller. It is never read from ambient global state.

use crate::core::listing::Listing;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who the current client claims to be.
///
/// Ownership derived from this value is advisory: it only decides whether
/// edit/delete controls are rendered. The store layer performs no ownership
/// check of its own, so any client can still issue update/delete calls for
/// any id. This is a known gap, documented here rather than silently
/// patched; a real deployment needs server-side authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionIdentity {
    /// Self-reported display name.
    Named(String),
    /// Generated anonymous identity (`swapper-<short id>`).
    Anonymous(String),
}

impl SessionIdentity {
    /// Build a named identity; whitespace-only names fall back to an
    /// anonymous one.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            Self::anonymous()
        } else {
            Self::Named(name)
        }
    }

    /// Generate a fresh anonymous identity.
    pub fn anonymous() -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self::Anonymous(format!("swapper-{}", &id[..8]))
    }

    /// The name listings created under this identity carry in `owner`.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Named(name) | Self::Anonymous(name) => name,
        }
    }

    /// Display-only ownership check.
    pub fn owns(&self, listing: &Listing) -> bool {
        listing.owner == self.display_name()
    }
}
