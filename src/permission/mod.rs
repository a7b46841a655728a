//! Permission module for Guardplane
//!
//! This module provides the access-control side of the console engine:
//! - Canonical allow/deny permission sets with pseudo-group handling
//! - Reconciliation between wire payloads and picker selection tokens
//! - Content-restriction row validation for vector-DB / AI-application policies
//! - Async principal option lookup with per-picker cancellation

pub mod model;
pub mod reconciler;
pub mod row;
pub mod search;

// Re-export specific types to avoid conflicts
pub use model::{PermissionSet, PermissionPayload, PseudoGroup, Side, SelectionSummary};
pub use reconciler::{
    SelectionBuckets, SelectionOption, SelectionToken, TokenType, decode_for_display,
    encode_from_selection, has_any_selection, to_wire_payload,
};
pub use row::{classify_row, RestrictionRow, RowErrorKey, RowErrors};
pub use search::{PrincipalSearch, PrincipalSource, SearchOutcome};
