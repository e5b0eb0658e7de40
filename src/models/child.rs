//! Child model and identifier aliases.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a child, assigned by the external data store.
pub type ChildId = i64;

/// Opaque identifier of a group, assigned by the external data store.
pub type GroupId = i64;

/// A child enrolled in the kindergarten.
///
/// Children are owned by the external data store; the engine treats them as
/// read-only input and only needs the id and display name for charge output
/// and audit text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    /// Unique identifier for the child.
    pub id: ChildId,
    /// The child's display name.
    pub full_name: String,
    /// The group the child is assigned to, if any.
    pub group_id: Option<GroupId>,
}
