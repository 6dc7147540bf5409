use crate::error::{MirrorError, Result};
use crate::store::Store;
use crate::types::records::{CompatibilityRecord, Relationship, RelationshipStatus};

pub const NO_SCORE_YET: &str =
    "No compatibility score yet. Please complete assessments to generate a score.";

fn member_relationship<S: Store>(
    store: &S,
    relationship_id: &str,
    user_id: &str,
) -> Result<Relationship> {
    store
        .relationship(relationship_id)?
        .filter(|relationship| relationship.includes(user_id))
        .ok_or_else(|| {
            MirrorError::Relationship(format!(
                "{user_id} has no relationship {relationship_id}"
            ))
        })
}

/// Either partner may end an active relationship. Stored compatibility
/// records stay readable afterwards.
pub fn end_relationship<S: Store>(
    store: &mut S,
    relationship_id: &str,
    user_id: &str,
) -> Result<Relationship> {
    let mut relationship = member_relationship(&*store, relationship_id, user_id)?;
    if relationship.status != RelationshipStatus::Active {
        return Err(MirrorError::Relationship(format!(
            "relationship {relationship_id} is already inactive"
        )));
    }

    store.set_relationship_status(&relationship.id, RelationshipStatus::Inactive)?;
    relationship.status = RelationshipStatus::Inactive;
    tracing::info!(relationship_id, user_id, "relationship ended");
    Ok(relationship)
}

/// The stored compatibility record of a relationship the caller belongs to.
pub fn latest_compatibility<S: Store>(
    store: &S,
    relationship_id: &str,
    user_id: &str,
) -> Result<Option<CompatibilityRecord>> {
    let relationship = member_relationship(store, relationship_id, user_id)?;
    let record = store.compatibility(&relationship.id)?;
    if record.is_none() {
        tracing::warn!(relationship_id, "no compatibility score stored");
    }
    Ok(record)
}
