use crate::error::{MirrorError, Result};
use crate::store::Store;
use crate::types::records::{
    InvitationStatus, PartnerInvitation, Relationship, RelationshipStatus,
};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

pub const INVITATION_TTL_DAYS: i64 = 7;
pub const CODE_LENGTH: usize = 10;

/// Short shareable code derived from who sent the invitation, to whom, and when.
pub fn invitation_code(sender_id: &str, email: Option<&str>, created_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sender_id.as_bytes());
    hasher.update(b"\n");
    hasher.update(email.unwrap_or_default().as_bytes());
    hasher.update(b"\n");
    hasher.update(
        created_at
            .to_rfc3339_opts(SecondsFormat::Nanos, true)
            .as_bytes(),
    );
    let digest = format!("{:x}", hasher.finalize());
    digest[..CODE_LENGTH].to_string()
}

pub fn create_invitation<S: Store>(
    store: &mut S,
    sender_id: &str,
    email: Option<&str>,
    now: DateTime<Utc>,
) -> Result<PartnerInvitation> {
    let invitation = store.insert_invitation(PartnerInvitation {
        id: String::new(),
        sender_id: sender_id.to_string(),
        invitation_code: invitation_code(sender_id, email, now),
        email: email.map(str::to_string),
        status: InvitationStatus::Pending,
        created_at: now,
        expires_at: now + Duration::days(INVITATION_TTL_DAYS),
    })?;
    tracing::info!(
        sender_id,
        code = %invitation.invitation_code,
        expires_at = %invitation.expires_at,
        "invitation created"
    );
    Ok(invitation)
}

/// Turns a pending invitation into an active relationship with the sender as
/// `user1`. An invitation found past its expiry is marked expired.
pub fn accept_invitation<S: Store>(
    store: &mut S,
    code: &str,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Relationship> {
    let invitation = store
        .invitation_by_code(code)?
        .filter(|invitation| invitation.status == InvitationStatus::Pending)
        .ok_or_else(|| MirrorError::Invitation("Invalid or expired invitation".to_string()))?;

    if invitation.expires_at <= now {
        store.set_invitation_status(&invitation.id, InvitationStatus::Expired)?;
        tracing::warn!(code, expires_at = %invitation.expires_at, "invitation expired");
        return Err(MirrorError::Invitation(
            "Invalid or expired invitation".to_string(),
        ));
    }

    if invitation.sender_id == user_id {
        return Err(MirrorError::Invitation(
            "You cannot accept your own invitation.".to_string(),
        ));
    }

    if store
        .active_relationship_between(&invitation.sender_id, user_id)?
        .is_some()
    {
        return Err(MirrorError::Invitation(
            "You are already connected with this partner.".to_string(),
        ));
    }

    let relationship = store.accept_invitation(
        &invitation.id,
        Relationship {
            id: String::new(),
            user1_id: invitation.sender_id.clone(),
            user2_id: user_id.to_string(),
            status: RelationshipStatus::Active,
            created_at: now,
        },
    )?;
    tracing::info!(
        code,
        relationship_id = %relationship.id,
        "invitation accepted"
    );
    Ok(relationship)
}

/// Turns down a pending invitation. The sender cannot decline their own.
pub fn decline_invitation<S: Store>(
    store: &mut S,
    code: &str,
    user_id: &str,
) -> Result<PartnerInvitation> {
    let mut invitation = store
        .invitation_by_code(code)?
        .filter(|invitation| invitation.status == InvitationStatus::Pending)
        .ok_or_else(|| MirrorError::Invitation("Invalid or expired invitation".to_string()))?;

    if invitation.sender_id == user_id {
        return Err(MirrorError::Invitation(
            "You cannot decline your own invitation.".to_string(),
        ));
    }

    store.set_invitation_status(&invitation.id, InvitationStatus::Declined)?;
    invitation.status = InvitationStatus::Declined;
    tracing::info!(code, user_id, "invitation declined");
    Ok(invitation)
}
