//! Teams, memberships, and user profiles.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Invite code alphabet without the ambiguous characters `0`, `O`, `1`, `I`.
const INVITE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of generated invite codes.
const INVITE_CODE_LEN: usize = 6;

/// A registered user profile.
///
/// Authentication (passwords, tokens, sessions) lives outside this service;
/// callers identify themselves by user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A team of users who schedule events together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique team identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Join code shared out-of-band with prospective members.
    pub invite_code: String,
    /// User who created the team.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Membership role within a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    /// May edit the team, its events, and memberships.
    Admin,
    /// Regular member.
    Member,
}

impl TeamRole {
    /// Returns the role as a static string slice (database representation).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Parses the database representation. Unknown values map to `Member`.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        if s == "admin" { Self::Admin } else { Self::Member }
    }
}

/// A membership row linking a user to a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Unique membership identifier.
    pub id: Uuid,
    /// The team.
    pub team_id: Uuid,
    /// The member.
    pub user_id: Uuid,
    /// Role within the team.
    pub role: TeamRole,
    /// When the user joined.
    pub created_at: DateTime<Utc>,
}

/// Generates a random 6-character invite code.
///
/// Codes are drawn from an alphabet without visually ambiguous characters
/// so they survive being read aloud or scribbled on a whiteboard.
#[must_use]
pub fn generate_invite_code() -> String {
    let mut rng = rand::thread_rng();
    (0..INVITE_CODE_LEN)
        .filter_map(|_| {
            INVITE_ALPHABET
                .get(rng.gen_range(0..INVITE_ALPHABET.len()))
                .map(|b| char::from(*b))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn invite_code_has_expected_shape() {
        let code = generate_invite_code();
        assert_eq!(code.len(), INVITE_CODE_LEN);
        assert!(code.bytes().all(|b| INVITE_ALPHABET.contains(&b)));
    }

    #[test]
    fn invite_code_avoids_ambiguous_chars() {
        for _ in 0..100 {
            let code = generate_invite_code();
            assert!(!code.contains(['0', 'O', '1', 'I']));
        }
    }

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!(TeamRole::from_str_lossy(TeamRole::Admin.as_str()), TeamRole::Admin);
        assert_eq!(TeamRole::from_str_lossy(TeamRole::Member.as_str()), TeamRole::Member);
        assert_eq!(TeamRole::from_str_lossy("garbage"), TeamRole::Member);
    }
}
