//! Profile struct and related types.

use soroban_sdk::{contracttype, Env, String, Vec};

/// Owner-supplied profile attributes, used for both mint and update.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProfileData {
    /// Globally unique display pseudo. Must be non-empty.
    pub pseudo: String,

    /// Profile image reference.
    pub profile_picture_url: String,

    /// Cover image reference.
    pub cover_picture_url: String,
}

/// Reputation accumulator pair.
///
/// `earned` and `lost` move independently; `lost` is not clamped to
/// `earned`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReputationPair {
    pub earned: u128,
    pub lost: u128,
}

/// A third-party identity linked to a profile.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ThirdPartyLink {
    /// Name of the third party, as registered in the catalog.
    pub third_party_id: String,

    /// The player's user id on that third party.
    pub user_id: String,
}

/// Stored player profile.
///
/// Keyed by the owning account; at most one profile per account.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Profile {
    pub pseudo: String,
    pub profile_picture_url: String,
    pub cover_picture_url: String,

    /// Linked third-party identities, at most one per third-party name.
    pub linked_third_parties: Vec<ThirdPartyLink>,

    pub reputation: ReputationPair,

    /// Ledger sequence at mint time.
    pub created_at: u64,

    /// Ledger sequence of the last mutation.
    pub updated_at: u64,
}

impl Profile {
    /// Create a fresh profile from owner-supplied data.
    pub fn new(env: &Env, data: &ProfileData, created_at: u64) -> Self {
        Self {
            pseudo: data.pseudo.clone(),
            profile_picture_url: data.profile_picture_url.clone(),
            cover_picture_url: data.cover_picture_url.clone(),
            linked_third_parties: Vec::new(env),
            reputation: ReputationPair { earned: 0, lost: 0 },
            created_at,
            updated_at: created_at,
        }
    }
}
