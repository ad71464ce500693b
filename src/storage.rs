//! Storage key definitions for both contracts.

use soroban_sdk::{contracttype, Address, String};

/// Storage keys for the profiles contract.
#[contracttype]
#[derive(Clone, Debug)]
pub enum ProfileKey {
    /// Contract administrator address.
    Admin,

    /// Total count of minted profiles.
    ProfileCount,

    /// Operator capability membership.
    Operator(Address),

    /// Maps pseudo to owner address.
    /// Used to enforce pseudo uniqueness.
    Pseudo(String),

    /// Maps address to Profile struct.
    /// Primary storage for profile data.
    Profile(Address),

    /// Append-only catalog of registered third-party names.
    ThirdParties,

    /// Storage fee charged per allocated record.
    StorageFee,

    /// Token the storage fee is collected in.
    StorageFeeToken,
}

/// Storage keys for the quests contract.
#[contracttype]
#[derive(Clone, Debug)]
pub enum QuestKey {
    /// Contract administrator address.
    Admin,

    /// Operator capability membership.
    Operator(Address),

    /// Address of the profiles contract.
    Profiles,

    /// Base URI for quest metadata.
    QuestsBaseUri,

    /// Base URI for game metadata.
    GamesBaseUri,

    /// Append-only catalog of game names.
    Games,

    /// Number of quests created so far.
    QuestCount,

    /// Maps quest id to Quest struct.
    Quest(u32),

    /// Quest ids belonging to a game.
    GameQuests(u32),

    /// Per-quest operator capability membership.
    QuestOperator(u32, Address),

    /// Ordered reward entries of a quest.
    Rewards(u32),

    /// Held balance of a token already promised to reward entries.
    /// An entry may only be added or increased out of the unreserved
    /// remainder.
    Reserved(Address),

    /// Storage fee charged per allocated record.
    StorageFee,

    /// Token the storage fee is collected in.
    StorageFeeToken,
}

/// Time-to-live for persistent records in ledger entries.
pub const RECORD_TTL_THRESHOLD: u32 = 518400; // ~30 days
pub const RECORD_TTL_EXTEND: u32 = 2592000; // ~150 days
