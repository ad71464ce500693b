//! Quest, reward entry and lifecycle types.

use soroban_sdk::{contracttype, Address};

/// Lifecycle state of a quest.
///
/// Transitions are linear: `Created` → `Active` → `Deactivated`.
/// `Deactivated` is terminal; a quest never re-enters `Created`.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum QuestState {
    /// Accepting funding and reward entries.
    Created,
    /// Claimable; funding configuration is frozen.
    Active,
    /// Swept; no further claims.
    Deactivated,
}

/// Kind of asset backing a reward entry.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RewardKind {
    Fungible,
}

/// A reward line item binding one token type to a per-claim payout and a
/// remaining escrowed balance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reward {
    /// Quest-scoped identifier, assigned at insertion.
    pub id: u32,

    pub kind: RewardKind,

    /// Token contract backing this entry. Unique within a quest.
    pub token: Address,

    /// Amount paid out per completion claim.
    pub payout: i128,

    /// Remaining escrowed amount still claimable.
    pub available: i128,
}

/// A quest record.
///
/// The quest id doubles as the escrow sub-scope for its funded tokens.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Quest {
    pub id: u32,

    /// The game this quest belongs to.
    pub game_id: u32,

    /// Reputation granted per completion.
    pub reputation_reward: u128,

    pub state: QuestState,
}
