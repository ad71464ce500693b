//! # Soroban Quest Rewards
//!
//! Quest and reward escrow engine for a gamified identity platform on
//! Soroban.
//!
//! The crate ships two contracts:
//!
//! - [`ProfilesContract`] — player profiles with globally unique pseudos,
//!   an operator-gated reputation ledger and a catalog of linkable
//!   third-party identities.
//! - [`QuestsContract`] — a game catalog plus a board of quests. Operators
//!   fund a quest with token rewards, activate it, and hand out one reward
//!   claim plus a reputation increment per completion. Deactivating a quest
//!   sweeps the unclaimed funds back out.
//!
//! Reward funds are held by the quests contract itself; each quest id is a
//! sub-scope of that escrow. A per-token reservation counter guarantees that
//! two quests can never promise the same held tokens twice.
//!
//! ## Usage
//!
//! ```rust,ignore
//! // Wire the platform: the quests contract grants reputation on behalf
//! // of completed quests, so it must be a profiles operator.
//! profiles.init(&admin);
//! quests.init(&admin, &profiles_id, &quests_base_uri, &games_base_uri);
//! profiles.add_operator(&quests_id, &admin);
//!
//! // Fund, activate, and pay out a quest.
//! let game = quests.add_game(&name, &operator, &deposit);
//! let quest = quests.create_quest(&game, &15, &operator, &deposit);
//! quests.add_reward(&quest, &RewardKind::Fungible, &token, &20, &20, &operator, &deposit);
//! quests.activate_quest(&quest, &operator);
//! quests.send_reward(&quest, &player, &operator);
//! ```

#![no_std]

mod events;
mod profile;
mod profiles;
mod quest;
mod quests;
mod storage;
mod uri;
mod validation;

pub use profile::{Profile, ProfileData, ReputationPair, ThirdPartyLink};
pub use profiles::{ProfilesContract, ProfilesContractClient};
pub use quest::{Quest, QuestState, Reward, RewardKind};
pub use quests::{QuestsContract, QuestsContractClient};
pub use storage::{ProfileKey, QuestKey};
pub use validation::validate_pseudo;

use soroban_sdk::contracterror;

/// Error codes for the profiles contract.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ProfileError {
    /// Contract has already been initialized.
    AlreadyInitialized = 1,
    /// Contract has not been initialized.
    NotInitialized = 2,
    /// Caller is not authorized for this operation.
    NotAuthorized = 3,
    /// No profile exists for the account.
    ProfileNotFound = 4,
    /// The account already owns a profile.
    AlreadyRegistered = 5,
    /// The pseudo is already in use by another profile.
    PseudoTaken = 6,
    /// The pseudo is empty.
    EmptyPseudo = 7,
    /// The third party is not registered in the catalog.
    ThirdPartyNotFound = 8,
    /// The third party is already registered in the catalog.
    DuplicateThirdParty = 9,
    /// The third party is already linked to the profile.
    AlreadyLinked = 10,
    /// Attached deposit does not cover the storage fee.
    InsufficientDeposit = 11,
}

/// Error codes for the quests contract.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum QuestError {
    /// Contract has already been initialized.
    AlreadyInitialized = 1,
    /// Contract has not been initialized.
    NotInitialized = 2,
    /// Caller is not authorized for this operation.
    NotAuthorized = 3,
    /// No game exists with the given id.
    GameNotFound = 4,
    /// No quest exists with the given id.
    QuestNotFound = 5,
    /// The quest's lifecycle state forbids this operation.
    InvalidState = 6,
    /// A reward entry for this token already exists on the quest.
    DuplicateRewardToken = 7,
    /// No reward entry exists for the given token.
    RewardNotFound = 8,
    /// The escrow's unreserved balance does not cover the declared amount.
    InsufficientFunds = 9,
    /// Every reward entry is exhausted.
    NoRewardAvailable = 10,
    /// The player has no profile.
    ProfileNotFound = 11,
    /// Attached deposit does not cover the storage fee.
    InsufficientDeposit = 12,
}
