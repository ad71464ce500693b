//! Event emission helpers for the profiles and quests contracts.

use soroban_sdk::{Address, Env, String, Symbol};

use crate::quest::Reward;

// ========== Shared ==========

/// Emit an event when an operator capability is granted.
pub fn emit_operator_added(env: &Env, operator: &Address) {
    let topics = (Symbol::new(env, "operator_added"),);
    env.events().publish(topics, operator.clone());
}

/// Emit an event when an operator capability is revoked.
pub fn emit_operator_removed(env: &Env, operator: &Address) {
    let topics = (Symbol::new(env, "operator_removed"),);
    env.events().publish(topics, operator.clone());
}

// ========== Profiles ==========

/// Emit an event when a profile is minted.
pub fn emit_profile_minted(env: &Env, account: &Address, pseudo: &String) {
    let topics = (Symbol::new(env, "profile_minted"),);
    env.events().publish(topics, (account.clone(), pseudo.clone()));
}

/// Emit an event when a profile is updated by its owner.
pub fn emit_profile_updated(env: &Env, account: &Address) {
    let topics = (Symbol::new(env, "profile_updated"),);
    env.events().publish(topics, account.clone());
}

/// Emit an event when a profile is burned by an operator.
pub fn emit_profile_burned(env: &Env, account: &Address) {
    let topics = (Symbol::new(env, "profile_burned"),);
    env.events().publish(topics, account.clone());
}

/// Emit an event when reputation is credited to a profile.
pub fn emit_reputation_increased(env: &Env, account: &Address, amount: u128) {
    let topics = (Symbol::new(env, "reputation_increased"),);
    env.events().publish(topics, (account.clone(), amount));
}

/// Emit an event when reputation is debited from a profile.
pub fn emit_reputation_decreased(env: &Env, account: &Address, amount: u128) {
    let topics = (Symbol::new(env, "reputation_decreased"),);
    env.events().publish(topics, (account.clone(), amount));
}

/// Emit an event when a third party is added to the catalog.
pub fn emit_third_party_added(env: &Env, name: &String) {
    let topics = (Symbol::new(env, "third_party_added"),);
    env.events().publish(topics, name.clone());
}

/// Emit an event when a third-party identity is linked to a profile.
pub fn emit_third_party_linked(env: &Env, account: &Address, third_party_id: &String) {
    let topics = (Symbol::new(env, "third_party_linked"),);
    env.events()
        .publish(topics, (account.clone(), third_party_id.clone()));
}

/// Emit an event when a third-party identity is unlinked from a profile.
pub fn emit_third_party_unlinked(env: &Env, account: &Address, third_party_id: &String) {
    let topics = (Symbol::new(env, "third_party_unlinked"),);
    env.events()
        .publish(topics, (account.clone(), third_party_id.clone()));
}

// ========== Quests ==========

/// Emit an event when a game is added to the catalog.
pub fn emit_game_added(env: &Env, game_id: u32, name: &String) {
    let topics = (Symbol::new(env, "game_added"),);
    env.events().publish(topics, (game_id, name.clone()));
}

/// Emit an event when a quest is created.
pub fn emit_quest_created(env: &Env, quest_id: u32, game_id: u32) {
    let topics = (Symbol::new(env, "quest_created"),);
    env.events().publish(topics, (quest_id, game_id));
}

/// Emit an event when a quest operator capability is granted.
pub fn emit_quest_operator_added(env: &Env, quest_id: u32, operator: &Address) {
    let topics = (Symbol::new(env, "quest_operator_added"),);
    env.events().publish(topics, (quest_id, operator.clone()));
}

/// Emit an event when a quest operator capability is revoked.
pub fn emit_quest_operator_removed(env: &Env, quest_id: u32, operator: &Address) {
    let topics = (Symbol::new(env, "quest_operator_removed"),);
    env.events().publish(topics, (quest_id, operator.clone()));
}

/// Emit an event when a reward entry is registered on a quest.
pub fn emit_reward_added(env: &Env, quest_id: u32, reward: &Reward) {
    let topics = (Symbol::new(env, "reward_added"),);
    env.events().publish(topics, (quest_id, reward.clone()));
}

/// Emit an event when a reward entry's remaining amount is increased.
pub fn emit_reward_increased(env: &Env, quest_id: u32, token: &Address, extra: i128) {
    let topics = (Symbol::new(env, "reward_increased"),);
    env.events().publish(topics, (quest_id, token.clone(), extra));
}

/// Emit an event when a quest's reputation reward is overwritten.
pub fn emit_reputation_reward_updated(env: &Env, quest_id: u32, amount: u128) {
    let topics = (Symbol::new(env, "reputation_reward_set"),);
    env.events().publish(topics, (quest_id, amount));
}

/// Emit an event when a quest becomes claimable.
pub fn emit_quest_activated(env: &Env, quest_id: u32) {
    let topics = (Symbol::new(env, "quest_activated"),);
    env.events().publish(topics, quest_id);
}

/// Emit an event when a quest is deactivated.
pub fn emit_quest_deactivated(env: &Env, quest_id: u32, withdrawal_account: &Address) {
    let topics = (Symbol::new(env, "quest_deactivated"),);
    env.events()
        .publish(topics, (quest_id, withdrawal_account.clone()));
}

/// Emit an event when a reward claim is paid out.
pub fn emit_reward_sent(env: &Env, quest_id: u32, player: &Address, token: &Address, amount: i128) {
    let topics = (Symbol::new(env, "reward_sent"),);
    env.events()
        .publish(topics, (quest_id, player.clone(), token.clone(), amount));
}

/// Emit an event when a remaining reward balance is swept out.
pub fn emit_withdrawal(env: &Env, quest_id: u32, token: &Address, amount: i128) {
    let topics = (Symbol::new(env, "withdrawal"),);
    env.events().publish(topics, (quest_id, token.clone(), amount));
}

/// Emit an event when a sweep transfer fails and the entry is left intact.
pub fn emit_withdrawal_failed(env: &Env, quest_id: u32, token: &Address, amount: i128) {
    let topics = (Symbol::new(env, "withdrawal_failed"),);
    env.events().publish(topics, (quest_id, token.clone(), amount));
}
