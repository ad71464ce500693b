//! Game catalog, quest registry, quest lifecycle and reward escrow ledger.
//!
//! All quest escrow funds are held at this contract's address; the quest id
//! is the sub-scope. Funding flows in through plain token transfers to the
//! contract, and `add_reward` / `increase_reward_amount` verify the declared
//! amounts against the held balance *net of what other entries already
//! reserved*, so the same tokens can never back two entries.

use soroban_sdk::{
    contract, contractimpl, panic_with_error, token, Address, Env, String, Vec,
};

use crate::events;
use crate::profiles::ProfilesContractClient;
use crate::quest::{Quest, QuestState, Reward, RewardKind};
use crate::storage::{QuestKey, RECORD_TTL_EXTEND, RECORD_TTL_THRESHOLD};
use crate::uri;
use crate::QuestError;

#[contract]
pub struct QuestsContract;

#[contractimpl]
impl QuestsContract {
    // ========== Initialization ==========

    /// Initialize the contract.
    ///
    /// # Arguments
    /// * `admin` - Top-level authority for operator management; granted
    ///   operator capability itself
    /// * `profiles` - Address of the profiles contract used for player
    ///   checks and reputation grants
    /// * `quests_base_uri` / `games_base_uri` - Prefixes for metadata URIs
    ///
    /// The contract must be granted operator capability on the profiles
    /// contract before quests can pay out reputation.
    pub fn init(
        env: Env,
        admin: Address,
        profiles: Address,
        quests_base_uri: String,
        games_base_uri: String,
    ) {
        if env.storage().instance().has(&QuestKey::Admin) {
            panic_with_error!(&env, QuestError::AlreadyInitialized);
        }

        admin.require_auth();
        env.storage().instance().set(&QuestKey::Admin, &admin);
        env.storage().instance().set(&QuestKey::Profiles, &profiles);
        env.storage()
            .instance()
            .set(&QuestKey::QuestsBaseUri, &quests_base_uri);
        env.storage()
            .instance()
            .set(&QuestKey::GamesBaseUri, &games_base_uri);
        env.storage().instance().set(&QuestKey::QuestCount, &0u32);
        env.storage()
            .persistent()
            .set(&QuestKey::Operator(admin.clone()), &true);
    }

    /// Get the admin address.
    pub fn admin(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&QuestKey::Admin)
            .unwrap_or_else(|| panic_with_error!(&env, QuestError::NotInitialized))
    }

    // ========== Operator management ==========

    /// Grant operator capability. Restricted to the admin.
    pub fn add_operator(env: Env, operator: Address, caller: Address) {
        Self::require_admin(&env, &caller);

        env.storage()
            .persistent()
            .set(&QuestKey::Operator(operator.clone()), &true);

        events::emit_operator_added(&env, &operator);
    }

    /// Revoke operator capability. Restricted to the admin.
    pub fn remove_operator(env: Env, operator: Address, caller: Address) {
        Self::require_admin(&env, &caller);

        env.storage()
            .persistent()
            .remove(&QuestKey::Operator(operator.clone()));

        events::emit_operator_removed(&env, &operator);
    }

    /// Check whether an account holds operator capability.
    pub fn is_operator(env: Env, account: Address) -> bool {
        env.storage()
            .persistent()
            .get(&QuestKey::Operator(account))
            .unwrap_or(false)
    }

    // ========== Games ==========

    /// Append a game to the catalog. Operator-only.
    ///
    /// Returns the new game's id, which is its index in the catalog.
    pub fn add_game(env: Env, name: String, caller: Address, deposit: i128) -> u32 {
        caller.require_auth();
        Self::require_operator(&env, &caller);
        Self::require_deposit(&env, deposit);

        Self::collect_deposit(&env, &caller, deposit);

        let mut games = Self::get_games(env.clone());
        let game_id = games.len();
        games.push_back(name.clone());
        env.storage().persistent().set(&QuestKey::Games, &games);
        env.storage().persistent().extend_ttl(
            &QuestKey::Games,
            RECORD_TTL_THRESHOLD,
            RECORD_TTL_EXTEND,
        );

        events::emit_game_added(&env, game_id, &name);

        game_id
    }

    /// Get the game catalog, in creation order.
    pub fn get_games(env: Env) -> Vec<String> {
        env.storage()
            .persistent()
            .get(&QuestKey::Games)
            .unwrap_or_else(|| Vec::new(&env))
    }

    /// Get the metadata URI of a game.
    pub fn get_url_metadata(env: Env, game_id: u32) -> String {
        let games = Self::get_games(env.clone());
        if game_id >= games.len() {
            panic_with_error!(&env, QuestError::GameNotFound);
        }

        let base: String = env
            .storage()
            .instance()
            .get(&QuestKey::GamesBaseUri)
            .unwrap_or_else(|| panic_with_error!(&env, QuestError::NotInitialized));
        uri::with_index(&env, &base, game_id)
    }

    // ========== Quests ==========

    /// Create a quest for a game. Operator-only.
    ///
    /// The quest starts in `Created` state with an empty reward ledger and
    /// the caller as its sole quest operator.
    pub fn create_quest(
        env: Env,
        game_id: u32,
        reputation_reward: u128,
        caller: Address,
        deposit: i128,
    ) -> u32 {
        caller.require_auth();
        Self::require_operator(&env, &caller);
        Self::require_deposit(&env, deposit);

        let games = Self::get_games(env.clone());
        if game_id >= games.len() {
            panic_with_error!(&env, QuestError::GameNotFound);
        }

        Self::collect_deposit(&env, &caller, deposit);

        let quest_id: u32 = env
            .storage()
            .instance()
            .get(&QuestKey::QuestCount)
            .unwrap_or(0);
        let quest = Quest {
            id: quest_id,
            game_id,
            reputation_reward,
            state: QuestState::Created,
        };

        Self::store_quest(&env, &quest);
        env.storage()
            .persistent()
            .set(&QuestKey::QuestOperator(quest_id, caller.clone()), &true);
        env.storage()
            .persistent()
            .set(&QuestKey::Rewards(quest_id), &Vec::<Reward>::new(&env));

        let mut game_quests: Vec<u32> = env
            .storage()
            .persistent()
            .get(&QuestKey::GameQuests(game_id))
            .unwrap_or_else(|| Vec::new(&env));
        game_quests.push_back(quest_id);
        env.storage()
            .persistent()
            .set(&QuestKey::GameQuests(game_id), &game_quests);

        env.storage()
            .instance()
            .set(&QuestKey::QuestCount, &(quest_id + 1));

        events::emit_quest_created(&env, quest_id, game_id);

        quest_id
    }

    /// Get all quests, in creation order.
    pub fn get_quests(env: Env) -> Vec<Quest> {
        let count: u32 = env
            .storage()
            .instance()
            .get(&QuestKey::QuestCount)
            .unwrap_or(0);

        let mut quests = Vec::new(&env);
        for quest_id in 0..count {
            quests.push_back(Self::load_quest(&env, quest_id));
        }
        quests
    }

    /// Get a quest by id.
    pub fn get_quest(env: Env, quest_id: u32) -> Quest {
        Self::load_quest(&env, quest_id)
    }

    /// Get the quest ids belonging to a game.
    pub fn get_game_quests(env: Env, game_id: u32) -> Vec<u32> {
        let games = Self::get_games(env.clone());
        if game_id >= games.len() {
            panic_with_error!(&env, QuestError::GameNotFound);
        }

        env.storage()
            .persistent()
            .get(&QuestKey::GameQuests(game_id))
            .unwrap_or_else(|| Vec::new(&env))
    }

    /// Get the metadata URI of a quest.
    pub fn get_quest_uri(env: Env, quest_id: u32) -> String {
        let count: u32 = env
            .storage()
            .instance()
            .get(&QuestKey::QuestCount)
            .unwrap_or(0);
        if quest_id >= count {
            panic_with_error!(&env, QuestError::QuestNotFound);
        }

        let base: String = env
            .storage()
            .instance()
            .get(&QuestKey::QuestsBaseUri)
            .unwrap_or_else(|| panic_with_error!(&env, QuestError::NotInitialized));
        uri::with_index(&env, &base, quest_id)
    }

    // ========== Quest operators ==========

    /// Grant quest operator capability. Quest-operator-only.
    pub fn add_quest_operator(env: Env, quest_id: u32, operator: Address, caller: Address) {
        caller.require_auth();
        Self::load_quest(&env, quest_id);
        Self::require_quest_operator(&env, quest_id, &caller);

        env.storage()
            .persistent()
            .set(&QuestKey::QuestOperator(quest_id, operator.clone()), &true);

        events::emit_quest_operator_added(&env, quest_id, &operator);
    }

    /// Revoke quest operator capability. Quest-operator-only.
    pub fn remove_quest_operator(env: Env, quest_id: u32, operator: Address, caller: Address) {
        caller.require_auth();
        Self::load_quest(&env, quest_id);
        Self::require_quest_operator(&env, quest_id, &caller);

        env.storage()
            .persistent()
            .remove(&QuestKey::QuestOperator(quest_id, operator.clone()));

        events::emit_quest_operator_removed(&env, quest_id, &operator);
    }

    /// Check whether an account holds quest operator capability.
    pub fn is_quest_operator(env: Env, quest_id: u32, account: Address) -> bool {
        env.storage()
            .persistent()
            .get(&QuestKey::QuestOperator(quest_id, account))
            .unwrap_or(false)
    }

    // ========== Reward ledger ==========

    /// Register a reward entry on a quest. Quest-operator-only, `Created`
    /// state only.
    ///
    /// The backing tokens must have been transferred to this contract
    /// before the entry is registered: the declared `available` amount is
    /// checked against the held balance net of prior reservations, and is
    /// reserved on success.
    ///
    /// Returns the quest-scoped reward id.
    ///
    /// # Panics
    /// - If an entry for `token_contract` already exists on the quest
    /// - If the unreserved held balance is below `available`
    pub fn add_reward(
        env: Env,
        quest_id: u32,
        kind: RewardKind,
        token_contract: Address,
        payout: i128,
        available: i128,
        caller: Address,
        deposit: i128,
    ) -> u32 {
        caller.require_auth();
        Self::require_deposit(&env, deposit);

        let quest = Self::load_quest(&env, quest_id);
        Self::require_quest_operator(&env, quest_id, &caller);

        if quest.state != QuestState::Created {
            panic_with_error!(&env, QuestError::InvalidState);
        }

        let mut rewards = Self::load_rewards(&env, quest_id);
        for reward in rewards.iter() {
            if reward.token == token_contract {
                panic_with_error!(&env, QuestError::DuplicateRewardToken);
            }
        }

        Self::reserve(&env, &token_contract, available);

        Self::collect_deposit(&env, &caller, deposit);

        let reward = Reward {
            id: rewards.len(),
            kind,
            token: token_contract,
            payout,
            available,
        };
        rewards.push_back(reward.clone());
        Self::store_rewards(&env, quest_id, &rewards);

        events::emit_reward_added(&env, quest_id, &reward);

        reward.id
    }

    /// Increase a reward entry's remaining amount. Quest-operator-only,
    /// `Created` state only.
    ///
    /// Subject to the same held-balance check as [`Self::add_reward`]; a
    /// failed call leaves the entry unchanged.
    pub fn increase_reward_amount(
        env: Env,
        quest_id: u32,
        token_contract: Address,
        extra: i128,
        caller: Address,
    ) {
        caller.require_auth();

        let quest = Self::load_quest(&env, quest_id);
        Self::require_quest_operator(&env, quest_id, &caller);

        if quest.state != QuestState::Created {
            panic_with_error!(&env, QuestError::InvalidState);
        }

        let mut rewards = Self::load_rewards(&env, quest_id);
        let mut index: Option<u32> = None;
        for i in 0..rewards.len() {
            let reward = rewards.get(i).unwrap();
            if reward.token == token_contract {
                index = Some(i);
                break;
            }
        }
        let index = match index {
            Some(i) => i,
            None => panic_with_error!(&env, QuestError::RewardNotFound),
        };

        Self::reserve(&env, &token_contract, extra);

        let mut reward = rewards.get(index).unwrap();
        reward.available += extra;
        rewards.set(index, reward);
        Self::store_rewards(&env, quest_id, &rewards);

        events::emit_reward_increased(&env, quest_id, &token_contract, extra);
    }

    /// Get a quest's reward entries, in insertion order.
    pub fn get_rewards(env: Env, quest_id: u32) -> Vec<Reward> {
        Self::load_quest(&env, quest_id);
        Self::load_rewards(&env, quest_id)
    }

    // ========== Lifecycle ==========

    /// Overwrite a quest's reputation reward. Quest-operator-only,
    /// allowed in every lifecycle state.
    pub fn update_reputation_reward(env: Env, quest_id: u32, amount: u128, caller: Address) {
        caller.require_auth();

        let mut quest = Self::load_quest(&env, quest_id);
        Self::require_quest_operator(&env, quest_id, &caller);

        quest.reputation_reward = amount;
        Self::store_quest(&env, &quest);

        events::emit_reputation_reward_updated(&env, quest_id, amount);
    }

    /// Get a quest's reputation reward.
    pub fn get_reputation_reward(env: Env, quest_id: u32) -> u128 {
        Self::load_quest(&env, quest_id).reputation_reward
    }

    /// Make a quest claimable. Quest-operator-only.
    ///
    /// Irreversible: the quest can never re-enter `Created`. A quest with
    /// no funded entries may still activate.
    pub fn activate_quest(env: Env, quest_id: u32, caller: Address) {
        caller.require_auth();

        let mut quest = Self::load_quest(&env, quest_id);
        Self::require_quest_operator(&env, quest_id, &caller);

        if quest.state != QuestState::Created {
            panic_with_error!(&env, QuestError::InvalidState);
        }

        quest.state = QuestState::Active;
        Self::store_quest(&env, &quest);

        events::emit_quest_activated(&env, quest_id);
    }

    /// Pay out one completion: a reward claim plus the reputation grant.
    /// Quest-operator-only, `Active` state only.
    ///
    /// Entries are drained in insertion order; the first entry whose
    /// remaining amount covers its payout is debited by one payout. When no
    /// entry qualifies the call fails with `NoRewardAvailable` and neither
    /// the ledger nor the player's reputation changes.
    ///
    /// There is no per-player dedup: repeat completions draw further claims
    /// until the ledger is exhausted.
    pub fn send_reward(env: Env, quest_id: u32, player: Address, caller: Address) {
        caller.require_auth();

        let quest = Self::load_quest(&env, quest_id);
        Self::require_quest_operator(&env, quest_id, &caller);

        if quest.state != QuestState::Active {
            panic_with_error!(&env, QuestError::InvalidState);
        }

        let profiles = ProfilesContractClient::new(&env, &Self::profiles_address(&env));
        if !profiles.has_profile(&player) {
            panic_with_error!(&env, QuestError::ProfileNotFound);
        }

        let mut rewards = Self::load_rewards(&env, quest_id);
        let mut index: Option<u32> = None;
        for i in 0..rewards.len() {
            let reward = rewards.get(i).unwrap();
            if reward.available >= reward.payout {
                index = Some(i);
                break;
            }
        }
        let index = match index {
            Some(i) => i,
            None => panic_with_error!(&env, QuestError::NoRewardAvailable),
        };

        let mut reward = rewards.get(index).unwrap();
        token::Client::new(&env, &reward.token).transfer(
            &env.current_contract_address(),
            &player,
            &reward.payout,
        );

        // The debit and the reservation release commit together with the
        // transfer above; a failed transfer unwinds the whole call.
        reward.available -= reward.payout;
        rewards.set(index, reward.clone());
        Self::store_rewards(&env, quest_id, &rewards);
        Self::release(&env, &reward.token, reward.payout);

        profiles.increase_reputation(
            &player,
            &quest.reputation_reward,
            &env.current_contract_address(),
        );

        events::emit_reward_sent(&env, quest_id, &player, &reward.token, reward.payout);
    }

    /// Deactivate a quest and sweep its remaining reward balances to
    /// `withdrawal_account`. Quest-operator-only, `Active` state only.
    ///
    /// The sweep is best-effort per entry: a successful transfer zeroes the
    /// entry and releases its reservation, a failed transfer is reported
    /// via event and leaves that entry intact without blocking the rest.
    pub fn deactivate_quest(
        env: Env,
        quest_id: u32,
        withdrawal_account: Address,
        caller: Address,
    ) {
        caller.require_auth();

        let mut quest = Self::load_quest(&env, quest_id);
        Self::require_quest_operator(&env, quest_id, &caller);

        if quest.state != QuestState::Active {
            panic_with_error!(&env, QuestError::InvalidState);
        }

        quest.state = QuestState::Deactivated;
        Self::store_quest(&env, &quest);

        let mut rewards = Self::load_rewards(&env, quest_id);
        for i in 0..rewards.len() {
            let mut reward = rewards.get(i).unwrap();
            if reward.available <= 0 {
                continue;
            }

            let client = token::Client::new(&env, &reward.token);
            let transferred = client.try_transfer(
                &env.current_contract_address(),
                &withdrawal_account,
                &reward.available,
            );

            match transferred {
                Ok(Ok(())) => {
                    Self::release(&env, &reward.token, reward.available);
                    events::emit_withdrawal(&env, quest_id, &reward.token, reward.available);
                    reward.available = 0;
                    rewards.set(i, reward);
                }
                _ => {
                    events::emit_withdrawal_failed(
                        &env,
                        quest_id,
                        &reward.token,
                        reward.available,
                    );
                }
            }
        }
        Self::store_rewards(&env, quest_id, &rewards);

        events::emit_quest_deactivated(&env, quest_id, &withdrawal_account);
    }

    // ========== Storage fee ==========

    /// Configure the per-record storage fee and its token. Admin-only.
    pub fn set_storage_fee(env: Env, fee: i128, fee_token: Address, caller: Address) {
        Self::require_admin(&env, &caller);

        env.storage().instance().set(&QuestKey::StorageFee, &fee);
        env.storage()
            .instance()
            .set(&QuestKey::StorageFeeToken, &fee_token);
    }

    /// Get the current per-record storage fee.
    pub fn storage_fee(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&QuestKey::StorageFee)
            .unwrap_or(0)
    }

    // ========== Internal helpers ==========

    fn require_admin(env: &Env, caller: &Address) {
        let admin: Address = env
            .storage()
            .instance()
            .get(&QuestKey::Admin)
            .unwrap_or_else(|| panic_with_error!(env, QuestError::NotInitialized));

        if *caller != admin {
            panic_with_error!(env, QuestError::NotAuthorized);
        }

        caller.require_auth();
    }

    fn require_operator(env: &Env, caller: &Address) {
        let is_operator: bool = env
            .storage()
            .persistent()
            .get(&QuestKey::Operator(caller.clone()))
            .unwrap_or(false);

        if !is_operator {
            panic_with_error!(env, QuestError::NotAuthorized);
        }
    }

    fn require_quest_operator(env: &Env, quest_id: u32, caller: &Address) {
        let is_operator: bool = env
            .storage()
            .persistent()
            .get(&QuestKey::QuestOperator(quest_id, caller.clone()))
            .unwrap_or(false);

        if !is_operator {
            panic_with_error!(env, QuestError::NotAuthorized);
        }
    }

    fn require_deposit(env: &Env, deposit: i128) {
        let fee: i128 = env
            .storage()
            .instance()
            .get(&QuestKey::StorageFee)
            .unwrap_or(0);

        if deposit < fee {
            panic_with_error!(env, QuestError::InsufficientDeposit);
        }
    }

    fn collect_deposit(env: &Env, payer: &Address, deposit: i128) {
        if deposit <= 0 {
            return;
        }

        let fee_token: Option<Address> = env.storage().instance().get(&QuestKey::StorageFeeToken);
        if let Some(fee_token) = fee_token {
            token::Client::new(env, &fee_token).transfer(
                payer,
                &env.current_contract_address(),
                &deposit,
            );
        }
    }

    fn profiles_address(env: &Env) -> Address {
        env.storage()
            .instance()
            .get(&QuestKey::Profiles)
            .unwrap_or_else(|| panic_with_error!(env, QuestError::NotInitialized))
    }

    fn load_quest(env: &Env, quest_id: u32) -> Quest {
        env.storage()
            .persistent()
            .get(&QuestKey::Quest(quest_id))
            .unwrap_or_else(|| panic_with_error!(env, QuestError::QuestNotFound))
    }

    fn store_quest(env: &Env, quest: &Quest) {
        env.storage()
            .persistent()
            .set(&QuestKey::Quest(quest.id), quest);
        env.storage().persistent().extend_ttl(
            &QuestKey::Quest(quest.id),
            RECORD_TTL_THRESHOLD,
            RECORD_TTL_EXTEND,
        );
    }

    fn load_rewards(env: &Env, quest_id: u32) -> Vec<Reward> {
        env.storage()
            .persistent()
            .get(&QuestKey::Rewards(quest_id))
            .unwrap_or_else(|| Vec::new(env))
    }

    fn store_rewards(env: &Env, quest_id: u32, rewards: &Vec<Reward>) {
        env.storage()
            .persistent()
            .set(&QuestKey::Rewards(quest_id), rewards);
        env.storage().persistent().extend_ttl(
            &QuestKey::Rewards(quest_id),
            RECORD_TTL_THRESHOLD,
            RECORD_TTL_EXTEND,
        );
    }

    /// Reserve `amount` of the contract's held `token` balance for a
    /// reward entry, verifying the unreserved remainder covers it.
    fn reserve(env: &Env, token_contract: &Address, amount: i128) {
        let held = token::Client::new(env, token_contract).balance(&env.current_contract_address());
        let reserved = Self::reserved(env, token_contract);

        if held - reserved < amount {
            panic_with_error!(env, QuestError::InsufficientFunds);
        }

        env.storage()
            .persistent()
            .set(&QuestKey::Reserved(token_contract.clone()), &(reserved + amount));
    }

    /// Release `amount` of a token reservation after a payout or sweep.
    fn release(env: &Env, token_contract: &Address, amount: i128) {
        let reserved = Self::reserved(env, token_contract);
        env.storage()
            .persistent()
            .set(&QuestKey::Reserved(token_contract.clone()), &(reserved - amount));
    }

    fn reserved(env: &Env, token_contract: &Address) -> i128 {
        env.storage()
            .persistent()
            .get(&QuestKey::Reserved(token_contract.clone()))
            .unwrap_or(0)
    }
}
