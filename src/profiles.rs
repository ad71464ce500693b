//! Profile registry, reputation ledger and third-party catalog.

use soroban_sdk::{
    contract, contractimpl, panic_with_error, token, Address, Env, String, Vec,
};

use crate::events;
use crate::profile::{Profile, ProfileData, ReputationPair, ThirdPartyLink};
use crate::storage::{ProfileKey, RECORD_TTL_EXTEND, RECORD_TTL_THRESHOLD};
use crate::validation;
use crate::ProfileError;

#[contract]
pub struct ProfilesContract;

#[contractimpl]
impl ProfilesContract {
    // ========== Initialization ==========

    /// Initialize the contract with an admin address.
    ///
    /// The admin is the top-level authority for operator management and is
    /// itself granted operator capability. Must be called once before any
    /// other operation.
    pub fn init(env: Env, admin: Address) {
        if env.storage().instance().has(&ProfileKey::Admin) {
            panic_with_error!(&env, ProfileError::AlreadyInitialized);
        }

        admin.require_auth();
        env.storage().instance().set(&ProfileKey::Admin, &admin);
        env.storage().instance().set(&ProfileKey::ProfileCount, &0u64);
        env.storage()
            .persistent()
            .set(&ProfileKey::Operator(admin.clone()), &true);
    }

    /// Get the admin address.
    pub fn admin(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&ProfileKey::Admin)
            .unwrap_or_else(|| panic_with_error!(&env, ProfileError::NotInitialized))
    }

    // ========== Operator management ==========

    /// Grant operator capability. Restricted to the admin.
    pub fn add_operator(env: Env, operator: Address, caller: Address) {
        Self::require_admin(&env, &caller);

        env.storage()
            .persistent()
            .set(&ProfileKey::Operator(operator.clone()), &true);

        events::emit_operator_added(&env, &operator);
    }

    /// Revoke operator capability. Restricted to the admin.
    pub fn remove_operator(env: Env, operator: Address, caller: Address) {
        Self::require_admin(&env, &caller);

        env.storage()
            .persistent()
            .remove(&ProfileKey::Operator(operator.clone()));

        events::emit_operator_removed(&env, &operator);
    }

    /// Check whether an account holds operator capability.
    pub fn is_operator(env: Env, account: Address) -> bool {
        env.storage()
            .persistent()
            .get(&ProfileKey::Operator(account))
            .unwrap_or(false)
    }

    // ========== Minting ==========

    /// Mint a profile for the caller.
    ///
    /// # Arguments
    /// * `data` - Pseudo and image references for the new profile
    /// * `caller` - The account the profile is minted for
    /// * `deposit` - Attached value covering the storage fee
    ///
    /// # Panics
    /// - If the pseudo is empty or already taken
    /// - If the caller already owns a profile
    /// - If the deposit does not cover the configured storage fee
    pub fn mint(env: Env, data: ProfileData, caller: Address, deposit: i128) {
        caller.require_auth();
        Self::require_init(&env);
        Self::require_deposit(&env, deposit);

        if !validation::validate_pseudo(&data.pseudo) {
            panic_with_error!(&env, ProfileError::EmptyPseudo);
        }

        if env
            .storage()
            .persistent()
            .has(&ProfileKey::Profile(caller.clone()))
        {
            panic_with_error!(&env, ProfileError::AlreadyRegistered);
        }

        if env
            .storage()
            .persistent()
            .has(&ProfileKey::Pseudo(data.pseudo.clone()))
        {
            panic_with_error!(&env, ProfileError::PseudoTaken);
        }

        Self::collect_deposit(&env, &caller, deposit);

        let now = env.ledger().sequence() as u64;
        let profile = Profile::new(&env, &data, now);

        // Reserve the pseudo, then store the profile
        env.storage()
            .persistent()
            .set(&ProfileKey::Pseudo(data.pseudo.clone()), &caller);
        env.storage()
            .persistent()
            .set(&ProfileKey::Profile(caller.clone()), &profile);

        env.storage().persistent().extend_ttl(
            &ProfileKey::Pseudo(data.pseudo.clone()),
            RECORD_TTL_THRESHOLD,
            RECORD_TTL_EXTEND,
        );
        env.storage().persistent().extend_ttl(
            &ProfileKey::Profile(caller.clone()),
            RECORD_TTL_THRESHOLD,
            RECORD_TTL_EXTEND,
        );

        let count: u64 = env
            .storage()
            .instance()
            .get(&ProfileKey::ProfileCount)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&ProfileKey::ProfileCount, &(count + 1));

        events::emit_profile_minted(&env, &caller, &data.pseudo);
    }

    /// Update the caller's profile.
    ///
    /// The caller's current pseudo is exempt from the collision check when
    /// left unchanged; changing it frees the old reservation.
    pub fn update(env: Env, data: ProfileData, caller: Address) {
        caller.require_auth();

        let mut profile: Profile = env
            .storage()
            .persistent()
            .get(&ProfileKey::Profile(caller.clone()))
            .unwrap_or_else(|| panic_with_error!(&env, ProfileError::ProfileNotFound));

        if !validation::validate_pseudo(&data.pseudo) {
            panic_with_error!(&env, ProfileError::EmptyPseudo);
        }

        if data.pseudo != profile.pseudo {
            if env
                .storage()
                .persistent()
                .has(&ProfileKey::Pseudo(data.pseudo.clone()))
            {
                panic_with_error!(&env, ProfileError::PseudoTaken);
            }

            env.storage()
                .persistent()
                .remove(&ProfileKey::Pseudo(profile.pseudo.clone()));
            env.storage()
                .persistent()
                .set(&ProfileKey::Pseudo(data.pseudo.clone()), &caller);
        }

        profile.pseudo = data.pseudo;
        profile.profile_picture_url = data.profile_picture_url;
        profile.cover_picture_url = data.cover_picture_url;
        profile.updated_at = env.ledger().sequence() as u64;

        Self::store_profile(&env, &caller, &profile);

        events::emit_profile_updated(&env, &caller);
    }

    /// Burn an account's profile and free its pseudo. Operator-only.
    pub fn burn(env: Env, account: Address, caller: Address) {
        caller.require_auth();
        Self::require_operator(&env, &caller);

        let profile: Profile = env
            .storage()
            .persistent()
            .get(&ProfileKey::Profile(account.clone()))
            .unwrap_or_else(|| panic_with_error!(&env, ProfileError::ProfileNotFound));

        env.storage()
            .persistent()
            .remove(&ProfileKey::Pseudo(profile.pseudo));
        env.storage()
            .persistent()
            .remove(&ProfileKey::Profile(account.clone()));

        let count: u64 = env
            .storage()
            .instance()
            .get(&ProfileKey::ProfileCount)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&ProfileKey::ProfileCount, &count.saturating_sub(1));

        events::emit_profile_burned(&env, &account);
    }

    // ========== Profile queries ==========

    /// Check whether an account owns a profile.
    pub fn has_profile(env: Env, account: Address) -> bool {
        env.storage()
            .persistent()
            .has(&ProfileKey::Profile(account))
    }

    /// Get an account's profile.
    pub fn get_profile(env: Env, account: Address) -> Profile {
        env.storage()
            .persistent()
            .get(&ProfileKey::Profile(account))
            .unwrap_or_else(|| panic_with_error!(&env, ProfileError::ProfileNotFound))
    }

    /// Get total profile count.
    pub fn profile_count(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&ProfileKey::ProfileCount)
            .unwrap_or(0)
    }

    // ========== Reputation ledger ==========

    /// Credit reputation to an account's profile. Operator-only.
    pub fn increase_reputation(env: Env, account: Address, amount: u128, caller: Address) {
        caller.require_auth();
        Self::require_operator(&env, &caller);

        let mut profile = Self::load_profile(&env, &account);
        profile.reputation.earned += amount;
        profile.updated_at = env.ledger().sequence() as u64;
        Self::store_profile(&env, &account, &profile);

        events::emit_reputation_increased(&env, &account, amount);
    }

    /// Debit reputation from an account's profile. Operator-only.
    ///
    /// `lost` accumulates independently of `earned`; there is no floor.
    pub fn decrease_reputation(env: Env, account: Address, amount: u128, caller: Address) {
        caller.require_auth();
        Self::require_operator(&env, &caller);

        let mut profile = Self::load_profile(&env, &account);
        profile.reputation.lost += amount;
        profile.updated_at = env.ledger().sequence() as u64;
        Self::store_profile(&env, &account, &profile);

        events::emit_reputation_decreased(&env, &account, amount);
    }

    /// Read an account's reputation pair.
    pub fn get_reputation(env: Env, account: Address) -> ReputationPair {
        Self::load_profile(&env, &account).reputation
    }

    // ========== Third parties ==========

    /// Register a third party in the catalog. Operator-only.
    pub fn add_third_party(env: Env, name: String, caller: Address, deposit: i128) {
        caller.require_auth();
        Self::require_operator(&env, &caller);
        Self::require_deposit(&env, deposit);

        let mut catalog: Vec<String> = env
            .storage()
            .persistent()
            .get(&ProfileKey::ThirdParties)
            .unwrap_or_else(|| Vec::new(&env));

        for existing in catalog.iter() {
            if existing == name {
                panic_with_error!(&env, ProfileError::DuplicateThirdParty);
            }
        }

        Self::collect_deposit(&env, &caller, deposit);

        catalog.push_back(name.clone());
        env.storage()
            .persistent()
            .set(&ProfileKey::ThirdParties, &catalog);

        events::emit_third_party_added(&env, &name);
    }

    /// Get the registered third parties, in registration order.
    pub fn get_third_parties(env: Env) -> Vec<String> {
        env.storage()
            .persistent()
            .get(&ProfileKey::ThirdParties)
            .unwrap_or_else(|| Vec::new(&env))
    }

    /// Link a third-party identity to a profile. Operator-only.
    pub fn link_third_party(
        env: Env,
        account: Address,
        third_party_id: String,
        user_id: String,
        caller: Address,
        deposit: i128,
    ) {
        caller.require_auth();
        Self::require_operator(&env, &caller);
        Self::require_deposit(&env, deposit);

        let mut profile = Self::load_profile(&env, &account);

        let catalog = Self::get_third_parties(env.clone());
        let mut registered = false;
        for name in catalog.iter() {
            if name == third_party_id {
                registered = true;
                break;
            }
        }
        if !registered {
            panic_with_error!(&env, ProfileError::ThirdPartyNotFound);
        }

        for link in profile.linked_third_parties.iter() {
            if link.third_party_id == third_party_id {
                panic_with_error!(&env, ProfileError::AlreadyLinked);
            }
        }

        Self::collect_deposit(&env, &caller, deposit);

        profile.linked_third_parties.push_back(ThirdPartyLink {
            third_party_id: third_party_id.clone(),
            user_id,
        });
        profile.updated_at = env.ledger().sequence() as u64;
        Self::store_profile(&env, &account, &profile);

        events::emit_third_party_linked(&env, &account, &third_party_id);
    }

    /// Unlink a third-party identity from a profile. Operator-only.
    ///
    /// Removing an identity that is not linked is a no-op.
    pub fn unlink_third_party(env: Env, account: Address, third_party_id: String, caller: Address) {
        caller.require_auth();
        Self::require_operator(&env, &caller);

        let mut profile = Self::load_profile(&env, &account);

        let mut index: Option<u32> = None;
        for i in 0..profile.linked_third_parties.len() {
            let link = profile.linked_third_parties.get(i).unwrap();
            if link.third_party_id == third_party_id {
                index = Some(i);
                break;
            }
        }

        if let Some(i) = index {
            profile.linked_third_parties.remove(i);
            profile.updated_at = env.ledger().sequence() as u64;
            Self::store_profile(&env, &account, &profile);

            events::emit_third_party_unlinked(&env, &account, &third_party_id);
        }
    }

    // ========== Storage fee ==========

    /// Configure the per-record storage fee and its token. Admin-only.
    pub fn set_storage_fee(env: Env, fee: i128, fee_token: Address, caller: Address) {
        Self::require_admin(&env, &caller);

        env.storage().instance().set(&ProfileKey::StorageFee, &fee);
        env.storage()
            .instance()
            .set(&ProfileKey::StorageFeeToken, &fee_token);
    }

    /// Get the current per-record storage fee.
    pub fn storage_fee(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&ProfileKey::StorageFee)
            .unwrap_or(0)
    }

    // ========== Internal helpers ==========

    fn require_init(env: &Env) {
        if !env.storage().instance().has(&ProfileKey::Admin) {
            panic_with_error!(env, ProfileError::NotInitialized);
        }
    }

    fn require_admin(env: &Env, caller: &Address) {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ProfileKey::Admin)
            .unwrap_or_else(|| panic_with_error!(env, ProfileError::NotInitialized));

        if *caller != admin {
            panic_with_error!(env, ProfileError::NotAuthorized);
        }

        caller.require_auth();
    }

    fn require_operator(env: &Env, caller: &Address) {
        let is_operator: bool = env
            .storage()
            .persistent()
            .get(&ProfileKey::Operator(caller.clone()))
            .unwrap_or(false);

        if !is_operator {
            panic_with_error!(env, ProfileError::NotAuthorized);
        }
    }

    fn require_deposit(env: &Env, deposit: i128) {
        let fee: i128 = env
            .storage()
            .instance()
            .get(&ProfileKey::StorageFee)
            .unwrap_or(0);

        if deposit < fee {
            panic_with_error!(env, ProfileError::InsufficientDeposit);
        }
    }

    fn collect_deposit(env: &Env, payer: &Address, deposit: i128) {
        if deposit <= 0 {
            return;
        }

        let fee_token: Option<Address> =
            env.storage().instance().get(&ProfileKey::StorageFeeToken);
        if let Some(fee_token) = fee_token {
            token::Client::new(env, &fee_token).transfer(
                payer,
                &env.current_contract_address(),
                &deposit,
            );
        }
    }

    fn load_profile(env: &Env, account: &Address) -> Profile {
        env.storage()
            .persistent()
            .get(&ProfileKey::Profile(account.clone()))
            .unwrap_or_else(|| panic_with_error!(env, ProfileError::ProfileNotFound))
    }

    fn store_profile(env: &Env, account: &Address, profile: &Profile) {
        env.storage()
            .persistent()
            .set(&ProfileKey::Profile(account.clone()), profile);
        env.storage().persistent().extend_ttl(
            &ProfileKey::Profile(account.clone()),
            RECORD_TTL_THRESHOLD,
            RECORD_TTL_EXTEND,
        );
    }
}
