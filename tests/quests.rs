//! Integration tests for the quests contract and its reward escrow.

use soroban_sdk::{testutils::Address as _, token, vec, Address, Env, String};
use soroban_quest_rewards::{
    ProfileData, ProfilesContract, ProfilesContractClient, QuestError, QuestState, QuestsContract,
    QuestsContractClient, ReputationPair, Reward, RewardKind,
};

struct Platform {
    env: Env,
    profiles: ProfilesContractClient<'static>,
    quests: QuestsContractClient<'static>,
    admin: Address,
    bob: Address,
    john: Address,
}

fn setup() -> Platform {
    let env = Env::default();
    env.mock_all_auths();

    let profiles_id = env.register(ProfilesContract, ());
    let profiles = ProfilesContractClient::new(&env, &profiles_id);
    let quests_id = env.register(QuestsContract, ());
    let quests = QuestsContractClient::new(&env, &quests_id);

    let admin = Address::generate(&env);
    profiles.init(&admin);
    quests.init(
        &admin,
        &profiles_id,
        &String::from_str(&env, "https://gg.quest/api/quests/"),
        &String::from_str(&env, "https://gg.quest/api/games/"),
    );

    // The quests contract grants reputation on completions, so it needs
    // operator capability on the profiles contract.
    profiles.add_operator(&quests_id, &admin);

    let bob = Address::generate(&env);
    let john = Address::generate(&env);
    for (account, pseudo) in [(&bob, "bob"), (&john, "john")] {
        profiles.mint(
            &ProfileData {
                pseudo: String::from_str(&env, pseudo),
                profile_picture_url: String::from_str(&env, ""),
                cover_picture_url: String::from_str(&env, ""),
            },
            account,
            &0,
        );
    }

    Platform {
        env,
        profiles,
        quests,
        admin,
        bob,
        john,
    }
}

/// Register a fresh fungible token whose issuer is the platform admin.
fn reward_token(p: &Platform) -> Address {
    p.env
        .register_stellar_asset_contract_v2(p.admin.clone())
        .address()
}

/// Fund the quests escrow by transferring tokens into its holding account.
fn fund(p: &Platform, token_id: &Address, amount: i128) {
    token::StellarAssetClient::new(&p.env, token_id).mint(&p.quests.address, &amount);
}

fn balance(p: &Platform, token_id: &Address, holder: &Address) -> i128 {
    token::Client::new(&p.env, token_id).balance(holder)
}

/// Add a game and create one quest for it with reputation reward 15.
fn create_quest(p: &Platform) -> u32 {
    let game_id = p
        .quests
        .add_game(&String::from_str(&p.env, "Axie Infinity"), &p.admin, &0);
    p.quests.create_quest(&game_id, &15, &p.admin, &0)
}

// ========== Games ==========

#[test]
fn test_non_operator_cannot_add_game() {
    let p = setup();

    assert_eq!(
        p.quests
            .try_add_game(&String::from_str(&p.env, "Axie Infinity"), &p.john, &0),
        Err(Ok(QuestError::NotAuthorized))
    );
    assert_eq!(p.quests.get_games().len(), 0);
}

#[test]
fn test_add_game_and_metadata_url() {
    let p = setup();

    p.quests
        .add_game(&String::from_str(&p.env, "Axie Infinity"), &p.admin, &0);
    p.quests
        .add_game(&String::from_str(&p.env, "Eve.io"), &p.admin, &0);

    assert_eq!(
        p.quests.get_games(),
        vec![
            &p.env,
            String::from_str(&p.env, "Axie Infinity"),
            String::from_str(&p.env, "Eve.io"),
        ]
    );

    assert_eq!(
        p.quests.get_url_metadata(&0),
        String::from_str(&p.env, "https://gg.quest/api/games/0")
    );
    assert_eq!(
        p.quests.get_url_metadata(&1),
        String::from_str(&p.env, "https://gg.quest/api/games/1")
    );
    assert_eq!(
        p.quests.try_get_url_metadata(&2),
        Err(Ok(QuestError::GameNotFound))
    );
}

// ========== Quest creation ==========

#[test]
fn test_create_quests_and_uris() {
    let p = setup();

    p.quests
        .add_game(&String::from_str(&p.env, "Axie Infinity"), &p.admin, &0);
    p.quests
        .add_game(&String::from_str(&p.env, "Eve.io"), &p.admin, &0);

    assert_eq!(p.quests.create_quest(&0, &15, &p.admin, &0), 0);
    assert_eq!(p.quests.create_quest(&0, &20, &p.admin, &0), 1);
    assert_eq!(p.quests.create_quest(&1, &10, &p.admin, &0), 2);

    let quests = p.quests.get_quests();
    assert_eq!(quests.len(), 3);
    for quest in quests.iter() {
        assert_eq!(quest.state, QuestState::Created);
    }
    assert_eq!(p.quests.get_quest(&1).reputation_reward, 20);

    assert_eq!(
        p.quests.get_quest_uri(&0),
        String::from_str(&p.env, "https://gg.quest/api/quests/0")
    );
    assert_eq!(
        p.quests.get_quest_uri(&2),
        String::from_str(&p.env, "https://gg.quest/api/quests/2")
    );
    assert_eq!(
        p.quests.try_get_quest_uri(&3),
        Err(Ok(QuestError::QuestNotFound))
    );

    assert_eq!(p.quests.get_game_quests(&0), vec![&p.env, 0u32, 1u32]);
    assert_eq!(p.quests.get_game_quests(&1), vec![&p.env, 2u32]);
}

#[test]
fn test_create_quest_requires_existing_game() {
    let p = setup();

    assert_eq!(
        p.quests.try_create_quest(&0, &15, &p.admin, &0),
        Err(Ok(QuestError::GameNotFound))
    );
}

#[test]
fn test_non_operator_cannot_create_quest() {
    let p = setup();

    p.quests
        .add_game(&String::from_str(&p.env, "Axie Infinity"), &p.admin, &0);

    assert_eq!(
        p.quests.try_create_quest(&0, &15, &p.john, &0),
        Err(Ok(QuestError::NotAuthorized))
    );
}

// ========== Quest operators ==========

#[test]
fn test_quest_operator_management() {
    let p = setup();
    let quest_id = create_quest(&p);

    // The creator is the sole initial quest operator
    assert!(p.quests.is_quest_operator(&quest_id, &p.admin));
    assert!(!p.quests.is_quest_operator(&quest_id, &p.john));

    p.quests.add_quest_operator(&quest_id, &p.john, &p.admin);
    assert!(p.quests.is_quest_operator(&quest_id, &p.john));

    p.quests.remove_quest_operator(&quest_id, &p.john, &p.admin);
    assert!(!p.quests.is_quest_operator(&quest_id, &p.john));
}

#[test]
fn test_non_quest_operator_cannot_manage_quest() {
    let p = setup();
    let quest_id = create_quest(&p);

    assert_eq!(
        p.quests
            .try_add_quest_operator(&quest_id, &p.bob, &p.john),
        Err(Ok(QuestError::NotAuthorized))
    );
    assert_eq!(
        p.quests.try_update_reputation_reward(&quest_id, &30, &p.john),
        Err(Ok(QuestError::NotAuthorized))
    );
    assert_eq!(
        p.quests.try_activate_quest(&quest_id, &p.john),
        Err(Ok(QuestError::NotAuthorized))
    );
}

// ========== Reward ledger ==========

#[test]
fn test_add_reward_requires_prior_funding() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_id = reward_token(&p);

    // Nothing transferred in yet
    assert_eq!(
        p.quests.try_add_reward(
            &quest_id,
            &RewardKind::Fungible,
            &token_id,
            &20,
            &20,
            &p.admin,
            &0,
        ),
        Err(Ok(QuestError::InsufficientFunds))
    );
    assert_eq!(p.quests.get_rewards(&quest_id).len(), 0);

    fund(&p, &token_id, 20);

    let reward_id = p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_id,
        &20,
        &20,
        &p.admin,
        &0,
    );
    assert_eq!(reward_id, 0);
}

#[test]
fn test_add_reward_round_trips_all_fields() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_id = reward_token(&p);
    fund(&p, &token_id, 20);

    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_id,
        &20,
        &20,
        &p.admin,
        &0,
    );

    assert_eq!(
        p.quests.get_rewards(&quest_id),
        vec![
            &p.env,
            Reward {
                id: 0,
                kind: RewardKind::Fungible,
                token: token_id,
                payout: 20,
                available: 20,
            }
        ]
    );
}

#[test]
fn test_add_reward_rejects_duplicate_token() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_id = reward_token(&p);
    fund(&p, &token_id, 20);

    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_id,
        &20,
        &20,
        &p.admin,
        &0,
    );

    // More funding does not make a duplicate entry acceptable
    fund(&p, &token_id, 1);
    assert_eq!(
        p.quests.try_add_reward(
            &quest_id,
            &RewardKind::Fungible,
            &token_id,
            &1,
            &1,
            &p.admin,
            &0,
        ),
        Err(Ok(QuestError::DuplicateRewardToken))
    );
    assert_eq!(p.quests.get_rewards(&quest_id).len(), 1);
}

#[test]
fn test_add_reward_rejected_after_activation() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_one = reward_token(&p);
    let token_two = reward_token(&p);
    fund(&p, &token_one, 20);

    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_one,
        &20,
        &20,
        &p.admin,
        &0,
    );
    p.quests.activate_quest(&quest_id, &p.admin);

    fund(&p, &token_two, 20);
    assert_eq!(
        p.quests.try_add_reward(
            &quest_id,
            &RewardKind::Fungible,
            &token_two,
            &20,
            &20,
            &p.admin,
            &0,
        ),
        Err(Ok(QuestError::InvalidState))
    );
}

#[test]
fn test_reserved_funds_cannot_back_a_second_quest() {
    let p = setup();
    let game_id = p
        .quests
        .add_game(&String::from_str(&p.env, "Axie Infinity"), &p.admin, &0);
    let quest_one = p.quests.create_quest(&game_id, &15, &p.admin, &0);
    let quest_two = p.quests.create_quest(&game_id, &15, &p.admin, &0);

    let token_id = reward_token(&p);
    fund(&p, &token_id, 20);

    p.quests.add_reward(
        &quest_one,
        &RewardKind::Fungible,
        &token_id,
        &20,
        &20,
        &p.admin,
        &0,
    );

    // The 20 held tokens already back quest one
    assert_eq!(
        p.quests.try_add_reward(
            &quest_two,
            &RewardKind::Fungible,
            &token_id,
            &20,
            &20,
            &p.admin,
            &0,
        ),
        Err(Ok(QuestError::InsufficientFunds))
    );

    fund(&p, &token_id, 15);
    p.quests.add_reward(
        &quest_two,
        &RewardKind::Fungible,
        &token_id,
        &15,
        &15,
        &p.admin,
        &0,
    );
}

#[test]
fn test_increase_reward_amount() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_id = reward_token(&p);
    fund(&p, &token_id, 20);

    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_id,
        &20,
        &20,
        &p.admin,
        &0,
    );

    // The full held balance is already reserved by the entry itself
    assert_eq!(
        p.quests
            .try_increase_reward_amount(&quest_id, &token_id, &5, &p.admin),
        Err(Ok(QuestError::InsufficientFunds))
    );
    assert_eq!(
        p.quests.get_rewards(&quest_id).get(0).unwrap().available,
        20
    );

    fund(&p, &token_id, 100);
    p.quests
        .increase_reward_amount(&quest_id, &token_id, &5, &p.admin);
    assert_eq!(
        p.quests.get_rewards(&quest_id).get(0).unwrap().available,
        25
    );
}

#[test]
fn test_increase_requires_existing_entry() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_id = reward_token(&p);
    fund(&p, &token_id, 20);

    assert_eq!(
        p.quests
            .try_increase_reward_amount(&quest_id, &token_id, &5, &p.admin),
        Err(Ok(QuestError::RewardNotFound))
    );
}

#[test]
fn test_increase_rejected_after_activation() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_id = reward_token(&p);
    fund(&p, &token_id, 40);

    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_id,
        &20,
        &20,
        &p.admin,
        &0,
    );
    p.quests.activate_quest(&quest_id, &p.admin);

    assert_eq!(
        p.quests
            .try_increase_reward_amount(&quest_id, &token_id, &5, &p.admin),
        Err(Ok(QuestError::InvalidState))
    );
}

// ========== Lifecycle ==========

#[test]
fn test_update_reputation_reward_in_any_state() {
    let p = setup();
    let quest_id = create_quest(&p);

    p.quests.update_reputation_reward(&quest_id, &30, &p.admin);
    assert_eq!(p.quests.get_reputation_reward(&quest_id), 30);

    p.quests.activate_quest(&quest_id, &p.admin);
    p.quests.update_reputation_reward(&quest_id, &40, &p.admin);
    assert_eq!(p.quests.get_reputation_reward(&quest_id), 40);
}

#[test]
fn test_activation_is_linear() {
    let p = setup();
    let quest_id = create_quest(&p);

    p.quests.activate_quest(&quest_id, &p.admin);
    assert_eq!(p.quests.get_quest(&quest_id).state, QuestState::Active);

    // No path back to Created
    assert_eq!(
        p.quests.try_activate_quest(&quest_id, &p.admin),
        Err(Ok(QuestError::InvalidState))
    );
}

#[test]
fn test_activating_an_unfunded_quest_is_allowed() {
    let p = setup();
    let quest_id = create_quest(&p);

    p.quests.activate_quest(&quest_id, &p.admin);

    assert_eq!(
        p.quests.try_send_reward(&quest_id, &p.bob, &p.admin),
        Err(Ok(QuestError::NoRewardAvailable))
    );
}

#[test]
fn test_send_reward_requires_active_state() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_id = reward_token(&p);
    fund(&p, &token_id, 20);

    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_id,
        &20,
        &20,
        &p.admin,
        &0,
    );

    assert_eq!(
        p.quests.try_send_reward(&quest_id, &p.bob, &p.admin),
        Err(Ok(QuestError::InvalidState))
    );
    assert_eq!(balance(&p, &token_id, &p.bob), 0);
}

#[test]
fn test_send_reward_pays_token_and_reputation() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_id = reward_token(&p);
    fund(&p, &token_id, 20);

    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_id,
        &20,
        &20,
        &p.admin,
        &0,
    );
    p.quests.activate_quest(&quest_id, &p.admin);

    p.quests.send_reward(&quest_id, &p.bob, &p.admin);

    assert_eq!(balance(&p, &token_id, &p.bob), 20);
    assert_eq!(
        p.profiles.get_reputation(&p.bob),
        ReputationPair { earned: 15, lost: 0 }
    );
    assert_eq!(p.quests.get_rewards(&quest_id).get(0).unwrap().available, 0);

    // The single claim slot is spent: the next completion gets nothing,
    // and crucially no reputation either.
    assert_eq!(
        p.quests.try_send_reward(&quest_id, &p.john, &p.admin),
        Err(Ok(QuestError::NoRewardAvailable))
    );
    assert_eq!(balance(&p, &token_id, &p.john), 0);
    assert_eq!(
        p.profiles.get_reputation(&p.john),
        ReputationPair { earned: 0, lost: 0 }
    );
}

#[test]
fn test_send_reward_requires_player_profile() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_id = reward_token(&p);
    fund(&p, &token_id, 20);

    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_id,
        &20,
        &20,
        &p.admin,
        &0,
    );
    p.quests.activate_quest(&quest_id, &p.admin);

    let stranger = Address::generate(&p.env);
    assert_eq!(
        p.quests.try_send_reward(&quest_id, &stranger, &p.admin),
        Err(Ok(QuestError::ProfileNotFound))
    );
    // The failed completion consumed nothing
    assert_eq!(
        p.quests.get_rewards(&quest_id).get(0).unwrap().available,
        20
    );
}

#[test]
fn test_rewards_drain_in_entry_order() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_one = reward_token(&p);
    let token_two = reward_token(&p);
    fund(&p, &token_one, 10);
    fund(&p, &token_two, 7);

    // Two claims of 5, then one claim of 7
    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_one,
        &5,
        &10,
        &p.admin,
        &0,
    );
    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_two,
        &7,
        &7,
        &p.admin,
        &0,
    );
    p.quests.activate_quest(&quest_id, &p.admin);

    // No per-player dedup: the same player may claim repeatedly until
    // the ledger runs dry.
    p.quests.send_reward(&quest_id, &p.bob, &p.admin);
    p.quests.send_reward(&quest_id, &p.bob, &p.admin);
    assert_eq!(balance(&p, &token_one, &p.bob), 10);
    assert_eq!(balance(&p, &token_two, &p.bob), 0);

    // First entry exhausted; the next claim comes from the second entry
    p.quests.send_reward(&quest_id, &p.bob, &p.admin);
    assert_eq!(balance(&p, &token_two, &p.bob), 7);

    assert_eq!(
        p.quests.try_send_reward(&quest_id, &p.bob, &p.admin),
        Err(Ok(QuestError::NoRewardAvailable))
    );
    assert_eq!(
        p.profiles.get_reputation(&p.bob),
        ReputationPair { earned: 45, lost: 0 }
    );
}

#[test]
fn test_deactivation_withdraws_remaining_rewards() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_id = reward_token(&p);
    fund(&p, &token_id, 20);

    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_id,
        &20,
        &20,
        &p.admin,
        &0,
    );
    p.quests.activate_quest(&quest_id, &p.admin);

    p.quests.deactivate_quest(&quest_id, &p.bob, &p.admin);

    assert_eq!(p.quests.get_quest(&quest_id).state, QuestState::Deactivated);
    assert_eq!(balance(&p, &token_id, &p.bob), 20);
    assert_eq!(balance(&p, &token_id, &p.quests.address), 0);
    // Zeroed, not just marked: nothing left to withdraw twice
    assert_eq!(p.quests.get_rewards(&quest_id).get(0).unwrap().available, 0);

    assert_eq!(
        p.quests.try_deactivate_quest(&quest_id, &p.bob, &p.admin),
        Err(Ok(QuestError::InvalidState))
    );
    assert_eq!(
        p.quests.try_send_reward(&quest_id, &p.bob, &p.admin),
        Err(Ok(QuestError::InvalidState))
    );
}

#[test]
fn test_deactivation_after_partial_consumption() {
    let p = setup();
    let quest_id = create_quest(&p);
    let token_id = reward_token(&p);
    fund(&p, &token_id, 20);

    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_id,
        &5,
        &20,
        &p.admin,
        &0,
    );
    p.quests.activate_quest(&quest_id, &p.admin);

    p.quests.send_reward(&quest_id, &p.bob, &p.admin);
    p.quests.send_reward(&quest_id, &p.john, &p.admin);
    assert_eq!(balance(&p, &token_id, &p.bob), 5);
    assert_eq!(balance(&p, &token_id, &p.john), 5);

    // Exactly the unconsumed remainder is swept
    p.quests.deactivate_quest(&quest_id, &p.admin, &p.admin);
    assert_eq!(balance(&p, &token_id, &p.admin), 10);
    assert_eq!(balance(&p, &token_id, &p.quests.address), 0);
}

#[test]
fn test_deactivation_requires_active_state() {
    let p = setup();
    let quest_id = create_quest(&p);

    assert_eq!(
        p.quests.try_deactivate_quest(&quest_id, &p.bob, &p.admin),
        Err(Ok(QuestError::InvalidState))
    );
}

// ========== Storage fee ==========

#[test]
fn test_storage_fee_gates_allocating_operations() {
    let p = setup();

    let sac = p.env.register_stellar_asset_contract_v2(p.admin.clone());
    let fee_token = sac.address();
    token::StellarAssetClient::new(&p.env, &fee_token).mint(&p.admin, &10_000);

    p.quests.set_storage_fee(&100, &fee_token, &p.admin);

    assert_eq!(
        p.quests
            .try_add_game(&String::from_str(&p.env, "Axie Infinity"), &p.admin, &0),
        Err(Ok(QuestError::InsufficientDeposit))
    );

    let game_id = p
        .quests
        .add_game(&String::from_str(&p.env, "Axie Infinity"), &p.admin, &100);

    assert_eq!(
        p.quests.try_create_quest(&game_id, &15, &p.admin, &99),
        Err(Ok(QuestError::InsufficientDeposit))
    );
    let quest_id = p.quests.create_quest(&game_id, &15, &p.admin, &100);

    let token_id = reward_token(&p);
    fund(&p, &token_id, 20);
    assert_eq!(
        p.quests.try_add_reward(
            &quest_id,
            &RewardKind::Fungible,
            &token_id,
            &20,
            &20,
            &p.admin,
            &0,
        ),
        Err(Ok(QuestError::InsufficientDeposit))
    );
    p.quests.add_reward(
        &quest_id,
        &RewardKind::Fungible,
        &token_id,
        &20,
        &20,
        &p.admin,
        &100,
    );

    assert_eq!(
        token::Client::new(&p.env, &fee_token).balance(&p.quests.address),
        300
    );
}
