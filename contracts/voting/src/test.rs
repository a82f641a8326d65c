use super::*;
use soroban_sdk::{testutils::Address as _, vec, Address, Env, String};

struct Setup<'a> {
    env: Env,
    owner: Address,
    voting: VotingClient<'a>,
}

fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let voting = VotingClient::new(&env, &env.register(Voting, ()));
    voting.initialize(&owner);

    Setup { env, owner, voting }
}

fn text(s: &Setup, value: &str) -> String {
    String::from_str(&s.env, value)
}

/// A two-option ballot, already started
fn yes_no(s: &Setup) -> u32 {
    let id = s.voting.create_ballot(
        &s.owner,
        &text(s, "Ship it?"),
        &vec![&s.env, text(s, "Yes"), text(s, "No")],
        &1_709_181_605,
        &400,
    );
    s.voting.start_voting(&s.owner, &id);
    id
}

fn voter(s: &Setup, weight: u64) -> Address {
    let voter = Address::generate(&s.env);
    s.voting.create_voter(&s.owner, &weight, &voter);
    voter
}

#[test]
fn test_initialize_and_create_ballot() {
    let s = setup();
    let stranger = Address::generate(&s.env);

    let result = s.voting.try_initialize(&s.owner);
    assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));

    let colors = vec![&s.env, text(&s, "Red"), text(&s, "Blue")];
    let result = s
        .voting
        .try_create_ballot(&stranger, &text(&s, "Color?"), &colors, &0, &400);
    assert_eq!(result, Err(Ok(Error::NotOwner)));

    let single = vec![&s.env, text(&s, "Red")];
    let result = s
        .voting
        .try_create_ballot(&s.owner, &text(&s, "Color?"), &single, &0, &400);
    assert_eq!(result, Err(Ok(Error::InvalidBallot)));

    let result = s
        .voting
        .try_create_ballot(&s.owner, &text(&s, ""), &colors, &0, &400);
    assert_eq!(result, Err(Ok(Error::InvalidBallot)));

    let first = s
        .voting
        .create_ballot(&s.owner, &text(&s, "Color?"), &colors, &1_709_181_605, &400);
    let second = s
        .voting
        .create_ballot(&s.owner, &text(&s, "Size?"), &colors, &1_709_181_605, &400);
    assert_eq!((first, second), (0, 1));
    assert_eq!(s.voting.ballot_count(), 2);

    let ballot = s.voting.get_ballot(&first);
    assert_eq!(ballot.question, text(&s, "Color?"));
    assert_eq!(ballot.options.len(), 2);
    assert_eq!(ballot.start_time, 1_709_181_605);
    assert_eq!(ballot.duration, 400);
    assert_eq!(ballot.status, BallotStatus::Created);

    let result = s.voting.try_get_ballot(&7);
    assert_eq!(result, Err(Ok(Error::BallotNotFound)));
}

#[test]
fn test_voter_roll() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    let alice = voter(&s, 1);

    let result = s.voting.try_create_voter(&s.owner, &2, &alice);
    assert_eq!(result, Err(Ok(Error::VoterExists)));

    let result = s.voting.try_create_voter(&stranger, &2, &stranger);
    assert_eq!(result, Err(Ok(Error::NotOwner)));

    s.voting.update_weight(&s.owner, &4, &alice);
    assert_eq!(s.voting.voter_weight(&alice), Some(4));

    let result = s.voting.try_update_weight(&alice, &9, &alice);
    assert_eq!(result, Err(Ok(Error::NotOwner)));

    let result = s.voting.try_update_weight(&s.owner, &4, &stranger);
    assert_eq!(result, Err(Ok(Error::VoterNotFound)));
    assert_eq!(s.voting.voter_weight(&stranger), None);
}

#[test]
fn test_ballot_lifecycle() {
    let s = setup();
    let colors = vec![&s.env, text(&s, "Red"), text(&s, "Blue")];
    let id = s
        .voting
        .create_ballot(&s.owner, &text(&s, "Color?"), &colors, &0, &400);

    let result = s.voting.try_end_voting(&s.owner, &id);
    assert_eq!(result, Err(Ok(Error::VotingNotOpen)));

    let result = s.voting.try_start_voting(&Address::generate(&s.env), &id);
    assert_eq!(result, Err(Ok(Error::NotOwner)));

    s.voting.start_voting(&s.owner, &id);
    assert_eq!(s.voting.get_ballot(&id).status, BallotStatus::Started);

    let result = s.voting.try_start_voting(&s.owner, &id);
    assert_eq!(result, Err(Ok(Error::VotingAlreadyStarted)));

    s.voting.end_voting(&s.owner, &id);
    assert_eq!(s.voting.get_ballot(&id).status, BallotStatus::Ended);

    let result = s.voting.try_start_voting(&s.owner, &id);
    assert_eq!(result, Err(Ok(Error::VotingAlreadyStarted)));

    let result = s.voting.try_end_voting(&s.owner, &id);
    assert_eq!(result, Err(Ok(Error::VotingNotOpen)));

    let result = s.voting.try_start_voting(&s.owner, &9);
    assert_eq!(result, Err(Ok(Error::BallotNotFound)));
}

#[test]
fn test_cast_vote() {
    let s = setup();
    let colors = vec![&s.env, text(&s, "Red"), text(&s, "Blue")];
    let pending = s
        .voting
        .create_ballot(&s.owner, &text(&s, "Color?"), &colors, &0, &400);
    let id = yes_no(&s);

    let muted = voter(&s, 0);
    let alice = voter(&s, 3);
    let stranger = Address::generate(&s.env);

    let result = s.voting.try_cast_vote(&alice, &pending, &0);
    assert_eq!(result, Err(Ok(Error::VotingNotOpen)));

    let result = s.voting.try_cast_vote(&muted, &id, &0);
    assert_eq!(result, Err(Ok(Error::NoVotingWeight)));

    let result = s.voting.try_cast_vote(&stranger, &id, &0);
    assert_eq!(result, Err(Ok(Error::VoterNotFound)));

    let result = s.voting.try_cast_vote(&alice, &id, &2);
    assert_eq!(result, Err(Ok(Error::InvalidOption)));

    s.voting.cast_vote(&alice, &id, &1);
    assert_eq!(s.voting.tally(&id, &1), 3);
    assert_eq!(s.voting.tally(&id, &0), 0);
    assert!(s.voting.has_voted(&alice, &id));

    let result = s.voting.try_cast_vote(&alice, &id, &0);
    assert_eq!(result, Err(Ok(Error::AlreadyVoted)));

    // one vote per ballot, not per voter
    s.voting.start_voting(&s.owner, &pending);
    s.voting.cast_vote(&alice, &pending, &0);
    assert_eq!(s.voting.tally(&pending, &0), 3);

    s.voting.end_voting(&s.owner, &id);
    let late = voter(&s, 1);
    let result = s.voting.try_cast_vote(&late, &id, &0);
    assert_eq!(result, Err(Ok(Error::VotingNotOpen)));
}

#[test]
fn test_delegate_vote() {
    let s = setup();
    let id = yes_no(&s);

    let muted = voter(&s, 0);
    let voted = voter(&s, 1);
    let free = voter(&s, 4);
    let from = voter(&s, 5);
    let to = voter(&s, 6);
    s.voting.cast_vote(&voted, &id, &0);

    let result = s.voting.try_delegate_vote(&muted, &to, &id);
    assert_eq!(result, Err(Ok(Error::NoVotingWeight)));

    let result = s.voting.try_delegate_vote(&voted, &to, &id);
    assert_eq!(result, Err(Ok(Error::AlreadyVoted)));

    let result = s.voting.try_delegate_vote(&free, &s.owner, &id);
    assert_eq!(result, Err(Ok(Error::VoterNotFound)));

    let result = s.voting.try_delegate_vote(&free, &muted, &id);
    assert_eq!(result, Err(Ok(Error::NoVotingWeight)));

    let result = s.voting.try_delegate_vote(&free, &voted, &id);
    assert_eq!(result, Err(Ok(Error::DelegateAlreadyVoted)));

    let result = s.voting.try_delegate_vote(&free, &free, &id);
    assert_eq!(result, Err(Ok(Error::InvalidDelegate)));

    s.voting.delegate_vote(&from, &to, &id);
    assert!(s.voting.has_voted(&from, &id));
    assert_eq!(s.voting.ballot_weight(&to, &id), 11);
    assert_eq!(s.voting.voter_weight(&to), Some(6));

    let result = s.voting.try_cast_vote(&from, &id, &1);
    assert_eq!(result, Err(Ok(Error::AlreadyVoted)));

    s.voting.cast_vote(&to, &id, &1);
    assert_eq!(s.voting.tally(&id, &1), 11);
}

#[test]
fn test_winning_option() {
    let s = setup();
    let id = yes_no(&s);
    let tied = yes_no(&s);

    let heavy = voter(&s, 2);
    let light = voter(&s, 1);
    let other = voter(&s, 2);

    s.voting.cast_vote(&heavy, &id, &1);
    s.voting.cast_vote(&light, &id, &0);
    s.voting.cast_vote(&heavy, &tied, &0);
    s.voting.cast_vote(&other, &tied, &1);

    let result = s.voting.try_calculate_winning_option(&s.owner, &id);
    assert_eq!(result, Err(Ok(Error::VotingNotEnded)));

    s.voting.end_voting(&s.owner, &id);
    s.voting.end_voting(&s.owner, &tied);

    let result = s.voting.try_calculate_winning_option(&heavy, &id);
    assert_eq!(result, Err(Ok(Error::NotOwner)));

    let result = s.voting.try_ballot_result(&id);
    assert_eq!(result, Err(Ok(Error::ResultNotTallied)));

    // weight beats headcount
    assert_eq!(
        s.voting.calculate_winning_option(&s.owner, &id),
        BallotOutcome::Winner(1)
    );
    assert_eq!(s.voting.ballot_result(&id), BallotOutcome::Winner(1));
    assert_eq!(s.voting.get_ballot(&id).options.get(1), Some(text(&s, "No")));

    assert_eq!(
        s.voting.calculate_winning_option(&s.owner, &tied),
        BallotOutcome::Tied
    );
    assert_eq!(s.voting.ballot_result(&tied), BallotOutcome::Tied);
}
