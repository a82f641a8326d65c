#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::{
    BallotCreatedEvent, BallotResolvedEvent, BallotStatusEvent, VoteCastEvent, VoteDelegatedEvent,
    VoterWeightEvent,
};
use storage::DataKey;
pub use storage::{Ballot, BallotOutcome, BallotStatus};

use soroban_sdk::{contract, contractimpl, log, Address, Env, String, Symbol, Vec};

/// Owner-run ballots among weighted voters. On each ballot a voter acts
/// once: by voting, or by handing their weight to a voter who has not
/// voted yet.
#[contract]
pub struct Voting;

#[contractimpl]
impl Voting {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the contract owner
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, owner: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::BallotCount, &0u32);

        Ok(())
    }

    /// Create a ballot in the `Created` state and return its id. Ids count
    /// up from zero.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `InvalidBallot`: Empty question, fewer than two options, or zero duration
    pub fn create_ballot(
        env: Env,
        caller: Address,
        question: String,
        options: Vec<String>,
        start_time: u64,
        duration: u64,
    ) -> Result<u32, Error> {
        Self::require_owner(&env, &caller)?;

        if question.len() == 0 || options.len() < 2 || duration == 0 {
            return Err(Error::InvalidBallot);
        }

        let ballot_id = Self::ballot_count(env.clone());
        let ballot = Ballot {
            question: question.clone(),
            options,
            start_time,
            duration,
            status: BallotStatus::Created,
        };
        env.storage()
            .persistent()
            .set(&DataKey::Ballot(ballot_id), &ballot);
        env.storage()
            .instance()
            .set(&DataKey::BallotCount, &(ballot_id + 1));

        env.events().publish(
            (Symbol::new(&env, "ballot_created"), ballot_id),
            BallotCreatedEvent {
                ballot_id,
                question,
                options: ballot.options.len(),
            },
        );

        Ok(ballot_id)
    }

    /// Put `voter` on the roll with `weight`. A zero weight registers a
    /// voter who cannot vote until reweighted.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `VoterExists`: Voter already registered
    pub fn create_voter(env: Env, caller: Address, weight: u64, voter: Address) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        let key = DataKey::Voter(voter.clone());
        if env.storage().persistent().has(&key) {
            return Err(Error::VoterExists);
        }
        env.storage().persistent().set(&key, &weight);

        env.events().publish(
            (Symbol::new(&env, "voter_registered"), voter.clone()),
            VoterWeightEvent { voter, weight },
        );

        Ok(())
    }

    /// Replace a registered voter's standing weight. Ballots already voted
    /// keep the weight they were cast with.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `VoterNotFound`: Voter not registered
    pub fn update_weight(env: Env, caller: Address, weight: u64, voter: Address) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        let key = DataKey::Voter(voter.clone());
        if !env.storage().persistent().has(&key) {
            return Err(Error::VoterNotFound);
        }
        env.storage().persistent().set(&key, &weight);

        env.events().publish(
            (Symbol::new(&env, "weight_updated"), voter.clone()),
            VoterWeightEvent { voter, weight },
        );

        Ok(())
    }

    // ============================================
    // BALLOT LIFECYCLE
    // ============================================

    /// Open a created ballot for votes
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `BallotNotFound`: No such ballot
    /// - `VotingAlreadyStarted`: Ballot already started or ended
    pub fn start_voting(env: Env, caller: Address, ballot_id: u32) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        let mut ballot = Self::get_ballot(env.clone(), ballot_id)?;
        if ballot.status != BallotStatus::Created {
            return Err(Error::VotingAlreadyStarted);
        }

        ballot.status = BallotStatus::Started;
        Self::save_status(&env, ballot_id, &ballot);

        Ok(())
    }

    /// Close a started ballot
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `BallotNotFound`: No such ballot
    /// - `VotingNotOpen`: Ballot not started, or already ended
    pub fn end_voting(env: Env, caller: Address, ballot_id: u32) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        let mut ballot = Self::get_ballot(env.clone(), ballot_id)?;
        if ballot.status != BallotStatus::Started {
            return Err(Error::VotingNotOpen);
        }

        ballot.status = BallotStatus::Ended;
        Self::save_status(&env, ballot_id, &ballot);

        Ok(())
    }

    // ============================================
    // VOTING
    // ============================================

    /// Add the voter's weight on this ballot (standing weight plus anything
    /// delegated to them) to `option`
    ///
    /// # Errors
    /// - `BallotNotFound`: No such ballot
    /// - `VotingNotOpen`: Ballot not started, or already ended
    /// - `InvalidOption`: Option index out of range
    /// - `VoterNotFound`: Voter not registered
    /// - `AlreadyVoted`: Voter already voted or delegated on this ballot
    /// - `NoVotingWeight`: Voter carries no weight
    pub fn cast_vote(env: Env, voter: Address, ballot_id: u32, option: u32) -> Result<(), Error> {
        voter.require_auth();

        let ballot = Self::open_ballot(&env, ballot_id)?;
        if option >= ballot.options.len() {
            return Err(Error::InvalidOption);
        }
        let weight = Self::unspent_weight(&env, &voter, ballot_id)?;

        let tally_key = DataKey::Tally(ballot_id, option);
        let tally: u64 = env.storage().persistent().get(&tally_key).unwrap_or(0);
        let tally = tally.checked_add(weight).ok_or(Error::WeightOverflow)?;

        env.storage()
            .persistent()
            .set(&DataKey::Voted(voter.clone(), ballot_id), &true);
        env.storage().persistent().set(&tally_key, &tally);

        env.events().publish(
            (Symbol::new(&env, "vote_cast"), ballot_id),
            VoteCastEvent {
                voter,
                ballot_id,
                option,
                weight,
            },
        );

        Ok(())
    }

    /// Hand the voter's whole weight on this ballot to `to`, who votes with
    /// it. The voter is done with the ballot.
    ///
    /// # Errors
    /// - `BallotNotFound`: No such ballot
    /// - `VotingNotOpen`: Ballot not started, or already ended
    /// - `InvalidDelegate`: Delegating to oneself
    /// - `VoterNotFound`: Voter or delegate not registered
    /// - `AlreadyVoted`: Voter already voted or delegated on this ballot
    /// - `NoVotingWeight`: Voter or delegate carries no weight
    /// - `DelegateAlreadyVoted`: Delegate already acted on this ballot
    pub fn delegate_vote(env: Env, voter: Address, to: Address, ballot_id: u32) -> Result<(), Error> {
        voter.require_auth();

        Self::open_ballot(&env, ballot_id)?;
        if voter == to {
            return Err(Error::InvalidDelegate);
        }
        let weight = Self::unspent_weight(&env, &voter, ballot_id)?;

        let delegate_weight =
            Self::voter_weight(env.clone(), to.clone()).ok_or(Error::VoterNotFound)?;
        if delegate_weight == 0 {
            return Err(Error::NoVotingWeight);
        }
        if Self::has_voted(env.clone(), to.clone(), ballot_id) {
            return Err(Error::DelegateAlreadyVoted);
        }

        let delegated_key = DataKey::Delegated(ballot_id, to.clone());
        let delegated: u64 = env.storage().persistent().get(&delegated_key).unwrap_or(0);
        let delegated = delegated.checked_add(weight).ok_or(Error::WeightOverflow)?;

        env.storage()
            .persistent()
            .set(&DataKey::Voted(voter.clone(), ballot_id), &true);
        env.storage().persistent().set(&delegated_key, &delegated);

        env.events().publish(
            (Symbol::new(&env, "vote_delegated"), ballot_id),
            VoteDelegatedEvent {
                from: voter,
                to,
                ballot_id,
                weight,
            },
        );

        Ok(())
    }

    // ============================================
    // RESULTS
    // ============================================

    /// Fix the outcome of an ended ballot: the option with the highest
    /// weighted tally, or `Tied` when the highest tally is shared
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller is not the owner
    /// - `BallotNotFound`: No such ballot
    /// - `VotingNotEnded`: Ballot still created or running
    pub fn calculate_winning_option(
        env: Env,
        caller: Address,
        ballot_id: u32,
    ) -> Result<BallotOutcome, Error> {
        Self::require_owner(&env, &caller)?;

        let ballot = Self::get_ballot(env.clone(), ballot_id)?;
        if ballot.status != BallotStatus::Ended {
            return Err(Error::VotingNotEnded);
        }

        let mut best = 0u64;
        let mut outcome = BallotOutcome::Tied;
        for option in 0..ballot.options.len() {
            let tally = Self::tally(env.clone(), ballot_id, option);
            if tally > best {
                best = tally;
                outcome = BallotOutcome::Winner(option);
            } else if tally == best {
                outcome = BallotOutcome::Tied;
            }
        }

        log!(&env, "ballot {} top tally {}", ballot_id, best);
        env.storage()
            .persistent()
            .set(&DataKey::Outcome(ballot_id), &outcome);

        env.events().publish(
            (Symbol::new(&env, "ballot_resolved"), ballot_id),
            BallotResolvedEvent {
                ballot_id,
                outcome: outcome.clone(),
            },
        );

        Ok(outcome)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// # Errors
    /// - `BallotNotFound`: No such ballot
    /// - `ResultNotTallied`: Winning option not calculated yet
    pub fn ballot_result(env: Env, ballot_id: u32) -> Result<BallotOutcome, Error> {
        Self::get_ballot(env.clone(), ballot_id)?;
        env.storage()
            .persistent()
            .get(&DataKey::Outcome(ballot_id))
            .ok_or(Error::ResultNotTallied)
    }

    pub fn get_ballot(env: Env, ballot_id: u32) -> Result<Ballot, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Ballot(ballot_id))
            .ok_or(Error::BallotNotFound)
    }

    pub fn ballot_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::BallotCount)
            .unwrap_or(0)
    }

    pub fn tally(env: Env, ballot_id: u32, option: u32) -> u64 {
        env.storage()
            .persistent()
            .get(&DataKey::Tally(ballot_id, option))
            .unwrap_or(0)
    }

    /// Standing weight, `None` when not registered
    pub fn voter_weight(env: Env, voter: Address) -> Option<u64> {
        env.storage().persistent().get(&DataKey::Voter(voter))
    }

    /// Standing weight plus weight delegated on this ballot
    pub fn ballot_weight(env: Env, voter: Address, ballot_id: u32) -> u64 {
        let own = Self::voter_weight(env.clone(), voter.clone()).unwrap_or(0);
        let delegated: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::Delegated(ballot_id, voter))
            .unwrap_or(0);
        own.saturating_add(delegated)
    }

    pub fn has_voted(env: Env, voter: Address, ballot_id: u32) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Voted(voter, ballot_id))
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        if *caller != Self::owner(env.clone())? {
            return Err(Error::NotOwner);
        }
        Ok(())
    }

    fn open_ballot(env: &Env, ballot_id: u32) -> Result<Ballot, Error> {
        let ballot = Self::get_ballot(env.clone(), ballot_id)?;
        if ballot.status != BallotStatus::Started {
            return Err(Error::VotingNotOpen);
        }
        Ok(ballot)
    }

    /// Weight `voter` can still spend on this ballot
    fn unspent_weight(env: &Env, voter: &Address, ballot_id: u32) -> Result<u64, Error> {
        let own = Self::voter_weight(env.clone(), voter.clone()).ok_or(Error::VoterNotFound)?;
        if Self::has_voted(env.clone(), voter.clone(), ballot_id) {
            return Err(Error::AlreadyVoted);
        }
        if own == 0 {
            return Err(Error::NoVotingWeight);
        }
        let delegated: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::Delegated(ballot_id, voter.clone()))
            .unwrap_or(0);
        own.checked_add(delegated).ok_or(Error::WeightOverflow)
    }

    fn save_status(env: &Env, ballot_id: u32, ballot: &Ballot) {
        env.storage()
            .persistent()
            .set(&DataKey::Ballot(ballot_id), ballot);

        env.events().publish(
            (Symbol::new(env, "ballot_status"), ballot_id),
            BallotStatusEvent {
                ballot_id,
                status: ballot.status,
            },
        );
    }
}

#[cfg(test)]
mod test;
