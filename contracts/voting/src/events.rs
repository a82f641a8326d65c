use soroban_sdk::{contracttype, Address, String};

use crate::storage::{BallotOutcome, BallotStatus};

#[contracttype]
#[derive(Clone, Debug)]
pub struct BallotCreatedEvent {
    pub ballot_id: u32,
    pub question: String,
    pub options: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BallotStatusEvent {
    pub ballot_id: u32,
    pub status: BallotStatus,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct VoterWeightEvent {
    pub voter: Address,
    pub weight: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct VoteCastEvent {
    pub voter: Address,
    pub ballot_id: u32,
    pub option: u32,
    pub weight: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct VoteDelegatedEvent {
    pub from: Address,
    pub to: Address,
    pub ballot_id: u32,
    pub weight: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BallotResolvedEvent {
    pub ballot_id: u32,
    pub outcome: BallotOutcome,
}
