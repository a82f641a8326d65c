use soroban_sdk::{contracttype, Address, String, Vec};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum BallotStatus {
    Created = 0,
    Started = 1,
    Ended = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ballot {
    pub question: String,
    pub options: Vec<String>,
    /// Announced opening time. The owner still starts and ends voting.
    pub start_time: u64,
    /// Announced length in seconds
    pub duration: u64,
    pub status: BallotStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BallotOutcome {
    /// Index into the ballot options
    Winner(u32),
    Tied,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    BallotCount,
    Ballot(u32),
    /// Standing weight on the voter roll
    Voter(Address),
    /// (voter, ballot)
    Voted(Address, u32),
    /// Weight handed to a voter on one ballot: (ballot, delegate)
    Delegated(u32, Address),
    /// (ballot, option)
    Tally(u32, u32),
    Outcome(u32),
}
