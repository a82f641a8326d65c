use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-9)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Only the owner runs ballots and the voter roll
    NotOwner = 10,

    // ============================================
    // ARGUMENT ERRORS (20-29)
    // ============================================
    /// Empty question, fewer than two options, or zero duration
    InvalidBallot = 20,
    /// Option index out of range
    InvalidOption = 21,
    /// A voter cannot delegate to themselves
    InvalidDelegate = 22,
    /// Accumulated weight overflowed
    WeightOverflow = 23,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// Ballot is not accepting votes
    VotingNotOpen = 30,
    /// Ballot was already started
    VotingAlreadyStarted = 31,
    /// Results need an ended ballot
    VotingNotEnded = 32,
    /// Voter or delegate carries no weight
    NoVotingWeight = 33,

    // ============================================
    // ALREADY DONE ERRORS (50-59)
    // ============================================
    /// Voter already voted or delegated on this ballot
    AlreadyVoted = 50,
    /// Address already on the voter roll
    VoterExists = 51,
    /// Delegate already voted on this ballot
    DelegateAlreadyVoted = 52,

    // ============================================
    // NOT FOUND ERRORS (80-89)
    // ============================================
    BallotNotFound = 80,
    VoterNotFound = 81,
    /// Winning option not calculated yet
    ResultNotTallied = 82,
}
