#![no_std]

//! Shared building blocks for the instrument lifecycle contracts: the types
//! every contract stores, client traits for the collaborator contracts,
//! payment-period and amortization math, exercise-window rules,
//! counterparty funding checks and secp256k1 receipt verification.

pub mod clients;
pub mod exercise_window;
pub mod holders;
pub mod math;
pub mod receipt;
pub mod schedule;
pub mod settlement;
pub mod types;

pub use types::*;
