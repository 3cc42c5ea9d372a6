//! # Selection
//!
//! Mating selection for the generational strategy: a crowded binary
//! [`tournament`] picks parents and [`pairing`] groups them into mating pairs.

pub mod pairing;
pub mod tournament;

pub use pairing::unique_pairs;
pub use tournament::CrowdedTournament;
