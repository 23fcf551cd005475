//! Extraction of Swiss popular initiatives and their double-majority results
//! from the chronology published by the federal chancellery.

pub mod canonical;
pub mod canton;
pub mod chronology;
pub mod config;
pub mod entity;
pub mod error;
pub mod fetch;
pub mod output;
pub mod overrides;
pub mod resolver;
pub mod similarity;

pub use chronology::{Chronology, CrawlRecord};
pub use config::VotumConfig;
pub use entity::{Ballot, BallotStatus, Bill, VoteResult};
pub use error::{ExtractError, VotumError};
