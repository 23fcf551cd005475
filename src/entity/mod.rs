mod ballot;
mod bill;

pub use ballot::{Ballot, BallotStatus, VoteResult};
pub use bill::Bill;
