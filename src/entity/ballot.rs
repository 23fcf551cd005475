use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bill::Bill;

/// Lifecycle stage of an initiative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallotStatus {
    /// Still collecting signatures or waiting for the vote.
    Pending,
    /// Withdrawn or never came about; no vote will take place.
    Failed,
    /// Voted on; a [`VoteResult`] is available.
    Completed,
}

impl fmt::Display for BallotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BallotStatus::Pending => write!(f, "PENDING"),
            BallotStatus::Failed => write!(f, "FAILED"),
            BallotStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// Double-majority outcome of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResult {
    /// Share of the population voting yes, in percent.
    pub percentage_yes: Decimal,
    /// Number of accepting cantons, half cantons counting as one half.
    pub accepting_cantons: Decimal,
}

/// A bill together with its lifecycle status and, once voted on, its result.
///
/// The fields are private so that `status == Completed` holds exactly when a
/// result is present. Construct through [`Ballot::completed`] or
/// [`Ballot::without_vote`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedBallot")]
pub struct Ballot {
    bill: Bill,
    status: BallotStatus,
    result: Option<VoteResult>,
}

#[derive(Deserialize)]
struct UncheckedBallot {
    bill: Bill,
    status: BallotStatus,
    result: Option<VoteResult>,
}

impl TryFrom<UncheckedBallot> for Ballot {
    type Error = String;

    fn try_from(raw: UncheckedBallot) -> Result<Self, Self::Error> {
        match (raw.status, raw.result) {
            (BallotStatus::Completed, Some(result)) => Ok(Ballot::completed(raw.bill, result)),
            (status, None) => Ballot::without_vote(raw.bill, status)
                .ok_or_else(|| format!("{status} ballot without result")),
            (status, Some(_)) => Err(format!("{status} ballot with result")),
        }
    }
}

impl Ballot {
    /// A ballot that has been voted on.
    pub fn completed(bill: Bill, result: VoteResult) -> Self {
        Self {
            bill,
            status: BallotStatus::Completed,
            result: Some(result),
        }
    }

    /// A pending or failed ballot. Returns `None` for `Completed`, which
    /// always needs a result.
    pub fn without_vote(bill: Bill, status: BallotStatus) -> Option<Self> {
        match status {
            BallotStatus::Completed => None,
            BallotStatus::Pending | BallotStatus::Failed => Some(Self {
                bill,
                status,
                result: None,
            }),
        }
    }

    pub fn bill(&self) -> &Bill {
        &self.bill
    }

    pub fn status(&self) -> BallotStatus {
        self.status
    }

    pub fn result(&self) -> Option<&VoteResult> {
        self.result.as_ref()
    }

    pub fn into_parts(self) -> (Bill, BallotStatus, Option<VoteResult>) {
        (self.bill, self.status, self.result)
    }
}
