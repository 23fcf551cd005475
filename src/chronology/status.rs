use crate::entity::BallotStatus;

/// First-cell markers of a row recording the day the vote took place.
/// Checked in order; the first marker with a matching row wins.
pub const VOTED_MARKERS: &[&str] = &["Abgestimmt am", "Abstimmung über Gegenentwurf"];

/// First-cell markers of a row recording that the bill never reached a vote.
pub const FAILED_MARKERS: &[&str] = &[
    "Nicht zustandegekommen am",
    "Im Sammelstadium gescheitert",
    "Zurückgezogen",
    "Bedingter Rückzug",
];

/// Cell texts of every table row on a details page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timetable {
    rows: Vec<Vec<String>>,
}

impl Timetable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// First row whose first cell starts with `marker`.
    ///
    /// Leading whitespace of the cell is ignored.
    pub fn find_row(&self, marker: &str) -> Option<&[String]> {
        self.rows
            .iter()
            .find(|row| {
                row.first()
                    .is_some_and(|cell| cell.trim_start().starts_with(marker))
            })
            .map(Vec::as_slice)
    }

    /// The row holding the vote date, if the bill was voted on.
    pub fn vote_row(&self) -> Option<&[String]> {
        VOTED_MARKERS.iter().find_map(|marker| self.find_row(marker))
    }

    pub fn last_row(&self) -> Option<&[String]> {
        self.rows.last().map(Vec::as_slice)
    }

    /// Status of the bill as recorded by the timetable.
    ///
    /// A vote row wins over any failure marker.
    pub fn status(&self) -> BallotStatus {
        if self.vote_row().is_some() {
            BallotStatus::Completed
        } else if FAILED_MARKERS.iter().any(|m| self.find_row(m).is_some()) {
            BallotStatus::Failed
        } else {
            BallotStatus::Pending
        }
    }
}
