//! JSON output of extracted ballots.

use std::io::Write;

use crate::entity::Ballot;
use crate::error::VotumError;

/// Writes `ballots` as a pretty-printed JSON array followed by a newline.
pub fn write_ballots<W: Write>(mut writer: W, ballots: &[&Ballot]) -> Result<(), VotumError> {
    serde_json::to_writer_pretty(&mut writer, ballots)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BallotStatus, Bill, VoteResult};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn ballots() -> Vec<Ballot> {
        let bill = |title: &str| {
            Bill::new(
                title.to_string(),
                "Text".to_string(),
                NaiveDate::from_ymd_opt(1892, 5, 10).unwrap(),
            )
        };
        vec![
            Ballot::completed(
                bill("für ein Verbot des Schlachtens ohne vorherige Betäubung"),
                VoteResult {
                    percentage_yes: Decimal::new(601, 1),
                    accepting_cantons: Decimal::new(115, 1),
                },
            ),
            Ballot::without_vote(bill("Für eine neue Bundesverfassung"), BallotStatus::Failed)
                .unwrap(),
        ]
    }

    #[test]
    fn writes_json_array() {
        let ballots = ballots();
        let refs: Vec<&Ballot> = ballots.iter().collect();
        let mut out = Vec::new();
        write_ballots(&mut out, &refs).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("]\n"));
        assert!(text.contains(r#""accepting_cantons": "11.5""#));
        assert!(text.contains(r#""date": "1892-05-10""#));
        let parsed: Vec<Ballot> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, ballots);
    }

    #[test]
    fn empty_batch_is_empty_array() {
        let mut out = Vec::new();
        write_ballots(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_reported() {
        let ballots = ballots();
        let refs: Vec<&Ballot> = ballots.iter().collect();
        let err = write_ballots(ClosedPipe, &refs).unwrap_err();
        assert!(matches!(err, VotumError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }
}
