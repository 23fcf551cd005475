use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A popular initiative as published in the federal chancellery chronology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    /// Official title without the "Eidgenössische Volksinitiative" prefix or quotes.
    pub title: String,
    /// Full legal wording in canonical text form.
    pub wording: String,
    /// Date of the last entry in the bill's timetable.
    pub date: NaiveDate,
}

impl Bill {
    pub fn new(title: String, wording: String, date: NaiveDate) -> Self {
        Self {
            title,
            wording,
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bill_serializes_date_as_iso() {
        let bill = Bill::new(
            "für ein Verbot des Schlachtens ohne vorherige Betäubung".into(),
            "Die Bundesverfassung wird wie folgt ergänzt:".into(),
            NaiveDate::from_ymd_opt(1892, 5, 10).unwrap(),
        );
        let json = serde_json::to_string(&bill).unwrap();
        assert!(json.contains(r#""date":"1892-05-10""#));

        let parsed: Bill = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, bill);
    }
}
