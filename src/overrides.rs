//! Historical corrections for pages that fuzzy matching or table parsing
//! cannot handle.
//!
//! The tables live in `overrides.toml`, which is compiled into the binary.
//! Additional entries can be loaded from a user file and are appended after
//! the bundled ones.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::VotumError;

const BUNDLED: &str = include_str!("overrides.toml");

/// Literal replacement applied to a chronology title before matching.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TitleRewrite {
    pub from: String,
    pub to: String,
}

/// Canton count to use instead of the results table for one bill.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CantonOverride {
    pub title: String,
    pub accepting_cantons: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Overrides {
    #[serde(default)]
    pub title_rewrites: Vec<TitleRewrite>,
    #[serde(default)]
    pub canton_overrides: Vec<CantonOverride>,
}

impl Overrides {
    /// The tables shipped with votum.
    pub fn bundled() -> Result<Self, VotumError> {
        Ok(toml::from_str(BUNDLED)?)
    }

    /// Bundled tables extended with the entries of `path`.
    pub fn load_with(path: &Path) -> Result<Self, VotumError> {
        let mut overrides = Self::bundled()?;
        let contents = std::fs::read_to_string(path)?;
        let extra: Overrides = toml::from_str(&contents)?;
        overrides.title_rewrites.extend(extra.title_rewrites);
        overrides.canton_overrides.extend(extra.canton_overrides);
        Ok(overrides)
    }

    /// Canton count override for `title`, if any.
    pub fn accepting_cantons(&self, title: &str) -> Option<Decimal> {
        self.canton_overrides
            .iter()
            .find(|o| o.title == title)
            .map(|o| o.accepting_cantons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;

    #[test]
    fn bundled_tables_parse() {
        let overrides = Overrides::bundled().unwrap();
        assert_eq!(overrides.title_rewrites.len(), 5);
        assert_eq!(overrides.canton_overrides.len(), 5);
    }

    #[test]
    fn bundled_canton_overrides() {
        let overrides = Overrides::bundled().unwrap();
        assert_eq!(
            overrides.accepting_cantons("Bekämpfung des Alkoholismus"),
            Some(Decimal::ZERO)
        );
        assert_eq!(
            overrides.accepting_cantons("Neuordnung des Alkoholwesens"),
            Some(Decimal::from_str("8.5").unwrap())
        );
        assert_eq!(
            overrides.accepting_cantons("Totalrevision der Bundesverfassung"),
            Some(Decimal::from(3))
        );
        assert_eq!(overrides.accepting_cantons("für eine neue Bundesverfassung"), None);
    }

    #[test]
    fn user_file_is_appended() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [[canton_overrides]]
            title = "Neue Initiative"
            accepting_cantons = "12.5"
            "#
        )
        .unwrap();

        let overrides = Overrides::load_with(file.path()).unwrap();
        assert_eq!(overrides.title_rewrites.len(), 5);
        assert_eq!(overrides.canton_overrides.len(), 6);
        assert_eq!(
            overrides.accepting_cantons("Neue Initiative"),
            Some(Decimal::from_str("12.5").unwrap())
        );
    }

    #[test]
    fn missing_user_file_is_an_error() {
        let result = Overrides::load_with(Path::new("/tmp/definitely_not_an_overrides_file.toml"));
        assert!(result.is_err());
    }
}
