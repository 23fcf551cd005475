//! Synchronous parsing of the chronology pages.
//!
//! Every function here parses one fetched document and returns owned data,
//! so no parsed tree outlives the call.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::status::Timetable;
use crate::canonical::{canonicalize, canonicalize_all};
use crate::canton::parse_canton_count;
use crate::entity::{BallotStatus, VoteResult};
use crate::error::ExtractError;
use crate::overrides::Overrides;
use crate::resolver::TitleResolver;

/// Date format of the timetables.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Keeps the quoted core of a title such as `Eidgenössische Volksinitiative 'X'`.
const PREFIXED_TITLE_PATTERN: &str = r"^.*['«]([^'»]*)['»].*$";

/// Content container of detail, wording and results pages.
const CONTENT_SELECTOR: &str = r#"div[class*="mod-text"]"#;

/// Header containers tried in order for the title.
const TITLE_SELECTORS: &[&str] = &["div.contentHead h2", "div.contentHead h1"];

/// What a details page says about a bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub title: String,
    /// Date of the last timetable entry.
    pub date: NaiveDate,
    pub status: BallotStatus,
    /// Set exactly when `status` is `Completed`.
    pub vote_date: Option<NaiveDate>,
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css)
        .map_err(|e| ExtractError::extraction(css, format!("invalid selector: {e}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Child elements of `element` with tag `name`.
fn children_named<'a>(
    element: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

/// Absolute detail page URLs linked from table cells of the index, in
/// document order.
pub fn parse_index(body: &str, index_url: &Url) -> Result<Vec<Url>, ExtractError> {
    let doc = Html::parse_document(body);
    let links = selector("td a")?;
    doc.select(&links)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| index_url.join(href.trim()).map_err(ExtractError::from))
        .collect()
}

pub fn parse_detail(body: &str, url: &Url) -> Result<DetailPage, ExtractError> {
    let doc = Html::parse_document(body);
    let title = extract_title(&doc, url)?;
    let timetable = extract_timetable(&doc)?;

    let last = timetable
        .last_row()
        .ok_or_else(|| ExtractError::extraction(url.as_str(), "page has no timetable rows"))?;
    let date = parse_date(second_cell(last, url)?, url)?;

    let status = timetable.status();
    let vote_date = match timetable.vote_row() {
        Some(row) => Some(parse_date(second_cell(row, url)?, url)?),
        None => None,
    };

    Ok(DetailPage {
        title,
        date,
        status,
        vote_date,
    })
}

fn extract_title(doc: &Html, url: &Url) -> Result<String, ExtractError> {
    let mut header = None;
    for css in TITLE_SELECTORS {
        header = doc.select(&selector(css)?).next();
        if header.is_some() {
            break;
        }
    }
    let header = header.ok_or_else(|| {
        ExtractError::extraction(
            url.as_str(),
            "no <h2> or <h1> header inside <div class=\"contentHead\">",
        )
    })?;

    let text = canonicalize(header).replace(['\r', '\n'], "");
    let pattern = Regex::new(PREFIXED_TITLE_PATTERN)
        .map_err(|e| ExtractError::extraction(url.as_str(), e.to_string()))?;
    pattern
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|core| core.as_str().to_string())
        .ok_or_else(|| {
            ExtractError::extraction(url.as_str(), format!("unexpected title format {text:?}"))
        })
}

fn extract_timetable(doc: &Html) -> Result<Timetable, ExtractError> {
    let rows = selector("tr")?;
    Ok(Timetable::new(
        doc.select(&rows)
            .map(|tr| children_named(tr, "td").map(text_of).collect())
            .collect(),
    ))
}

fn second_cell<'a>(row: &'a [String], url: &Url) -> Result<&'a str, ExtractError> {
    row.get(1)
        .map(String::as_str)
        .ok_or_else(|| ExtractError::extraction(url.as_str(), "timetable row has no date cell"))
}

fn parse_date(text: &str, url: &Url) -> Result<NaiveDate, ExtractError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| {
        ExtractError::extraction(url.as_str(), format!("invalid date {text:?}: {e}"))
    })
}

/// Companion page holding the wording: `123.html` becomes `123t.html`.
pub fn wording_url(detail_url: &Url) -> Result<Url, ExtractError> {
    let path = detail_url.path();
    let stem = path.strip_suffix(".html").ok_or_else(|| {
        ExtractError::extraction(detail_url.as_str(), "details page is not an .html file")
    })?;
    let mut url = detail_url.clone();
    url.set_path(&format!("{stem}t.html"));
    Ok(url)
}

pub fn parse_wording(body: &str) -> Result<String, ExtractError> {
    let doc = Html::parse_document(body);
    let content = selector(CONTENT_SELECTOR)?;
    Ok(canonicalize_all(doc.select(&content)).trim().to_string())
}

/// Results of all ballots held on `date`.
pub fn results_url(base: &Url, date: NaiveDate) -> Result<Url, ExtractError> {
    Ok(base.join(&format!(
        "{:04}{:02}{:02}/index.html",
        date.year(),
        date.month(),
        date.day()
    ))?)
}

/// Reads the result of the bill titled `title` from a voting day page.
pub fn parse_result(
    body: &str,
    url: &Url,
    title: &str,
    overrides: &Overrides,
) -> Result<VoteResult, ExtractError> {
    let doc = Html::parse_document(body);
    let headings = selector(&format!("{CONTENT_SELECTOR} h3"))?;
    let resolver = TitleResolver::new(&overrides.title_rewrites);
    let heading = resolver
        .resolve(doc.select(&headings).map(|h| (canonicalize(h), h)), title)
        .into_result(title)?;

    let table = heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "table")
        .ok_or_else(|| ExtractError::extraction(url.as_str(), "no table after result heading"))?;
    let rows: Vec<Vec<ElementRef<'_>>> = children_named(table, "tbody")
        .flat_map(|tbody| children_named(tbody, "tr"))
        .map(|tr| children_named(tr, "td").collect())
        .collect();

    let cell = |row: usize, column: usize| {
        rows.get(row)
            .and_then(|cells| cells.get(column))
            .map(|td| text_of(*td))
            .ok_or_else(|| {
                ExtractError::extraction(
                    url.as_str(),
                    format!("result table has no cell at row {row}, column {column}"),
                )
            })
    };

    let percentage = cell(0, 3)?;
    let percentage_yes = Decimal::from_str(percentage.trim()).map_err(|e| {
        ExtractError::extraction(url.as_str(), format!("invalid percentage {percentage:?}: {e}"))
    })?;

    let accepting_cantons = match overrides.accepting_cantons(title) {
        Some(count) => count,
        None => parse_canton_count(&cell(1, 1)?)?,
    };

    Ok(VoteResult {
        percentage_yes,
        accepting_cantons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    const DETAIL: &str = r#"<html><body>
        <div class="contentHead"><h2>Eidgenössische Volksinitiative 'Verbot des Schlachtens ohne vorherige Betäubung'</h2></div>
        <table>
          <tr><td>Vorprüfung</td><td>03.10.1891</td></tr>
          <tr><td>Abgestimmt am</td><td> 20.08.1893 </td></tr>
          <tr><td>Erwahrung</td><td>10.05.1892</td></tr>
        </table>
    </body></html>"#;

    #[test]
    fn index_links_are_joined_with_parent() {
        let body = r#"<table>
            <tr><td><a href="vis2.html">Zwei</a></td></tr>
            <tr><td><a href="vis1.html">Eins</a></td></tr>
        </table><p><a href="ignored.html">x</a></p>"#;
        let index = url("https://www.bk.admin.ch/ch/d/pore/vi/vis_2_2_5_1.html");
        let urls = parse_index(body, &index).unwrap();
        assert_eq!(
            urls,
            vec![
                url("https://www.bk.admin.ch/ch/d/pore/vi/vis2.html"),
                url("https://www.bk.admin.ch/ch/d/pore/vi/vis1.html"),
            ]
        );
    }

    #[test]
    fn detail_page() {
        let detail = parse_detail(DETAIL, &url("https://x.ch/vi/vis1.html")).unwrap();
        assert_eq!(detail.title, "Verbot des Schlachtens ohne vorherige Betäubung");
        assert_eq!(detail.date, NaiveDate::from_ymd_opt(1892, 5, 10).unwrap());
        assert_eq!(detail.status, BallotStatus::Completed);
        assert_eq!(detail.vote_date, NaiveDate::from_ymd_opt(1893, 8, 20));
    }

    #[test]
    fn title_falls_back_to_h1_with_guillemets() {
        let body = r#"<div class="contentHead"><h1>Volksinitiative «Für eine
            sichere Zukunft»</h1></div>
            <table><tr><td>Vorprüfung</td><td>01.02.2020</td></tr></table>"#;
        let detail = parse_detail(body, &url("https://x.ch/vi/vis9.html")).unwrap();
        assert!(detail.title.starts_with("Für eine"));
        assert!(detail.title.ends_with("sichere Zukunft"));
        assert_eq!(detail.status, BallotStatus::Pending);
        assert_eq!(detail.vote_date, None);
    }

    #[test]
    fn missing_header_is_an_error() {
        let body = "<h2>'Titel'</h2><table><tr><td>a</td><td>01.01.2000</td></tr></table>";
        let err = parse_detail(body, &url("https://x.ch/vi/vis3.html")).unwrap_err();
        assert!(matches!(err, ExtractError::Extraction { .. }));
    }

    #[test]
    fn unquoted_title_is_an_error() {
        let body = r#"<div class="contentHead"><h2>Kein Zitat</h2></div>
            <table><tr><td>a</td><td>01.01.2000</td></tr></table>"#;
        let err = parse_detail(body, &url("https://x.ch/vi/vis4.html")).unwrap_err();
        assert!(err.to_string().contains("unexpected title format"));
    }

    #[test]
    fn missing_timetable_is_an_error() {
        let body = r#"<div class="contentHead"><h2>Initiative 'X'</h2></div>"#;
        assert!(parse_detail(body, &url("https://x.ch/vi/vis5.html")).is_err());
    }

    #[test]
    fn malformed_date_is_an_error() {
        let body = r#"<div class="contentHead"><h2>Initiative 'X'</h2></div>
            <table><tr><td>Abgestimmt am</td><td>1893-08-20</td></tr></table>"#;
        let err = parse_detail(body, &url("https://x.ch/vi/vis6.html")).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn wording_url_inserts_suffix() {
        assert_eq!(
            wording_url(&url("https://x.ch/ch/d/pore/vi/vis10.html")).unwrap(),
            url("https://x.ch/ch/d/pore/vi/vis10t.html")
        );
        assert!(wording_url(&url("https://x.ch/vi/vis10")).is_err());
    }

    #[test]
    fn wording_is_canonical_and_trimmed() {
        let body = r#"<div id="pageNavigation"><p>Zurück</p></div>
            <div class="mod-text"><p>Art. 25<sup>bis</sup> (neu)</p><p>Text.</p></div>"#;
        assert_eq!(parse_wording(body).unwrap(), "Art. 25^bis (neu)\n\nText.");
    }

    #[test]
    fn results_url_is_zero_padded() {
        let base = url("https://www.bk.admin.ch/ch/d/pore/va/");
        let date = NaiveDate::from_ymd_opt(1893, 8, 2).unwrap();
        assert_eq!(
            results_url(&base, date).unwrap().as_str(),
            "https://www.bk.admin.ch/ch/d/pore/va/18930802/index.html"
        );
    }

    const RESULTS: &str = r#"<div class="mod-text">
        <h3>Eidgenössische Volksinitiative 'Verbot des Schlachtens ohne vorherige Betäubung'</h3>
        <p>Vorlage Nr. 1</p>
        <table>
          <tr><td>Stimmberechtigte</td><td>x</td><td>y</td><td>60.1</td></tr>
          <tr><td>Stände</td><td>10 3/2</td></tr>
        </table>
        <h3>Bundesgesetz betreffend die Wahl der Mitglieder des Nationalrates</h3>
        <table>
          <tr><td>Stimmberechtigte</td><td>x</td><td>y</td><td>42.0</td></tr>
          <tr><td>Stände</td><td>3</td></tr>
        </table>
    </div>"#;

    #[test]
    fn result_of_matching_heading() {
        let overrides = Overrides::bundled().unwrap();
        let result = parse_result(
            RESULTS,
            &url("https://x.ch/va/18930820/index.html"),
            "Verbot des Schlachtens ohne vorherige Betäubung",
            &overrides,
        )
        .unwrap();
        assert_eq!(result.percentage_yes, Decimal::from_str("60.1").unwrap());
        assert_eq!(result.accepting_cantons, Decimal::from_str("11.5").unwrap());
    }

    #[test]
    fn canton_override_replaces_only_cantons() {
        let body = r#"<div class="mod-text">
            <h3>Totalrevision der Bundesverfassung</h3>
            <table>
              <tr><td>a</td><td>b</td><td>c</td><td>41.9</td></tr>
            </table>
        </div>"#;
        let overrides = Overrides::bundled().unwrap();
        let result = parse_result(
            body,
            &url("https://x.ch/va/18800831/index.html"),
            "Totalrevision der Bundesverfassung",
            &overrides,
        )
        .unwrap();
        assert_eq!(result.percentage_yes, Decimal::from_str("41.9").unwrap());
        assert_eq!(result.accepting_cantons, Decimal::from(3));
    }

    #[test]
    fn results_page_without_headings() {
        let overrides = Overrides::default();
        let err = parse_result(
            "<div class=\"mod-text\"><p>Keine Vorlagen</p></div>",
            &url("https://x.ch/va/20000101/index.html"),
            "Titel",
            &overrides,
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::NoMatch { .. }));
    }

    #[test]
    fn heading_without_table() {
        let overrides = Overrides::default();
        let err = parse_result(
            "<div class=\"mod-text\"><h3>Titel</h3><p>Kein Resultat</p></div>",
            &url("https://x.ch/va/20000101/index.html"),
            "Titel",
            &overrides,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no table after result heading"));
    }

    #[test]
    fn invalid_canton_count() {
        let body = r#"<div class="mod-text"><h3>Titel</h3><table>
            <tr><td>a</td><td>b</td><td>c</td><td>50.0</td></tr>
            <tr><td>Stände</td><td>viele</td></tr>
        </table></div>"#;
        let err = parse_result(
            body,
            &url("https://x.ch/va/20000101/index.html"),
            "Titel",
            &Overrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::CantonCount(_)));
    }
}
