//! Extraction of popular initiatives from the federal chancellery chronology.
//!
//! A bill needs up to three page fetches: the details page, its wording
//! companion and, once voted on, the results page of the voting day.
//! Parsing happens in [`page`]; this module only sequences the fetches.

pub mod page;
pub mod status;

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use url::Url;

use crate::config::VotumConfig;
use crate::entity::{Ballot, Bill};
use crate::error::{ExtractError, VotumError};
use crate::fetch::PageFetcher;
use crate::overrides::Overrides;

/// Outcome of one URL in a batch crawl.
#[derive(Debug)]
pub struct CrawlRecord {
    pub url: Url,
    pub outcome: Result<Ballot, ExtractError>,
}

/// Ballot extractor. Cheap to clone; clones share the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct Chronology {
    fetcher: PageFetcher,
    index_url: Url,
    results_base_url: Url,
    overrides: Arc<Overrides>,
    concurrency: usize,
}

impl Chronology {
    pub fn new(config: &VotumConfig) -> Result<Self, VotumError> {
        config.validate()?;
        let overrides = match &config.overrides_path {
            Some(path) => Overrides::load_with(path)?,
            None => Overrides::bundled()?,
        };
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
            index_url: config.index_url()?,
            results_base_url: config.results_base_url()?,
            overrides: Arc::new(overrides),
            concurrency: config.concurrency,
        })
    }

    /// Details page URLs of all initiatives, newest first.
    pub async fn list_initiatives(&self) -> Result<Vec<Url>, ExtractError> {
        let body = self.fetcher.fetch(&self.index_url).await?;
        let urls = page::parse_index(&body, &self.index_url)?;
        info!(count = urls.len(), index = %self.index_url, "listed initiatives");
        Ok(urls)
    }

    /// Extract the ballot described by the details page at `url`.
    ///
    /// Either a complete ballot is returned or the first error hit.
    pub async fn get_initiative(&self, url: &Url) -> Result<Ballot, ExtractError> {
        let body = self.fetcher.fetch(url).await?;
        let detail = page::parse_detail(&body, url)?;
        debug!(url = %url, title = %detail.title, status = %detail.status, "parsed details page");

        let wording_url = page::wording_url(url)?;
        let wording = page::parse_wording(&self.fetcher.fetch(&wording_url).await?)?;
        let bill = Bill::new(detail.title, wording, detail.date);

        let Some(vote_date) = detail.vote_date else {
            return Ballot::without_vote(bill, detail.status).ok_or_else(|| {
                ExtractError::extraction(url.as_str(), "voted bill without vote date")
            });
        };

        let results_url = page::results_url(&self.results_base_url, vote_date)?;
        let body = self.fetcher.fetch(&results_url).await?;
        let result = page::parse_result(&body, &results_url, &bill.title, &self.overrides)?;
        info!(
            title = %bill.title,
            yes = %result.percentage_yes,
            cantons = %result.accepting_cantons,
            "extracted ballot result"
        );
        Ok(Ballot::completed(bill, result))
    }

    /// Extract every URL with at most `concurrency` extractions in flight.
    ///
    /// Records come back in the order of `urls`. A failing record is kept
    /// and reported through `on_record`; it never stops the batch. `on_record` is called as each
    /// record finishes, in completion order.
    pub async fn crawl<F>(&self, urls: Vec<Url>, mut on_record: F) -> Vec<CrawlRecord>
    where
        F: FnMut(&CrawlRecord),
    {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let total = urls.len();

        for (index, url) in urls.into_iter().enumerate() {
            let chronology = self.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome = chronology.get_initiative(&url).await;
                (index, CrawlRecord { url, outcome })
            });
        }

        let mut slots: Vec<Option<CrawlRecord>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, record)) => {
                    if let Err(e) = &record.outcome {
                        debug!(url = %record.url, error = %e, "skipping initiative");
                    }
                    on_record(&record);
                    slots[index] = Some(record);
                }
                Err(e) => error!(error = %e, "extraction task failed"),
            }
        }

        slots.into_iter().flatten().collect()
    }
}
