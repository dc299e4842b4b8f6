// src/services/batch.rs

//! Eager and lazy scraping over a list of search results.

use std::iter::FusedIterator;
use std::ops::Range;
use std::thread;
use std::time::Duration;

use rand::Rng;
use reqwest::blocking::Client;

use crate::error::{AppError, Result};
use crate::models::ScrapeConfig;

/// Scrapes the listing behind one search result.
pub type ScrapeFn<R, L> = fn(&Client, &R) -> Result<L>;

/// Randomized pause taken before a detail fetch.
fn pause_for(config: &ScrapeConfig, rng: &mut impl Rng) -> Result<Duration> {
    if !config.jitter.is_finite() || config.jitter < 0.0 {
        return Err(AppError::config(format!(
            "scrape.jitter must be a finite number >= 0, was {}",
            config.jitter
        )));
    }
    if config.delay_ms == 0 || config.jitter == 0.0 {
        return Ok(Duration::ZERO);
    }
    let factor: f64 = rng.gen_range(0.0..1.0);
    Duration::try_from_secs_f64(config.delay_ms as f64 / 1000.0 * factor * config.jitter)
        .map_err(|e| AppError::config(format!("scrape delay out of range: {e}")))
}

/// Scrape every result in order, stopping at the first failure.
///
/// Pauses between fetches per [`ScrapeConfig`]; there is no pause after the
/// last result.
pub fn scrape_all<R, L>(
    client: &Client,
    results: &[R],
    config: &ScrapeConfig,
    scrape: ScrapeFn<R, L>,
) -> Result<Vec<L>> {
    let mut rng = rand::thread_rng();
    let total = results.len();
    let mut listings = Vec::with_capacity(total);

    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            let pause = pause_for(config, &mut rng)?;
            if !pause.is_zero() {
                log::debug!("Delaying {:.2}s before next listing", pause.as_secs_f64());
                thread::sleep(pause);
            }
        }

        listings.push(scrape(client, result)?);
        log::info!("Parsed {} of {}", i + 1, total);
    }

    Ok(listings)
}

/// Search results whose listings are scraped only when asked for.
///
/// Nothing is fetched up front. Each call to [`get`](Self::get) or each step
/// of an iterator fetches and parses one listing; iterating again fetches
/// again.
pub struct LazyListings<'c, R, L> {
    client: &'c Client,
    results: Vec<R>,
    scrape: ScrapeFn<R, L>,
}

impl<'c, R, L> LazyListings<'c, R, L> {
    pub fn new(client: &'c Client, results: Vec<R>, scrape: ScrapeFn<R, L>) -> Self {
        Self {
            client,
            results,
            scrape,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The underlying search results, unscraped.
    pub fn results(&self) -> &[R] {
        &self.results
    }

    /// Scrape the listing at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<Result<L>> {
        self.results
            .get(index)
            .map(|result| (self.scrape)(self.client, result))
    }

    /// Scrape a contiguous range of listings.
    pub fn slice(&self, range: Range<usize>) -> Result<Vec<L>> {
        let results = self.results.get(range.clone()).ok_or_else(|| {
            AppError::invalid(format!(
                "range {range:?} out of bounds for {} results",
                self.results.len()
            ))
        })?;
        results
            .iter()
            .map(|result| (self.scrape)(self.client, result))
            .collect()
    }

    /// A fresh pull-based iterator over the listings.
    pub fn iter(&self) -> LazyIter<'_, 'c, R, L> {
        LazyIter {
            listings: self,
            index: 0,
        }
    }
}

/// Iterator returned by [`LazyListings::iter`].
pub struct LazyIter<'a, 'c, R, L> {
    listings: &'a LazyListings<'c, R, L>,
    index: usize,
}

impl<R, L> Iterator for LazyIter<'_, '_, R, L> {
    type Item = Result<L>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.listings.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.listings.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<R, L> ExactSizeIterator for LazyIter<'_, '_, R, L> {}

impl<R, L> FusedIterator for LazyIter<'_, '_, R, L> {}

impl<'a, 'c, R, L> IntoIterator for &'a LazyListings<'c, R, L> {
    type Item = Result<L>;
    type IntoIter = LazyIter<'a, 'c, R, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::models::HttpConfig;
    use crate::utils::http::create_client;

    fn client() -> Client {
        create_client(&HttpConfig::default()).unwrap()
    }

    fn double(_: &Client, n: &u32) -> Result<u32> {
        if *n == 13 {
            return Err(AppError::validation("unlucky"));
        }
        Ok(n * 2)
    }

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn counted(_: &Client, n: &u32) -> Result<u32> {
        CALLS.fetch_add(1, Ordering::SeqCst);
        Ok(*n)
    }

    #[test]
    fn test_pause_disabled_by_default() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            pause_for(&ScrapeConfig::default(), &mut rng).unwrap(),
            Duration::ZERO
        );
    }

    #[test]
    fn test_pause_bounded_by_delay_times_jitter() {
        let config = ScrapeConfig {
            delay_ms: 1000,
            jitter: 0.5,
        };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(pause_for(&config, &mut rng).unwrap() < Duration::from_millis(500));
        }
    }

    #[test]
    fn test_bad_jitter_is_config_error() {
        let mut rng = StdRng::seed_from_u64(7);
        for jitter in [f64::NAN, f64::INFINITY, -1.0, f64::MAX] {
            let config = ScrapeConfig {
                delay_ms: 1000,
                jitter,
            };
            assert!(matches!(
                pause_for(&config, &mut rng),
                Err(AppError::Config(_))
            ));
        }
    }

    #[test]
    fn test_scrape_all_rejects_nan_jitter() {
        let client = client();
        let config = ScrapeConfig {
            delay_ms: 1000,
            jitter: f64::NAN,
        };
        let result = scrape_all(&client, &[1, 2], &config, double);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_scrape_all_in_order() {
        let client = client();
        let out = scrape_all(&client, &[1, 2, 3], &ScrapeConfig::default(), double).unwrap();
        assert_eq!(out, vec![2, 4, 6]);
    }

    #[test]
    fn test_scrape_all_stops_on_error() {
        let client = client();
        let result = scrape_all(&client, &[1, 13, 3], &ScrapeConfig::default(), double);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_lazy_fetches_on_demand_and_restarts() {
        let client = client();
        let lazy = LazyListings::new(&client, vec![5, 6, 7], counted);
        let before = CALLS.load(Ordering::SeqCst);

        assert_eq!(lazy.len(), 3);
        assert_eq!(CALLS.load(Ordering::SeqCst), before);

        let mut iter = lazy.iter();
        assert_eq!(iter.size_hint(), (3, Some(3)));
        assert_eq!(iter.next().unwrap().unwrap(), 5);
        assert_eq!(CALLS.load(Ordering::SeqCst), before + 1);

        let all: Vec<u32> = lazy.iter().collect::<Result<_>>().unwrap();
        assert_eq!(all, vec![5, 6, 7]);
        assert_eq!(CALLS.load(Ordering::SeqCst), before + 4);
    }

    #[test]
    fn test_lazy_get_and_slice() {
        let client = client();
        let lazy = LazyListings::new(&client, vec![1, 13, 3], double);

        assert_eq!(lazy.get(0).unwrap().unwrap(), 2);
        assert!(lazy.get(1).unwrap().is_err());
        assert!(lazy.get(3).is_none());
        assert_eq!(lazy.slice(2..3).unwrap(), vec![6]);
        assert!(lazy.slice(0..2).is_err());
        assert!(matches!(lazy.slice(1..9), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn test_lazy_yields_errors_per_item() {
        let client = client();
        let lazy = LazyListings::new(&client, vec![1, 13, 3], double);
        let outcomes: Vec<bool> = (&lazy).into_iter().map(|r| r.is_ok()).collect();
        assert_eq!(outcomes, vec![true, false, true]);
    }
}
