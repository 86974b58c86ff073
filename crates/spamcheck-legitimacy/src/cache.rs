//! Process-wide memoization of legitimacy reports
//!
//! Entries are keyed by the exact `(company name, api key)` pair as passed in,
//! never evicted, and include failures: a failed lookup is returned again for
//! the same pair until the process restarts. A blank company name or key is
//! rejected up front and never becomes an entry.

use crate::query::{validate_inputs, LegitimacyQuery, LegitimacyReport};
use spamcheck_core::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    company_name: String,
    api_key: String,
}

type Slot = Arc<OnceCell<LegitimacyReport>>;

/// Memoizing wrapper around [`LegitimacyQuery`]
pub struct ResultCache {
    query: LegitimacyQuery,
    entries: Mutex<HashMap<CacheKey, Slot>>,
}

impl ResultCache {
    pub fn new(query: LegitimacyQuery) -> Self {
        Self {
            query,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn query(&self) -> &LegitimacyQuery {
        &self.query
    }

    /// Return the cached report for this pair, querying at most once.
    ///
    /// Concurrent callers with the same pair wait on the same in-flight call.
    /// Only a blank input is an `Err`; external failures come back as a cached
    /// [`LegitimacyReport::Failed`].
    pub async fn check(&self, company_name: &str, api_key: &str) -> Result<LegitimacyReport> {
        validate_inputs(company_name, api_key)?;

        let key = CacheKey {
            company_name: company_name.to_string(),
            api_key: api_key.to_string(),
        };

        let slot = {
            let mut entries = self.entries.lock();
            entries.entry(key).or_default().clone()
        };

        if let Some(report) = slot.get() {
            metrics::counter!("spamcheck_legitimacy_cache_hits_total").increment(1);
            tracing::debug!(company = company_name, "Legitimacy cache hit");
            return Ok(report.clone());
        }

        let report = slot
            .get_or_init(|| async {
                let report =
                    LegitimacyReport::from(self.query.query(company_name, api_key).await);

                let outcome = if report.is_failure() { "error" } else { "success" };
                metrics::counter!("spamcheck_legitimacy_requests_total", "outcome" => outcome)
                    .increment(1);
                if report.is_failure() {
                    tracing::warn!(company = company_name, "Legitimacy check failed: {}", report);
                }

                report
            })
            .await;

        Ok(report.clone())
    }

    /// Number of distinct pairs seen
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
