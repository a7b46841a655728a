//! Async principal option lookup for the combined picker
//!
//! Lookups are delegated to a [`PrincipalSource`] collaborator. Each picker
//! instance supplies a uniqueness key; a newer search under the same key
//! supersedes any in-flight older one so stale results can never overwrite
//! fresher ones. Independent keys never interfere.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::error::Result;
use crate::permission::model::EVERYONE_LABEL;
use crate::permission::reconciler::{SelectionOption, TokenType};

/// Source of principal options (users, groups, roles) for a search term
///
/// Implemented by the out-of-scope data layer; the engine only requires the
/// lookup contract.
#[async_trait]
pub trait PrincipalSource: Send + Sync {
    async fn lookup(&self, term: &str) -> Result<Vec<SelectionOption>>;
}

/// Outcome of one search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Options for the freshest search under this key
    Options(Vec<SelectionOption>),
    /// A newer search for the same key started while this one was in flight;
    /// the result was discarded
    Superseded,
}

/// Search session manager with per-key supersession
pub struct PrincipalSearch {
    /// Latest search generation per uniqueness key
    generations: DashMap<String, u64>,
    /// Label whose prefix surfaces the "Everyone" pseudo-option
    everyone_label: String,
}

impl Default for PrincipalSearch {
    fn default() -> Self {
        Self::new(EVERYONE_LABEL)
    }
}

impl PrincipalSearch {
    pub fn new<S: Into<String>>(everyone_label: S) -> Self {
        Self {
            generations: DashMap::new(),
            everyone_label: everyone_label.into(),
        }
    }

    /// Run one search under the given uniqueness key
    ///
    /// An empty or whitespace-only term short-circuits to an empty option
    /// list without calling the source. A term that equals, or is a
    /// case-sensitive prefix of, the everyone label puts the pseudo-option at
    /// the head of the results even when the source matched nothing.
    pub async fn search(
        &self,
        key: &str,
        term: &str,
        source: &dyn PrincipalSource,
    ) -> Result<SearchOutcome> {
        let generation = self.bump(key);

        let term = term.trim();
        if term.is_empty() {
            // Guards against "search everything" queries
            return Ok(SearchOutcome::Options(Vec::new()));
        }

        let mut options = source.lookup(term).await?;

        if self.current(key) != generation {
            debug!(key, term, "discarding superseded search result");
            return Ok(SearchOutcome::Superseded);
        }

        if self.everyone_label.starts_with(term) {
            options.insert(
                0,
                SelectionOption::from_token(&self.everyone_label, TokenType::Others),
            );
        }
        Ok(SearchOutcome::Options(options))
    }

    fn bump(&self, key: &str) -> u64 {
        let mut entry = self.generations.entry(key.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    fn current(&self, key: &str) -> u64 {
        self.generations.get(key).map(|entry| *entry).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StaticSource {
        options: Vec<SelectionOption>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl StaticSource {
        fn new(labels: &[&str]) -> Self {
            Self {
                options: labels
                    .iter()
                    .map(|label| SelectionOption::from_token(label, TokenType::Users))
                    .collect(),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl PrincipalSource for StaticSource {
        async fn lookup(&self, _term: &str) -> Result<Vec<SelectionOption>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.options.clone())
        }
    }

    #[tokio::test]
    async fn test_empty_term_short_circuits() {
        let search = PrincipalSearch::default();
        let source = StaticSource::new(&["alice"]);
        let outcome = search.search("picker-1", "   ", &source).await.unwrap();
        assert_eq!(outcome, SearchOutcome::Options(Vec::new()));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_everyone_prefix_heads_results() {
        let search = PrincipalSearch::default();
        let source = StaticSource::new(&["evan"]);
        let outcome = search.search("picker-1", "Ev", &source).await.unwrap();
        match outcome {
            SearchOutcome::Options(options) => {
                assert_eq!(options[0].label, "Everyone");
                assert_eq!(options[0].value, "others##__##Everyone");
                assert_eq!(options.len(), 2);
            }
            SearchOutcome::Superseded => panic!("unexpected supersession"),
        }
    }

    #[tokio::test]
    async fn test_everyone_prefix_is_case_sensitive() {
        let search = PrincipalSearch::default();
        let source = StaticSource::new(&[]);
        let outcome = search.search("picker-1", "ev", &source).await.unwrap();
        assert_eq!(outcome, SearchOutcome::Options(Vec::new()));
    }

    #[tokio::test]
    async fn test_newer_search_supersedes_in_flight() {
        let search = std::sync::Arc::new(PrincipalSearch::default());
        let slow = StaticSource::new(&["stale"]).with_delay(Duration::from_millis(50));
        let fast = StaticSource::new(&["fresh"]);

        let slow_task = {
            let search = search.clone();
            tokio::spawn(async move { search.search("picker-1", "sta", &slow).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let fresh = search.search("picker-1", "fre", &fast).await.unwrap();
        let stale = slow_task.await.unwrap().unwrap();

        assert_eq!(stale, SearchOutcome::Superseded);
        match fresh {
            SearchOutcome::Options(options) => assert_eq!(options[0].label, "fresh"),
            SearchOutcome::Superseded => panic!("fresh search must win"),
        }
    }

    #[tokio::test]
    async fn test_independent_keys_do_not_cancel_each_other() {
        let search = PrincipalSearch::default();
        let source = StaticSource::new(&["alice"]);
        let first = search.search("picker-1", "al", &source).await.unwrap();
        let second = search.search("picker-2", "al", &source).await.unwrap();
        assert!(matches!(first, SearchOutcome::Options(_)));
        assert!(matches!(second, SearchOutcome::Options(_)));
    }
}
