//! Scrape orchestration across targets and their same-site scripts.
//!
//! Per target: cache check, page fetch, script discovery plus page scan,
//! registrable-domain resolution, bounded script fan-out, merge, cache store.
//! Targets run one after another; a failing target is logged and skipped.
//! The aggregate of all targets is deduplicated once at the end.

use std::sync::Arc;
use std::time::Duration;

use harvest_core::{AddressInfo, AppConfig, Error, FixedSizeCache, SourceKind, dedup};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::extract::{extract_addresses, extract_script_srcs};
use crate::fetch::{DomainFilter, FetchClient, FetchConfig, Fetcher, ScriptGate, resolve_reference};

/// The two caches shared across scrape calls.
#[derive(Clone)]
pub struct ScrapeCaches {
    /// Target URL to its merged findings.
    pub targets: Arc<FixedSizeCache<Vec<AddressInfo>>>,
    /// Script URL to its decoded body.
    pub scripts: Arc<FixedSizeCache<Arc<str>>>,
}

impl ScrapeCaches {
    /// Fresh caches, both bounded to `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self { targets: Arc::new(FixedSizeCache::new(capacity)), scripts: Arc::new(FixedSizeCache::new(capacity)) }
    }
}

/// Scrape orchestrator.
///
/// Cheap to clone; clones share the fetcher and both caches.
#[derive(Clone)]
pub struct Scraper {
    fetcher: Arc<dyn Fetcher>,
    filter: Arc<DomainFilter>,
    caches: ScrapeCaches,
    max_concurrency: usize,
}

impl Scraper {
    pub fn new(fetcher: Arc<dyn Fetcher>, filter: DomainFilter, caches: ScrapeCaches, max_concurrency: usize) -> Self {
        Self { fetcher, filter: Arc::new(filter), caches, max_concurrency: max_concurrency.max(1) }
    }

    /// Build a scraper with an HTTP fetcher and fresh caches from loaded configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let fetcher = FetchClient::new(FetchConfig::from(config))?;
        Ok(Self::new(
            Arc::new(fetcher),
            DomainFilter::new(config.blacklist_hosts.iter().cloned()),
            ScrapeCaches::new(config.cache_capacity),
            config.max_concurrency,
        ))
    }

    pub fn caches(&self) -> &ScrapeCaches {
        &self.caches
    }

    /// Scrape every target and return the deduplicated findings.
    ///
    /// Per-target failures are logged and dropped; an empty result is not an
    /// error.
    pub async fn scrape(&self, targets: &[String]) -> Result<Vec<AddressInfo>, Error> {
        let mut all = Vec::new();
        let mut failed = 0usize;

        for target in targets {
            match self.scrape_target(target).await {
                Ok(infos) => all.extend(infos),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(url = %target, error = %e, "error scraping target");
                }
            }
        }

        let results = dedup(all);
        tracing::info!(targets = targets.len(), failed, findings = results.len(), "scrape finished");

        Ok(results)
    }

    /// [`Scraper::scrape`] bounded by an overall deadline.
    pub async fn scrape_with_deadline(&self, targets: &[String], deadline: Duration) -> Result<Vec<AddressInfo>, Error> {
        tokio::time::timeout(deadline, self.scrape(targets))
            .await
            .map_err(|_| Error::Timeout(format!("request timed out after {}ms", deadline.as_millis())))?
    }

    /// Findings for a single target, from cache when present.
    pub async fn scrape_target(&self, target: &str) -> Result<Vec<AddressInfo>, Error> {
        if let Some(cached) = self.caches.targets.get(target).await {
            tracing::debug!("target cache hit for {}", target);
            return Ok(cached);
        }

        let body = self.fetcher.fetch(target).await?;
        let html = String::from_utf8_lossy(&body);

        let mut infos = extract_addresses(&html, target, SourceKind::Html, target);
        let scripts = extract_script_srcs(&html);

        let target_domain = self.filter.target_domain(target)?;

        infos.extend(self.process_scripts(target, &target_domain, scripts).await?);

        self.caches.targets.set(target, infos.clone()).await;

        Ok(infos)
    }

    /// Fan out over a target's scripts with at most `max_concurrency` in flight.
    ///
    /// Every script is attempted; a failing script only drops its own findings.
    async fn process_scripts(
        &self, target: &str, target_domain: &str, scripts: Vec<String>,
    ) -> Result<Vec<AddressInfo>, Error> {
        if scripts.is_empty() {
            return Ok(Vec::new());
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let target: Arc<str> = Arc::from(target);
        let target_domain: Arc<str> = Arc::from(target_domain);
        let mut join_set = JoinSet::new();

        for script in scripts {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| Error::Internal(format!("script semaphore closed: {}", e)))?;
            let this = self.clone();
            let target = target.clone();
            let target_domain = target_domain.clone();

            join_set.spawn(async move {
                let _permit = permit;
                let result = this.process_script(&target, &target_domain, &script).await;
                (script, result)
            });
        }

        let mut collected = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((_, Ok(infos))) => collected.extend(infos),
                Ok((script, Err(e))) => {
                    tracing::warn!(script = %script, error = %e, "error processing script");
                }
                Err(e) => {
                    tracing::warn!(url = %target, error = %e, "script task aborted");
                }
            }
        }

        Ok(collected)
    }

    async fn process_script(&self, target: &str, target_domain: &str, script: &str) -> Result<Vec<AddressInfo>, Error> {
        let script_url = resolve_reference(target, script)?;

        match self.filter.check_script(&script_url, target_domain)? {
            ScriptGate::Follow => {}
            ScriptGate::Blacklisted => {
                tracing::debug!("skipping blacklisted script {}", script_url);
                return Ok(Vec::new());
            }
            ScriptGate::OffSite { script_domain } => {
                tracing::debug!("skipping off-site script {} ({} != {})", script_url, script_domain, target_domain);
                return Ok(Vec::new());
            }
        }

        let content = self.script_content(script_url.as_str()).await?;

        Ok(extract_addresses(&content, script_url.as_str(), SourceKind::Script, target))
    }

    async fn script_content(&self, script_url: &str) -> Result<Arc<str>, Error> {
        if let Some(cached) = self.caches.scripts.get(script_url).await {
            tracing::debug!("script cache hit for {}", script_url);
            return Ok(cached);
        }

        let body = self.fetcher.fetch(script_url).await?;
        let content: Arc<str> = Arc::from(String::from_utf8_lossy(&body).as_ref());
        self.caches.scripts.set(script_url, content.clone()).await;

        Ok(content)
    }
}
