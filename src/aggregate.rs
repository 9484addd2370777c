use std::{fmt, sync::Arc};

use bytes::Bytes;
use clap::ValueEnum;
use futures::{stream::FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::{spawn, task::JoinHandle, time::Instant};

use crate::{
    config::{Config, FailurePolicy},
    error::{FetchError, RunError},
    fetch::{Fetcher, HttpFetcher},
    report::{Line, Report},
    targets::{list_targets, Target},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Fetch one target after another on the calling task.
    Sequential,
    /// Spawn one task per target and wait for all of them.
    Concurrent,
    /// Spawn one task per target but wait for each before the next.
    Offloaded,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sequential => "sequential",
            Self::Concurrent => "concurrent",
            Self::Offloaded => "offloaded",
        })
    }
}

pub type Request = JoinHandle<Result<Bytes, FetchError>>;

pub fn spawn_fetch<F>(target: Target, fetcher: Arc<F>) -> Request
where
    F: Fetcher + 'static,
{
    spawn(async move { fetcher.fetch(&target).await })
}

/// Flatten a panicked or aborted task into a [`FetchError`].
pub async fn double_unwrap<T>(handle: JoinHandle<Result<T, FetchError>>) -> Result<T, FetchError> {
    handle.await?
}

#[derive(Debug)]
pub struct Aggregator<F> {
    fetcher: Arc<F>,
    policy: FailurePolicy,
}

impl Aggregator<HttpFetcher> {
    pub fn http(config: Config) -> Self {
        let policy = config.policy;
        Self::new(HttpFetcher::new(config)).policy(policy)
    }
}

impl<F> Aggregator<F>
where
    F: Fetcher + 'static,
{
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            policy: FailurePolicy::default(),
        }
    }

    pub fn policy(self, policy: FailurePolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch every target in `mode` and report the results in input order.
    ///
    /// Only fails under [`FailurePolicy::FailFast`].
    pub async fn run(&self, mode: Mode, targets: &[Target]) -> Result<Report, RunError> {
        info!("{mode}: fetching {} targets.", targets.len());
        let time = Instant::now();
        let lines = match mode {
            Mode::Sequential => self.sequential(targets).await?,
            Mode::Concurrent => self.concurrent(targets).await?,
            Mode::Offloaded => self.offloaded(targets).await?,
        };
        let report = Report {
            mode,
            lines,
            elapsed: time.elapsed(),
        };
        info!(
            "{mode}: {} lines, {} failed, {}ms.",
            report.len(),
            report.failures(),
            report.elapsed_millis()
        );
        Ok(report)
    }

    async fn sequential(&self, targets: &[Target]) -> Result<Vec<Line>, RunError> {
        let mut lines = Vec::with_capacity(targets.len());
        for (index, target) in targets.iter().enumerate() {
            debug!("{index}: fetching {target}.");
            let outcome = self.fetcher.fetch(target).await;
            lines.push(self.line(index, target, outcome)?);
        }
        Ok(lines)
    }

    async fn offloaded(&self, targets: &[Target]) -> Result<Vec<Line>, RunError> {
        let mut lines = Vec::with_capacity(targets.len());
        for (index, target) in targets.iter().enumerate() {
            debug!("{index}: spawning {target}.");
            let request = spawn_fetch(target.clone(), Arc::clone(&self.fetcher));
            let outcome = double_unwrap(request).await;
            lines.push(self.line(index, target, outcome)?);
        }
        Ok(lines)
    }

    async fn concurrent(&self, targets: &[Target]) -> Result<Vec<Line>, RunError> {
        // Every task is spawned here, before any of them is awaited.
        let mut requests: FuturesUnordered<_> = targets
            .iter()
            .enumerate()
            .map(|(index, target)| {
                debug!("{index}: spawning {target}.");
                let request = spawn_fetch(target.clone(), Arc::clone(&self.fetcher));
                async move { (index, double_unwrap(request).await) }
            })
            .collect();

        let mut slots: Vec<Option<Result<Line, RunError>>> =
            (0..targets.len()).map(|_| None).collect();
        while let Some((index, outcome)) = requests.next().await {
            debug!("{index}: done.");
            slots[index] = Some(self.line(index, &targets[index], outcome));
        }
        // Lowest failed index wins under fail-fast.
        slots.into_iter().flatten().collect()
    }

    fn line(
        &self,
        index: usize,
        target: &Target,
        outcome: Result<Bytes, FetchError>,
    ) -> Result<Line, RunError> {
        if let Err(error) = &outcome {
            warn!("{index}: {target} failed: {error}.");
            if self.policy == FailurePolicy::FailFast {
                return Err(RunError {
                    index,
                    target: target.clone(),
                    source: error.clone(),
                });
            }
        }
        Ok(Line::new(target.clone(), outcome))
    }
}

/// Fetch the default targets one by one with default settings.
pub async fn run_sequential() -> Result<Report, RunError> {
    Aggregator::http(Config::default())
        .run(Mode::Sequential, &list_targets())
        .await
}

/// Fetch the default targets all at once with default settings.
pub async fn run_concurrent() -> Result<Report, RunError> {
    Aggregator::http(Config::default())
        .run(Mode::Concurrent, &list_targets())
        .await
}
