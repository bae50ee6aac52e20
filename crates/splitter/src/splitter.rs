//! TrafficSplitter - weighted random split with fault-isolated dispatch
//!
//! One uniform sample in [0, 100) is consumed per record, in input order,
//! before any dispatch starts; routing decisions are therefore reproducible
//! with an injected random source even though acceptance calls run
//! concurrently. Outcomes are collected by original index, so the output
//! sequence always matches the input batch 1:1 and in order.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use contracts::{
    ContractError, DispatchOutcome, EventRecord, Invoker, RandomSource, Route, RoutingConfig,
    SplitBlueprint, TargetId,
};

use crate::error::SplitterError;
use crate::invokers::{create_invoker, AnyInvoker};
use crate::metrics::{MetricsSnapshot, RouteMetrics};
use crate::random::SystemRandom;

/// Splitter dispatch configuration
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Maximum concurrent in-flight acceptance calls
    pub max_in_flight: usize,
    /// Per-record acceptance timeout
    pub accept_timeout: Duration,
    /// Overall batch deadline (None = no deadline)
    pub batch_deadline: Option<Duration>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 8,
            accept_timeout: Duration::from_millis(3000),
            batch_deadline: None,
        }
    }
}

impl SplitterConfig {
    /// Build from a blueprint's dispatch section
    pub fn from_blueprint(blueprint: &SplitBlueprint) -> Self {
        Self {
            max_in_flight: blueprint.dispatch.max_in_flight.max(1),
            accept_timeout: Duration::from_millis(blueprint.dispatch.accept_timeout_ms),
            batch_deadline: blueprint.dispatch.batch_deadline_ms.map(Duration::from_millis),
        }
    }
}

/// The traffic splitter: routes each record of a batch to the stable or
/// canary target and dispatches it fire-and-forget.
pub struct TrafficSplitter<I> {
    routing: RoutingConfig,
    config: SplitterConfig,
    invoker: Arc<I>,
    random: Mutex<Box<dyn RandomSource + Send>>,
    metrics: Arc<RouteMetrics>,
}

impl<I> TrafficSplitter<I>
where
    I: Invoker + Send + Sync + 'static,
{
    /// Create a splitter with the production random source
    pub fn new(routing: RoutingConfig, invoker: I, config: SplitterConfig) -> Self {
        Self::with_random_source(routing, invoker, config, Box::new(SystemRandom::new()))
    }

    /// Create a splitter with an injected random source
    pub fn with_random_source(
        routing: RoutingConfig,
        invoker: I,
        config: SplitterConfig,
        random: Box<dyn RandomSource + Send>,
    ) -> Self {
        Self {
            routing,
            config,
            invoker: Arc::new(invoker),
            random: Mutex::new(random),
            metrics: Arc::new(RouteMetrics::new()),
        }
    }

    /// The routing configuration in use
    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    /// Snapshot of routing/dispatch counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Route a batch, returning one outcome per record in input order
    pub async fn route(&self, batch: &[EventRecord]) -> Vec<DispatchOutcome> {
        let (_guard, shutdown) = watch::channel(false);
        self.route_with_shutdown(batch, shutdown).await
    }

    /// Route a batch with an external shutdown signal
    ///
    /// When the signal flips to `true` (or the batch deadline elapses),
    /// records not yet dispatched get `Cancelled` outcomes; records whose
    /// acceptance already completed keep their outcome.
    #[instrument(
        name = "splitter_route",
        skip(self, batch, shutdown),
        fields(batch_size = batch.len(), canary_percent = self.routing.canary_percent())
    )]
    pub async fn route_with_shutdown(
        &self,
        batch: &[EventRecord],
        shutdown: watch::Receiver<bool>,
    ) -> Vec<DispatchOutcome> {
        if batch.is_empty() {
            return Vec::new();
        }

        let routes = self.decide_routes(batch.len());
        let deadline = self.config.batch_deadline.map(|d| Instant::now() + d);
        let semaphore = Arc::new(Semaphore::new(self.config.max_in_flight));

        let mut tasks = JoinSet::new();
        for (index, record) in batch.iter().enumerate() {
            let route = routes[index];
            tasks.spawn(dispatch_one(DispatchContext {
                invoker: Arc::clone(&self.invoker),
                semaphore: Arc::clone(&semaphore),
                metrics: Arc::clone(&self.metrics),
                index,
                route,
                target: self.routing.target_for(route).clone(),
                record: record.clone(),
                accept_timeout: self.config.accept_timeout,
                deadline,
                shutdown: shutdown.clone(),
            }));
        }

        let mut slots: Vec<Option<DispatchOutcome>> = vec![None; batch.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    let index = outcome.index;
                    slots[index] = Some(outcome);
                }
                Err(e) => warn!(error = %e, "Dispatch task failed to join"),
            }
        }

        let outcomes: Vec<DispatchOutcome> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    let route = routes[index];
                    DispatchOutcome::failed(
                        index,
                        route,
                        self.routing.target_for(route).clone(),
                        "dispatch task aborted",
                    )
                })
            })
            .collect();

        let snapshot = self.metrics.snapshot();
        info!(
            batch_size = batch.len(),
            accepted = outcomes.iter().filter(|o| o.is_accepted()).count(),
            failed = outcomes.iter().filter(|o| o.is_failed()).count(),
            cancelled = outcomes.iter().filter(|o| o.is_cancelled()).count(),
            canary_fraction = snapshot.canary_fraction(),
            "Batch routed"
        );

        outcomes
    }

    /// Consume one sample per record, in input order
    fn decide_routes(&self, count: usize) -> Vec<Route> {
        let mut random = self
            .random
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        (0..count)
            .map(|_| {
                let sample = random.next_percent();
                let route = self.routing.pick(sample);
                match route {
                    Route::Stable => self.metrics.inc_stable_routed(),
                    Route::Canary => self.metrics.inc_canary_routed(),
                }
                debug!(sample, %route, "Route decided");
                route
            })
            .collect()
    }
}

/// Everything one dispatch task needs, moved into the task
struct DispatchContext<I> {
    invoker: Arc<I>,
    semaphore: Arc<Semaphore>,
    metrics: Arc<RouteMetrics>,
    index: usize,
    route: Route,
    target: TargetId,
    record: EventRecord,
    accept_timeout: Duration,
    deadline: Option<Instant>,
    shutdown: watch::Receiver<bool>,
}

/// Dispatch a single record: wait for a worker slot, then request
/// acceptance. Cancellation and the batch deadline win over both waits.
async fn dispatch_one<I>(mut ctx: DispatchContext<I>) -> DispatchOutcome
where
    I: Invoker + Send + Sync + 'static,
{
    let _permit = tokio::select! {
        biased;
        _ = wait_for_shutdown(&mut ctx.shutdown) => {
            ctx.metrics.inc_cancelled();
            return DispatchOutcome::cancelled(ctx.index, ctx.route, ctx.target.clone());
        }
        _ = deadline_elapsed(ctx.deadline) => {
            ctx.metrics.inc_cancelled();
            return DispatchOutcome::cancelled(ctx.index, ctx.route, ctx.target.clone());
        }
        permit = Arc::clone(&ctx.semaphore).acquire_owned() => match permit {
            Ok(permit) => permit,
            Err(_) => {
                ctx.metrics.inc_cancelled();
                return DispatchOutcome::cancelled(ctx.index, ctx.route, ctx.target.clone());
            }
        },
    };

    let accept = tokio::time::timeout(
        ctx.accept_timeout,
        ctx.invoker.accept(&ctx.target, &ctx.record),
    );

    tokio::select! {
        biased;
        _ = wait_for_shutdown(&mut ctx.shutdown) => {
            ctx.metrics.inc_cancelled();
            DispatchOutcome::cancelled(ctx.index, ctx.route, ctx.target.clone())
        }
        _ = deadline_elapsed(ctx.deadline) => {
            ctx.metrics.inc_cancelled();
            DispatchOutcome::cancelled(ctx.index, ctx.route, ctx.target.clone())
        }
        result = accept => match result {
            Ok(Ok(acceptance)) => {
                ctx.metrics.inc_accepted();
                debug!(
                    index = ctx.index,
                    target = %ctx.target,
                    status_code = acceptance.status_code,
                    "Dispatch accepted"
                );
                DispatchOutcome::accepted(ctx.index, ctx.route, ctx.target.clone(), acceptance)
            }
            Ok(Err(error)) => {
                ctx.metrics.inc_failed();
                warn!(
                    index = ctx.index,
                    target = %ctx.target,
                    error = %error,
                    "Dispatch failed"
                );
                DispatchOutcome::failed(ctx.index, ctx.route, ctx.target.clone(), error.to_string())
            }
            Err(_) => {
                let error = ContractError::dispatch_timeout(
                    ctx.target.as_str(),
                    ctx.accept_timeout.as_millis() as u64,
                );
                ctx.metrics.inc_failed();
                warn!(index = ctx.index, target = %ctx.target, error = %error, "Dispatch timed out");
                DispatchOutcome::failed(ctx.index, ctx.route, ctx.target.clone(), error.to_string())
            }
        }
    }
}

/// Resolve when the shutdown signal flips to true; pend forever otherwise
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    if *shutdown.borrow() {
        return;
    }
    while shutdown.changed().await.is_ok() {
        if *shutdown.borrow() {
            return;
        }
    }
    // Sender dropped without signalling: no shutdown will ever arrive
    std::future::pending::<()>().await
}

/// Resolve at the batch deadline; pend forever when none is set
async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Convenience function to create a splitter from a blueprint
#[instrument(name = "splitter_create", skip(blueprint))]
pub async fn create_splitter(
    blueprint: &SplitBlueprint,
) -> Result<TrafficSplitter<AnyInvoker>, SplitterError> {
    let routing = blueprint.routing_config()?;
    let invoker = create_invoker(&blueprint.invoker).await?;
    Ok(TrafficSplitter::new(
        routing,
        invoker,
        SplitterConfig::from_blueprint(blueprint),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invokers::MockInvoker;
    use crate::random::{FixedSequence, SeededRandom};
    use serde_json::json;

    fn routing(percent: f64) -> RoutingConfig {
        RoutingConfig::new(TargetId::new("stable"), TargetId::new("canary"), percent).unwrap()
    }

    fn batch(n: usize) -> Vec<EventRecord> {
        (0..n)
            .map(|i| EventRecord::new().with_field("id", json!(i)))
            .collect()
    }

    fn serial_config() -> SplitterConfig {
        SplitterConfig {
            max_in_flight: 1,
            ..SplitterConfig::default()
        }
    }

    #[tokio::test]
    async fn test_deterministic_split_with_boundary() {
        // Sample == percent must route stable (strict <)
        let splitter = TrafficSplitter::with_random_source(
            routing(40.0),
            MockInvoker::new("mock"),
            serial_config(),
            Box::new(FixedSequence::new([10.0, 50.0, 39.0, 40.0, 99.0])),
        );

        let outcomes = splitter.route(&batch(5)).await;

        let routes: Vec<Route> = outcomes.iter().map(|o| o.route).collect();
        assert_eq!(
            routes,
            vec![
                Route::Canary,
                Route::Stable,
                Route::Canary,
                Route::Stable,
                Route::Stable
            ]
        );
        assert!(outcomes.iter().all(|o| o.is_accepted()));

        let targets: Vec<&str> = outcomes.iter().map(|o| o.target.as_str()).collect();
        assert_eq!(targets, vec!["canary", "stable", "canary", "stable", "stable"]);
    }

    #[tokio::test]
    async fn test_failure_isolation() {
        // A failing record must not affect the rest of the batch
        let splitter = TrafficSplitter::with_random_source(
            routing(0.0),
            MockInvoker::new("mock").fail_on_calls([2]),
            serial_config(),
            Box::new(FixedSequence::new([50.0])),
        );

        let outcomes = splitter.route(&batch(3)).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_accepted());
        assert!(outcomes[1].is_failed());
        assert!(outcomes[2].is_accepted());
        assert!(outcomes.iter().all(|o| o.route == Route::Stable));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let splitter = TrafficSplitter::new(
            routing(50.0),
            MockInvoker::new("mock"),
            SplitterConfig::default(),
        );
        let outcomes = splitter.route(&[]).await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_outcomes_in_input_order_under_concurrency() {
        let splitter = TrafficSplitter::with_random_source(
            routing(50.0),
            MockInvoker::new("mock").with_delay(Duration::from_millis(1)),
            SplitterConfig {
                max_in_flight: 8,
                ..SplitterConfig::default()
            },
            Box::new(SeededRandom::new(7)),
        );

        let outcomes = splitter.route(&batch(32)).await;

        assert_eq!(outcomes.len(), 32);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.index, i);
            assert!(outcome.is_accepted());
        }
    }

    #[tokio::test]
    async fn test_percent_extremes() {
        let splitter = TrafficSplitter::new(
            routing(0.0),
            MockInvoker::new("mock"),
            SplitterConfig::default(),
        );
        let outcomes = splitter.route(&batch(100)).await;
        assert!(outcomes.iter().all(|o| o.route == Route::Stable));
        assert_eq!(splitter.metrics().canary_routed, 0);

        let splitter = TrafficSplitter::new(
            routing(100.0),
            MockInvoker::new("mock"),
            SplitterConfig::default(),
        );
        let outcomes = splitter.route(&batch(100)).await;
        assert!(outcomes.iter().all(|o| o.route == Route::Canary));
        assert_eq!(splitter.metrics().stable_routed, 0);
    }

    #[tokio::test]
    async fn test_pre_fired_shutdown_cancels_everything() {
        let invoker = MockInvoker::new("mock");
        let splitter = TrafficSplitter::with_random_source(
            routing(50.0),
            invoker,
            SplitterConfig::default(),
            Box::new(SeededRandom::new(1)),
        );

        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let outcomes = splitter.route_with_shutdown(&batch(4), rx).await;

        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.iter().all(|o| o.is_cancelled()));
        assert_eq!(splitter.metrics().cancelled, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_deadline_cancels_remainder() {
        // Serial mock taking 50ms per call against a 120ms deadline:
        // two records complete, the rest are cancelled, none dropped.
        let splitter = TrafficSplitter::with_random_source(
            routing(0.0),
            MockInvoker::new("mock").with_delay(Duration::from_millis(50)),
            SplitterConfig {
                max_in_flight: 1,
                accept_timeout: Duration::from_secs(10),
                batch_deadline: Some(Duration::from_millis(120)),
            },
            Box::new(FixedSequence::new([50.0])),
        );

        let outcomes = splitter.route(&batch(5)).await;

        assert_eq!(outcomes.len(), 5);
        let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
        let cancelled = outcomes.iter().filter(|o| o.is_cancelled()).count();
        assert_eq!(accepted, 2);
        assert_eq!(cancelled, 3);
        assert!(outcomes.iter().all(|o| !o.is_failed()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_accept_timeout_is_a_dispatch_failure() {
        let splitter = TrafficSplitter::with_random_source(
            routing(0.0),
            MockInvoker::new("mock").with_delay(Duration::from_millis(100)),
            SplitterConfig {
                max_in_flight: 1,
                accept_timeout: Duration::from_millis(10),
                batch_deadline: None,
            },
            Box::new(FixedSequence::new([50.0])),
        );

        let outcomes = splitter.route(&batch(1)).await;

        assert!(outcomes[0].is_failed());
        match &outcomes[0].status {
            contracts::OutcomeStatus::Failed { message } => {
                assert!(message.contains("timed out"), "got: {message}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_splitter_from_blueprint() {
        let blueprint = SplitBlueprint {
            version: Default::default(),
            routing: contracts::RoutingSection {
                stable_target: "stable".to_string(),
                canary_target: "canary".to_string(),
                canary_percent: 10.0,
            },
            dispatch: contracts::DispatchSection::default(),
            invoker: contracts::InvokerConfig::default(),
        };

        let splitter = create_splitter(&blueprint).await.unwrap();
        let outcomes = splitter.route(&batch(2)).await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.is_accepted()));
    }

    #[tokio::test]
    async fn test_create_splitter_rejects_bad_percent() {
        let blueprint = SplitBlueprint {
            version: Default::default(),
            routing: contracts::RoutingSection {
                stable_target: "stable".to_string(),
                canary_target: "canary".to_string(),
                canary_percent: -1.0,
            },
            dispatch: contracts::DispatchSection::default(),
            invoker: contracts::InvokerConfig::default(),
        };

        assert!(create_splitter(&blueprint).await.is_err());
    }
}
