//! # Integration Tests
//!
//! Integration and end-to-end tests.
//!
//! Responsibilities:
//! - Contract snapshot tests
//! - Config-to-splitter e2e tests (no real downstream targets)
//! - Statistical routing baselines

#[cfg(test)]
mod contract_tests {
    use contracts::{DispatchOutcome, EventRecord, Route, RoutingConfig, TargetId};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_outcome_json_shape_is_flat() {
        let outcome = DispatchOutcome::accepted(
            3,
            Route::Canary,
            TargetId::new("canary-fn"),
            contracts::Acceptance::new(202),
        );

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["index"], 3);
        assert_eq!(json["route"], "canary");
        assert_eq!(json["target"], "canary-fn");
        assert_eq!(json["status"], "accepted");
        assert_eq!(json["status_code"], 202);
    }

    #[test]
    fn test_routing_boundary_is_strict() {
        let routing = RoutingConfig::new(TargetId::new("s"), TargetId::new("c"), 40.0).unwrap();
        assert_eq!(routing.pick(39.999), Route::Canary);
        assert_eq!(routing.pick(40.0), Route::Stable);
    }

    #[test]
    fn test_record_rejects_non_object() {
        assert!(EventRecord::from_json("[1, 2]").is_err());
        assert!(EventRecord::from_json("\"text\"").is_err());
        assert!(EventRecord::from_json(r#"{"ok": true}"#).is_ok());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{EventRecord, Route, RoutingConfig, TargetId};
    use observability::RouteStatsAggregator;
    use splitter::{
        create_splitter, FixedSequence, MockInvoker, SplitterConfig, TrafficSplitter,
    };
    use tokio::sync::watch;

    const E2E_CONFIG: &str = r#"
        [routing]
        stable_target = "orders-v1"
        canary_target = "orders-v2"
        canary_percent = 40.0

        [dispatch]
        max_in_flight = 4
        accept_timeout_ms = 2000

        [invoker]
        name = "log"
        invoker_type = "log"
    "#;

    fn batch(n: usize) -> Vec<EventRecord> {
        (0..n)
            .map(|i| EventRecord::new().with_field("orderId", serde_json::json!(format!("o-{i}"))))
            .collect()
    }

    fn routing(percent: f64) -> RoutingConfig {
        RoutingConfig::new(TargetId::new("orders-v1"), TargetId::new("orders-v2"), percent)
            .unwrap()
    }

    /// End-to-end: TOML config -> ConfigLoader -> create_splitter -> route
    #[tokio::test]
    async fn test_e2e_config_to_routed_batch() {
        let blueprint = ConfigLoader::load_from_str(E2E_CONFIG, ConfigFormat::Toml).unwrap();
        assert_eq!(blueprint.routing.canary_percent, 40.0);

        let splitter = create_splitter(&blueprint).await.unwrap();
        let outcomes = splitter.route(&batch(20)).await;

        assert_eq!(outcomes.len(), 20);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.index, i);
            assert!(outcome.is_accepted());
            match outcome.route {
                Route::Stable => assert_eq!(outcome.target.as_str(), "orders-v1"),
                Route::Canary => assert_eq!(outcome.target.as_str(), "orders-v2"),
            }
        }
    }

    /// Percent 0 must never route canary, percent 100 never stable,
    /// even with the production random source over a large batch.
    #[tokio::test]
    async fn test_percent_extremes_with_system_random() {
        let splitter = TrafficSplitter::new(
            routing(0.0),
            MockInvoker::new("mock"),
            SplitterConfig::default(),
        );
        let outcomes = splitter.route(&batch(1000)).await;
        assert!(outcomes.iter().all(|o| o.route == Route::Stable));

        let splitter = TrafficSplitter::new(
            routing(100.0),
            MockInvoker::new("mock"),
            SplitterConfig::default(),
        );
        let outcomes = splitter.route(&batch(1000)).await;
        assert!(outcomes.iter().all(|o| o.route == Route::Canary));
    }

    /// One poisoned record fails its own dispatch and nothing else,
    /// under concurrent dispatch.
    #[tokio::test]
    async fn test_e2e_failure_isolation_under_concurrency() {
        let mut records = batch(10);
        records[4] = records[4].clone().with_field("poison", serde_json::json!(true));

        let splitter = TrafficSplitter::with_random_source(
            routing(50.0),
            MockInvoker::new("mock").fail_on_key("poison"),
            SplitterConfig::default(),
            Box::new(FixedSequence::new([25.0, 75.0])),
        );

        let outcomes = splitter.route(&records).await;

        assert_eq!(outcomes.len(), 10);
        for (i, outcome) in outcomes.iter().enumerate() {
            if i == 4 {
                assert!(outcome.is_failed());
            } else {
                assert!(outcome.is_accepted(), "record {i} should be accepted");
            }
        }
    }

    /// Shutdown mid-batch: every record still gets an outcome, cancelled
    /// ones are distinguishable from failures.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_shutdown_cancels_pending_records() {
        let splitter = TrafficSplitter::with_random_source(
            routing(0.0),
            MockInvoker::new("mock").with_delay(Duration::from_millis(30)),
            SplitterConfig {
                max_in_flight: 1,
                ..SplitterConfig::default()
            },
            Box::new(FixedSequence::new([50.0])),
        );

        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(45)).await;
            let _ = tx.send(true);
        });

        let outcomes = splitter.route_with_shutdown(&batch(5), rx).await;

        assert_eq!(outcomes.len(), 5);
        let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
        let cancelled = outcomes.iter().filter(|o| o.is_cancelled()).count();
        assert_eq!(accepted, 1);
        assert_eq!(cancelled, 4);
        assert!(outcomes.iter().all(|o| !o.is_failed()));
    }

    /// Aggregated stats line up with individual outcomes
    #[tokio::test]
    async fn test_e2e_stats_aggregation() {
        let splitter = TrafficSplitter::with_random_source(
            routing(40.0),
            MockInvoker::new("mock"),
            SplitterConfig {
                max_in_flight: 1,
                ..SplitterConfig::default()
            },
            Box::new(FixedSequence::new([10.0, 50.0, 39.0, 40.0, 99.0])),
        );

        let outcomes = splitter.route(&batch(5)).await;

        let mut aggregator = RouteStatsAggregator::new();
        for outcome in &outcomes {
            aggregator.observe(outcome);
        }
        let summary = aggregator.summary();

        assert_eq!(summary.total, 5);
        assert_eq!(summary.canary, 2);
        assert_eq!(summary.stable, 3);
        assert_eq!(summary.accepted, 5);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.cancelled, 0);
        assert!((summary.canary_fraction - 0.4).abs() < 1e-9);
    }

    /// Config validation rejects an out-of-range percent before any routing
    #[test]
    fn test_e2e_config_rejects_bad_percent() {
        let config = r#"
            [routing]
            stable_target = "orders-v1"
            canary_target = "orders-v2"
            canary_percent = 150.0
        "#;

        let result = ConfigLoader::load_from_str(config, ConfigFormat::Toml);
        assert!(result.is_err());
    }
}
