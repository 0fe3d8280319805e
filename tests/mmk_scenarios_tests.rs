use mmk_sim::experiments::{
    run_sweep, single_run, utilization_sweep, SweepConfig, SweepPlan, SWEEP_SEED,
    SWEEP_SERVICE_RATE,
};
use mmk_sim::{simulate, MmkAnalytics, QueueParams, SimError};

fn relative_error(simulated: f64, expected: f64) -> f64 {
    (simulated - expected).abs() / expected
}

/// λ = 5/60, μ = 8/60, k = 1, seed 101, 100 customers
#[test]
fn test_reference_run_completes() {
    let report = single_run().unwrap();

    assert_eq!(report.served, 100);
    assert!(report.elapsed_time > 0.0);
    assert!((0.0..=1.0).contains(&report.result.utilization));
    assert!(report.result.avg_queue_length >= 0.0);
    assert!(report.result.avg_delay > 0.0);
}

#[test]
fn test_congestion_grows_with_ratio() {
    let points = utilization_sweep(&SweepConfig::new()).unwrap();
    assert_eq!(points.len(), 10);

    for pair in points.windows(2) {
        let (low, high) = (&pair[0].report.result, &pair[1].report.result);
        assert!(
            high.avg_delay >= low.avg_delay * (1.0 - 1e-9),
            "delay fell from {} to {} between ratio {} and {}",
            low.avg_delay,
            high.avg_delay,
            pair[0].ratio,
            pair[1].ratio
        );
        assert!(
            high.avg_queue_length >= low.avg_queue_length * (1.0 - 1e-9),
            "queue length fell from {} to {} between ratio {} and {}",
            low.avg_queue_length,
            high.avg_queue_length,
            pair[0].ratio,
            pair[1].ratio
        );
    }

    let (first, last) = (&points[0].report.result, &points[9].report.result);
    assert!(last.avg_delay > first.avg_delay);
    assert!(last.avg_queue_length > first.avg_queue_length);
}

#[test]
fn test_more_servers_reduce_congestion() {
    let one = simulate(
        QueueParams::from_ratio(0.9, SWEEP_SERVICE_RATE, 1).unwrap(),
        100,
        SWEEP_SEED,
    )
    .unwrap();
    let four = simulate(
        QueueParams::from_ratio(0.9, SWEEP_SERVICE_RATE, 4).unwrap(),
        100,
        SWEEP_SEED,
    )
    .unwrap();

    assert!(four.result.avg_queue_length < one.result.avg_queue_length);
    assert!(four.result.avg_delay < one.result.avg_delay);
}

#[test]
fn test_mm1_matches_closed_form() {
    let params = QueueParams::new(0.5, 1.0, 1).unwrap();
    let analytics = MmkAnalytics::compute(&params).unwrap();
    let report = simulate(params, 100_000, 2024).unwrap();

    let lq_error = relative_error(report.result.avg_queue_length, analytics.lq);
    let w_error = relative_error(report.result.avg_delay, analytics.w);
    let u_error = relative_error(report.result.utilization, analytics.utilization);
    assert!(lq_error < 0.10, "Lq off by {lq_error}");
    assert!(w_error < 0.06, "W off by {w_error}");
    assert!(u_error < 0.03, "U off by {u_error}");
}

#[test]
fn test_mm2_matches_erlang_c() {
    let params = QueueParams::new(1.5, 1.0, 2).unwrap();
    let analytics = MmkAnalytics::compute(&params).unwrap();
    let report = simulate(params, 200_000, 77).unwrap();

    let lq_error = relative_error(report.result.avg_queue_length, analytics.lq);
    let w_error = relative_error(report.result.avg_delay, analytics.w);
    let u_error = relative_error(report.result.utilization, analytics.utilization);
    assert!(lq_error < 0.10, "Lq off by {lq_error}");
    assert!(w_error < 0.06, "W off by {w_error}");
    assert!(u_error < 0.03, "U off by {u_error}");
}

#[test]
fn test_runs_are_reproducible() {
    let plan = SweepPlan {
        server_counts: vec![1, 3],
        ..SweepPlan::utilization()
    };
    let first = run_sweep(&plan, &SweepConfig::parallel()).unwrap();
    let second = run_sweep(&plan, &SweepConfig::new()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_zero_target_is_degenerate() {
    let params = QueueParams::new(1.0, 2.0, 1).unwrap();
    assert_eq!(simulate(params, 0, 5), Err(SimError::NoCustomersServed));
}

#[test]
fn test_non_positive_rates_rejected() {
    assert!(matches!(
        QueueParams::new(-1.0, 2.0, 1),
        Err(SimError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        QueueParams::from_ratio(0.5, 0.0, 1),
        Err(SimError::InvalidConfiguration(_))
    ));
}
