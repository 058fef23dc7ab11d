//! Property tests for the simulation pipeline: life-table invariants,
//! determinism, and boundary configurations.

use proptest::prelude::*;

use pgt_simulator::{
    build_life_table, Arm, CohortOrchestrator, Execution, LifeTableIndex, RunConfig, ScenarioConfig,
    ScenarioRunner, SimulationParams,
};

fn params_strategy() -> impl Strategy<Value = SimulationParams> {
    (0u32..8, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0)
        .prop_map(|(n, an, lbr, tpr, fpr)| SimulationParams::new(n, an, lbr, tpr, fpr))
}

fn run_strategy() -> impl Strategy<Value = RunConfig> {
    (1u32..5, 0usize..60, 0usize..60, any::<u64>())
        .prop_map(|(cycles, s, u, seed)| RunConfig::new(cycles, s, u).with_seed(seed))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn life_tables_keep_invariants(params in params_strategy(), run in run_strategy()) {
        let output = ScenarioRunner::new(ScenarioConfig::new(params, run)).unwrap().run();

        for table in [&output.by_transfer, &output.by_cycle] {
            let violations = table.check_invariants();
            prop_assert!(violations.is_empty(), "violations: {:?}", violations);

            for row in &table.rows {
                prop_assert!(row.x > 0);
                prop_assert!(row.events <= row.n);
                prop_assert!(row.conditional_rate.is_some());
            }
        }
    }

    #[test]
    fn cycle_table_at_risk_matches_active_counts(params in params_strategy(), run in run_strategy()) {
        let output = ScenarioRunner::new(ScenarioConfig::new(params, run)).unwrap().run();

        for arm in Arm::ALL {
            for row in output.by_cycle.rows_for(arm) {
                prop_assert_eq!(row.n, output.simulation.active_in_cycle(arm, row.x));
            }
        }
    }

    #[test]
    fn parallel_and_sequential_agree(params in params_strategy(), run in run_strategy()) {
        let sequential = CohortOrchestrator::new(params, run).unwrap().run();
        let parallel = CohortOrchestrator::new(params, run.with_execution(Execution::Parallel))
            .unwrap()
            .run();
        prop_assert_eq!(sequential.rows, parallel.rows);
    }

    #[test]
    fn out_of_range_rate_is_rejected(rate in prop_oneof![-10.0f64..-1e-9, 1.0f64 + 1e-9..10.0]) {
        let params = SimulationParams::new(5, rate, 0.4, 0.9, 0.1);
        prop_assert!(ScenarioRunner::new(ScenarioConfig::new(params, RunConfig::default())).is_err());
    }
}

#[test]
fn pipeline_is_deterministic() {
    let config = ScenarioConfig::new(
        SimulationParams::new(5, 0.4, 0.4, 0.9, 0.1),
        RunConfig::new(3, 500, 500).with_seed(2024),
    );

    let first = ScenarioRunner::new(config).unwrap().run();
    let second = ScenarioRunner::new(config).unwrap().run();

    assert_eq!(first.simulation.rows, second.simulation.rows);
    assert_eq!(first.by_transfer, second.by_transfer);
    assert_eq!(first.by_cycle, second.by_cycle);
}

#[test]
fn no_embryos_means_no_transfers() {
    let config = ScenarioConfig::new(SimulationParams::new(0, 0.4, 0.4, 0.9, 0.1), RunConfig::new(3, 100, 100));
    let output = ScenarioRunner::new(config).unwrap().run();

    assert_eq!(output.simulation.rows.len(), 600);
    assert!(output
        .simulation
        .rows
        .iter()
        .all(|r| r.embryos_transferred == 0 && !r.live_birth));
    assert!(output.by_transfer.rows.is_empty());

    // Everyone reaches every cycle without an event
    for arm in Arm::ALL {
        let rows: Vec<_> = output.by_cycle.rows_for(arm).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].x, rows[0].n, rows[0].events), (3, 100, 0));
    }
}

#[test]
fn certain_success_on_first_transfer() {
    let config = ScenarioConfig::new(SimulationParams::new(5, 0.0, 1.0, 0.9, 0.1), RunConfig::new(3, 200, 200));
    let output = ScenarioRunner::new(config).unwrap().run();

    // The screened arm can lose every embryo to false positives, so only
    // the unscreened arm is guaranteed a single-row table.
    let rows: Vec<_> = output.by_transfer.rows_for(Arm::Unscreened).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].x, 1);
    assert_eq!(rows[0].conditional_rate, Some(1.0));
    assert_eq!(rows[0].cumulative_rate, 1.0);
}

#[test]
fn perfect_screen_transfers_only_euploid_embryos() {
    let params = SimulationParams::new(5, 0.4, 0.4, 1.0, 0.0);
    let result = CohortOrchestrator::new(params, RunConfig::new(3, 3000, 3000).with_seed(7))
        .unwrap()
        .run();

    let per_transfer_rate = |arm: Arm| {
        let transfers: u64 = result.rows_for(arm).map(|r| r.embryos_transferred as u64).sum();
        result.live_births(arm) as f64 / transfers as f64
    };

    let screened = per_transfer_rate(Arm::Screened);
    let unscreened = per_transfer_rate(Arm::Unscreened);

    assert!((screened - 0.4).abs() < 0.02, "screened per-transfer rate {}", screened);
    assert!(unscreened < screened, "unscreened {} vs screened {}", unscreened, screened);
    assert!((unscreened - 0.24).abs() < 0.03, "unscreened per-transfer rate {}", unscreened);
}

#[test]
fn end_to_end_reference_scenario() {
    let config = ScenarioConfig::new(
        SimulationParams::new(5, 0.4, 0.4, 0.9, 0.1),
        RunConfig::new(3, 1000, 1000).with_seed(42),
    );
    let output = ScenarioRunner::new(config).unwrap().run();

    for arm in Arm::ALL {
        let clbr: Vec<f64> = (1..=3).map(|x| output.by_cycle.cumulative_rate_at(arm, x)).collect();
        assert!(clbr.windows(2).all(|w| w[0] <= w[1]), "{} clbr not monotone: {:?}", arm, clbr);
        assert!(clbr[0] > 0.0);
    }

    // Screening concentrates euploid embryos early in the transfer sequence
    for x in 1..=2 {
        let screened = output.by_transfer.cumulative_rate_at(Arm::Screened, x);
        let unscreened = output.by_transfer.cumulative_rate_at(Arm::Unscreened, x);
        assert!(screened > unscreened, "x={}: screened {} <= unscreened {}", x, screened, unscreened);
    }

    assert!(output.by_transfer.check_invariants().is_empty());
    assert!(output.by_cycle.check_invariants().is_empty());
}

#[test]
fn tables_can_be_rebuilt_from_trajectories() {
    let config = ScenarioConfig::new(SimulationParams::default(), RunConfig::new(2, 300, 300));
    let output = ScenarioRunner::new(config).unwrap().run();

    let rebuilt = build_life_table(&output.simulation, LifeTableIndex::Transfers);
    assert_eq!(rebuilt, output.by_transfer);
}
