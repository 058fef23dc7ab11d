//! PGT-A Simulator CLI
//!
//! Runs one scenario and prints the cumulative live-birth tables

use anyhow::{Context, Result};
use clap::Parser;
use pgt_simulator::{
    Arm, Execution, LifeTable, ScenarioConfig, ScenarioOutput, ScenarioRunner,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Simulate cumulative live-birth rates with and without PGT-A
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON scenario file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frozen embryos per complete cycle
    #[arg(long)]
    n_embryos: Option<u32>,

    /// Probability an embryo is aneuploid
    #[arg(long)]
    aneuploidy_rate: Option<f64>,

    /// Live birth rate per euploid embryo transfer
    #[arg(long)]
    live_birth_rate: Option<f64>,

    /// PGT-A sensitivity
    #[arg(long)]
    tpr: Option<f64>,

    /// PGT-A false positive rate (1 - specificity)
    #[arg(long)]
    fpr: Option<f64>,

    /// Number of complete cycles
    #[arg(long)]
    cycles: Option<u32>,

    /// Individuals in the PGT arm
    #[arg(long)]
    screened: Option<usize>,

    /// Individuals in the no-PGT arm
    #[arg(long)]
    unscreened: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Simulate individuals in parallel (results are identical)
    #[arg(long)]
    parallel: bool,

    /// Write every trajectory row to this CSV file
    #[arg(long)]
    trajectory_csv: Option<PathBuf>,

    /// Write the per-transfer life table to this CSV file
    #[arg(long)]
    transfer_csv: Option<PathBuf>,

    /// Write the per-cycle life table to this CSV file
    #[arg(long)]
    cycle_csv: Option<PathBuf>,

    /// Write the tables and comparison as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Cli {
    fn scenario(&self) -> Result<ScenarioConfig> {
        let mut config = match &self.config {
            Some(path) => ScenarioConfig::from_json_path(path)
                .with_context(|| format!("Failed to load scenario from {}", path.display()))?,
            None => ScenarioConfig::default(),
        };

        let params = &mut config.params;
        if let Some(v) = self.n_embryos { params.n_embryos = v; }
        if let Some(v) = self.aneuploidy_rate { params.aneuploidy_rate = v; }
        if let Some(v) = self.live_birth_rate { params.live_birth_rate = v; }
        if let Some(v) = self.tpr { params.true_positive_rate = v; }
        if let Some(v) = self.fpr { params.false_positive_rate = v; }

        let run = &mut config.run;
        if let Some(v) = self.cycles { run.num_complete_cycles = v; }
        if let Some(v) = self.screened { run.screened_cohort_size = v; }
        if let Some(v) = self.unscreened { run.unscreened_cohort_size = v; }
        if let Some(v) = self.seed { run.seed = v; }
        if self.parallel { run.execution = Execution::Parallel; }

        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = cli.scenario()?;
    let runner = ScenarioRunner::new(config).context("Invalid scenario configuration")?;

    println!("PGT-A Simulator v{}", env!("CARGO_PKG_VERSION"));
    println!("=====================\n");
    println!("Embryos per cycle: {}", config.params.n_embryos);
    println!("Aneuploidy rate:   {:.1}%", config.params.aneuploidy_rate * 100.0);
    println!("LBR per euploid:   {:.1}%", config.params.live_birth_rate * 100.0);
    println!("TPR / FPR:         {:.2} / {:.2}", config.params.true_positive_rate, config.params.false_positive_rate);
    println!(
        "Cohorts:           {} PGT, {} no PGT, {} complete cycles, seed {}",
        config.run.screened_cohort_size,
        config.run.unscreened_cohort_size,
        config.run.num_complete_cycles,
        config.run.seed
    );

    let output = runner.run();

    print_table("Live birth rate per embryo transfer", &output.by_transfer);
    print_table("Live birth rate per complete cycle", &output.by_cycle);
    print_comparison(&output);

    write_outputs(&cli, &output)
}

fn print_table(title: &str, table: &LifeTable) {
    println!("\n{}:", title);
    println!("{:>10} {:>7} {:>8} {:>7} {:>9} {:>9}",
        table.index.column_name(), "arm", "n", "lb", "lbr", "clbr");
    println!("{}", "-".repeat(56));

    for row in &table.rows {
        let lbr = row
            .conditional_rate
            .map(|r| format!("{:.4}", r))
            .unwrap_or_else(|| "NaN".to_string());
        println!("{:>10} {:>7} {:>8} {:>7} {:>9} {:>9.4}",
            row.x, row.arm.label(), row.n, row.events, lbr, row.cumulative_rate);
    }

    for violation in table.check_invariants() {
        log::warn!("Life table invariant violated: {}", violation);
    }
}

fn print_comparison(output: &ScenarioOutput) {
    let comparison = output.comparison();
    let cycles = output.simulation.run.num_complete_cycles;

    println!("\nCumulative live birth rates after {} complete cycle(s):", cycles);
    println!("  {:<7} {:.1}%", Arm::Screened.label(), comparison.screened_clbr * 100.0);
    println!("  {:<7} {:.1}%", Arm::Unscreened.label(), comparison.unscreened_clbr * 100.0);
    println!("  Difference: {:+.1} percentage points", comparison.clbr_difference() * 100.0);

    for (arm, ratio) in [
        (Arm::Screened, comparison.screened_transfers_per_live_birth),
        (Arm::Unscreened, comparison.unscreened_transfers_per_live_birth),
    ] {
        match ratio {
            Some(r) => println!("  Transfers per live birth ({}): {:.2}", arm, r),
            None => println!("  Transfers per live birth ({}): n/a", arm),
        }
    }
}

fn write_outputs(cli: &Cli, output: &ScenarioOutput) -> Result<()> {
    if let Some(path) = &cli.trajectory_csv {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        output.simulation.write_csv(BufWriter::new(file))?;
        println!("\nTrajectory rows written to: {}", path.display());
    }

    for (path, table) in [(&cli.transfer_csv, &output.by_transfer), (&cli.cycle_csv, &output.by_cycle)] {
        if let Some(path) = path {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            table.write_csv(BufWriter::new(file))?;
            println!("Life table ({}) written to: {}", table.index, path.display());
        }
    }

    if let Some(path) = &cli.json {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let report = serde_json::json!({
            "params": output.simulation.params,
            "run": output.simulation.run,
            "by_transfer": output.by_transfer,
            "by_cycle": output.by_cycle,
            "comparison": output.comparison(),
        });
        serde_json::to_writer_pretty(BufWriter::new(file), &report)?;
        println!("JSON report written to: {}", path.display());
    }

    Ok(())
}
