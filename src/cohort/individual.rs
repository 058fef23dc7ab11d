//! Simulated individual with a private random stream

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cycle::{Arm, CycleOutcome, CycleSimulator};

/// One individual in a cohort
///
/// The random stream is derived from the run seed and the individual's id,
/// so the draws an individual sees do not depend on who else is simulated
/// or on which thread runs them.
#[derive(Debug, Clone)]
pub struct Individual {
    pub id: u64,
    pub arm: Arm,

    /// Complete cycles attempted so far
    pub cycles_attempted: u32,

    /// Set once a cycle ends in a live birth
    pub live_birth: bool,

    rng: ChaCha8Rng,
}

impl Individual {
    pub fn new(id: u64, arm: Arm, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(id);
        Self {
            id,
            arm,
            cycles_attempted: 0,
            live_birth: false,
            rng,
        }
    }

    /// Run the next complete cycle on this individual's stream
    pub fn attempt_cycle(&mut self, simulator: &CycleSimulator) -> CycleOutcome {
        let outcome = simulator.simulate(self.arm, &mut self.rng);
        self.cycles_attempted += 1;
        self.live_birth = outcome.live_birth;
        outcome
    }
}

/// Build both arms' starting pools: screened ids first, then unscreened
pub fn initial_cohort(screened: usize, unscreened: usize, seed: u64) -> Vec<Individual> {
    let screened_ids = 0..screened as u64;
    let unscreened_ids = screened as u64..(screened + unscreened) as u64;

    screened_ids
        .map(|id| Individual::new(id, Arm::Screened, seed))
        .chain(unscreened_ids.map(|id| Individual::new(id, Arm::Unscreened, seed)))
        .collect()
}
