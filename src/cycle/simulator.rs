//! Monte Carlo simulation of a single complete cycle

use rand::Rng;

use super::embryo::{Arm, CycleOutcome, Embryo};
use crate::config::SimulationParams;
use crate::error::Result;

/// Simulates complete cycles for one parameter set
///
/// Stateless across calls: every draw comes from the stream passed in.
#[derive(Debug, Clone, Copy)]
pub struct CycleSimulator {
    params: SimulationParams,
}

impl CycleSimulator {
    /// Create a simulator, rejecting out-of-range parameters
    pub fn new(params: SimulationParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Simulate one complete cycle for an individual in `arm`
    ///
    /// Draw order is fixed: all aneuploidy draws, then all screen draws,
    /// then the sequential transfer draws.
    pub fn simulate<R: Rng>(&self, arm: Arm, rng: &mut R) -> CycleOutcome {
        let mut embryos: Vec<Embryo> = (0..self.params.n_embryos)
            .map(|_| Embryo {
                aneuploid: rng.gen_bool(self.params.aneuploidy_rate),
                screen_positive: None,
            })
            .collect();

        if arm.is_screened() {
            for embryo in embryos.iter_mut() {
                let p = self.params.screen_positive_rate(embryo.aneuploid);
                embryo.screen_positive = Some(rng.gen_bool(p));
            }
        }

        let (transfer_pool, embryos_transferred, live_birth) = self.transfer_sequentially(&embryos, rng);

        CycleOutcome {
            arm,
            embryos,
            transfer_pool,
            embryos_transferred,
            live_birth,
        }
    }

    /// Transfer surviving embryos in generation order until the first live birth
    fn transfer_sequentially<R: Rng>(&self, embryos: &[Embryo], rng: &mut R) -> (u32, u32, bool) {
        let mut pool = 0;
        let mut transferred = 0;
        let mut live_birth = false;

        for embryo in embryos.iter().filter(|e| e.is_transferable()) {
            pool += 1;
            if live_birth {
                continue;
            }
            transferred += 1;
            // Aneuploid transfers always fail and consume no draw
            if !embryo.aneuploid && rng.gen_bool(self.params.live_birth_rate) {
                live_birth = true;
            }
        }

        (pool, transferred, live_birth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(1234)
    }

    #[test]
    fn test_no_embryos_no_transfer() {
        let sim = CycleSimulator::new(SimulationParams::new(0, 0.4, 0.4, 0.9, 0.1)).unwrap();
        let mut rng = rng();

        for arm in Arm::ALL {
            let outcome = sim.simulate(arm, &mut rng);
            assert!(outcome.embryos.is_empty());
            assert_eq!(outcome.transfer_pool, 0);
            assert_eq!(outcome.embryos_transferred, 0);
            assert!(!outcome.live_birth);
        }
    }

    #[test]
    fn test_certain_success_on_first_transfer() {
        let sim = CycleSimulator::new(SimulationParams::new(5, 0.0, 1.0, 0.9, 0.0)).unwrap();
        let mut rng = rng();

        for arm in Arm::ALL {
            let outcome = sim.simulate(arm, &mut rng);
            assert_eq!(outcome.embryos_transferred, 1);
            assert!(outcome.live_birth);
            assert_eq!(outcome.transfer_pool, 5);
        }
    }

    #[test]
    fn test_all_aneuploid_exhausts_pool() {
        let sim = CycleSimulator::new(SimulationParams::new(4, 1.0, 1.0, 0.0, 0.0)).unwrap();
        let outcome = sim.simulate(Arm::Unscreened, &mut rng());

        assert_eq!(outcome.aneuploid_count(), 4);
        assert_eq!(outcome.embryos_transferred, 4);
        assert!(!outcome.live_birth);
    }

    #[test]
    fn test_perfect_screen_empties_aneuploid_pool() {
        let sim = CycleSimulator::new(SimulationParams::new(4, 1.0, 1.0, 1.0, 0.0)).unwrap();
        let outcome = sim.simulate(Arm::Screened, &mut rng());

        assert_eq!(outcome.screened_out(), 4);
        assert_eq!(outcome.transfer_pool, 0);
        assert_eq!(outcome.embryos_transferred, 0);
        assert!(!outcome.live_birth);
    }

    #[test]
    fn test_false_positives_lose_euploid_embryos() {
        let sim = CycleSimulator::new(SimulationParams::new(3, 0.0, 1.0, 0.0, 1.0)).unwrap();
        let outcome = sim.simulate(Arm::Screened, &mut rng());

        assert_eq!(outcome.false_positives(), 3);
        assert_eq!(outcome.embryos_transferred, 0);
        assert!(!outcome.live_birth);
    }

    #[test]
    fn test_unscreened_embryos_are_untested() {
        let sim = CycleSimulator::new(SimulationParams::default()).unwrap();
        let outcome = sim.simulate(Arm::Unscreened, &mut rng());
        assert!(outcome.embryos.iter().all(|e| e.screen_positive.is_none()));
        assert_eq!(outcome.transfer_pool, outcome.embryos_created());
    }

    #[test]
    fn test_transfers_never_exceed_pool() {
        let sim = CycleSimulator::new(SimulationParams::new(6, 0.5, 0.3, 0.7, 0.2)).unwrap();
        let mut rng = rng();

        for _ in 0..500 {
            for arm in Arm::ALL {
                let outcome = sim.simulate(arm, &mut rng);
                assert!(outcome.embryos_transferred <= outcome.transfer_pool);
                if !outcome.live_birth {
                    assert_eq!(outcome.embryos_transferred, outcome.transfer_pool);
                }
            }
        }
    }

    #[test]
    fn test_same_stream_same_outcome() {
        let sim = CycleSimulator::new(SimulationParams::default()).unwrap();
        let a = sim.simulate(Arm::Screened, &mut rng());
        let b = sim.simulate(Arm::Screened, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(CycleSimulator::new(SimulationParams::new(5, 1.5, 0.4, 0.9, 0.1)).is_err());
    }
}
