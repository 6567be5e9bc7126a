//! Simulated settlement: how long the "bank" takes and whether it approves.
//!
//! Behaviour is fully determined by the injected [`ExecutionMode`] and the
//! simulator's own RNG. Nothing here reads the environment.

use crate::domain::payment::PaymentMethod;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Mutex;
use std::time::Duration;

/// Delay used in deterministic mode when no override is configured.
pub const DEFAULT_DETERMINISTIC_DELAY_MS: u64 = 1000;

/// Randomized delays are drawn from this range, in seconds.
pub const RANDOM_DELAY_SECS: Range<f64> = 5.0..10.0;

pub const UPI_SUCCESS_RATE: f64 = 0.90;
pub const CARD_SUCCESS_RATE: f64 = 0.95;

/// Controls how settlement outcomes are produced.
///
/// With `deterministic` set, the outcome is `success_override` (default
/// success) after `delay_override_ms` (default 1000 ms) and no randomness is
/// consulted. Otherwise each override that is set replaces its random draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionMode {
    pub deterministic: bool,
    pub success_override: Option<bool>,
    pub delay_override_ms: Option<u64>,
}

impl ExecutionMode {
    pub fn randomized() -> Self {
        Self::default()
    }

    pub fn deterministic(succeed: bool, delay_ms: u64) -> Self {
        Self {
            deterministic: true,
            success_override: Some(succeed),
            delay_override_ms: Some(delay_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettlementOutcome {
    pub delay: Duration,
    pub succeeded: bool,
}

pub fn success_rate(method: PaymentMethod) -> f64 {
    match method {
        PaymentMethod::Upi => UPI_SUCCESS_RATE,
        PaymentMethod::Card => CARD_SUCCESS_RATE,
    }
}

/// Computes one outcome. `rng` is only touched for values not fixed by `mode`.
pub fn simulate<R: Rng + ?Sized>(
    method: PaymentMethod,
    mode: &ExecutionMode,
    rng: &mut R,
) -> SettlementOutcome {
    if mode.deterministic {
        return SettlementOutcome {
            delay: Duration::from_millis(
                mode.delay_override_ms
                    .unwrap_or(DEFAULT_DETERMINISTIC_DELAY_MS),
            ),
            succeeded: mode.success_override.unwrap_or(true),
        };
    }

    let delay = match mode.delay_override_ms {
        Some(ms) => Duration::from_millis(ms),
        None => Duration::from_secs_f64(rng.gen_range(RANDOM_DELAY_SECS)),
    };
    let succeeded = match mode.success_override {
        Some(forced) => forced,
        None => rng.gen_bool(success_rate(method)),
    };

    SettlementOutcome { delay, succeeded }
}

/// Produces the settlement outcome for a payment about to be settled.
pub trait SettlementSimulator: Send + Sync {
    fn simulate(&self, method: PaymentMethod) -> SettlementOutcome;
}

pub type SettlementSimulatorBox = Box<dyn SettlementSimulator>;

/// The default simulator: an [`ExecutionMode`] plus its own seeded RNG.
pub struct SimulatedSettlement {
    mode: ExecutionMode,
    rng: Mutex<StdRng>,
}

impl SimulatedSettlement {
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible outcomes for a given seed.
    pub fn seeded(mode: ExecutionMode, seed: u64) -> Self {
        Self {
            mode,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn mode(&self) -> &ExecutionMode {
        &self.mode
    }
}

impl SettlementSimulator for SimulatedSettlement {
    fn simulate(&self, method: PaymentMethod) -> SettlementOutcome {
        // A panic while holding the lock cannot leave the RNG inconsistent.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        simulate(method, &self.mode, &mut *rng)
    }
}
