//! # Card Network Simulation
//!
//! The card reader asks an [`OutcomeSource`] for a number in `[0, 1)` and
//! declines the payment when it lands below the configured failure rate.
//!
//! Production runs use [`RandomOutcome`]; tests plug in [`FixedOutcome`] to
//! force an approval or a decline.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform draws in `[0, 1)`.
pub trait OutcomeSource {
    fn draw(&mut self) -> f64;
}

/// Decides a card payment from a draw.
#[inline]
pub fn is_approved(draw: f64, failure_rate: f64) -> bool {
    draw >= failure_rate
}

/// Draws from a `StdRng`.
#[derive(Debug, Clone)]
pub struct RandomOutcome {
    rng: StdRng,
}

impl RandomOutcome {
    /// Seeds from the operating system.
    pub fn from_entropy() -> Self {
        RandomOutcome {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of outcomes.
    pub fn seeded(seed: u64) -> Self {
        RandomOutcome {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl OutcomeSource for RandomOutcome {
    fn draw(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always returns the same draw.
///
/// `FixedOutcome::APPROVE` clears any failure rate below 1.0;
/// `FixedOutcome::DECLINE` fails any failure rate above 0.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedOutcome(pub f64);

impl FixedOutcome {
    pub const APPROVE: FixedOutcome = FixedOutcome(0.999_999);
    pub const DECLINE: FixedOutcome = FixedOutcome(0.0);
}

impl OutcomeSource for FixedOutcome {
    fn draw(&mut self) -> f64 {
        self.0
    }
}

impl<S: OutcomeSource + ?Sized> OutcomeSource for Box<S> {
    fn draw(&mut self) -> f64 {
        (**self).draw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_approved_boundaries() {
        assert!(is_approved(0.5, 0.15));
        assert!(!is_approved(0.1, 0.15));
        assert!(is_approved(0.0, 0.0));
        assert!(!is_approved(0.999, 1.0));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = RandomOutcome::seeded(42);
        let mut b = RandomOutcome::seeded(42);
        for _ in 0..10 {
            let x = a.draw();
            assert_eq!(x, b.draw());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_fixed_outcomes() {
        assert!(is_approved(FixedOutcome::APPROVE.draw(), 0.15));
        assert!(!is_approved(FixedOutcome::DECLINE.draw(), 0.15));
    }

    #[test]
    fn test_boxed_source() {
        let mut boxed: Box<dyn OutcomeSource> = Box::new(FixedOutcome(0.25));
        assert_eq!(boxed.draw(), 0.25);
    }
}
