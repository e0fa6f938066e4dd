use rand::Rng;

use super::domain::ReferenceNumber;

/// Source of reference numbers so tests can pin them.
pub trait ReferenceGenerator: Send + Sync {
    fn next_reference(&self) -> ReferenceNumber;
}

/// Uniformly random six-digit references. Collisions are possible.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomReferenceGenerator;

impl ReferenceGenerator for RandomReferenceGenerator {
    fn next_reference(&self) -> ReferenceNumber {
        let value = rand::thread_rng().gen_range(ReferenceNumber::MIN..=ReferenceNumber::MAX);
        ReferenceNumber::clamped(value)
    }
}
