use bevy::ecs::system::Resource;

/// Deterministic linear congruential generator driving all spawn decisions.
///
/// Seedable so a host (or a test) can replay the exact sequence of draws.
#[derive(Debug, Resource, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameRng {
    pub seed: u32,
}

impl GameRng {
    // Numerical Recipes constants; modulus is 2^32 via wrapping arithmetic.
    const A: u32 = 1_664_525;
    const C: u32 = 1_013_904_223;

    pub fn new(initial_seed: u32) -> Self {
        GameRng { seed: initial_seed }
    }

    /// Advances the generator and returns the next raw value.
    pub fn next_u32(&mut self) -> u32 {
        self.seed = self.seed.wrapping_mul(Self::A).wrapping_add(Self::C);
        self.seed
    }

    /// Uniform f32 in [0.0, 1.0).
    pub fn next_f32(&mut self) -> f32 {
        // Dividing by 2^32 keeps the result strictly below 1.0.
        self.next_u32() as f32 / 4_294_967_296.0
    }

    /// Uniform index into a collection of `len` elements. `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "next_index over an empty collection");
        (self.next_u32() % len as u32) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = GameRng::new(12345);
        let mut b = GameRng::new(12345);
        let seq_a: Vec<u32> = (0..100).map(|_| a.next_u32()).collect();
        let seq_b: Vec<u32> = (0..100).map(|_| b.next_u32()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = GameRng::new(100);
        let mut b = GameRng::new(200);
        let seq_a: Vec<u32> = (0..10).map(|_| a.next_u32()).collect();
        let seq_b: Vec<u32> = (0..10).map(|_| b.next_u32()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn f32_stays_in_unit_range() {
        let mut rng = GameRng::new(98765);
        for _ in 0..1000 {
            let val = rng.next_f32();
            assert!((0.0..1.0).contains(&val), "{val} not in [0, 1)");
        }
    }

    #[test]
    fn index_stays_in_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            assert!(rng.next_index(7) < 7);
        }
    }
}
