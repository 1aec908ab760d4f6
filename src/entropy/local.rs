use super::EntropySource;
use rand::rngs::OsRng;
use rand::Rng;

/// Draws faces from any `rand` generator. The default is the OS CSPRNG;
/// tests plug in a seeded generator.
pub struct LocalEntropy<R = OsRng> {
    rng: R,
}

impl LocalEntropy<OsRng> {
    pub fn system() -> Self {
        Self { rng: OsRng }
    }
}

impl<R: Rng> LocalEntropy<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> EntropySource for LocalEntropy<R> {
    fn faces(&mut self, count: usize, low: u32, high: u32) -> Vec<u32> {
        let high = high.max(low);
        (0..count).map(|_| self.rng.gen_range(low..=high)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_system_faces_in_range() {
        let faces = LocalEntropy::system().faces(500, 1, 6);
        assert_eq!(faces.len(), 500);
        assert!(faces.iter().all(|f| (1..=6).contains(f)));
    }

    #[test]
    fn test_every_face_reachable() {
        let mut entropy = LocalEntropy::from_rng(ChaCha8Rng::seed_from_u64(7));
        let faces = entropy.faces(1000, 1, 4);
        for face in 1..=4 {
            assert!(faces.contains(&face), "face {} never rolled", face);
        }
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let a = LocalEntropy::from_rng(ChaCha8Rng::seed_from_u64(42)).faces(20, 1, 100);
        let b = LocalEntropy::from_rng(ChaCha8Rng::seed_from_u64(42)).faces(20, 1, 100);
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_range() {
        let faces = LocalEntropy::system().faces(3, 5, 2);
        assert_eq!(faces, vec![5, 5, 5]);
    }
}
