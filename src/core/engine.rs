//! The roll engine: turns a roller configuration and an entropy source into
//! tagged faces, a total and the results text.

use super::outcome::{format_results, Face};
use super::roller::RollerConfig;
use crate::entropy::EntropySource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollResult {
    pub faces: Vec<Face>,
    pub total: i32,
    pub text: String,
}

/// Rolls `config.dice_qty` dice.
///
/// The config is normalized in place first: with odd dice disallowed an odd
/// die is rounded down to the even size below it, and the minimum face is
/// pulled below the top face. Both changes stick.
///
/// The entropy source is trusted for the count; anything it gets wrong is
/// patched so the result always holds exactly `dice_qty` faces inside
/// `[floor, die_faces]`.
pub fn roll(
    config: &mut RollerConfig,
    allow_odd: bool,
    entropy: &mut dyn EntropySource,
) -> RollResult {
    if !allow_odd && config.round_down_odd() {
        tracing::debug!(die_faces = config.die_faces, "rounded odd die down");
    }
    config.set_minimum(config.minimum);

    let count = config.dice_qty as usize;
    let low = config.floor();
    let high = config.die_faces;

    let mut values = entropy.faces(count, low, high);
    values.truncate(count);
    values.resize(count, low);

    let faces: Vec<Face> = values
        .into_iter()
        .map(|v| Face::rolled(v.clamp(low, high), high))
        .collect();
    let (total, text) = format_results(&faces, config.modifier, config.final_modifier);

    RollResult { faces, total, text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::FaceTag;
    use crate::entropy::LocalEntropy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Hands out a fixed sequence of values.
    struct Scripted(Vec<u32>);

    impl EntropySource for Scripted {
        fn faces(&mut self, count: usize, _low: u32, _high: u32) -> Vec<u32> {
            self.0.drain(..count.min(self.0.len())).collect()
        }
    }

    fn seeded() -> LocalEntropy<ChaCha8Rng> {
        LocalEntropy::from_rng(ChaCha8Rng::seed_from_u64(42))
    }

    #[test]
    fn test_roll_three_d6() {
        let mut config = RollerConfig::new(3, 6, 0, 0);
        let result = roll(&mut config, true, &mut Scripted(vec![6, 1, 4]));
        assert_eq!(result.total, 11);
        assert_eq!(result.text, "11 = \u{25b2}6 + \u{25bc}1 + 4");
    }

    #[test]
    fn test_roll_counts_and_ranges() {
        let mut entropy = seeded();
        for qty in [1, 2, 7, 99] {
            for faces in [2, 3, 6, 20, 100] {
                let mut config = RollerConfig::new(qty, faces, 0, 0);
                let result = roll(&mut config, true, &mut entropy);
                assert_eq!(result.faces.len(), qty as usize);
                assert!(result
                    .faces
                    .iter()
                    .all(|f| (1..=faces).contains(&f.value)));
            }
        }
    }

    #[test]
    fn test_odd_die_rounded_down_when_disallowed() {
        let mut config = RollerConfig::new(50, 7, 0, 0);
        let result = roll(&mut config, false, &mut seeded());
        assert_eq!(config.die_faces, 6);
        assert!(result.faces.iter().all(|f| f.value <= 6));
    }

    #[test]
    fn test_odd_die_kept_when_allowed() {
        let mut config = RollerConfig::new(1, 7, 0, 0);
        roll(&mut config, true, &mut seeded());
        assert_eq!(config.die_faces, 7);
    }

    #[test]
    fn test_tags_follow_die_size_not_modifier() {
        let mut config = RollerConfig::new(3, 8, 5, 0);
        let result = roll(&mut config, true, &mut Scripted(vec![8, 1, 5]));
        assert_eq!(result.faces[0].tag, FaceTag::Critical);
        assert_eq!(result.faces[1].tag, FaceTag::Fumble);
        assert_eq!(result.faces[2].tag, FaceTag::Normal);
        // 13 + 6 + 10
        assert_eq!(result.total, 29);
        assert_eq!(result.text, "29 = \u{25b2}13 + \u{25bc}6 + 10");
    }

    #[test]
    fn test_final_modifier_added_once() {
        let mut config = RollerConfig::new(2, 6, 0, -3);
        let result = roll(&mut config, true, &mut Scripted(vec![3, 4]));
        assert_eq!(result.total, 4);
    }

    #[test]
    fn test_minimum_floor_respected() {
        let mut config = RollerConfig::new(99, 6, 0, 0);
        config.set_minimum(Some(4));
        let result = roll(&mut config, true, &mut seeded());
        assert!(result.faces.iter().all(|f| (4..=6).contains(&f.value)));
        assert!(result.faces.iter().all(|f| f.tag != FaceTag::Fumble));
    }

    #[test]
    fn test_short_batch_is_padded() {
        let mut config = RollerConfig::new(3, 6, 0, 0);
        let result = roll(&mut config, true, &mut Scripted(vec![5]));
        assert_eq!(result.faces.len(), 3);
        assert_eq!(result.faces[0].value, 5);
        assert_eq!(result.faces[1].value, 1);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let mut config = RollerConfig::new(2, 6, 0, 0);
        let result = roll(&mut config, true, &mut Scripted(vec![0, 42]));
        assert_eq!(result.faces[0].value, 1);
        assert_eq!(result.faces[1].value, 6);
        assert_eq!(result.faces[1].tag, FaceTag::Critical);
    }
}
