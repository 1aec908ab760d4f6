use super::constants::*;
use super::engine;
use super::outcome::{format_results, Face, Outcome};
use crate::entropy::EntropySource;

/// The editable columns of a roller row, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    DiceQty,
    DieFaces,
    Modifier,
    Minimum,
    FinalModifier,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::DiceQty,
        Field::DieFaces,
        Field::Modifier,
        Field::Minimum,
        Field::FinalModifier,
    ];

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::DiceQty => "dice",
            Field::DieFaces => "faces",
            Field::Modifier => "modifier",
            Field::Minimum => "minimum",
            Field::FinalModifier => "final modifier",
        }
    }
}

/// What to roll: `dice_qty` dice of `die_faces` sides, `modifier` added to
/// every die and `final_modifier` added to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollerConfig {
    pub dice_qty: u32,
    pub die_faces: u32,
    pub modifier: i32,
    pub final_modifier: i32,
    /// Lowest face a die may land on. `None` means 1.
    pub minimum: Option<u32>,
}

impl Default for RollerConfig {
    fn default() -> Self {
        Self {
            dice_qty: DEFAULT_DICE_QTY,
            die_faces: DEFAULT_DIE_FACES,
            modifier: 0,
            final_modifier: 0,
            minimum: None,
        }
    }
}

impl RollerConfig {
    pub fn new(dice_qty: u32, die_faces: u32, modifier: i32, final_modifier: i32) -> Self {
        let mut config = Self::default();
        config.set_dice_qty(dice_qty);
        config.set_die_faces(die_faces);
        config.set_modifier(modifier);
        config.set_final_modifier(final_modifier);
        config
    }

    /// Clamps to 1-99
    pub fn set_dice_qty(&mut self, qty: u32) {
        self.dice_qty = qty.clamp(MIN_DICE_QTY, MAX_DICE_QTY);
    }

    /// Clamps to 2-100
    pub fn set_die_faces(&mut self, faces: u32) {
        self.die_faces = faces.clamp(MIN_DIE_FACES, MAX_DIE_FACES);
    }

    /// Clamps to -99..100
    pub fn set_modifier(&mut self, modifier: i32) {
        self.modifier = modifier.clamp(MIN_MODIFIER, MAX_MODIFIER);
    }

    /// Clamps to -99..100
    pub fn set_final_modifier(&mut self, modifier: i32) {
        self.final_modifier = modifier.clamp(MIN_MODIFIER, MAX_MODIFIER);
    }

    /// A floor of 1 (or less) is the same as no floor. The floor always stays
    /// below the highest face.
    pub fn set_minimum(&mut self, minimum: Option<u32>) {
        self.minimum = minimum
            .filter(|&m| m > 1)
            .map(|m| m.min(self.die_faces.saturating_sub(1)))
            .filter(|&m| m > 1);
    }

    /// Lowest face the next roll can produce.
    pub fn floor(&self) -> u32 {
        self.minimum
            .map_or(1, |m| m.clamp(1, self.die_faces.saturating_sub(1).max(1)))
    }

    /// Rounds an odd die down to the even size below it. Returns true if the
    /// config changed.
    pub fn round_down_odd(&mut self) -> bool {
        if self.die_faces % 2 == 0 {
            return false;
        }
        self.die_faces -= 1;
        // d3 -> d2 can leave a floor that is no longer below the top face
        self.set_minimum(self.minimum);
        true
    }

    /// Spinner step: `value += step * direction`, clamped to the field range.
    pub fn step(&mut self, field: Field, direction: i32, faces_step: u32) {
        match field {
            Field::DiceQty => {
                self.set_dice_qty((self.dice_qty as i32 + direction).max(0) as u32);
            }
            Field::DieFaces => {
                let next = self.die_faces as i32 + direction * faces_step as i32;
                self.set_die_faces(next.max(0) as u32);
                self.set_minimum(self.minimum);
            }
            Field::Modifier => self.set_modifier(self.modifier + direction),
            Field::FinalModifier => self.set_final_modifier(self.final_modifier + direction),
            Field::Minimum => {
                let next = self.floor() as i32 + direction;
                self.set_minimum(Some(next.max(0) as u32));
            }
        }
    }

    /// Compact notation such as `3d6+1`.
    pub fn notation(&self) -> String {
        let mut s = format!("{}d{}", self.dice_qty, self.die_faces);
        if self.modifier != 0 {
            s.push_str(&format!("{:+}", self.modifier));
        }
        s
    }
}

/// A single dice-rolling unit. `faces` and `results_text` are what the row
/// currently shows, which is the record under the group's history cursor
/// after any navigation.
#[derive(Debug, Clone)]
pub struct Roller {
    pub id: u64,
    pub name: String,
    pub config: RollerConfig,
    pub faces: Vec<Face>,
    pub results_text: String,
    pub history: Vec<Outcome>,
}

impl Roller {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self::with_config(id, name, RollerConfig::default())
    }

    pub fn with_config(id: u64, name: impl Into<String>, config: RollerConfig) -> Self {
        let mut roller = Self {
            id,
            name: name.into(),
            config,
            faces: Vec::new(),
            results_text: String::new(),
            history: Vec::new(),
        };
        roller.reset();
        roller
    }

    /// Same name and configuration, fresh display, no history.
    pub fn duplicate(&self, id: u64) -> Self {
        Self::with_config(id, self.name.clone(), self.config)
    }

    /// Shows one blank face per die.
    pub fn reset(&mut self) {
        self.faces = vec![Face::blank(); self.config.dice_qty as usize];
        self.apply_modifiers();
    }

    /// Recomputes the results text from the shown faces and current
    /// modifiers.
    pub fn apply_modifiers(&mut self) {
        let (_, text) =
            format_results(&self.faces, self.config.modifier, self.config.final_modifier);
        self.results_text = text;
    }

    /// Rolls with the current configuration and appends the outcome to the
    /// history.
    pub fn roll(
        &mut self,
        allow_odd: bool,
        entropy: &mut dyn EntropySource,
        timestamp: &str,
    ) -> &Outcome {
        let result = engine::roll(&mut self.config, allow_odd, entropy);
        self.faces = result.faces;
        self.results_text = result.text;
        tracing::debug!(
            roller = %self.name,
            dice = %self.config.notation(),
            result = %self.results_text,
            "rolled"
        );
        self.history.push(self.snapshot(timestamp));
        &self.history[self.history.len() - 1]
    }

    /// Records what the row shows right now.
    pub fn snapshot(&self, timestamp: &str) -> Outcome {
        Outcome {
            results_text: self.results_text.clone(),
            ..Outcome::new(&self.config, self.faces.clone(), timestamp)
        }
    }

    /// The record used to pad the history of a roller that never rolled.
    pub fn placeholder(&self, timestamp: &str) -> Outcome {
        let blanks = vec![Face::blank(); self.config.dice_qty as usize];
        Outcome::new(&self.config, blanks, timestamp)
    }

    /// Loads a history record into the row, configuration included.
    pub fn show(&mut self, outcome: &Outcome) {
        self.config = outcome.config();
        self.faces = outcome.results.clone();
        self.results_text = outcome.results_text.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_roller_defaults() {
        let roller = Roller::new(1, "Roller 1");
        assert_eq!(roller.config.dice_qty, 1);
        assert_eq!(roller.config.die_faces, 10);
        assert_eq!(roller.results_text, "0 = 0");
        assert!(roller.history.is_empty());
    }

    #[test]
    fn test_config_setters_clamp() {
        let config = RollerConfig::new(0, 500, -1000, 1000);
        assert_eq!(config.dice_qty, 1);
        assert_eq!(config.die_faces, 100);
        assert_eq!(config.modifier, -99);
        assert_eq!(config.final_modifier, 100);

        let config = RollerConfig::new(150, 1, 0, 0);
        assert_eq!(config.dice_qty, 99);
        assert_eq!(config.die_faces, 2);
    }

    #[test]
    fn test_minimum_stays_below_top_face() {
        let mut config = RollerConfig::new(1, 6, 0, 0);
        config.set_minimum(Some(9));
        assert_eq!(config.minimum, Some(5));
        assert_eq!(config.floor(), 5);

        config.set_minimum(Some(1));
        assert_eq!(config.minimum, None);
        assert_eq!(config.floor(), 1);
    }

    #[test]
    fn test_round_down_odd() {
        let mut config = RollerConfig::new(1, 7, 0, 0);
        assert!(config.round_down_odd());
        assert_eq!(config.die_faces, 6);
        assert!(!config.round_down_odd());
        assert_eq!(config.die_faces, 6);
    }

    #[test]
    fn test_round_down_odd_pulls_minimum_with_it() {
        let mut config = RollerConfig::new(1, 3, 0, 0);
        config.set_minimum(Some(2));
        config.round_down_odd();
        assert_eq!(config.die_faces, 2);
        assert_eq!(config.minimum, None);
    }

    #[test]
    fn test_step_faces_by_two_when_odd_disallowed() {
        let mut config = RollerConfig::default();
        config.step(Field::DieFaces, 1, 2);
        assert_eq!(config.die_faces, 12);
        config.step(Field::DieFaces, -1, 1);
        assert_eq!(config.die_faces, 11);
    }

    #[test]
    fn test_step_clamps_at_range_edges() {
        let mut config = RollerConfig::new(99, 100, 100, -99);
        config.step(Field::DiceQty, 1, 1);
        config.step(Field::DieFaces, 1, 2);
        config.step(Field::Modifier, 1, 1);
        config.step(Field::FinalModifier, -1, 1);
        assert_eq!(config, RollerConfig::new(99, 100, 100, -99));

        let mut config = RollerConfig::new(1, 2, 0, 0);
        config.step(Field::DiceQty, -1, 1);
        config.step(Field::DieFaces, -1, 2);
        assert_eq!(config.dice_qty, 1);
        assert_eq!(config.die_faces, 2);
    }

    #[test]
    fn test_step_minimum_from_unset() {
        let mut config = RollerConfig::new(1, 6, 0, 0);
        config.step(Field::Minimum, 1, 1);
        assert_eq!(config.minimum, Some(2));
        config.step(Field::Minimum, -1, 1);
        assert_eq!(config.minimum, None);
        config.step(Field::Minimum, -1, 1);
        assert_eq!(config.minimum, None);
    }

    #[test]
    fn test_field_cycles() {
        assert_eq!(Field::DiceQty.prev(), Field::FinalModifier);
        assert_eq!(Field::FinalModifier.next(), Field::DiceQty);
        let mut field = Field::DiceQty;
        for _ in 0..Field::ALL.len() {
            field = field.next();
        }
        assert_eq!(field, Field::DiceQty);
    }

    #[test]
    fn test_reset_shows_one_blank_per_die() {
        let mut roller = Roller::with_config(1, "r", RollerConfig::new(3, 6, 1, 0));
        roller.reset();
        assert_eq!(roller.faces.len(), 3);
        assert_eq!(roller.results_text, "3 = 1 + 1 + 1");
    }

    #[test]
    fn test_show_overwrites_config_and_display() {
        let mut roller = Roller::new(1, "r");
        let record = Outcome::new(
            &RollerConfig::new(2, 8, 1, 3),
            vec![Face::rolled(8, 8), Face::rolled(4, 8)],
            "10:00:00",
        );
        roller.show(&record);
        assert_eq!(roller.config, RollerConfig::new(2, 8, 1, 3));
        assert_eq!(roller.results_text, record.results_text);
        assert_eq!(roller.results_text, "17 = \u{25b2}9 + 5");
    }

    #[test]
    fn test_placeholder_matches_blank_display() {
        let roller = Roller::with_config(1, "r", RollerConfig::new(2, 6, 0, 0));
        let placeholder = roller.placeholder("09:00:00");
        assert_eq!(placeholder.results_text, "0 = 0 + 0");
        assert_eq!(placeholder.timestamp, "09:00:00");
    }

    #[test]
    fn test_notation() {
        assert_eq!(RollerConfig::new(3, 6, 1, 0).notation(), "3d6+1");
        assert_eq!(RollerConfig::new(1, 20, -2, 0).notation(), "1d20-2");
        assert_eq!(RollerConfig::default().notation(), "1d10");
    }
}
