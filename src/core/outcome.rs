//! Roll outcomes: tagged die faces, the history record, and result formatting.

use super::constants::{CRITICAL_MARKER, FUMBLE_MARKER, TIMESTAMP_FORMAT};
use super::roller::RollerConfig;
use serde::{Deserialize, Serialize};

/// How a die face is highlighted in the results text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceTag {
    Normal,
    /// Landed on the highest face of the die.
    Critical,
    /// Landed on a one.
    Fumble,
}

/// A single die as rolled, before any modifier is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FaceRepr")]
pub struct Face {
    pub value: u32,
    pub tag: FaceTag,
}

impl Face {
    /// Tags a rolled value against the die it came from.
    pub fn rolled(value: u32, die_faces: u32) -> Self {
        let tag = if value == die_faces {
            FaceTag::Critical
        } else if value == 1 {
            FaceTag::Fumble
        } else {
            FaceTag::Normal
        };
        Self { value, tag }
    }

    /// The zero face shown by a roller that has not rolled yet.
    pub fn blank() -> Self {
        Self {
            value: 0,
            tag: FaceTag::Normal,
        }
    }

    pub fn contribution(&self, modifier: i32) -> i32 {
        self.value as i32 + modifier
    }

    pub fn term(&self, modifier: i32) -> String {
        let n = self.contribution(modifier);
        match self.tag {
            FaceTag::Critical => format!("{}{}", CRITICAL_MARKER, n),
            FaceTag::Fumble => format!("{}{}", FUMBLE_MARKER, n),
            FaceTag::Normal => n.to_string(),
        }
    }
}

/// Faces are written as `{"value": 6, "tag": "critical"}`. Older files
/// stored a bare number scaled by 1000 for a critical and by 0.001 for a
/// fumble.
#[derive(Deserialize)]
#[serde(untagged)]
enum FaceRepr {
    Tagged { value: u32, tag: FaceTag },
    Scaled(f64),
}

impl From<FaceRepr> for Face {
    fn from(repr: FaceRepr) -> Self {
        match repr {
            FaceRepr::Tagged { value, tag } => Face { value, tag },
            FaceRepr::Scaled(n) if n >= 1000.0 => Face {
                value: (n / 1000.0).round() as u32,
                tag: FaceTag::Critical,
            },
            FaceRepr::Scaled(n) if n > 0.0 && n < 1.0 => Face {
                value: (n * 1000.0).round() as u32,
                tag: FaceTag::Fumble,
            },
            FaceRepr::Scaled(n) => Face {
                value: n.max(0.0).round() as u32,
                tag: FaceTag::Normal,
            },
        }
    }
}

/// Sums the faces with their per-die modifier and renders
/// `"<total> = <term> + <term> ..."`.
pub fn format_results(faces: &[Face], modifier: i32, final_modifier: i32) -> (i32, String) {
    let total = faces.iter().map(|f| f.contribution(modifier)).sum::<i32>() + final_modifier;
    let terms = if faces.is_empty() {
        "0".to_string()
    } else {
        faces
            .iter()
            .map(|f| f.term(modifier))
            .collect::<Vec<_>>()
            .join(" + ")
    };
    (total, format!("{} = {}", total, terms))
}

/// Wall-clock time as stored on history records.
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// One entry of a roller's history: the configuration in effect, the faces
/// rolled and the text that was displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub dice_qty: u32,
    pub die_faces: u32,
    pub modifier: i32,
    #[serde(rename = "finalmod")]
    pub final_modifier: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<u32>,
    pub results_text: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub results: Vec<Face>,
}

impl Outcome {
    pub fn new(config: &RollerConfig, results: Vec<Face>, timestamp: &str) -> Self {
        let (_, results_text) =
            format_results(&results, config.modifier, config.final_modifier);
        Self {
            dice_qty: config.dice_qty,
            die_faces: config.die_faces,
            modifier: config.modifier,
            final_modifier: config.final_modifier,
            minimum: config.minimum,
            results_text,
            timestamp: timestamp.to_string(),
            results,
        }
    }

    /// The configuration this record was rolled with, clamped to the field
    /// ranges.
    pub fn config(&self) -> RollerConfig {
        let mut config =
            RollerConfig::new(self.dice_qty, self.die_faces, self.modifier, self.final_modifier);
        config.set_minimum(self.minimum);
        config
    }

    /// Rewrites the modifiers after the fact and re-totals the record's own
    /// faces. Records without faces keep their text.
    pub fn amend(&mut self, modifier: i32, final_modifier: i32) {
        self.modifier = modifier;
        self.final_modifier = final_modifier;
        if !self.results.is_empty() {
            self.results_text = format_results(&self.results, modifier, final_modifier).1;
        }
    }

    fn clamp_config(mut self) -> Self {
        let config = self.config();
        self.dice_qty = config.dice_qty;
        self.die_faces = config.die_faces;
        self.modifier = config.modifier;
        self.final_modifier = config.final_modifier;
        self.minimum = config.minimum;
        self
    }
}

/// A history entry as found on disk. Files written by the earliest versions
/// hold only the results text, or a `[text, final_modifier]` pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    Record(Outcome),
    Pair(String, i32),
    Text(String),
}

impl HistoryEntry {
    /// Legacy entries carry no configuration, so they borrow the roller's.
    /// Full records have theirs clamped into range.
    pub fn into_outcome(self, config: &RollerConfig) -> Outcome {
        match self {
            HistoryEntry::Record(outcome) => outcome.clamp_config(),
            HistoryEntry::Pair(text, final_modifier) => Outcome {
                final_modifier,
                results_text: text,
                ..Outcome::new(config, Vec::new(), "")
            },
            HistoryEntry::Text(text) => Outcome {
                results_text: text,
                ..Outcome::new(config, Vec::new(), "")
            },
        }
    }
}
