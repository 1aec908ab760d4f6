use super::constants::{ODD_STEP_ALLOWED, ODD_STEP_DISALLOWED};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Session-wide toggles, stored in the `settings` block of a save file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ask random.org for dice instead of the local generator.
    pub use_random_org: bool,
    /// Written as the die-faces spinner step: 1 when odd dice are allowed,
    /// 2 when they are not.
    #[serde(serialize_with = "odd_step_out", deserialize_with = "odd_step_in")]
    pub allow_odd: bool,
    pub always_on_top: bool,
    pub autosave: bool,
}

impl Settings {
    /// Step used when spinning the die faces field.
    pub fn faces_step(&self) -> u32 {
        if self.allow_odd {
            ODD_STEP_ALLOWED
        } else {
            ODD_STEP_DISALLOWED
        }
    }
}

fn odd_step_out<S: Serializer>(allow_odd: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    let step = if *allow_odd {
        ODD_STEP_ALLOWED
    } else {
        ODD_STEP_DISALLOWED
    };
    serializer.serialize_u32(step)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OddStep {
    Flag(bool),
    Step(u32),
}

fn odd_step_in<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match OddStep::deserialize(deserializer)? {
        OddStep::Flag(flag) => flag,
        OddStep::Step(step) => step == ODD_STEP_ALLOWED,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disallow_odd() {
        let settings = Settings::default();
        assert!(!settings.allow_odd);
        assert_eq!(settings.faces_step(), 2);
    }

    #[test]
    fn test_allow_odd_written_as_step() {
        let settings = Settings {
            allow_odd: true,
            ..Settings::default()
        };
        let json = serde_json::to_value(settings).unwrap();
        assert_eq!(json["allow_odd"], 1);
        assert_eq!(serde_json::to_value(Settings::default()).unwrap()["allow_odd"], 2);
    }

    #[test]
    fn test_allow_odd_reads_step_or_flag() {
        let a: Settings = serde_json::from_str(r#"{"allow_odd": 1}"#).unwrap();
        let b: Settings = serde_json::from_str(r#"{"allow_odd": 2}"#).unwrap();
        let c: Settings = serde_json::from_str(r#"{"allow_odd": true}"#).unwrap();
        assert!(a.allow_odd);
        assert!(!b.allow_odd);
        assert!(c.allow_odd);
    }

    #[test]
    fn test_missing_keys_default() {
        let settings: Settings = serde_json::from_str(r#"{"autosave": true}"#).unwrap();
        assert!(settings.autosave);
        assert!(!settings.use_random_org);
        assert!(!settings.allow_odd);
    }
}
