//! The JSON save file.
//!
//! Top level is an object keyed by group name, plus an optional `settings`
//! block. Each group holds its position and an object of rollers keyed by
//! roller name. Names are made unique on the way out by appending `!`, and
//! positions come from the `index` fields on the way in, so key order in the
//! file does not matter.

use crate::core::constants::{NAME_COLLISION_SUFFIX, SETTINGS_KEY};
use crate::core::group::RollerGroup;
use crate::core::outcome::{HistoryEntry, Outcome};
use crate::core::roller::RollerConfig;
use crate::core::settings::Settings;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct RollerEntry<H> {
    index: usize,
    history: Vec<H>,
    dice_qty: u32,
    die_faces: u32,
    #[serde(default)]
    modifier: i32,
    #[serde(default)]
    finalmod: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    minimum: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct GroupEntry {
    index: usize,
    rollers: Map<String, Value>,
}

/// A roller as read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRoller {
    pub name: String,
    pub config: RollerConfig,
    pub history: Vec<Outcome>,
}

/// A group as read from disk, rollers already in order.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedGroup {
    pub name: String,
    pub rollers: Vec<LoadedRoller>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveData {
    /// `None` for files written before settings were saved.
    pub settings: Option<Settings>,
    pub groups: Vec<LoadedGroup>,
}

fn invalid<E: std::fmt::Display>(e: E) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

/// Appends `!` until `name` is not taken.
pub fn unique_name(name: &str, taken: &Map<String, Value>) -> String {
    let mut unique = name.to_string();
    while taken.contains_key(&unique) {
        unique.push(NAME_COLLISION_SUFFIX);
    }
    unique
}

/// Renders the whole session as pretty-printed JSON.
pub fn render(groups: &[RollerGroup], settings: &Settings) -> io::Result<String> {
    let mut root = Map::new();
    root.insert(
        SETTINGS_KEY.to_string(),
        serde_json::to_value(settings).map_err(invalid)?,
    );

    for (group_index, group) in groups.iter().enumerate() {
        let mut rollers = Map::new();
        for (roller_index, roller) in group.rollers.iter().enumerate() {
            let entry = RollerEntry {
                index: roller_index,
                history: roller.history.clone(),
                dice_qty: roller.config.dice_qty,
                die_faces: roller.config.die_faces,
                modifier: roller.config.modifier,
                finalmod: roller.config.final_modifier,
                minimum: roller.config.minimum,
            };
            let name = unique_name(&roller.name, &rollers);
            rollers.insert(name, serde_json::to_value(entry).map_err(invalid)?);
        }

        let entry = GroupEntry {
            index: group_index,
            rollers,
        };
        let name = unique_name(&group.name, &root);
        root.insert(name, serde_json::to_value(entry).map_err(invalid)?);
    }

    serde_json::to_string_pretty(&Value::Object(root)).map_err(invalid)
}

/// Parses a save file. Either the whole file is understood or an
/// `InvalidData` error is returned.
pub fn parse(json: &str) -> io::Result<SaveData> {
    let mut root: Map<String, Value> = serde_json::from_str(json).map_err(invalid)?;

    let settings = root
        .remove(SETTINGS_KEY)
        .map(serde_json::from_value::<Settings>)
        .transpose()
        .map_err(invalid)?;

    let mut groups = Vec::with_capacity(root.len());
    for (group_name, value) in root {
        let entry: GroupEntry = serde_json::from_value(value)
            .map_err(|e| invalid(format!("group {:?}: {}", group_name, e)))?;

        let mut rollers = Vec::with_capacity(entry.rollers.len());
        for (roller_name, value) in entry.rollers {
            let raw: RollerEntry<HistoryEntry> = serde_json::from_value(value)
                .map_err(|e| invalid(format!("roller {:?}: {}", roller_name, e)))?;
            let mut config = RollerConfig::new(raw.dice_qty, raw.die_faces, raw.modifier, raw.finalmod);
            config.set_minimum(raw.minimum);
            let history = raw
                .history
                .into_iter()
                .map(|h| h.into_outcome(&config))
                .collect();
            rollers.push((
                raw.index,
                LoadedRoller {
                    name: roller_name,
                    config,
                    history,
                },
            ));
        }
        rollers.sort_by_key(|(index, _)| *index);

        groups.push((
            entry.index,
            LoadedGroup {
                name: group_name,
                rollers: rollers.into_iter().map(|(_, r)| r).collect(),
            },
        ));
    }
    groups.sort_by_key(|(index, _)| *index);

    Ok(SaveData {
        settings,
        groups: groups.into_iter().map(|(_, g)| g).collect(),
    })
}

pub fn read(path: &Path) -> io::Result<SaveData> {
    let json = fs::read_to_string(path)?;
    parse(&json)
}

pub fn write(path: &Path, groups: &[RollerGroup], settings: &Settings) -> io::Result<()> {
    let json = render(groups, settings)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::roller::Roller;

    fn sample_groups() -> Vec<RollerGroup> {
        let mut first = RollerGroup::new(1, "Attack");
        first.rollers.push(Roller::with_config(2, "Sword", RollerConfig::new(1, 20, 0, 5)));
        first.rollers.push(Roller::with_config(3, "Sword", RollerConfig::new(2, 6, 1, 0)));
        let mut second = RollerGroup::new(4, "Attack");
        second.rollers.push(Roller::new(5, "Roller 1"));
        vec![first, second]
    }

    #[test]
    fn test_unique_name() {
        let mut taken = Map::new();
        assert_eq!(unique_name("a", &taken), "a");
        taken.insert("a".into(), Value::Null);
        taken.insert("a!".into(), Value::Null);
        assert_eq!(unique_name("a", &taken), "a!!");
    }

    #[test]
    fn test_render_layout() {
        let json = render(&sample_groups(), &Settings::default()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["settings"]["allow_odd"], 2);
        assert_eq!(value["Attack"]["index"], 0);
        assert_eq!(value["Attack!"]["index"], 1);
        assert_eq!(value["Attack"]["rollers"]["Sword"]["finalmod"], 5);
        assert_eq!(value["Attack"]["rollers"]["Sword!"]["die_faces"], 6);
        assert_eq!(value["Attack"]["rollers"]["Sword!"]["index"], 1);
        assert!(value["Attack"]["rollers"]["Sword"].get("minimum").is_none());
    }

    #[test]
    fn test_group_named_settings_survives() {
        let mut groups = sample_groups();
        groups[0].name = "settings".to_string();
        let data = parse(&render(&groups, &Settings::default()).unwrap()).unwrap();
        assert_eq!(data.groups[0].name, "settings!");
        assert_eq!(data.groups.len(), 2);
    }

    #[test]
    fn test_parse_orders_by_index() {
        let json = r#"{
            "B": {"index": 1, "rollers": {
                "y": {"index": 1, "history": [], "dice_qty": 1, "die_faces": 4, "modifier": 0, "finalmod": 0},
                "x": {"index": 0, "history": [], "dice_qty": 2, "die_faces": 8, "modifier": 0, "finalmod": 0}
            }},
            "A": {"index": 0, "rollers": {
                "z": {"index": 0, "history": [], "dice_qty": 1, "die_faces": 10, "modifier": 0, "finalmod": 0}
            }}
        }"#;
        let data = parse(json).unwrap();
        assert!(data.settings.is_none());
        assert_eq!(data.groups[0].name, "A");
        assert_eq!(data.groups[1].name, "B");
        assert_eq!(data.groups[1].rollers[0].name, "x");
        assert_eq!(data.groups[1].rollers[0].config, RollerConfig::new(2, 8, 0, 0));
    }

    #[test]
    fn test_parse_legacy_history() {
        let json = r#"{
            "Group 1": {"index": 0, "rollers": {
                "Roller 1": {"index": 0, "history": [["5 = 5", 0], ["8 = 6", 2]],
                             "dice_qty": 1, "die_faces": 6, "modifier": 0, "finalmod": 2}
            }}
        }"#;
        let data = parse(json).unwrap();
        let roller = &data.groups[0].rollers[0];
        assert_eq!(roller.history.len(), 2);
        assert_eq!(roller.history[1].results_text, "8 = 6");
        assert_eq!(roller.history[1].final_modifier, 2);
        assert_eq!(roller.history[1].die_faces, 6);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("not json").is_err());
        assert!(parse(r#"{"G": {"index": "zero"}}"#).is_err());
        assert!(parse("[1, 2]").is_err());
    }
}
