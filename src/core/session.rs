//! Application state: the ordered groups, the toggles, the current file and
//! every user-facing command.
//!
//! Each mutating command ends in `touch()`, which either marks the session
//! dirty or, with autosave on, writes it straight back to its file.

use super::action::LastAction;
use super::constants::APP_NAME;
use super::group::{move_item, HistoryTarget, RollerGroup};
use super::roller::{Field, Roller};
use super::settings::Settings;
use crate::entropy::Dice;
use crate::save_file;
use std::io;
use std::path::{Path, PathBuf};

pub struct Session {
    pub groups: Vec<RollerGroup>,
    pub settings: Settings,
    path: Option<PathBuf>,
    dirty: bool,
    last_action: Option<LastAction>,
    dice: Dice,
    next_id: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// One group with one roller, rolling with OS randomness.
    pub fn new() -> Self {
        Self::with_dice(Dice::system())
    }

    pub fn with_dice(dice: Dice) -> Self {
        let mut session = Self {
            groups: Vec::new(),
            settings: Settings::default(),
            path: None,
            dirty: false,
            last_action: None,
            dice,
            next_id: 1,
        };
        session.push_default_group();
        session
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn default_group(&mut self) -> RollerGroup {
        let mut group = RollerGroup::new(self.next_id(), format!("Group {}", self.groups.len() + 1));
        group.rollers.push(Roller::new(self.next_id(), "Roller 1"));
        group
    }

    fn push_default_group(&mut self) {
        let group = self.default_group();
        self.groups.push(group);
    }

    // ------------------------------------------------------------------
    // State queries
    // ------------------------------------------------------------------

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_action(&self) -> Option<LastAction> {
        self.last_action
    }

    pub fn group_index(&self, group_id: u64) -> Option<usize> {
        self.groups.iter().position(|g| g.id == group_id)
    }

    /// Finds a roller by id anywhere in the session.
    pub fn locate_roller(&self, roller_id: u64) -> Option<(usize, usize)> {
        self.groups
            .iter()
            .enumerate()
            .find_map(|(gi, g)| g.roller_index(roller_id).map(|ri| (gi, ri)))
    }

    /// `[*]<file> - Poly Rolly vX`, with "Unsaved" for a dirty session that
    /// never had a file.
    pub fn title(&self) -> String {
        let base = format!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
        let name = match &self.path {
            Some(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            None if self.dirty => "Unsaved".to_string(),
            None => return base,
        };
        let marker = if self.dirty { "*" } else { "" };
        format!("{}{} - {}", marker, name, base)
    }

    /// Marks an unsaved change, or saves right away when autosaving.
    fn touch(&mut self) {
        if self.settings.autosave && self.path.is_some() {
            if let Err(e) = self.save() {
                tracing::warn!("autosave failed: {}", e);
                self.dirty = true;
            }
        } else {
            self.dirty = true;
        }
    }

    fn record(&mut self, action: LastAction) {
        self.last_action = Some(action);
    }

    // ------------------------------------------------------------------
    // File commands
    // ------------------------------------------------------------------

    /// Back to a single default group with default settings and no file.
    pub fn reset(&mut self) {
        self.groups.clear();
        self.settings = Settings::default();
        self.path = None;
        self.dirty = false;
        self.last_action = None;
        self.push_default_group();
    }

    /// Writes to the current file. Fails with `NotFound` if there is none.
    pub fn save(&mut self) -> io::Result<()> {
        let path = self.path.clone().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "session has no file yet")
        })?;
        save_file::write(&path, &self.groups, &self.settings)?;
        self.dirty = false;
        tracing::info!(path = %path.display(), "saved");
        Ok(())
    }

    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> io::Result<()> {
        let path = path.into();
        save_file::write(&path, &self.groups, &self.settings)?;
        tracing::info!(path = %path.display(), "saved as");
        self.path = Some(path);
        self.dirty = false;
        Ok(())
    }

    /// Replaces the session with a save file. The file is fully parsed
    /// before anything changes, so a missing or broken file leaves the
    /// session as it was.
    pub fn load(&mut self, path: impl Into<PathBuf>) -> io::Result<()> {
        let path = path.into();
        let data = match save_file::read(&path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %path.display(), "load failed: {}", e);
                return Err(e);
            }
        };

        let mut groups = Vec::with_capacity(data.groups.len());
        for loaded in data.groups {
            let mut group = RollerGroup::new(self.next_id(), loaded.name);
            for loaded_roller in loaded.rollers {
                let mut roller = Roller::with_config(self.next_id(), loaded_roller.name, loaded_roller.config);
                roller.history = loaded_roller.history;
                group.rollers.push(roller);
            }
            if group.rollers.is_empty() {
                group.rollers.push(Roller::new(self.next_id(), "Roller 1"));
            }
            if group.align_histories() {
                tracing::warn!(group = %group.name, "uneven roller histories padded on load");
            }
            group.navigate(HistoryTarget::Last);
            groups.push(group);
        }
        if groups.is_empty() {
            groups.push(self.default_group());
        }

        tracing::info!(path = %path.display(), groups = groups.len(), "loaded");
        self.groups = groups;
        self.settings = data.settings.unwrap_or_default();
        self.path = Some(path);
        self.dirty = false;
        self.last_action = None;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Group commands
    // ------------------------------------------------------------------

    /// Adds a group after `index`. A clone copies the name and every
    /// roller's configuration, but not the history.
    pub fn add_group(&mut self, index: usize, clone: bool) -> Option<usize> {
        let source = self.groups.get(index)?;
        let source_id = source.id;

        let group = if clone {
            let source = source.clone();
            let mut group = RollerGroup::new(self.next_id(), source.name.clone());
            for roller in &source.rollers {
                let id = self.next_id();
                group.rollers.push(roller.duplicate(id));
            }
            group
        } else {
            self.default_group()
        };

        let position = (index + 1).min(self.groups.len());
        self.groups.insert(position, group);
        self.record(LastAction::AddGroup {
            group: source_id,
            clone,
        });
        self.touch();
        Some(position)
    }

    pub fn move_group(&mut self, index: usize, offset: i64) -> Option<usize> {
        let group_id = self.groups.get(index)?.id;
        self.record(LastAction::MoveGroup {
            group: group_id,
            offset,
        });
        let moved = move_item(&mut self.groups, index, offset);
        if moved.is_some_and(|to| to != index) {
            self.touch();
        }
        moved
    }

    /// The last group cannot be removed.
    pub fn remove_group(&mut self, index: usize) -> bool {
        if self.groups.len() <= 1 || index >= self.groups.len() {
            return false;
        }
        self.groups.remove(index);
        self.touch();
        true
    }

    pub fn rename_group(&mut self, index: usize, name: &str) -> bool {
        let Some(group) = self.groups.get_mut(index) else {
            return false;
        };
        if group.name == name {
            return false;
        }
        group.name = name.to_string();
        self.touch();
        true
    }

    /// Hides or shows a group's rollers. Display only.
    pub fn toggle_collapse(&mut self, index: usize) -> bool {
        match self.groups.get_mut(index) {
            Some(group) => {
                group.collapsed = !group.collapsed;
                true
            }
            None => false,
        }
    }

    pub fn clear_history(&mut self, index: usize) -> bool {
        let Some(group) = self.groups.get_mut(index) else {
            return false;
        };
        group.clear_history();
        self.touch();
        true
    }

    pub fn roll_group(&mut self, index: usize) -> bool {
        let allow_odd = self.settings.allow_odd;
        let use_remote = self.settings.use_random_org;
        let Some(group) = self.groups.get_mut(index) else {
            return false;
        };
        group.roll_all(allow_odd, self.dice.source(use_remote));
        let group_id = group.id;
        self.record(LastAction::RollGroup { group: group_id });
        self.touch();
        true
    }

    pub fn navigate(&mut self, index: usize, target: HistoryTarget) -> bool {
        let Some(group) = self.groups.get_mut(index) else {
            return false;
        };
        let before = group.cursor;
        if !group.navigate(target) {
            return false;
        }
        if group.cursor != before {
            self.touch();
        }
        true
    }

    // ------------------------------------------------------------------
    // Roller commands
    // ------------------------------------------------------------------

    /// Adds a roller after `roller` in group `group`. A clone copies the
    /// name and configuration.
    pub fn add_roller(&mut self, group: usize, roller: usize, clone: bool) -> Option<usize> {
        let id = self.next_id();
        let target = self.groups.get_mut(group)?;
        let source = target.rollers.get(roller)?;
        let source_id = source.id;

        let new_roller = if clone {
            source.duplicate(id)
        } else {
            Roller::new(id, format!("Roller {}", target.rollers.len() + 1))
        };
        let position = target.insert_roller(roller, new_roller);

        self.record(LastAction::AddRoller {
            roller: source_id,
            clone,
        });
        self.touch();
        Some(position)
    }

    pub fn move_roller(&mut self, group: usize, roller: usize, offset: i64) -> Option<usize> {
        let target = self.groups.get_mut(group)?;
        let roller_id = target.rollers.get(roller)?.id;
        let moved = target.move_roller(roller, offset);
        self.record(LastAction::MoveRoller {
            roller: roller_id,
            offset,
        });
        if moved.is_some_and(|to| to != roller) {
            self.touch();
        }
        moved
    }

    /// The last roller of a group cannot be removed.
    pub fn remove_roller(&mut self, group: usize, roller: usize) -> bool {
        let removed = self
            .groups
            .get_mut(group)
            .is_some_and(|g| g.remove_roller(roller));
        if removed {
            self.touch();
        }
        removed
    }

    pub fn rename_roller(&mut self, group: usize, roller: usize, name: &str) -> bool {
        let Some(target) = self
            .groups
            .get_mut(group)
            .and_then(|g| g.rollers.get_mut(roller))
        else {
            return false;
        };
        if target.name == name {
            return false;
        }
        target.name = name.to_string();
        self.touch();
        true
    }

    pub fn roll_roller(&mut self, group: usize, roller: usize) -> bool {
        let allow_odd = self.settings.allow_odd;
        let use_remote = self.settings.use_random_org;
        let Some(target) = self.groups.get_mut(group) else {
            return false;
        };
        let Some(roller_id) = target.rollers.get(roller).map(|r| r.id) else {
            return false;
        };
        target.roll_one(roller, allow_odd, self.dice.source(use_remote));
        self.record(LastAction::RollRoller { roller: roller_id });
        self.touch();
        true
    }

    /// Steps one field of a roller by `direction` (+1 or -1).
    pub fn edit_field(&mut self, group: usize, roller: usize, field: Field, direction: i32) -> bool {
        let faces_step = self.settings.faces_step();
        let changed = self
            .groups
            .get_mut(group)
            .is_some_and(|g| g.edit_roller(roller, field, direction, faces_step));
        if changed {
            self.touch();
        }
        changed
    }

    // ------------------------------------------------------------------
    // Toggles
    // ------------------------------------------------------------------

    pub fn toggle_random_org(&mut self) -> bool {
        self.settings.use_random_org = !self.settings.use_random_org;
        self.touch();
        self.settings.use_random_org
    }

    /// Disallowing odd dice rounds every odd die down straight away.
    pub fn toggle_allow_odd(&mut self) -> bool {
        self.settings.allow_odd = !self.settings.allow_odd;
        if !self.settings.allow_odd {
            for group in &mut self.groups {
                group.round_down_odd();
            }
        }
        self.touch();
        self.settings.allow_odd
    }

    pub fn toggle_always_on_top(&mut self) -> bool {
        self.settings.always_on_top = !self.settings.always_on_top;
        self.touch();
        self.settings.always_on_top
    }

    /// Turning autosave on saves immediately, so it needs a file. Returns
    /// the new state; `NotFound` means "save as first".
    pub fn toggle_autosave(&mut self) -> io::Result<bool> {
        if self.settings.autosave {
            self.settings.autosave = false;
            self.dirty = true;
            return Ok(false);
        }
        if self.path.is_none() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "autosave needs a file, save as first",
            ));
        }
        self.settings.autosave = true;
        if let Err(e) = self.save() {
            self.settings.autosave = false;
            return Err(e);
        }
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Repeat
    // ------------------------------------------------------------------

    /// Re-runs the most recent repeatable command. Returns false when there
    /// is none or its target no longer exists.
    pub fn repeat_last_action(&mut self) -> bool {
        let Some(action) = self.last_action else {
            return false;
        };
        match action {
            LastAction::RollGroup { group } => match self.group_index(group) {
                Some(gi) => self.roll_group(gi),
                None => false,
            },
            LastAction::RollRoller { roller } => match self.locate_roller(roller) {
                Some((gi, ri)) => self.roll_roller(gi, ri),
                None => false,
            },
            LastAction::AddGroup { group, clone } => self
                .group_index(group)
                .and_then(|gi| self.add_group(gi, clone))
                .is_some(),
            LastAction::MoveGroup { group, offset } => self
                .group_index(group)
                .and_then(|gi| self.move_group(gi, offset))
                .is_some(),
            LastAction::AddRoller { roller, clone } => self
                .locate_roller(roller)
                .and_then(|(gi, ri)| self.add_roller(gi, ri, clone))
                .is_some(),
            LastAction::MoveRoller { roller, offset } => self
                .locate_roller(roller)
                .and_then(|(gi, ri)| self.move_roller(gi, ri, offset))
                .is_some(),
        }
    }
}
