//! Roller groups and their shared history cursor.
//!
//! Every roller in a group keeps its own history, but the histories are
//! always the same length so one cursor can index all of them. Rolling the
//! whole group appends to every roller; rolling a single roller backfills
//! the others. Moving the cursor "time travels": each roller's row,
//! configuration included, is overwritten with the record under the cursor.

use super::constants::EMPTY_HISTORY_LABEL;
use super::outcome::timestamp_now;
use super::roller::{Field, Roller};
use crate::entropy::EntropySource;

/// Where to move a group's history cursor. Out-of-range targets clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryTarget {
    Offset(i64),
    Absolute(i64),
    First,
    Last,
}

#[derive(Debug, Clone)]
pub struct RollerGroup {
    pub id: u64,
    pub name: String,
    pub rollers: Vec<Roller>,
    pub cursor: usize,
    pub collapsed: bool,
    /// Timestamp of the record under the cursor.
    pub label: String,
}

impl RollerGroup {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            rollers: Vec::new(),
            cursor: 0,
            collapsed: false,
            label: EMPTY_HISTORY_LABEL.to_string(),
        }
    }

    pub fn history_len(&self) -> usize {
        self.rollers.first().map_or(0, |r| r.history.len())
    }

    /// Pads shorter histories up to the longest one. Each padded roller
    /// repeats its latest record (or a placeholder if it has none), stamped
    /// with the longest history's timestamps. Returns true if anything was
    /// padded.
    pub fn align_histories(&mut self) -> bool {
        let Some(longest) = self.rollers.iter().max_by_key(|r| r.history.len()) else {
            return false;
        };
        let timestamps: Vec<String> = longest.history.iter().map(|h| h.timestamp.clone()).collect();

        let mut padded = false;
        for roller in &mut self.rollers {
            for timestamp in &timestamps[roller.history.len()..] {
                let mut record = match roller.history.last() {
                    Some(last) => last.clone(),
                    None => roller.placeholder(timestamp),
                };
                record.timestamp = timestamp.clone();
                roller.history.push(record);
                padded = true;
            }
        }
        padded
    }

    pub fn roller_index(&self, roller_id: u64) -> Option<usize> {
        self.rollers.iter().position(|r| r.id == roller_id)
    }

    /// Moves the cursor and republishes the selected record into every
    /// roller. Returns false when there is no history to move through.
    pub fn navigate(&mut self, target: HistoryTarget) -> bool {
        let len = self.history_len();
        if len == 0 {
            return false;
        }

        let last = len as i64 - 1;
        let desired = match target {
            HistoryTarget::Offset(offset) => (self.cursor as i64).saturating_add(offset),
            HistoryTarget::Absolute(index) => index,
            HistoryTarget::First => 0,
            HistoryTarget::Last => last,
        };
        self.cursor = desired.clamp(0, last) as usize;
        self.republish();
        true
    }

    fn republish(&mut self) {
        let cursor = self.cursor;
        for roller in &mut self.rollers {
            if let Some(record) = roller.history.get(cursor).cloned() {
                roller.show(&record);
                self.label = record.timestamp.clone();
            }
        }
    }

    /// Rolls every roller and moves the cursor to the new records.
    pub fn roll_all(&mut self, allow_odd: bool, entropy: &mut dyn EntropySource) {
        let timestamp = timestamp_now();
        for roller in &mut self.rollers {
            roller.roll(allow_odd, entropy, &timestamp);
        }
        self.navigate(HistoryTarget::Last);
    }

    /// Rolls one roller. Every other roller repeats its latest record (or a
    /// placeholder if it has none) so the histories stay aligned.
    pub fn roll_one(
        &mut self,
        index: usize,
        allow_odd: bool,
        entropy: &mut dyn EntropySource,
    ) -> bool {
        if index >= self.rollers.len() {
            return false;
        }

        let timestamp = timestamp_now();
        self.rollers[index].roll(allow_odd, entropy, &timestamp);

        for (i, roller) in self.rollers.iter_mut().enumerate() {
            if i == index {
                continue;
            }
            let mut record = match roller.history.last() {
                Some(last) => last.clone(),
                None => roller.placeholder(&timestamp),
            };
            record.timestamp = timestamp.clone();
            roller.history.push(record);
        }

        self.navigate(HistoryTarget::Last);
        true
    }

    /// Steps one field of one roller.
    ///
    /// Changing the dice count resets the row to blank faces. Changing either
    /// modifier re-totals the shown faces and amends the record under the
    /// cursor, so a forgotten modifier can be fixed after the roll.
    pub fn edit_roller(&mut self, index: usize, field: Field, direction: i32, faces_step: u32) -> bool {
        let cursor = self.cursor;
        let Some(roller) = self.rollers.get_mut(index) else {
            return false;
        };

        let before = roller.config;
        roller.config.step(field, direction, faces_step);
        if roller.config == before {
            return false;
        }

        match field {
            Field::DiceQty => roller.reset(),
            Field::Modifier | Field::FinalModifier => {
                roller.apply_modifiers();
                let (modifier, final_modifier) =
                    (roller.config.modifier, roller.config.final_modifier);
                if let Some(record) = roller.history.get_mut(cursor) {
                    record.amend(modifier, final_modifier);
                }
            }
            Field::DieFaces | Field::Minimum => {}
        }
        true
    }

    /// Rounds every odd die in the group down to an even size.
    pub fn round_down_odd(&mut self) -> bool {
        let mut changed = false;
        for roller in &mut self.rollers {
            changed |= roller.config.round_down_odd();
        }
        changed
    }

    pub fn clear_history(&mut self) {
        for roller in &mut self.rollers {
            roller.reset();
            roller.history.clear();
        }
        self.cursor = 0;
        self.label = EMPTY_HISTORY_LABEL.to_string();
    }

    /// Inserts a roller right after `after` (or at the end). The newcomer's
    /// history is padded with snapshots of its own blank row, stamped with
    /// the neighbour's timestamps.
    pub fn insert_roller(&mut self, after: usize, mut roller: Roller) -> usize {
        let position = (after + 1).min(self.rollers.len());
        let timestamps: Vec<String> = self
            .rollers
            .get(after)
            .or_else(|| self.rollers.first())
            .map(|r| r.history.iter().map(|h| h.timestamp.clone()).collect())
            .unwrap_or_default();

        roller.history = timestamps.iter().map(|ts| roller.snapshot(ts)).collect();
        self.rollers.insert(position, roller);
        position
    }

    /// Moves a roller by `offset` places. Moving past the end stops at the
    /// end; moving above the top is ignored.
    pub fn move_roller(&mut self, index: usize, offset: i64) -> Option<usize> {
        move_item(&mut self.rollers, index, offset)
    }

    /// The last roller of a group cannot be removed.
    pub fn remove_roller(&mut self, index: usize) -> bool {
        if self.rollers.len() <= 1 || index >= self.rollers.len() {
            return false;
        }
        self.rollers.remove(index);
        true
    }
}

/// Shared by rollers within a group and groups within a session.
pub(crate) fn move_item<T>(items: &mut Vec<T>, index: usize, offset: i64) -> Option<usize> {
    if index >= items.len() {
        return None;
    }
    let destination = index as i64 + offset;
    if destination < 0 {
        return None;
    }
    let destination = (destination as usize).min(items.len() - 1);
    let item = items.remove(index);
    items.insert(destination, item);
    Some(destination)
}
