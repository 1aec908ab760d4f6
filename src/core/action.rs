//! The repeatable actions behind "Repeat last action".
//!
//! Actions name their target by id rather than position, so repeating a
//! "move down" keeps moving the same group even though its index changed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastAction {
    RollGroup { group: u64 },
    RollRoller { roller: u64 },
    AddGroup { group: u64, clone: bool },
    MoveGroup { group: u64, offset: i64 },
    AddRoller { roller: u64, clone: bool },
    MoveRoller { roller: u64, offset: i64 },
}

impl LastAction {
    pub fn describe(&self) -> &'static str {
        match self {
            LastAction::RollGroup { .. } => "roll group",
            LastAction::RollRoller { .. } => "roll roller",
            LastAction::AddGroup { clone: false, .. } => "add group",
            LastAction::AddGroup { clone: true, .. } => "clone group",
            LastAction::MoveGroup { .. } => "move group",
            LastAction::AddRoller { clone: false, .. } => "add roller",
            LastAction::AddRoller { clone: true, .. } => "clone roller",
            LastAction::MoveRoller { .. } => "move roller",
        }
    }
}
