//! Dice model, roll engine, history tracking and the session that ties
//! them together.

pub mod action;
pub mod constants;
pub mod engine;
pub mod group;
pub mod outcome;
pub mod roller;
pub mod session;
pub mod settings;

pub use action::LastAction;
pub use group::{HistoryTarget, RollerGroup};
pub use outcome::{Face, FaceTag, Outcome};
pub use roller::{Field, Roller, RollerConfig};
pub use session::Session;
pub use settings::Settings;
