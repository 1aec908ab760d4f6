// Application identity
pub const APP_NAME: &str = "Poly Rolly";
pub const APP_DIR_NAME: &str = ".polyrolly";
pub const LOG_FILE_NAME: &str = "polyrolly.log";

// Roller field ranges
pub const MIN_DICE_QTY: u32 = 1;
pub const MAX_DICE_QTY: u32 = 99;
pub const MIN_DIE_FACES: u32 = 2;
pub const MAX_DIE_FACES: u32 = 100;
pub const MIN_MODIFIER: i32 = -99;
pub const MAX_MODIFIER: i32 = 100;

// Fresh roller: 1d10 + 0
pub const DEFAULT_DICE_QTY: u32 = 1;
pub const DEFAULT_DIE_FACES: u32 = 10;

// Result formatting
pub const CRITICAL_MARKER: char = '\u{25b2}';
pub const FUMBLE_MARKER: char = '\u{25bc}';
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";
pub const EMPTY_HISTORY_LABEL: &str = "History";
pub const MAX_RESULT_WIDTH: usize = 80;

// Save file
pub const SETTINGS_KEY: &str = "settings";
pub const NAME_COLLISION_SUFFIX: char = '!';
pub const ODD_STEP_ALLOWED: u32 = 1;
pub const ODD_STEP_DISALLOWED: u32 = 2;
pub const SAVE_EXTENSION: &str = "json";
pub const DEFAULT_SAVE_NAME: &str = "rolls.json";

// random.org integer generator
pub const RANDOM_ORG_URL: &str = "https://www.random.org/integers/";
pub const REMOTE_MIN_INTERVAL_MS: u64 = 100;
pub const REMOTE_TIMEOUT_SECS: u64 = 5;

// Event loop
pub const INPUT_POLL_MS: u64 = 50;
pub const HISTORY_JUMP: i64 = 10;
