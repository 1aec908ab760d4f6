//! Where dice values come from.
//!
//! The roll engine only sees [`EntropySource`]. The default is the operating
//! system's CSPRNG; random.org can be switched on and silently falls back to
//! the local generator whenever it misbehaves.

pub mod local;
pub mod remote;

pub use local::LocalEntropy;
pub use remote::{Fetch, RemoteEntropy, UreqFetch};

/// Supplies `count` uniform values in `[low, high]`.
///
/// Implementations never fail: a source that cannot deliver must fall back
/// to one that can.
pub trait EntropySource {
    fn faces(&mut self, count: usize, low: u32, high: u32) -> Vec<u32>;
}

/// The two sources a session switches between with the random.org toggle.
pub struct Dice {
    local: Box<dyn EntropySource>,
    remote: Box<dyn EntropySource>,
}

impl Dice {
    pub fn new(local: Box<dyn EntropySource>, remote: Box<dyn EntropySource>) -> Self {
        Self { local, remote }
    }

    /// OS randomness locally, random.org remotely.
    pub fn system() -> Self {
        Self::new(
            Box::new(LocalEntropy::system()),
            Box::new(RemoteEntropy::random_org()),
        )
    }

    pub fn source(&mut self, use_remote: bool) -> &mut dyn EntropySource {
        if use_remote {
            self.remote.as_mut()
        } else {
            self.local.as_mut()
        }
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::system()
    }
}
