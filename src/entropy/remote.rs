//! True random dice from random.org.
//!
//! One plain-text request fetches the whole batch. Calls are spaced at
//! least 100ms apart to stay inside the service's rate limits, and any
//! failure falls back to the local generator.

use super::{EntropySource, LocalEntropy};
use crate::core::constants::{RANDOM_ORG_URL, REMOTE_MIN_INTERVAL_MS, REMOTE_TIMEOUT_SECS};
use std::error::Error;
use std::thread;
use std::time::{Duration, Instant};

/// Performs one GET and returns the body of a 2xx response.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

pub struct UreqFetch {
    agent: ureq::Agent,
}

impl UreqFetch {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("polyrolly/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Fetch for UreqFetch {
    fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        // ureq reports non-2xx statuses as errors
        let body = self.agent.get(url).call()?.into_string()?;
        Ok(body)
    }
}

/// Query string for `count` integers in `[low, high]`, one column per value
/// so the reply is a single tab-separated line.
pub fn request_url(count: usize, low: u32, high: u32) -> String {
    format!(
        "{}?col={count}&num={count}&min={low}&max={high}&base=10&format=plain&rnd=new",
        RANDOM_ORG_URL
    )
}

/// Parses a tab/newline separated reply, insisting on exactly `count`
/// values inside `[low, high]`.
pub fn parse_batch(body: &str, count: usize, low: u32, high: u32) -> Result<Vec<u32>, Box<dyn Error>> {
    let values = body
        .split_whitespace()
        .map(str::parse::<u32>)
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() != count {
        return Err(format!("expected {} values, got {}", count, values.len()).into());
    }
    if let Some(bad) = values.iter().find(|v| !(low..=high).contains(*v)) {
        return Err(format!("value {} outside {}..={}", bad, low, high).into());
    }
    Ok(values)
}

pub struct RemoteEntropy<F = UreqFetch> {
    fetch: F,
    fallback: LocalEntropy,
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RemoteEntropy<UreqFetch> {
    pub fn random_org() -> Self {
        Self::new(UreqFetch::new(Duration::from_secs(REMOTE_TIMEOUT_SECS)))
    }
}

impl<F: Fetch> RemoteEntropy<F> {
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            fallback: LocalEntropy::system(),
            min_interval: Duration::from_millis(REMOTE_MIN_INTERVAL_MS),
            last_call: None,
        }
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    fn throttle(&self) {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                thread::sleep(self.min_interval - elapsed);
            }
        }
    }

    fn fetch_batch(&mut self, count: usize, low: u32, high: u32) -> Result<Vec<u32>, Box<dyn Error>> {
        self.throttle();
        let result = self.fetch.fetch(&request_url(count, low, high));
        self.last_call = Some(Instant::now());
        parse_batch(&result?, count, low, high)
    }
}

impl<F: Fetch> EntropySource for RemoteEntropy<F> {
    fn faces(&mut self, count: usize, low: u32, high: u32) -> Vec<u32> {
        if count == 0 {
            return Vec::new();
        }
        match self.fetch_batch(count, low, high) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("random.org unavailable, falling back to local entropy: {}", e);
                self.fallback.faces(count, low, high)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Replays canned bodies and remembers the URLs it was asked for.
    struct Canned {
        reply: Result<String, String>,
        urls: RefCell<Vec<String>>,
        calls: Cell<usize>,
    }

    impl Canned {
        fn ok(body: &str) -> Self {
            Self {
                reply: Ok(body.to_string()),
                urls: RefCell::new(Vec::new()),
                calls: Cell::new(0),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                reply: Err(reason.to_string()),
                ..Self::ok("")
            }
        }
    }

    impl Fetch for Canned {
        fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
            self.calls.set(self.calls.get() + 1);
            self.urls.borrow_mut().push(url.to_string());
            self.reply.clone().map_err(|e| e.into())
        }
    }

    #[test]
    fn test_request_url() {
        assert_eq!(
            request_url(3, 1, 6),
            "https://www.random.org/integers/?col=3&num=3&min=1&max=6&base=10&format=plain&rnd=new"
        );
    }

    #[test]
    fn test_parse_batch_tabs_and_newlines() {
        assert_eq!(parse_batch("6\t1\t4\n", 3, 1, 6).unwrap(), vec![6, 1, 4]);
        assert_eq!(parse_batch("2\n3\n", 2, 1, 6).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_parse_batch_rejects_bad_bodies() {
        assert!(parse_batch("Error: rate limited", 1, 1, 6).is_err());
        assert!(parse_batch("1\t2", 3, 1, 6).is_err());
        assert!(parse_batch("1\t9", 2, 1, 6).is_err());
        assert!(parse_batch("", 1, 1, 6).is_err());
    }

    #[test]
    fn test_remote_values_used() {
        let mut remote = RemoteEntropy::new(Canned::ok("6\t1\t4\n"));
        assert_eq!(remote.faces(3, 1, 6), vec![6, 1, 4]);
        assert_eq!(remote.fetch.urls.borrow()[0], request_url(3, 1, 6));
    }

    #[test]
    fn test_transport_error_falls_back() {
        let mut remote = RemoteEntropy::new(Canned::failing("connection refused"));
        let faces = remote.faces(5, 1, 20);
        assert_eq!(faces.len(), 5);
        assert!(faces.iter().all(|f| (1..=20).contains(f)));
    }

    #[test]
    fn test_malformed_body_falls_back() {
        let mut remote = RemoteEntropy::new(Canned::ok("<html>oops</html>"));
        let faces = remote.faces(4, 1, 6);
        assert_eq!(faces.len(), 4);
        assert!(faces.iter().all(|f| (1..=6).contains(f)));
    }

    #[test]
    fn test_calls_are_spaced() {
        let mut remote =
            RemoteEntropy::new(Canned::ok("3")).with_min_interval(Duration::from_millis(30));
        let start = Instant::now();
        remote.faces(1, 1, 6);
        remote.faces(1, 1, 6);
        remote.faces(1, 1, 6);
        assert!(start.elapsed() >= Duration::from_millis(60));
        assert_eq!(remote.fetch.calls.get(), 3);
    }

    #[test]
    fn test_zero_dice_skips_request() {
        let mut remote = RemoteEntropy::new(Canned::ok(""));
        assert!(remote.faces(0, 1, 6).is_empty());
        assert_eq!(remote.fetch.calls.get(), 0);
    }
}
