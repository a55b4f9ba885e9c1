use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_INTERVAL: &str = "1h";
pub const DEFAULT_SECONDS: u64 = 3600;

static INTERVAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)(h|m|s)").expect("interval regex is valid"));

/// Converts "1h", "30m" or "45s" into seconds.
///
/// The first `<ASCII digits><unit>` found anywhere in the lower-cased text wins.
/// Anything without such a match means one hour. A digit run too large for a
/// `u64` counts as 1.
pub fn parse(text: &str) -> u64 {
    let lowered = text.to_lowercase();
    let Some(caps) = INTERVAL_RE.captures(&lowered) else {
        return DEFAULT_SECONDS;
    };

    let count: u64 = caps[1].parse().unwrap_or(1);
    let unit = match &caps[2] {
        "h" => 3600,
        "m" => 60,
        _ => 1,
    };
    count.saturating_mul(unit)
}

/// Time between two rotation cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    seconds: u64,
}

impl Interval {
    pub fn from_secs(seconds: u64) -> Self {
        Self { seconds }
    }

    pub fn parse(text: &str) -> Self {
        Self::from_secs(parse(text))
    }

    pub fn as_secs(&self) -> u64 {
        self.seconds
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.seconds)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::from_secs(DEFAULT_SECONDS)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.seconds;
        if s != 0 && s % 3600 == 0 {
            write!(f, "{}h", s / 3600)
        } else if s != 0 && s % 60 == 0 {
            write!(f, "{}m", s / 60)
        } else {
            write!(f, "{}s", s)
        }
    }
}
