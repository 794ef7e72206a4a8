/// What caused a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// First fetch right after start-up
    Startup,

    /// The fixed polling interval elapsed
    Interval,

    /// The user asked for a refresh
    Manual,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Trigger::Startup => "startup",
            Trigger::Interval => "interval",
            Trigger::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// Commands that can be sent to the monitor service
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch the feed now (no-op while a fetch is in flight)
    Refresh { trigger: Trigger },

    /// Stop the service
    Quit,
}
