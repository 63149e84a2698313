use serde::{Deserialize, Serialize};
use std::fmt;

/// Knowledge domain a file is ingested into.
///
/// The pipeline routes every file into exactly one of four collections;
/// the monitor mirrors that split when classifying finished files and
/// when aggregating per-domain counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Technical/intellectual content (specs, guides, code, API docs)
    Mind,
    /// Physical/operational content (logs, telemetry, system metrics)
    Body,
    /// Emotional/personal content (user preferences, personas, feedback)
    Heart,
    /// Ethical/governance content (security audits, compliance, policy)
    Soul,
}

impl Domain {
    /// All domains in their fixed display order.
    pub const ALL: [Domain; 4] = [Domain::Mind, Domain::Body, Domain::Heart, Domain::Soul];

    /// Capitalized label for notifications and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Domain::Mind => "Mind",
            Domain::Body => "Body",
            Domain::Heart => "Heart",
            Domain::Soul => "Soul",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
