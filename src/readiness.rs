use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use uuid::Uuid;

/// Startup handshake between a spawned process and its parent.
///
/// Each binary writes exactly one JSON line to stdout once it is actually
/// ready to take traffic; everything else (logs) goes to stderr. The parent
/// reads stdout lines instead of sleeping for a fixed settle time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ReadyEvent {
    /// The gateway is bound and serving. Carries the actual port, which
    /// matters when the configured port was 0.
    Listening { port: u16 },
    /// A simulator registered its resource with the gateway.
    Registered { di: Uuid, href: String, endpoint: String },
}

/// Writes the event as a single flushed line on stdout.
pub fn announce(event: &ReadyEvent) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, event)?;
    writeln!(stdout)?;
    stdout.flush()
}
