//! Smart-HTTP ref discovery
//!
//! - `pkt_line`: length-prefixed line framing
//! - `advertisement`: parsing of the ref advertisement a remote sends for `git-receive-pack`

pub mod advertisement;
pub mod pkt_line;

/// Service whose ref advertisement is requested
pub const RECEIVE_PACK_SERVICE: &str = "git-receive-pack";

/// Upper bound on the lines decoded from a single message
pub const MAX_LINES: usize = 1000;

/// Upper bound on the packets split out of one buffer
pub const MAX_PACKETS: usize = 65_536;

/// Largest ref advertisement body accepted from a remote
pub const MAX_ADVERTISEMENT_BYTES: usize = 1 << 20;
