//! Pkt-line framing
//!
//! Each packet starts with a 4-digit hex length that counts itself. `0000` is
//! the flush packet that ends a section.

use crate::artifacts::protocol::{MAX_LINES, MAX_PACKETS};
use crate::errors::TwigError;
use bytes::Bytes;
use tracing::warn;

const LENGTH_PREFIX: usize = 4;
const MAX_PACKET_LEN: usize = 0xffff;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PktLine {
    Data(Bytes),
    Flush,
}

impl PktLine {
    /// Payload with one trailing newline removed; `None` for flush
    pub fn as_line(&self) -> Option<&[u8]> {
        match self {
            PktLine::Data(data) => Some(data.strip_suffix(b"\n").unwrap_or(&data[..])),
            PktLine::Flush => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_line().and_then(|line| std::str::from_utf8(line).ok())
    }
}

fn invalid(reason: String) -> anyhow::Error {
    TwigError::InvalidPktLine(reason).into()
}

/// Parse the packet starting at `data[offset..]`, returning it with the offset after it
fn parse_packet(data: &[u8], offset: usize) -> anyhow::Result<(PktLine, usize)> {
    let prefix = data
        .get(offset..offset + LENGTH_PREFIX)
        .ok_or_else(|| invalid(format!("truncated length prefix at byte {offset}")))?;

    if !prefix.iter().all(u8::is_ascii_hexdigit) {
        return Err(invalid(format!(
            "non-hex length prefix {:?}",
            String::from_utf8_lossy(prefix)
        )));
    }

    let prefix = std::str::from_utf8(prefix)
        .map_err(|e| invalid(format!("bad length prefix: {e}")))?;
    let length = usize::from_str_radix(prefix, 16)
        .map_err(|e| invalid(format!("bad length prefix {prefix:?}: {e}")))?;

    match length {
        0 => Ok((PktLine::Flush, offset + LENGTH_PREFIX)),
        1..LENGTH_PREFIX => Err(invalid(format!("length {length} is shorter than its prefix"))),
        _ => {
            let end = offset + length;
            let payload = data.get(offset + LENGTH_PREFIX..end).ok_or_else(|| {
                invalid(format!(
                    "packet declares {length} bytes but only {} remain",
                    data.len() - offset
                ))
            })?;

            Ok((PktLine::Data(Bytes::copy_from_slice(payload)), end))
        }
    }
}

/// Split a buffer into at most [`MAX_PACKETS`] packets until it is exhausted
pub fn read_packets(data: &[u8]) -> anyhow::Result<Vec<PktLine>> {
    let mut packets = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        if packets.len() == MAX_PACKETS {
            return Err(invalid(format!("more than {MAX_PACKETS} packets")));
        }

        let (packet, next) = parse_packet(data, offset)?;
        packets.push(packet);
        offset = next;
    }

    Ok(packets)
}

/// Decode one message: the lines up to the first flush packet or the end of data
pub fn extract_lines(data: &[u8]) -> anyhow::Result<Vec<Bytes>> {
    let mut lines = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        if lines.len() == MAX_LINES {
            warn!(max = MAX_LINES, "pkt-line message truncated");
            break;
        }

        let (packet, next) = parse_packet(data, offset)?;
        match packet.as_line() {
            Some(line) => lines.push(Bytes::copy_from_slice(line)),
            None => break,
        }
        offset = next;
    }

    Ok(lines)
}

/// Encode lines as newline-terminated packets followed by a flush packet
pub fn build_lines_data<L: AsRef<[u8]>>(lines: &[L]) -> anyhow::Result<Bytes> {
    let mut data = Vec::new();

    for line in lines {
        let line = line.as_ref();
        let length = line.len() + LENGTH_PREFIX + 1;
        if length > MAX_PACKET_LEN {
            return Err(invalid(format!(
                "line of {} bytes does not fit in a packet",
                line.len()
            )));
        }

        data.extend_from_slice(format!("{length:04x}").as_bytes());
        data.extend_from_slice(line);
        data.push(b'\n');
    }
    data.extend_from_slice(b"0000");

    Ok(Bytes::from(data))
}
