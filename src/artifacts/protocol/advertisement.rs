use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::protocol::pkt_line::{PktLine, read_packets};
use crate::artifacts::protocol::RECEIVE_PACK_SERVICE;
use crate::errors::TwigError;
use derive_new::new;

/// Pseudo-ref an empty repository advertises to carry its capabilities
const CAPABILITIES_PSEUDO_REF: &str = "capabilities^{}";

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RemoteRef {
    pub name: String,
    pub oid: ObjectId,
}

/// Refs and capabilities a remote advertises for `git-receive-pack`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefAdvertisement {
    /// Digest on the first ref line; `None` when the remote has no commits
    pub head: Option<ObjectId>,
    pub refs: Vec<RemoteRef>,
    pub capabilities: Vec<String>,
}

fn mismatch(reason: impl Into<String>) -> anyhow::Error {
    TwigError::ProtocolMismatch(reason.into()).into()
}

fn parse_oid(field: &str) -> anyhow::Result<ObjectId> {
    if field.len() != OBJECT_ID_LENGTH {
        return Err(mismatch(format!("expected a 40-hex digest, got {field:?}")));
    }
    ObjectId::try_parse(field.to_string()).map_err(|e| mismatch(e.to_string()))
}

impl RefAdvertisement {
    /// Parse the body of `GET <url>/info/refs?service=git-receive-pack`
    pub fn parse(body: &[u8]) -> anyhow::Result<Self> {
        let packets = read_packets(body)?;
        let expected = format!("# service={RECEIVE_PACK_SERVICE}");

        match packets.first().and_then(PktLine::as_str) {
            Some(line) if line == expected => {}
            other => return Err(mismatch(format!("expected {expected:?}, got {other:?}"))),
        }
        if packets.get(1) != Some(&PktLine::Flush) {
            return Err(mismatch("missing flush after service announcement"));
        }

        let first_ref = packets
            .get(2)
            .and_then(PktLine::as_str)
            .ok_or_else(|| mismatch("no ref line in advertisement"))?;
        let head = parse_oid(first_ref.get(..OBJECT_ID_LENGTH).unwrap_or(first_ref))?;

        let mut advertisement = RefAdvertisement {
            head: (!head.is_null()).then_some(head),
            ..Default::default()
        };

        for (i, packet) in packets[2..].iter().enumerate() {
            let Some(line) = packet.as_str() else { break };

            let (line, capabilities) = match line.split_once('\0') {
                Some((line, capabilities)) if i == 0 => (line, Some(capabilities)),
                Some(_) => return Err(mismatch("capabilities after the first ref line")),
                None => (line, None),
            };
            if let Some(capabilities) = capabilities {
                advertisement.capabilities =
                    capabilities.split_whitespace().map(String::from).collect();
            }

            let (oid, name) = line
                .split_once(' ')
                .ok_or_else(|| mismatch(format!("malformed ref line {line:?}")))?;
            if name != CAPABILITIES_PSEUDO_REF {
                advertisement
                    .refs
                    .push(RemoteRef::new(name.to_string(), parse_oid(oid)?));
            }
        }

        Ok(advertisement)
    }
}
