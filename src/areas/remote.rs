//! Remote ref discovery over smart HTTP
//!
//! Only the initial `info/refs` advertisement is requested; no pack is
//! negotiated or transferred.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::protocol::advertisement::RefAdvertisement;
use crate::artifacts::protocol::{MAX_ADVERTISEMENT_BYTES, RECEIVE_PACK_SERVICE};
use crate::errors::TwigError;
use bytes::{Bytes, BytesMut};
use derive_new::new;
use reqwest::{Client, Response};
use tracing::{debug, info};

/// HTTP Basic credentials for the remote
#[derive(Clone, PartialEq, Eq, new)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Remote {
    url: String,
    client: Client,
}

impl Remote {
    pub fn new(url: impl Into<String>) -> Self {
        Remote {
            url: url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn discovery_url(&self) -> String {
        format!("{}/info/refs?service={RECEIVE_PACK_SERVICE}", self.url)
    }

    /// Fetch and parse the receive-pack ref advertisement
    pub async fn discover_refs(&self, credentials: &Credentials) -> anyhow::Result<RefAdvertisement> {
        let url = self.discovery_url();
        debug!(%url, username = %credentials.username, "requesting ref advertisement");

        let response = self
            .client
            .get(&url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await?
            .error_for_status()?;
        let body = read_capped_body(response).await?;

        let advertisement = RefAdvertisement::parse(&body)?;
        debug!(
            refs = advertisement.refs.len(),
            capabilities = advertisement.capabilities.len(),
            "parsed ref advertisement"
        );

        Ok(advertisement)
    }

    /// Digest the remote's first advertised ref points at; `None` for an empty remote
    pub async fn fetch_remote_head(&self, credentials: &Credentials) -> anyhow::Result<Option<ObjectId>> {
        let head = self.discover_refs(credentials).await?.head;

        match &head {
            Some(oid) => info!(url = %self.url, head = %oid, "discovered remote head"),
            None => info!(url = %self.url, "remote has no commits"),
        }

        Ok(head)
    }
}

fn too_large() -> anyhow::Error {
    TwigError::ProtocolMismatch(format!(
        "ref advertisement exceeds {MAX_ADVERTISEMENT_BYTES} bytes"
    ))
    .into()
}

/// Collect the response body, refusing anything past [`MAX_ADVERTISEMENT_BYTES`]
async fn read_capped_body(mut response: Response) -> anyhow::Result<Bytes> {
    if response
        .content_length()
        .is_some_and(|length| length > MAX_ADVERTISEMENT_BYTES as u64)
    {
        return Err(too_large());
    }

    let mut body = BytesMut::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > MAX_ADVERTISEMENT_BYTES {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}
