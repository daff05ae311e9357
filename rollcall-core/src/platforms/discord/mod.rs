// File: src/platforms/discord/mod.rs

pub mod members;
pub mod sink;

use std::sync::Arc;
use std::time::Duration;

use twilight_http::client::ClientBuilder;
use twilight_http::Client as HttpClient;
use twilight_model::id::Id;

use crate::Error;

pub use members::{RoleMemberSource, ThreadMemberSource};
pub use sink::DiscordMessageSink;

/// Builds the REST client every adapter shares.
pub fn build_http_client(token: &str) -> Arc<HttpClient> {
    Arc::new(
        ClientBuilder::new()
            .token(token.to_string())
            .timeout(Duration::from_secs(30))
            .build(),
    )
}

/// Parses a snowflake given as a string. Zero is not a valid id.
pub fn parse_id<T>(raw: &str, what: &str) -> Result<Id<T>, Error> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .and_then(Id::new_checked)
        .ok_or_else(|| Error::missing(format!("invalid {what} ID: {raw:?}")))
}
