// File: src/platforms/mod.rs

use async_trait::async_trait;

use crate::Error;
use rollcall_common::models::member::Member;
use rollcall_common::models::message::MessageHandle;

/// Supplies the members an operation should list or mention, in order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberSource: Send + Sync {
    /// `Ok(None)` means the member set could not be determined at all,
    /// which is different from an empty set.
    async fn list_members(&self) -> Result<Option<Vec<Member>>, Error>;
}

/// Side-effecting half of a listing: posts new messages or rewrites one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, text: &str) -> Result<MessageHandle, Error>;
    async fn edit(&self, target: &MessageHandle, text: &str) -> Result<(), Error>;
    async fn fetch_content(&self, target: &MessageHandle) -> Result<String, Error>;
}

pub mod discord;
