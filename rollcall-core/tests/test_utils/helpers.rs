// File: rollcall-core/tests/test_utils/helpers.rs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rollcall_core::platforms::{MemberSource, MessageSink};
use rollcall_core::Error;
use rollcall_common::models::member::Member;
use rollcall_common::models::message::MessageHandle;

/// Serves a fixed member set.
pub struct StaticMembers(pub Option<Vec<Member>>);

#[async_trait]
impl MemberSource for StaticMembers {
    async fn list_members(&self) -> Result<Option<Vec<Member>>, Error> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Send(String),
    Edit(String),
    Fetch,
}

/// In-memory channel: remembers every call and keeps one editable message.
pub struct RecordingSink {
    pub calls: Mutex<Vec<SinkCall>>,
    pub content: Mutex<String>,
    /// Fail the edit with this 1-based index (0 = never fail).
    pub fail_on_edit: usize,
    /// Fail the send with this 1-based index (0 = never fail).
    pub fail_on_send: usize,
    edits: AtomicUsize,
}

impl RecordingSink {
    pub fn with_message(content: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            content: Mutex::new(content.to_string()),
            fail_on_edit: 0,
            fail_on_send: 0,
            edits: AtomicUsize::new(0),
        }
    }

    pub fn failing_on_edit(content: &str, n: usize) -> Self {
        Self { fail_on_edit: n, ..Self::with_message(content) }
    }

    pub fn failing_on_send(n: usize) -> Self {
        Self { fail_on_send: n, ..Self::with_message("") }
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn content(&self) -> String {
        self.content.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SinkCall::Send(text) => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send(&self, text: &str) -> Result<MessageHandle, Error> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(SinkCall::Send(text.to_string()));
        if calls.len() == self.fail_on_send {
            return Err(Error::transport("send message", "simulated rejection"));
        }
        Ok(MessageHandle::new("1", calls.len().to_string()))
    }

    async fn edit(&self, _target: &MessageHandle, text: &str) -> Result<(), Error> {
        let n = self.edits.fetch_add(1, Ordering::SeqCst) + 1;
        self.calls.lock().unwrap().push(SinkCall::Edit(text.to_string()));
        if n == self.fail_on_edit {
            return Err(Error::transport("edit message", "simulated rejection"));
        }
        *self.content.lock().unwrap() = text.to_string();
        Ok(())
    }

    async fn fetch_content(&self, _target: &MessageHandle) -> Result<String, Error> {
        self.calls.lock().unwrap().push(SinkCall::Fetch);
        Ok(self.content())
    }
}

/// `count` members with snowflake-sized ids and names of varying length.
pub fn guild_members(count: usize) -> Vec<Member> {
    (0..count)
        .map(|i| {
            Member::new(
                (300_000_000_000_000_000u64 + i as u64).to_string(),
                format!("raider-{i}-{}", "z".repeat(i % 17)),
            )
        })
        .collect()
}
