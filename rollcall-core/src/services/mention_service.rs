// File: src/services/mention_service.rs

use tracing::{debug, error, info, warn};

use crate::batching::partition;
use crate::platforms::{MemberSource, MessageSink};
use crate::Error;
use rollcall_common::models::batch::Batch;
use rollcall_common::models::member::MemberToken;
use rollcall_common::models::message::{MessageHandle, RestorableTarget};

/// A member set that resolved and fits the budget, ready to go out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBatches {
    pub member_count: usize,
    pub batches: Vec<Batch>,
}

/// Lists or mentions a member set through a [`MessageSink`], one message per batch.
///
/// Sends and edits are awaited one at a time, in batch order.
pub struct MentionService {
    budget: usize,
}

impl MentionService {
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Resolves the member set and packs it, without touching any message.
    ///
    /// `Ok(None)` means the source could not determine a member set. Every
    /// lookup and budget error surfaces here, before any side effect.
    pub async fn prepare(&self, source: &dyn MemberSource) -> Result<Option<PreparedBatches>, Error> {
        let Some(members) = source.list_members().await? else {
            return Ok(None);
        };
        let tokens: Vec<MemberToken> = members.iter().map(MemberToken::from).collect();
        let batches = partition(&tokens, self.budget)?;
        Ok(Some(PreparedBatches {
            member_count: tokens.len(),
            batches,
        }))
    }

    /// Posts the member list as fresh messages.
    ///
    /// Returns how many members were listed, or `None` if the source could not
    /// determine a member set.
    pub async fn post_listing(
        &self,
        source: &dyn MemberSource,
        sink: &dyn MessageSink,
    ) -> Result<Option<usize>, Error> {
        let Some(prepared) = self.prepare(source).await? else {
            info!("(MentionService) no member set available => nothing posted");
            return Ok(None);
        };
        let batches = &prepared.batches;

        for (i, batch) in batches.iter().enumerate() {
            debug!("(MentionService) posting batch {}/{} ({} members)", i + 1, batches.len(), batch.token_count);
            sink.send(&batch.mention_text).await?;
        }

        info!("(MentionService) listed {} members in {} messages", prepared.member_count, batches.len());
        Ok(Some(prepared.member_count))
    }

    /// Mentions every member by rewriting `target` once per batch, then puts
    /// the message's original content back. An empty or unknown member set
    /// leaves the message untouched.
    pub async fn broadcast_via_edit(
        &self,
        source: &dyn MemberSource,
        sink: &dyn MessageSink,
        target: &MessageHandle,
    ) -> Result<Option<usize>, Error> {
        let Some(prepared) = self.prepare(source).await? else {
            info!("(MentionService) no member set available => message untouched");
            return Ok(None);
        };
        if prepared.batches.is_empty() {
            info!("(MentionService) member set is empty => message untouched");
            return Ok(Some(0));
        }

        let original_content = sink.fetch_content(target).await?;
        let target = RestorableTarget {
            handle: target.clone(),
            original_content,
        };
        self.overwrite_then_restore(sink, &target, &prepared.batches).await?;

        info!(
            "(MentionService) mentioned {} members over {} edits of message {}",
            prepared.member_count,
            prepared.batches.len(),
            target.handle.message_id
        );
        Ok(Some(prepared.member_count))
    }

    /// Like [`broadcast_via_edit`](Self::broadcast_via_edit), but posts
    /// `placeholder` as the message to rewrite. Nothing is posted unless the
    /// member set resolved, passed the budget check and is non-empty.
    pub async fn broadcast_via_placeholder(
        &self,
        source: &dyn MemberSource,
        sink: &dyn MessageSink,
        placeholder: &str,
    ) -> Result<Option<usize>, Error> {
        let Some(prepared) = self.prepare(source).await? else {
            info!("(MentionService) no member set available => no placeholder posted");
            return Ok(None);
        };
        if prepared.batches.is_empty() {
            info!("(MentionService) member set is empty => no placeholder posted");
            return Ok(Some(0));
        }

        let handle = sink.send(placeholder).await?;
        let target = RestorableTarget {
            handle,
            original_content: placeholder.to_string(),
        };
        self.overwrite_then_restore(sink, &target, &prepared.batches).await?;

        info!(
            "(MentionService) mentioned {} members over {} edits of placeholder {}",
            prepared.member_count,
            prepared.batches.len(),
            target.handle.message_id
        );
        Ok(Some(prepared.member_count))
    }

    /// Edits `target` to each batch in turn and finishes with one more edit
    /// back to `original_content`, even for a single batch.
    ///
    /// If an edit fails part-way, one restore is attempted before the
    /// original error is returned.
    pub async fn overwrite_then_restore(
        &self,
        sink: &dyn MessageSink,
        target: &RestorableTarget,
        batches: &[Batch],
    ) -> Result<(), Error> {
        for (i, batch) in batches.iter().enumerate() {
            debug!("(MentionService) edit {}/{} ({} members)", i + 1, batches.len(), batch.token_count);
            if let Err(e) = sink.edit(&target.handle, &batch.mention_text).await {
                warn!("(MentionService) edit {} failed => {e}; restoring original content", i + 1);
                if let Err(restore_err) = sink.edit(&target.handle, &target.original_content).await {
                    error!(
                        "(MentionService) could not restore message {} => {restore_err}",
                        target.handle.message_id
                    );
                }
                return Err(e);
            }
        }

        sink.edit(&target.handle, &target.original_content).await
    }
}
