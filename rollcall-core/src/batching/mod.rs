//! src/batching/mod.rs
//!
//! Packs member tokens into messages that stay under the per-message budget.
//!
//! Every token has two renderings: the mention that is actually sent and the
//! display name the client draws in its place. A batch is sized by adding up
//! the *larger* of the two renderings for each token, so both the sent text and
//! the drawn text stay under the budget. Packing is greedy: a batch is sealed as
//! soon as the next token would bring the running size to the budget or past it.

use tracing::{debug, trace};

use rollcall_common::error::Error;
use rollcall_common::models::batch::Batch;
use rollcall_common::models::member::{text_len, MemberToken};

/// Hard cap the platform enforces on a single message.
pub const PLATFORM_MESSAGE_LIMIT: usize = 2000;

/// Default budget, leaving headroom below [`PLATFORM_MESSAGE_LIMIT`].
pub const DEFAULT_MESSAGE_BUDGET: usize = 1800;

/// Incremental form of [`partition`]. Callers must run [`validate_tokens`]
/// first; `push` assumes every token fits on its own.
pub struct BatchComposer {
    budget: usize,
    current: Batch,
    sealed: Vec<Batch>,
}

impl BatchComposer {
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            current: Batch::default(),
            sealed: Vec::new(),
        }
    }

    pub fn push(&mut self, token: &MemberToken) {
        let candidate = token.worst_case_len();
        if self.current.worst_case_len + candidate < self.budget {
            self.current.push(token);
            trace!(
                "token fits => batch now {} tokens, worst case {}",
                self.current.token_count, self.current.worst_case_len
            );
            return;
        }

        let full = std::mem::replace(&mut self.current, Batch::starting_with(token));
        debug!(
            "sealing batch #{} => {} tokens, worst case {} of {}",
            self.sealed.len(),
            full.token_count,
            full.worst_case_len,
            self.budget
        );
        self.sealed.push(full);
    }

    /// Seals whatever is left and returns every batch in order.
    pub fn finish(mut self) -> Vec<Batch> {
        if !self.current.is_empty() {
            self.sealed.push(self.current);
        }
        self.sealed
    }
}

/// Rejects any token whose mention or display rendering cannot fit in a
/// message by itself.
pub fn validate_tokens(tokens: &[MemberToken], budget: usize) -> Result<(), Error> {
    for (index, token) in tokens.iter().enumerate() {
        let mention = text_len(&token.mention_text);
        let display = text_len(&token.display_text);
        let length = mention.max(display);
        if length >= budget {
            return Err(Error::PreconditionViolation { index, length, budget });
        }
    }
    Ok(())
}

/// Splits `tokens` into the batches that go out as separate messages, in order.
pub fn partition(tokens: &[MemberToken], budget: usize) -> Result<Vec<Batch>, Error> {
    validate_tokens(tokens, budget)?;

    let mut composer = BatchComposer::new(budget);
    for token in tokens {
        composer.push(token);
    }
    Ok(composer.finish())
}
