use crate::models::member::MemberToken;

/// A contiguous run of tokens that goes out as one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    /// Concatenated mention renderings; this is what gets transmitted.
    pub mention_text: String,
    /// Concatenated display renderings, kept for sizing and diagnostics only.
    pub display_text: String,
    /// Sum of each token's worst-case length.
    pub worst_case_len: usize,
    pub token_count: usize,
}

impl Batch {
    pub fn starting_with(token: &MemberToken) -> Self {
        let mut batch = Batch::default();
        batch.push(token);
        batch
    }

    pub fn push(&mut self, token: &MemberToken) {
        self.mention_text.push_str(&token.mention_text);
        self.display_text.push_str(&token.display_text);
        self.worst_case_len += token.worst_case_len();
        self.token_count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.token_count == 0
    }
}
