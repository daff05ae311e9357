/// A guild member as seen by a listing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user_id: String,
    pub display_name: String,
}

impl Member {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// One member's two renderings. Both strings carry their own leading space,
/// so tokens can be concatenated directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberToken {
    /// Transmitted form, e.g. ` <@123>`.
    pub mention_text: String,
    /// Sizing-only form, e.g. ` @alice`. Never sent.
    pub display_text: String,
}

impl MemberToken {
    pub fn new(mention_text: impl Into<String>, display_text: impl Into<String>) -> Self {
        Self {
            mention_text: mention_text.into(),
            display_text: display_text.into(),
        }
    }

    /// The larger of the two renderings; this is what counts against the budget.
    pub fn worst_case_len(&self) -> usize {
        let mention = text_len(&self.mention_text);
        let display = text_len(&self.display_text);
        if display > mention { display } else { mention }
    }
}

impl From<&Member> for MemberToken {
    fn from(member: &Member) -> Self {
        MemberToken {
            mention_text: format!(" <@{}>", member.user_id),
            display_text: format!(" @{}", member.display_name),
        }
    }
}

/// Message length as the platform counts it (UTF-16 code units).
pub fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Guild nickname, then global name, then username.
pub fn resolve_display_name(nick: Option<&str>, global_name: Option<&str>, username: &str) -> String {
    nick.filter(|n| !n.is_empty())
        .or(global_name.filter(|g| !g.is_empty()))
        .unwrap_or(username)
        .to_string()
}
