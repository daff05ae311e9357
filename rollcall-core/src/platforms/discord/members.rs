use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use twilight_http::Client as HttpClient;
use twilight_model::channel::ChannelType;
use twilight_model::guild::Member as GuildMember;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, RoleMarker, UserMarker};
use twilight_model::id::Id;

use crate::platforms::MemberSource;
use crate::Error;
use rollcall_common::models::member::{resolve_display_name, Member};

/// Largest page the guild member list endpoint hands out.
const GUILD_MEMBER_PAGE: u16 = 1000;
/// Largest page the thread member list endpoint hands out.
const THREAD_MEMBER_PAGE: u32 = 100;

fn to_member(member: &GuildMember) -> Member {
    Member::new(
        member.user.id.to_string(),
        resolve_display_name(
            member.nick.as_deref(),
            member.user.global_name.as_deref(),
            &member.user.name,
        ),
    )
}

fn is_thread(kind: ChannelType) -> bool {
    matches!(
        kind,
        ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::AnnouncementThread
    )
}

/// Decides where the next page starts, or `None` when paging is done.
///
/// Stops on a short page, an empty page, or a cursor that did not move
/// forward (an endpoint that ignored `after` would otherwise loop forever).
pub fn next_cursor<T>(
    previous: Option<Id<T>>,
    page_last: Option<Id<T>>,
    page_len: usize,
    page_size: usize,
) -> Option<Id<T>> {
    if page_len < page_size {
        return None;
    }
    let last = page_last?;
    match previous {
        Some(prev) if last <= prev => None,
        _ => Some(last),
    }
}

/// Every member of a guild, in the order the API returns them.
pub async fn fetch_guild_members(
    http: &HttpClient,
    guild_id: Id<GuildMarker>,
) -> Result<Vec<GuildMember>, Error> {
    let mut members = Vec::new();
    let mut after: Option<Id<UserMarker>> = None;

    loop {
        let mut request = http.guild_members(guild_id).limit(GUILD_MEMBER_PAGE);
        if let Some(last) = after {
            request = request.after(last);
        }
        let page = request
            .await
            .map_err(|e| Error::transport("fetch guild members", e))?
            .models()
            .await
            .map_err(|e| Error::transport("fetch guild members", e))?;

        let cursor = next_cursor(
            after,
            page.last().map(|m| m.user.id),
            page.len(),
            GUILD_MEMBER_PAGE as usize,
        );
        members.extend(page);

        match cursor {
            Some(next) => after = Some(next),
            None => break,
        }
    }

    debug!("fetched {} members of guild {guild_id}", members.len());
    Ok(members)
}

/// User ids of everyone who joined a thread.
pub async fn fetch_thread_member_ids(
    http: &HttpClient,
    thread_id: Id<ChannelMarker>,
) -> Result<HashSet<Id<UserMarker>>, Error> {
    let mut ids = HashSet::new();
    let mut after: Option<Id<UserMarker>> = None;

    loop {
        // the endpoint only honours `after`/`limit` when members are included
        let mut request = http
            .thread_members(thread_id)
            .with_member(true)
            .limit(THREAD_MEMBER_PAGE);
        if let Some(last) = after {
            request = request.after(last);
        }
        let page = request
            .await
            .map_err(|e| Error::transport("fetch thread members", e))?
            .models()
            .await
            .map_err(|e| Error::transport("fetch thread members", e))?;

        let cursor = next_cursor(
            after,
            page.iter().filter_map(|m| m.user_id).last(),
            page.len(),
            THREAD_MEMBER_PAGE as usize,
        );
        ids.extend(page.iter().filter_map(|m| m.user_id));

        match cursor {
            Some(next) => after = Some(next),
            None => break,
        }
    }

    Ok(ids)
}

/// Guild members who have joined a given thread.
pub struct ThreadMemberSource {
    http: Arc<HttpClient>,
    thread_id: Id<ChannelMarker>,
}

impl ThreadMemberSource {
    pub fn new(http: Arc<HttpClient>, thread_id: Id<ChannelMarker>) -> Self {
        Self { http, thread_id }
    }
}

#[async_trait]
impl MemberSource for ThreadMemberSource {
    async fn list_members(&self) -> Result<Option<Vec<Member>>, Error> {
        let channel = self
            .http
            .channel(self.thread_id)
            .await
            .map_err(|e| Error::transport("fetch channel", e))?
            .model()
            .await
            .map_err(|e| Error::transport("fetch channel", e))?;

        if !is_thread(channel.kind) {
            return Err(Error::missing(format!("channel {} is not a thread", self.thread_id)));
        }
        let Some(guild_id) = channel.guild_id else {
            info!("(ThreadMemberSource) thread {} has no guild; nothing to list", self.thread_id);
            return Ok(None);
        };

        let in_thread = fetch_thread_member_ids(&self.http, self.thread_id).await?;
        let everyone = fetch_guild_members(&self.http, guild_id).await?;

        let members: Vec<Member> = everyone
            .iter()
            .filter(|m| in_thread.contains(&m.user.id))
            .map(to_member)
            .collect();

        info!(
            "(ThreadMemberSource) thread {} => {} of {} guild members",
            self.thread_id,
            members.len(),
            everyone.len()
        );
        Ok(Some(members))
    }
}

/// Guild members holding a given role.
pub struct RoleMemberSource {
    http: Arc<HttpClient>,
    guild_id: Id<GuildMarker>,
    role_id: Id<RoleMarker>,
}

impl RoleMemberSource {
    pub fn new(http: Arc<HttpClient>, guild_id: Id<GuildMarker>, role_id: Id<RoleMarker>) -> Self {
        Self { http, guild_id, role_id }
    }
}

#[async_trait]
impl MemberSource for RoleMemberSource {
    async fn list_members(&self) -> Result<Option<Vec<Member>>, Error> {
        let roles = self
            .http
            .roles(self.guild_id)
            .await
            .map_err(|e| Error::transport("fetch roles", e))?
            .models()
            .await
            .map_err(|e| Error::transport("fetch roles", e))?;

        if !roles.iter().any(|r| r.id == self.role_id) {
            return Err(Error::missing(format!(
                "could not find role {} in guild {}",
                self.role_id, self.guild_id
            )));
        }

        let everyone = fetch_guild_members(&self.http, self.guild_id).await?;
        let members: Vec<Member> = everyone
            .iter()
            .filter(|m| m.roles.contains(&self.role_id))
            .map(to_member)
            .collect();

        info!(
            "(RoleMemberSource) role {} => {} of {} guild members",
            self.role_id,
            members.len(),
            everyone.len()
        );
        Ok(Some(members))
    }
}
