use clap::{Parser, Subcommand};
use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker, RoleMarker};

use rollcall_core::platforms::discord::{
    build_http_client, parse_id, DiscordMessageSink, RoleMemberSource, ThreadMemberSource,
};
use rollcall_core::services::MentionService;
use rollcall_core::RollcallConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "rollcall")]
#[command(author, version, about = "Rollcall - list or ping Discord thread members within message limits")]
struct Args {
    /// Bot token; falls back to DISCORD_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,

    /// Per-message character budget; falls back to ROLLCALL_MESSAGE_BUDGET, then 1800
    #[arg(long, global = true)]
    budget: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Post the members of a thread into that thread
    ListThread {
        #[arg(long)]
        thread_id: String,
    },

    /// Mention everyone holding a role by temporarily rewriting a message
    MentionRole {
        #[arg(long)]
        guild_id: String,

        #[arg(long)]
        role_id: String,

        /// Thread (or channel) holding the message to rewrite
        #[arg(long)]
        channel_id: String,

        /// Message to rewrite; a placeholder is posted when omitted
        #[arg(long)]
        message_id: Option<String>,
    },
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_log::LogTracer::init().context("Failed to bridge log records")?;
    let filter = EnvFilter::from_default_env()
        .add_directive("rollcall=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub).context("Failed to set global subscriber")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let config = RollcallConfig::from_env()?.with_overrides(args.token.clone(), args.budget);
    config.validate()?;

    if let Err(e) = run(args.command, &config).await {
        error!("Rollcall failed: {e}");
        return Err(e.into());
    }
    Ok(())
}

async fn run(command: Command, config: &RollcallConfig) -> Result<(), rollcall_core::Error> {
    let http = build_http_client(&config.discord_token);
    let service = MentionService::new(config.message_budget);
    info!("Rollcall starting. budget={}", service.budget());

    match command {
        Command::ListThread { thread_id } => {
            let thread_id = parse_id::<ChannelMarker>(&thread_id, "thread")?;
            let source = ThreadMemberSource::new(http.clone(), thread_id);
            let sink = DiscordMessageSink::new(http, thread_id);

            match service.post_listing(&source, &sink).await? {
                Some(n) => println!("{n} members listed"),
                None => println!("Could not determine the thread's members"),
            }
        }
        Command::MentionRole { guild_id, role_id, channel_id, message_id } => {
            let guild_id = parse_id::<GuildMarker>(&guild_id, "guild")?;
            let role_id = parse_id::<RoleMarker>(&role_id, "role")?;
            let channel_id = parse_id::<ChannelMarker>(&channel_id, "channel")?;

            let source = RoleMemberSource::new(http.clone(), guild_id, role_id);
            let sink = DiscordMessageSink::new(http, channel_id);

            let notified = match message_id {
                Some(raw) => {
                    let target = sink.handle_for(parse_id::<MessageMarker>(&raw, "message")?);
                    service.broadcast_via_edit(&source, &sink, &target).await?
                }
                None => {
                    let placeholder = format!("Adding <@&{role_id}> to this thread...");
                    service.broadcast_via_placeholder(&source, &sink, &placeholder).await?
                }
            };

            match notified {
                Some(n) => println!("{n} members notified"),
                None => println!("Could not determine the role's members"),
            }
        }
    }

    Ok(())
}
