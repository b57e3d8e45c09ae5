use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::context::AppContext;
use crate::error::{AppError, Result};
use crate::ingest::register_channel;
use crate::models::{KeywordKind, NewKeyword, SortOrder, Video, VideoFilter, VideoQuery};

const WRAP_WIDTH: usize = 88;

#[derive(Parser, Debug)]
#[command(name = "video-curator")]
#[command(about = "Curate YouTube videos with AI summaries and recency scores")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive dashboard (default)
    Tui,
    /// Ingest a video by URL or ID
    Add { url: String },
    /// Pull recent uploads from every registered channel
    Refresh,
    /// List stored videos
    List {
        /// Case-insensitive title filter
        #[arg(short, long)]
        title: Option<String>,
        /// Earliest publish date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest publish date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Only bookmarked videos
        #[arg(long)]
        saved: bool,
        #[arg(long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,
        /// Print summaries under each entry
        #[arg(short, long)]
        verbose: bool,
    },
    /// Toggle the bookmark on a video
    Bookmark { id: i64 },
    /// Delete one or more videos
    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Show the AI report for a video, generating it if needed
    Report {
        id: i64,
        #[arg(long)]
        regenerate: bool,
    },
    #[command(subcommand)]
    Channel(ChannelCommand),
    #[command(subcommand)]
    Keyword(KeywordCommand),
    #[command(subcommand)]
    Group(GroupCommand),
}

#[derive(Subcommand, Debug)]
pub enum ChannelCommand {
    /// Register a channel by its YouTube channel ID
    Add { channel_id: String },
    Remove { id: i64 },
    List,
}

#[derive(Subcommand, Debug)]
pub enum KeywordCommand {
    Add {
        keyword: String,
        #[arg(long)]
        color: Option<String>,
        /// Hide matching videos instead of tagging them
        #[arg(long)]
        exclude: bool,
    },
    Remove { id: i64 },
    Color { id: i64, color: String },
    List,
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    Create {
        name: String,
        #[arg(long, default_value = "#6B7280")]
        color: String,
    },
    Rename { id: i64, name: String },
    Color { id: i64, color: String },
    Remove { id: i64 },
    /// Put a keyword into a group
    Assign { group_id: i64, keyword_id: i64 },
    Unassign { group_id: i64, keyword_id: i64 },
    List,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SortArg {
    Newest,
    Importance,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Newest => SortOrder::Newest,
            SortArg::Importance => SortOrder::Importance,
        }
    }
}

/// Runs a non-interactive command. `Tui` is handled by the caller.
pub async fn run(command: Command, ctx: &AppContext) -> Result<()> {
    match command {
        Command::Tui => Ok(()),

        Command::Add { url } => {
            let video = ctx.ingestor()?.ingest_url(&url).await?;
            println!("Added #{}: {}", video.id, video.title);
            print_video_details(&video);
            Ok(())
        }

        Command::Refresh => {
            let report = ctx.refresher()?.refresh_all().await?;
            println!(
                "Ingested {}, skipped {}, failed {}",
                report.ingested, report.skipped, report.failed
            );
            Ok(())
        }

        Command::List {
            title,
            from,
            to,
            saved,
            sort,
            verbose,
        } => {
            let query = VideoQuery {
                title,
                start_date: from,
                end_date: to,
                filter: if saved {
                    VideoFilter::Saved
                } else {
                    VideoFilter::All
                },
                sort: sort.into(),
            };
            let videos = ctx.repository.list_videos(query).await?;
            if videos.is_empty() {
                println!("No videos found");
            }
            for video in &videos {
                println!("{}", video_line(video));
                if verbose {
                    print_video_details(video);
                }
            }
            Ok(())
        }

        Command::Bookmark { id } => {
            let saved = ctx.repository.toggle_video_saved(id).await?;
            println!(
                "Video #{id} {}",
                if saved { "bookmarked" } else { "unbookmarked" }
            );
            Ok(())
        }

        Command::Delete { ids } => {
            let deleted = ctx.repository.delete_videos(ids).await?;
            println!("Deleted {deleted} video(s)");
            Ok(())
        }

        Command::Report { id, regenerate } => {
            let video = ctx
                .repository
                .get_video(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("video {id}")))?;
            let report = ctx.report_for(&video, regenerate).await?;
            println!("{}\n", video.title);
            println!("{}", report.content);
            Ok(())
        }

        Command::Channel(command) => run_channel(command, ctx).await,
        Command::Keyword(command) => run_keyword(command, ctx).await,
        Command::Group(command) => run_group(command, ctx).await,
    }
}

async fn run_channel(command: ChannelCommand, ctx: &AppContext) -> Result<()> {
    match command {
        ChannelCommand::Add { channel_id } => {
            let channel = register_channel(ctx.youtube()?, &ctx.repository, &channel_id).await?;
            println!("Registered #{}: {}", channel.id, channel.name);
        }
        ChannelCommand::Remove { id } => {
            if !ctx.repository.delete_channel(id).await? {
                return Err(AppError::NotFound(format!("channel {id}")));
            }
            println!("Removed channel #{id}");
        }
        ChannelCommand::List => {
            for channel in ctx.repository.get_all_channels().await? {
                println!("{:>4}  {}  {}", channel.id, channel.channel_id, channel.name);
            }
        }
    }
    Ok(())
}

async fn run_keyword(command: KeywordCommand, ctx: &AppContext) -> Result<()> {
    match command {
        KeywordCommand::Add {
            keyword,
            color,
            exclude,
        } => {
            let kind = if exclude {
                KeywordKind::Exclude
            } else {
                KeywordKind::Include
            };
            let mut new_keyword = NewKeyword::new(&keyword, kind);
            if let Some(color) = color {
                new_keyword.color = color;
            }
            let id = ctx.repository.insert_keyword(new_keyword).await?;
            println!("Added {kind} keyword #{id}: {}", keyword.trim());
        }
        KeywordCommand::Remove { id } => {
            if !ctx.repository.delete_keyword(id).await? {
                return Err(AppError::NotFound(format!("keyword {id}")));
            }
            println!("Removed keyword #{id}");
        }
        KeywordCommand::Color { id, color } => {
            ctx.repository.update_keyword_color(id, color).await?;
            println!("Updated keyword #{id}");
        }
        KeywordCommand::List => {
            for keyword in ctx.repository.get_all_keywords().await? {
                println!(
                    "{:>4}  {:<8} {}  {}",
                    keyword.id, keyword.kind, keyword.color, keyword.keyword
                );
            }
        }
    }
    Ok(())
}

async fn run_group(command: GroupCommand, ctx: &AppContext) -> Result<()> {
    let repo = &ctx.repository;
    match command {
        GroupCommand::Create { name, color } => {
            let id = repo.insert_tag_group(name.clone(), color).await?;
            println!("Created group #{id}: {name}");
        }
        GroupCommand::Rename { id, name } => {
            repo.update_tag_group(id, Some(name), None).await?;
            println!("Renamed group #{id}");
        }
        GroupCommand::Color { id, color } => {
            repo.update_tag_group(id, None, Some(color)).await?;
            println!("Updated group #{id}");
        }
        GroupCommand::Remove { id } => {
            repo.delete_tag_group(id).await?;
            println!("Removed group #{id}");
        }
        GroupCommand::Assign {
            group_id,
            keyword_id,
        } => {
            repo.add_keyword_to_group(group_id, keyword_id).await?;
            println!("Keyword #{keyword_id} added to group #{group_id}");
        }
        GroupCommand::Unassign {
            group_id,
            keyword_id,
        } => {
            if !repo.remove_keyword_from_group(group_id, keyword_id).await? {
                return Err(AppError::NotFound(format!(
                    "keyword {keyword_id} in group {group_id}"
                )));
            }
            println!("Keyword #{keyword_id} removed from group #{group_id}");
        }
        GroupCommand::List => {
            for group in repo.get_tag_groups().await? {
                let members: Vec<&str> =
                    group.members.iter().map(|m| m.keyword.as_str()).collect();
                println!(
                    "{:>4}  {}  {}: {}",
                    group.id,
                    group.color,
                    group.name,
                    members.join(", ")
                );
            }
        }
    }
    Ok(())
}

fn video_line(video: &Video) -> String {
    let star = if video.is_saved { "★" } else { " " };
    let duration = video.duration_label();
    format!(
        "{:>4} {star} [{}] {:>7} {:>8}  {}  {}",
        video.id,
        video.importance,
        video.score.map(|s| s.to_string()).unwrap_or_default(),
        duration,
        video.published_at.format("%Y-%m-%d"),
        video.title
    )
}

fn print_video_details(video: &Video) {
    if let Some(channel) = &video.channel_title {
        println!("      {channel}");
    }
    if let Some(tag) = &video.tag {
        println!("      tags: {tag}");
    }
    if let Some(summary) = video.summary.as_deref().filter(|s| !s.is_empty()) {
        let options = textwrap::Options::new(WRAP_WIDTH)
            .initial_indent("      ")
            .subsequent_indent("      ");
        println!("{}", textwrap::fill(summary, options));
    }
    println!("      {}", video.url);
}
