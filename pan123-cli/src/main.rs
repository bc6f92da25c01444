use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use futures::{StreamExt, TryStreamExt};
use pan123_api::types::{
    DuplicatePolicy, FileInfo, ListQuery, OfflineTaskOptions, SearchMode, ShareExpiry,
    ShareOptions, ShareUpdate,
};
use pan123_api::upload::Progress;
use pan123_api::{Pan123Client, UploadOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pan123", version, about = "123pan Open Platform CLI")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a fresh access token
    Token {
        /// Print the token itself
        #[arg(long)]
        show: bool,
    },
    /// Show account and quota
    Me,
    /// List a folder
    Ls {
        /// Folder ID (0 = root)
        #[arg(default_value = "0")]
        folder_id: u64,
        /// Include trashed entries
        #[arg(short, long)]
        all: bool,
    },
    /// Search the drive
    Find {
        keyword: String,
        /// Exact match instead of fuzzy
        #[arg(short, long)]
        exact: bool,
        /// Max results
        #[arg(short, long, default_value = "100")]
        limit: usize,
    },
    /// Show file details
    Info { file_id: u64 },
    /// Create a folder
    Mkdir {
        name: String,
        /// Parent folder ID
        #[arg(short, long, default_value = "0")]
        parent: u64,
    },
    /// Move files into a folder
    Mv {
        #[arg(required = true)]
        file_ids: Vec<u64>,
        /// Target folder ID
        #[arg(short, long)]
        to: u64,
    },
    /// Rename a file or folder
    Rename { file_id: u64, new_name: String },
    /// Move files to the trash
    Rm {
        #[arg(required = true)]
        file_ids: Vec<u64>,
    },
    /// Copy a file into a folder
    Cp {
        file_id: u64,
        /// Target folder ID
        #[arg(short, long)]
        to: u64,
    },
    /// Upload a local file
    Upload {
        file: PathBuf,
        /// Parent folder ID
        #[arg(short, long, default_value = "0")]
        parent: u64,
        /// Name in the drive
        #[arg(short, long)]
        name: Option<String>,
        /// What to do when the name already exists
        #[arg(short, long)]
        duplicate: Option<DuplicateArg>,
    },
    /// Download a file
    Download {
        file_id: u64,
        /// Output path (default: the file's name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Recycle bin
    #[command(subcommand)]
    Trash(TrashCommand),
    /// Share links
    #[command(subcommand)]
    Share(ShareCommand),
    /// Offline downloads
    #[command(subcommand)]
    Offline(OfflineCommand),
    /// Direct links
    #[command(subcommand)]
    Link(LinkCommand),
    /// Image hosting
    #[command(subcommand)]
    Image(ImageCommand),
    /// Video transcoding
    #[command(subcommand)]
    Video(VideoCommand),
}

#[derive(Subcommand)]
enum TrashCommand {
    /// List trashed files
    List,
    /// Restore a file
    Restore { file_id: u64 },
    /// Delete a trashed file for good
    Purge { file_id: u64 },
    /// Empty the trash
    Empty {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ShareCommand {
    /// Create a share link
    Create {
        #[arg(required = true)]
        file_ids: Vec<u64>,
        /// Share name
        #[arg(short, long)]
        name: String,
        /// Validity in days: 0 (permanent), 1, 7 or 30
        #[arg(short, long, default_value = "7", value_parser = parse_expiry)]
        expire: ShareExpiry,
        /// Extraction code
        #[arg(short, long)]
        password: Option<String>,
    },
    /// List share links
    List,
    /// Change a share link
    Update {
        share_id: u64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, value_parser = parse_expiry)]
        expire: Option<ShareExpiry>,
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum OfflineCommand {
    /// Start an offline download
    Add {
        url: String,
        /// Target folder ID
        #[arg(short, long)]
        dir: Option<u64>,
        /// Target file name
        #[arg(short, long)]
        name: Option<String>,
        /// Callback URL
        #[arg(long)]
        callback: Option<String>,
    },
    /// Show task progress
    Status { task_id: u64 },
}

#[derive(Subcommand)]
enum LinkCommand {
    /// Direct URL of a file
    Url { file_id: u64 },
    /// Enable direct links for a folder
    Enable { folder_id: u64 },
    /// Disable direct links for a folder
    Disable { folder_id: u64 },
    /// Refresh the direct-link cache
    Refresh,
}

#[derive(Subcommand)]
enum ImageCommand {
    /// Upload an image
    Upload {
        file: PathBuf,
        /// Target folder ID
        #[arg(short, long)]
        dir: Option<u64>,
    },
    /// Copy an image from the drive
    Copy { file_id: u64 },
}

#[derive(Subcommand)]
enum VideoCommand {
    /// Start a transcode task
    Transcode {
        file_id: u64,
        #[arg(short, long, default_value = pan123_api::video::DEFAULT_RESOLUTION)]
        resolution: String,
        #[arg(short, long, default_value = pan123_api::video::DEFAULT_FORMAT)]
        format: String,
    },
    /// Show transcode progress
    Status { task_id: u64 },
    /// Play URL of a transcoded video
    Play { file_id: u64 },
}

#[derive(Clone, ValueEnum)]
enum DuplicateArg {
    KeepBoth,
    Overwrite,
}

impl From<DuplicateArg> for DuplicatePolicy {
    fn from(d: DuplicateArg) -> Self {
        match d {
            DuplicateArg::KeepBoth => Self::KeepBoth,
            DuplicateArg::Overwrite => Self::Overwrite,
        }
    }
}

fn parse_expiry(s: &str) -> std::result::Result<ShareExpiry, String> {
    let days: u32 = s.parse().map_err(|_| format!("not a number: {s}"))?;
    ShareExpiry::try_from(days).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let client = Pan123Client::new().context("failed to configure client")?;
    match cli.command {
        Command::Token { show } => cmd_token(&client, show).await,
        Command::Me => cmd_me(&client).await,
        Command::Ls { folder_id, all } => cmd_ls(&client, folder_id, all).await,
        Command::Find {
            keyword,
            exact,
            limit,
        } => cmd_find(&client, keyword, exact, limit).await,
        Command::Info { file_id } => cmd_info(&client, file_id).await,
        Command::Mkdir { name, parent } => {
            let id = client.create_folder(parent, &name).await?;
            println!("Created {name} (id={id})");
            Ok(())
        }
        Command::Mv { file_ids, to } => {
            client.move_files(&file_ids, to).await?;
            println!("Moved {} item(s) to {to}", file_ids.len());
            Ok(())
        }
        Command::Rename { file_id, new_name } => {
            client.rename_file(file_id, &new_name).await?;
            println!("Renamed {file_id} to {new_name}");
            Ok(())
        }
        Command::Rm { file_ids } => {
            client.trash_files(&file_ids).await?;
            println!("Moved {} item(s) to the trash", file_ids.len());
            Ok(())
        }
        Command::Cp { file_id, to } => {
            let id = client.copy_file(file_id, to).await?;
            println!("Copied {file_id} -> {id}");
            Ok(())
        }
        Command::Upload {
            file,
            parent,
            name,
            duplicate,
        } => cmd_upload(&client, file, parent, name, duplicate).await,
        Command::Download { file_id, output } => cmd_download(&client, file_id, output).await,
        Command::Trash(cmd) => cmd_trash(&client, cmd).await,
        Command::Share(cmd) => cmd_share(&client, cmd).await,
        Command::Offline(cmd) => cmd_offline(&client, cmd).await,
        Command::Link(cmd) => cmd_link(&client, cmd).await,
        Command::Image(cmd) => cmd_image(&client, cmd).await,
        Command::Video(cmd) => cmd_video(&client, cmd).await,
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[allow(clippy::cast_precision_loss)]
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

fn print_entry(f: &FileInfo) {
    let kind = if f.is_folder() { "d" } else { "-" };
    let size = if f.is_folder() {
        String::new()
    } else {
        human_size(f.size)
    };
    println!("  {kind} [{}] {:<40} {size:>10}", f.file_id, f.filename);
}

// ── account ──

async fn cmd_token(client: &Pan123Client, show: bool) -> Result<()> {
    let token = client.refresh_token().await?;
    println!("Expires: {}", token.expired_at);
    if show {
        println!("Token:   {}", token.access_token);
    }
    if let Some(store) = client.token_store() {
        println!("Cached:  {}", store.path().display());
    }
    Ok(())
}

async fn cmd_me(client: &Pan123Client) -> Result<()> {
    let me = client.user_info().await?;
    println!("User:  {} (uid={})", me.nickname, me.user_id);
    println!(
        "Space: {} / {}",
        human_size(me.space_used),
        human_size(me.space_capacity)
    );
    if let Some(vip) = me.vip {
        println!("VIP:   {vip}");
    }
    Ok(())
}

// ── files ──

async fn cmd_ls(client: &Pan123Client, folder_id: u64, all: bool) -> Result<()> {
    let entries: Vec<FileInfo> = client
        .list_all_files(ListQuery::in_folder(folder_id))
        .try_filter(|f| futures::future::ready(all || !f.trashed))
        .try_collect()
        .await?;
    for f in &entries {
        print_entry(f);
    }
    println!("\n{} item(s)", entries.len());
    Ok(())
}

async fn cmd_find(client: &Pan123Client, keyword: String, exact: bool, limit: usize) -> Result<()> {
    let mode = if exact {
        SearchMode::Exact
    } else {
        SearchMode::Fuzzy
    };
    let entries: Vec<FileInfo> = client
        .list_all_files(ListQuery::search(keyword, mode))
        .try_filter(|f| futures::future::ready(!f.trashed))
        .take(limit)
        .try_collect()
        .await?;
    for f in &entries {
        print_entry(f);
    }
    Ok(())
}

async fn cmd_info(client: &Pan123Client, file_id: u64) -> Result<()> {
    let f = client.file_info(file_id).await?;
    println!("Name:   {} (id={})", f.filename, f.file_id);
    println!("Type:   {}", if f.is_folder() { "folder" } else { "file" });
    println!("Size:   {}", human_size(f.size));
    println!("Parent: {}", f.parent_file_id);
    if !f.etag.is_empty() {
        println!("MD5:    {}", f.etag);
    }
    if let Some(created) = &f.create_at {
        println!("Created: {created}");
    }
    if f.trashed {
        println!("(in trash)");
    }
    Ok(())
}

async fn cmd_upload(
    client: &Pan123Client,
    file: PathBuf,
    parent: u64,
    name: Option<String>,
    duplicate: Option<DuplicateArg>,
) -> Result<()> {
    let progress: Progress<'_> = &|done, total| {
        eprint!("\r  {} / {}", human_size(done), human_size(total));
    };
    let opts = UploadOptions {
        filename: name.as_deref(),
        duplicate: duplicate.map(Into::into),
        progress: Some(progress),
    };
    let id = client.upload_file(&file, parent, opts).await?;
    eprintln!();
    println!("{} -> id={id}", file.display());
    Ok(())
}

async fn cmd_download(client: &Pan123Client, file_id: u64, output: Option<PathBuf>) -> Result<()> {
    let dest = if let Some(p) = output {
        p
    } else {
        let info = client.file_info(file_id).await?;
        if info.is_folder() {
            bail!("{} is a folder", info.filename);
        }
        PathBuf::from(info.filename)
    };
    let size = client.download_file_to(file_id, &dest).await?;
    println!("Downloaded {} ({})", dest.display(), human_size(size));
    Ok(())
}

// ── trash ──

async fn cmd_trash(client: &Pan123Client, cmd: TrashCommand) -> Result<()> {
    match cmd {
        TrashCommand::List => {
            let entries: Vec<FileInfo> = client.list_all_trash(100).try_collect().await?;
            for f in &entries {
                print_entry(f);
            }
            println!("\n{} item(s) in trash", entries.len());
        }
        TrashCommand::Restore { file_id } => {
            client.restore_file(file_id).await?;
            println!("Restored {file_id}");
        }
        TrashCommand::Purge { file_id } => {
            client.delete_permanently(file_id).await?;
            println!("Deleted {file_id}");
        }
        TrashCommand::Empty { yes } => {
            if !yes {
                bail!("refusing to empty the trash without --yes");
            }
            client.empty_trash().await?;
            println!("Trash emptied");
        }
    }
    Ok(())
}

// ── share ──

async fn cmd_share(client: &Pan123Client, cmd: ShareCommand) -> Result<()> {
    match cmd {
        ShareCommand::Create {
            file_ids,
            name,
            expire,
            password,
        } => {
            let opts = ShareOptions {
                password,
                ..ShareOptions::default()
            };
            let share = client.create_share(&file_ids, &name, expire, &opts).await?;
            println!("Share {} created: {}", share.share_id, share.share_url());
        }
        ShareCommand::List => {
            let shares: Vec<_> = client.list_all_shares(100).try_collect().await?;
            for s in &shares {
                let mut flags = Vec::new();
                if s.has_password() {
                    flags.push(format!("pwd={}", s.share_pwd));
                }
                if s.is_expired() {
                    flags.push("expired".to_owned());
                }
                println!(
                    "  [{}] {} {} {}",
                    s.share_id,
                    s.share_name,
                    s.share_url(),
                    flags.join(" ")
                );
            }
        }
        ShareCommand::Update {
            share_id,
            name,
            expire,
            password,
        } => {
            let update = ShareUpdate {
                name,
                expiry: expire,
                password,
                ..ShareUpdate::default()
            };
            client.update_share(share_id, &update).await?;
            println!("Share {share_id} updated");
        }
    }
    Ok(())
}

// ── offline / link / image / video ──

async fn cmd_offline(client: &Pan123Client, cmd: OfflineCommand) -> Result<()> {
    match cmd {
        OfflineCommand::Add {
            url,
            dir,
            name,
            callback,
        } => {
            let opts = OfflineTaskOptions {
                file_name: name,
                dir_id: dir,
                callback_url: callback,
            };
            let task_id = client.create_offline_task(&url, &opts).await?;
            println!("Task {task_id} created");
        }
        OfflineCommand::Status { task_id } => {
            let task = client.offline_progress(task_id).await?;
            let state = if task.is_success() {
                "done"
            } else if task.is_failed() {
                "failed"
            } else {
                "downloading"
            };
            println!("Task {task_id}: {state} ({:.0}%)", task.progress);
            if !task.fail_reason.is_empty() {
                println!("Reason: {}", task.fail_reason);
            }
            if let Some(id) = task.file_id {
                println!("File:   {id}");
            }
        }
    }
    Ok(())
}

async fn cmd_link(client: &Pan123Client, cmd: LinkCommand) -> Result<()> {
    match cmd {
        LinkCommand::Url { file_id } => println!("{}", client.direct_link_url(file_id).await?),
        LinkCommand::Enable { folder_id } => {
            let name = client.enable_direct_link(folder_id).await?;
            println!("Direct links enabled for {name}");
        }
        LinkCommand::Disable { folder_id } => {
            let name = client.disable_direct_link(folder_id).await?;
            println!("Direct links disabled for {name}");
        }
        LinkCommand::Refresh => {
            client.refresh_direct_link_cache().await?;
            println!("Cache refreshed");
        }
    }
    Ok(())
}

async fn cmd_image(client: &Pan123Client, cmd: ImageCommand) -> Result<()> {
    match cmd {
        ImageCommand::Upload { file, dir } => {
            let image = client.upload_image(&file, dir).await?;
            println!("{} ({:.2} MB)", image.direct_url, image.size_mb());
        }
        ImageCommand::Copy { file_id } => println!("{}", client.copy_cloud_image(file_id).await?),
    }
    Ok(())
}

async fn cmd_video(client: &Pan123Client, cmd: VideoCommand) -> Result<()> {
    match cmd {
        VideoCommand::Transcode {
            file_id,
            resolution,
            format,
        } => {
            let task_id = client
                .create_transcode_task(file_id, &resolution, &format)
                .await?;
            println!("Task {task_id} created");
        }
        VideoCommand::Status { task_id } => {
            let task = client.transcode_status(task_id).await?;
            let state = match task.status {
                0 => "queued",
                1 => "transcoding",
                2 => "done",
                _ => "failed",
            };
            println!("Task {task_id}: {state} ({:.0}%)", task.progress);
            if let Some(url) = &task.play_url {
                println!("Play: {url}");
            }
        }
        VideoCommand::Play { file_id } => {
            let url = client.play_url(file_id).await?;
            if url.is_empty() {
                println!("No play URL yet");
            } else {
                println!("{url}");
            }
        }
    }
    Ok(())
}
