use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_API_URL;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Base URL of the Critica API.
    #[arg(long, global = true, env = "CRITICA_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory holding the persisted session (default: ~/.config/critica).
    #[arg(long, global = true, env = "CRITICA_SESSION_DIR")]
    pub session_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show API service information.
    Info,
    /// Store an API key issued by the auth service.
    Login(LoginArgs),
    /// Forget the stored API key.
    Logout,
    /// Show who the stored API key belongs to.
    Whoami,
    /// List public articles.
    Search(SearchArgs),
    /// Read an article one section at a time.
    Read(ReadArgs),
    /// List your articles and their sections.
    Dashboard,
    Article {
        #[command(subcommand)]
        command: ArticleCommand,
    },
    Section {
        #[command(subcommand)]
        command: SectionCommand,
    },
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// API key secret.
    #[arg(long)]
    pub key: String,

    /// User id the key was issued to.
    #[arg(long)]
    pub user_id: i64,

    #[arg(long, default_value_t = 0)]
    pub api_key_id: i64,

    /// Key lifetime in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub duration_ms: i64,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive title substring.
    #[arg(long)]
    pub query: Option<String>,

    /// Only articles estimated to take at most this long.
    #[arg(long)]
    pub max_duration_ms: Option<i64>,
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    #[arg(long)]
    pub article_id: i64,

    /// Resume from this reveal position.
    #[arg(long, default_value_t = 0)]
    pub position: i64,
}

#[derive(Debug, Subcommand)]
pub enum ArticleCommand {
    New(ArticleNewArgs),
    /// Submit a new version of an article's title/duration/active flag.
    Edit(ArticleEditArgs),
}

#[derive(Debug, Args)]
pub struct ArticleNewArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub duration_ms: i64,
}

#[derive(Debug, Args)]
pub struct ArticleEditArgs {
    #[arg(long)]
    pub article_id: i64,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub duration_ms: i64,

    /// Hide the article from public views.
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Debug, Subcommand)]
pub enum SectionCommand {
    New(SectionNewArgs),
}

#[derive(Debug, Args)]
pub struct SectionNewArgs {
    #[arg(long)]
    pub article_id: i64,

    #[arg(long)]
    pub position: i64,

    /// 0 for the human-written text, anything else for a distractor.
    #[arg(long, default_value_t = 0)]
    pub variant: i64,

    #[arg(long)]
    pub text: String,

    #[arg(long)]
    pub inactive: bool,
}
