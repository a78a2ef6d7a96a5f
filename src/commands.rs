use anyhow::Context as _;

use crate::api::{ArticleData, CriticaApi, ErrorCode, HttpApi};
use crate::cli::{
    ArticleEditArgs, ArticleNewArgs, ConnectionArgs, LoginArgs, SearchArgs, SectionNewArgs,
};
use crate::config::Config;
use crate::pages::{article_search, dashboard};
use crate::session::{ApiKey, FileStorage, Session};

/// Everything a subcommand needs: resolved config and an API client.
pub struct Context {
    pub config: Config,
    pub api: HttpApi,
}

impl Context {
    pub fn new(args: &ConnectionArgs) -> anyhow::Result<Self> {
        let config = Config::from_args(args).context("resolve config")?;
        let api = HttpApi::new(config.api_url.as_str())?;
        tracing::debug!(api_url = %config.api_url, session_dir = %config.session_dir.display(), "context ready");
        Ok(Self { config, api })
    }

    pub fn session(&self) -> anyhow::Result<Session<FileStorage>> {
        Session::init(FileStorage::new(&self.config.session_dir)).context("open session")
    }

    pub fn require_api_key(&self) -> anyhow::Result<ApiKey> {
        self.session()?
            .api_key()
            .ok_or_else(|| anyhow::anyhow!("not logged in; run `critica login` first"))
    }
}

pub fn api_error(code: ErrorCode) -> anyhow::Error {
    anyhow::anyhow!("{} ({code})", code.message())
}

pub async fn info(ctx: &Context) -> anyhow::Result<()> {
    let info = ctx.api.info().await.map_err(api_error)?;
    println!(
        "{} v{}.{}.{}",
        info.service, info.version_major, info.version_minor, info.version_rev
    );
    println!("app origin: {}", info.app_pub_origin);
    println!("authenticator: {}", info.auth_authenticator_href);
    Ok(())
}

pub fn login(ctx: &Context, args: LoginArgs) -> anyhow::Result<()> {
    let key = args.key.trim();
    if key.is_empty() {
        anyhow::bail!("--key must not be empty");
    }
    let api_key = ApiKey {
        api_key_id: args.api_key_id,
        creation_time: chrono::Utc::now().timestamp_millis(),
        creator_user_id: args.user_id,
        key: key.to_owned(),
        duration: args.duration_ms,
    };
    ctx.session()?.set_api_key(Some(api_key))?;
    println!("logged in as user {}", args.user_id);
    Ok(())
}

pub fn logout(ctx: &Context) -> anyhow::Result<()> {
    ctx.session()?.clear()?;
    println!("logged out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> anyhow::Result<()> {
    match ctx.session()?.api_key() {
        Some(api_key) => println!("user {}", api_key.creator_user_id),
        None => println!("not logged in"),
    }
    Ok(())
}

pub async fn search(ctx: &Context, args: SearchArgs) -> anyhow::Result<()> {
    let filter = article_search::SearchFilter {
        text: args.query.filter(|q| !q.trim().is_empty()),
        max_duration: args.max_duration_ms,
    };
    let articles = article_search::load(&ctx.api, &filter)
        .await
        .map_err(api_error)?;
    if articles.is_empty() {
        println!("no articles found");
        return Ok(());
    }
    for article in &articles {
        println!("{}", format_article_line(article));
    }
    Ok(())
}

pub async fn dashboard(ctx: &Context) -> anyhow::Result<()> {
    let api_key = ctx.require_api_key()?;
    let data = dashboard::load(&ctx.api, &api_key)
        .await
        .map_err(api_error)?;
    if data.articles.is_empty() {
        println!("you have no articles yet");
        return Ok(());
    }
    for entry in &data.articles {
        let status = if entry.data.active { "" } else { " [inactive]" };
        println!("{}{status}", format_article_line(&entry.data));
        for section in &entry.sections {
            let kind = if section.is_correct() { "human" } else { "decoy" };
            println!(
                "  {:>3}.{} {kind:<5} {}",
                section.position,
                section.variant,
                excerpt(&section.section_text, 60)
            );
        }
    }
    Ok(())
}

pub async fn article_new(ctx: &Context, args: ArticleNewArgs) -> anyhow::Result<()> {
    let api_key = ctx.require_api_key()?;
    let created = dashboard::create_article(&ctx.api, &api_key, &args.title, args.duration_ms)
        .await
        .map_err(api_error)?;
    println!("created article {}", created.article.article_id);
    Ok(())
}

pub async fn article_edit(ctx: &Context, args: ArticleEditArgs) -> anyhow::Result<()> {
    let api_key = ctx.require_api_key()?;
    let updated = dashboard::update_article(
        &ctx.api,
        &api_key,
        args.article_id,
        &args.title,
        args.duration_ms,
        !args.inactive,
    )
    .await
    .map_err(api_error)?;
    println!(
        "updated article {} (version {})",
        updated.article.article_id, updated.article_data_id
    );
    Ok(())
}

pub async fn section_new(ctx: &Context, args: SectionNewArgs) -> anyhow::Result<()> {
    let api_key = ctx.require_api_key()?;
    let created = dashboard::add_section(
        &ctx.api,
        &api_key,
        dashboard::NewSection {
            article_id: args.article_id,
            position: args.position,
            variant: args.variant,
            section_text: args.text,
            active: !args.inactive,
        },
    )
    .await
    .map_err(api_error)?;
    println!(
        "added section {} at position {}",
        created.article_section_id, created.position
    );
    Ok(())
}

pub fn format_article_line(article: &ArticleData) -> String {
    format!(
        "{:>5}  {}  ({}, {})",
        article.article.article_id,
        article.title,
        format_duration(article.duration_estimate),
        format_date(article.creation_time)
    )
}

/// Minutes, rounded up, from a millisecond estimate.
pub fn duration_minutes(ms: i64) -> i64 {
    ms.max(0).saturating_add(59_999) / 60_000
}

pub fn format_duration(ms: i64) -> String {
    format!("{} min", duration_minutes(ms))
}

pub fn format_date(ms: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(ms) {
        Some(at) => at.format("%Y-%m-%d").to_string(),
        None => "unknown date".to_owned(),
    }
}

pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let cut = text.chars().take(max_chars).collect::<String>();
    format!("{}…", cut.trim_end())
}
