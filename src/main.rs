use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use critica::cli::{ArticleCommand, Cli, Command, SectionCommand};
use critica::commands::{self, Context};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    critica::logging::init(critica::logging::CLI_DIRECTIVE).context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let ctx = Context::new(&cli.connection)?;
    match cli.command {
        Command::Info => commands::info(&ctx).await.context("info")?,
        Command::Login(args) => commands::login(&ctx, args).context("login")?,
        Command::Logout => commands::logout(&ctx).context("logout")?,
        Command::Whoami => commands::whoami(&ctx).context("whoami")?,
        Command::Search(args) => commands::search(&ctx, args).await.context("search")?,
        Command::Read(args) => critica::reader::run(&ctx, args).await.context("read")?,
        Command::Dashboard => commands::dashboard(&ctx).await.context("dashboard")?,
        Command::Article {
            command: ArticleCommand::New(args),
        } => {
            commands::article_new(&ctx, args)
                .await
                .context("article new")?;
        }
        Command::Article {
            command: ArticleCommand::Edit(args),
        } => {
            commands::article_edit(&ctx, args)
                .await
                .context("article edit")?;
        }
        Command::Section {
            command: SectionCommand::New(args),
        } => {
            commands::section_new(&ctx, args)
                .await
                .context("section new")?;
        }
    }

    Ok(())
}
