//! Interactive terminal reader.

use std::io::{BufRead, Write};

use anyhow::Context as _;

use crate::cli::ReadArgs;
use crate::commands::{Context, api_error};
use crate::pages::article_view::{self, ArticleViewQuery, ArticleViewer};
use crate::pages::{Load, scoped};
use crate::reveal::{Outcome, Progress};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Finished,
    Stalled,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub ending: Ending,
    pub position: i64,
    pub mistakes: u32,
}

pub async fn run(ctx: &Context, args: ReadArgs) -> anyhow::Result<()> {
    let cancel = async {
        // Without a signal handler nothing can cancel the load.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let data = match scoped(article_view::load(&ctx.api, args.article_id), cancel).await {
        Load::Pending => anyhow::bail!("interrupted while loading article {}", args.article_id),
        Load::Failed(code) => return Err(api_error(code)),
        Load::Ready(data) => data,
    };

    let query = ArticleViewQuery {
        article_id: Some(args.article_id),
        position: args.position.max(0),
        ..Default::default()
    };
    let mut viewer = ArticleViewer::new(data, &query);

    let summary = tokio::task::block_in_place(|| {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        play(&mut viewer, stdin.lock(), stdout.lock())
    })?;
    tracing::debug!(?summary, "reading ended");
    Ok(())
}

/// Runs the reveal loop over line-oriented input until the article ends,
/// stalls, or the reader quits.
pub fn play<R: BufRead, W: Write>(
    viewer: &mut ArticleViewer,
    mut input: R,
    mut out: W,
) -> anyhow::Result<Summary> {
    writeln!(out, "# {}", viewer.title())?;
    writeln!(out)?;
    for section in viewer.visible() {
        writeln!(out, "{}", section.section_text)?;
        writeln!(out)?;
    }

    let ending = loop {
        let candidates = match viewer.progress() {
            Progress::Finished => break Ending::Finished,
            Progress::Stalled(_) => break Ending::Stalled,
            Progress::Open(candidates) => candidates,
        };

        writeln!(out, "Which comes next?")?;
        for (i, candidate) in candidates.iter().enumerate() {
            let mark = if viewer.state().is_marked(i) { "x" } else { " " };
            writeln!(out, "[{mark}] {}. {}", i + 1, candidate.section_text)?;
        }
        let count = candidates.len();
        write!(out, "choose 1-{count} (q to quit): ")?;
        out.flush().context("flush prompt")?;

        let mut line = String::new();
        if input.read_line(&mut line).context("read choice")? == 0 {
            writeln!(out)?;
            break Ending::Quit;
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break Ending::Quit;
        }
        let Some(index) = line
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=count).contains(n))
            .map(|n| n - 1)
        else {
            writeln!(out, "please enter a number between 1 and {count}")?;
            continue;
        };

        let chosen = candidates[index].section_text.clone();
        match viewer.choose(index)? {
            Outcome::Correct => {
                writeln!(out, "Correct.")?;
                writeln!(out)?;
                writeln!(out, "{chosen}")?;
                writeln!(out)?;
            }
            Outcome::Wrong => writeln!(out, "Not quite, that one was generated.")?,
        }
    };

    let summary = Summary {
        ending,
        position: viewer.state().position(),
        mistakes: viewer.state().mistakes(),
    };
    match ending {
        Ending::Finished => writeln!(out, "The end. Mistakes: {}", summary.mistakes)?,
        Ending::Stalled => writeln!(
            out,
            "This article has no human-written continuation after position {}.",
            summary.position
        )?,
        Ending::Quit => writeln!(
            out,
            "Stopped at position {}. Resume with --position {}",
            summary.position, summary.position
        )?,
    }
    Ok(summary)
}
