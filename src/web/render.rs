//! HTML for each page. Every piece of API-provided text goes through
//! `text`/`attr` before it is embedded.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::api::{ArticleData, ErrorCode};
use crate::commands::{duration_minutes, format_date, format_duration};
use crate::config::{BRANDING, Branding};
use crate::pages::article_search::SearchFilter;
use crate::pages::article_view::{self, ArticleViewer};
use crate::pages::dashboard::DashboardData;
use crate::pages::{article_search, dashboard};
use crate::reveal::Progress;
use crate::session::ApiKey;

fn text(s: &str) -> String {
    encode_text(s).into_owned()
}

fn attr(s: &str) -> String {
    encode_double_quoted_attribute(s).into_owned()
}

pub fn layout(title: &str, body: &str) -> String {
    let Branding {
        name,
        home_url,
        dashboard_url,
        instructions_url,
        ..
    } = BRANDING;
    format!(
        r#"<!doctype html>
<html>
  <head><meta charset="utf-8"><title>{title} | {name}</title></head>
  <body>
    <nav>
      <a href="{home_url}">{name}</a>
      <a href="{search}">Articles</a>
      <a href="{instructions_url}">Instructions</a>
      <a href="{dashboard_url}">Dashboard</a>
    </nav>
    <main>
{body}
    </main>
  </body>
</html>
"#,
        title = text(title),
        search = article_search::PATH,
    )
}

pub fn error_message(code: ErrorCode) -> String {
    format!(
        r#"<div class="alert alert-danger" data-error="{code}">{}</div>"#,
        text(code.message())
    )
}

pub fn error_page(code: ErrorCode) -> String {
    layout("Error", &error_message(code))
}

pub fn not_found_page() -> String {
    layout(
        "Page not found",
        "<h1>404</h1>\n<p>The page you requested does not exist.</p>",
    )
}

pub fn home_page() -> String {
    let body = format!(
        r#"<h1>{name}</h1>
<p>{tagline}</p>
<p><a href="{search}">Browse articles</a></p>
<section id="instructions">
  <h2>Instructions</h2>
  <p>Each article is revealed one paragraph at a time. For every step you are shown
  several possible continuations: one was written by a person, the rest were
  generated. Pick the human one to keep reading. Wrong picks are counted.</p>
</section>"#,
        name = BRANDING.name,
        tagline = text(BRANDING.tagline),
        search = article_search::PATH,
    );
    layout(BRANDING.name, &body)
}

fn article_row(article: &ArticleData) -> String {
    let href = article_view::ArticleViewQuery {
        article_id: Some(article.article.article_id),
        ..Default::default()
    }
    .href();
    format!(
        r#"<li><a href="{href}">{title}</a> <small>{duration}, {date}</small></li>"#,
        href = attr(&href),
        title = text(&article.title),
        duration = format_duration(article.duration_estimate),
        date = format_date(article.creation_time),
    )
}

/// Upper bounds offered by the search form, in minutes.
const MAX_DURATION_CHOICES: [i64; 4] = [5, 10, 30, 60];

pub fn search_form(filter: &SearchFilter) -> String {
    let mut options = format!(
        r#"<option value=""{}>Any length</option>"#,
        if filter.max_duration.is_none() { " selected" } else { "" }
    );
    for minutes in MAX_DURATION_CHOICES {
        let ms = minutes * 60_000;
        let selected = if filter.max_duration == Some(ms) { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{ms}"{selected}>Up to {minutes} min</option>"#
        );
    }
    format!(
        r#"<form method="get" action="{path}">
  <input type="search" name="q" value="{q}" placeholder="Title">
  <select name="maxDuration">{options}</select>
  <button type="submit">Search</button>
</form>"#,
        path = article_search::PATH,
        q = attr(filter.text.as_deref().unwrap_or_default()),
    )
}

pub fn search_page(filter: &SearchFilter, articles: &[ArticleData]) -> String {
    let mut body = String::from("<h1>Articles</h1>\n");
    body.push_str(&search_form(filter));
    if articles.is_empty() {
        body.push_str("\n<p>No articles found.</p>");
    } else {
        body.push_str("\n<ul>\n");
        for article in articles {
            body.push_str(&article_row(article));
            body.push('\n');
        }
        body.push_str("</ul>");
    }
    layout("Articles", &body)
}

pub fn article_page(viewer: &ArticleViewer) -> String {
    let mut body = format!("<h1>{}</h1>\n", text(viewer.title()));
    for section in viewer.visible() {
        let _ = writeln!(body, "<p>{}</p>", text(&section.section_text));
    }

    let query = viewer.query();
    let state = viewer.state();
    match viewer.progress() {
        Progress::Finished => {
            let _ = write!(
                body,
                r#"<p class="finished">The end. Mistakes: {}</p>"#,
                state.mistakes()
            );
        }
        Progress::Stalled(_) => {
            let _ = write!(
                body,
                r#"<p class="stalled">This article has no human-written continuation after position {}.</p>"#,
                state.position()
            );
        }
        Progress::Open(candidates) => {
            let _ = writeln!(
                body,
                r#"<p class="mistakes">Mistakes: {}</p>
<div class="row">"#,
                state.mistakes()
            );
            let marks = query
                .marks
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(",");
            for (i, candidate) in candidates.iter().enumerate() {
                let border = match (state.is_marked(i), candidate.is_correct()) {
                    (false, _) => "",
                    (true, true) => " border-success",
                    (true, false) => " border-danger",
                };
                let _ = writeln!(
                    body,
                    r#"<div class="card{border}">
  <p>{section_text}</p>
  <form method="post" action="{path}/choose">
    <input type="hidden" name="articleId" value="{article_id}">
    <input type="hidden" name="position" value="{position}">
    <input type="hidden" name="mistakes" value="{mistakes}">
    <input type="hidden" name="marks" value="{marks}">
    <input type="hidden" name="candidate" value="{i}">
    <button type="submit">Choose</button>
  </form>
</div>"#,
                    section_text = text(&candidate.section_text),
                    path = article_view::PATH,
                    article_id = viewer.article_id(),
                    position = state.position(),
                    mistakes = state.mistakes(),
                );
            }
            body.push_str("</div>");
        }
    }
    layout(viewer.title(), &body)
}

pub fn login_required_page() -> String {
    layout(
        "Login required",
        &format!(
            "<h1>Login required</h1>\n{}\n<p>Store your API key with <code>critica login --key KEY --user-id ID</code>.</p>",
            error_message(ErrorCode::Unauthorized)
        ),
    )
}

pub fn dashboard_page(api_key: &ApiKey, data: &DashboardData) -> String {
    let mut body = format!(
        "<h1>Dashboard</h1>\n<p>Signed in as user {}.</p>\n",
        api_key.creator_user_id
    );
    let _ = writeln!(
        body,
        r#"<form method="post" action="{path}/article">
  <input name="title" placeholder="Title" required>
  <input name="durationMinutes" type="number" min="1" value="5" required>
  <button type="submit">New article</button>
</form>"#,
        path = dashboard::PATH
    );

    if data.articles.is_empty() {
        body.push_str("<p>You have no articles yet.</p>");
    }
    for entry in &data.articles {
        let article_id = entry.data.article.article_id;
        let minutes = duration_minutes(entry.data.duration_estimate);
        let checked = if entry.data.active { " checked" } else { "" };
        let _ = writeln!(
            body,
            r#"<section class="article" data-article-id="{article_id}">
  <h2>{title}</h2>
  <form method="post" action="{path}/article_data">
    <input type="hidden" name="articleId" value="{article_id}">
    <input name="title" value="{title_attr}" required>
    <input name="durationMinutes" type="number" min="1" value="{minutes}" required>
    <label><input type="checkbox" name="active" value="on"{checked}> Active</label>
    <button type="submit">Save</button>
  </form>
  <ol>"#,
            title = text(&entry.data.title),
            title_attr = attr(&entry.data.title),
            path = dashboard::PATH,
        );
        for section in &entry.sections {
            let kind = if section.is_correct() { "human" } else { "decoy" };
            let _ = writeln!(
                body,
                r#"    <li data-position="{}" data-variant="{}">[{kind}] {}</li>"#,
                section.position,
                section.variant,
                text(&section.section_text)
            );
        }
        let next_position = entry
            .sections
            .iter()
            .map(|s| s.position.saturating_add(1))
            .max()
            .unwrap_or(0);
        let _ = writeln!(
            body,
            r#"  </ol>
  <form method="post" action="{path}/section">
    <input type="hidden" name="articleId" value="{article_id}">
    <input name="position" type="number" min="0" value="{next_position}" required>
    <input name="variant" type="number" min="0" value="0" required>
    <textarea name="sectionText" required></textarea>
    <button type="submit">Add section</button>
  </form>
</section>"#,
            path = dashboard::PATH,
        );
    }
    layout("Dashboard", &body)
}
