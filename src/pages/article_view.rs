use url::form_urlencoded;

use crate::api::{
    ApiResult, ArticleData, ArticleDataViewPublicProps, ArticleSection,
    ArticleSectionViewPublicProps, CriticaApi, ErrorCode, first_or,
};
use crate::reveal::{Outcome, Progress, RevealError, RevealState};

pub const PATH: &str = "/article_view";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleViewData {
    pub article_data: ArticleData,
    pub sections: Vec<ArticleSection>,
}

/// Loads the article's current metadata, then its sections. The section
/// request needs nothing from the first one but only runs once the article
/// is known to exist.
pub async fn load(api: &dyn CriticaApi, article_id: i64) -> ApiResult<ArticleViewData> {
    let article_data = api
        .article_data_view_public(&ArticleDataViewPublicProps {
            article_id: Some(vec![article_id]),
            ..Default::default()
        })
        .await?;
    let article_data = first_or(article_data, ErrorCode::NotFound)?;

    let sections = api
        .article_section_view_public(&ArticleSectionViewPublicProps {
            article_id: Some(vec![article_id]),
            ..Default::default()
        })
        .await?;

    tracing::debug!(article_id, sections = sections.len(), "loaded article");
    Ok(ArticleViewData {
        article_data,
        sections,
    })
}

/// Reader state mirrored into the URL so a reload resumes in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleViewQuery {
    pub article_id: Option<i64>,
    pub position: i64,
    pub mistakes: u32,
    pub marks: Vec<usize>,
}

impl ArticleViewQuery {
    /// Lenient parse: unparseable or negative numbers fall back to defaults.
    pub fn parse(query: &str) -> Self {
        let mut out = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "articleId" => out.article_id = value.trim().parse().ok(),
                "position" => {
                    out.position = value.trim().parse::<i64>().ok().filter(|p| *p >= 0).unwrap_or(0)
                }
                "mistakes" => out.mistakes = value.trim().parse().unwrap_or(0),
                "marks" => out.marks = Self::parse_marks(&value),
                _ => {}
            }
        }
        out
    }

    /// Comma separated candidate indices; unparseable entries are dropped.
    pub fn parse_marks(raw: &str) -> Vec<usize> {
        raw.split(',')
            .filter_map(|m| m.trim().parse().ok())
            .collect()
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(article_id) = self.article_id {
            serializer.append_pair("articleId", &article_id.to_string());
        }
        serializer.append_pair("position", &self.position.to_string());
        if self.mistakes > 0 {
            serializer.append_pair("mistakes", &self.mistakes.to_string());
        }
        if !self.marks.is_empty() {
            let marks = self
                .marks
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(",");
            serializer.append_pair("marks", &marks);
        }
        serializer.finish()
    }

    pub fn href(&self) -> String {
        format!("{PATH}?{}", self.to_query_string())
    }
}

/// A loaded article plus the reader's progress through it.
#[derive(Debug, Clone)]
pub struct ArticleViewer {
    data: ArticleViewData,
    state: RevealState,
}

impl ArticleViewer {
    pub fn new(data: ArticleViewData, query: &ArticleViewQuery) -> Self {
        let state = RevealState::restore(query.position, query.mistakes, query.marks.clone());
        Self { data, state }
    }

    pub fn title(&self) -> &str {
        &self.data.article_data.title
    }

    pub fn article_id(&self) -> i64 {
        self.data.article_data.article.article_id
    }

    pub fn article_data(&self) -> &ArticleData {
        &self.data.article_data
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn visible(&self) -> Vec<&ArticleSection> {
        self.state.visible(&self.data.sections)
    }

    pub fn candidates(&self) -> Vec<&ArticleSection> {
        self.state.candidates(&self.data.sections)
    }

    pub fn progress(&self) -> Progress<'_> {
        self.state.progress(&self.data.sections)
    }

    pub fn choose(&mut self, index: usize) -> Result<Outcome, RevealError> {
        let selection = self.state.select(&self.data.sections, index)?;
        tracing::debug!(
            article_id = self.article_id(),
            index,
            outcome = ?selection.outcome,
            position = selection.state.position(),
            mistakes = selection.state.mistakes(),
            "section chosen"
        );
        self.state = selection.state;
        Ok(selection.outcome)
    }

    /// The query that replaces the current URL's.
    pub fn query(&self) -> ArticleViewQuery {
        ArticleViewQuery {
            article_id: Some(self.article_id()),
            position: self.state.position(),
            mistakes: self.state.mistakes(),
            marks: self.state.marks().collect(),
        }
    }
}
