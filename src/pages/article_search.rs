use url::form_urlencoded;

use crate::api::{ApiResult, ArticleData, ArticleDataViewPublicProps, CriticaApi};

pub const PATH: &str = "/article_search";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Case-insensitive substring of the title.
    pub text: Option<String>,
    /// Upper bound on the duration estimate, in milliseconds.
    pub max_duration: Option<i64>,
}

impl SearchFilter {
    pub fn parse(query: &str) -> Self {
        let mut out = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "q" => {
                    let text = value.trim();
                    out.text = (!text.is_empty()).then(|| text.to_owned());
                }
                "maxDuration" => out.max_duration = value.trim().parse().ok(),
                _ => {}
            }
        }
        out
    }

    pub fn matches(&self, article_data: &ArticleData) -> bool {
        let Some(text) = &self.text else {
            return true;
        };
        article_data
            .title
            .to_lowercase()
            .contains(&text.to_lowercase())
    }
}

/// Public article listing, newest first.
pub async fn load(api: &dyn CriticaApi, filter: &SearchFilter) -> ApiResult<Vec<ArticleData>> {
    let mut articles = api
        .article_data_view_public(&ArticleDataViewPublicProps {
            max_duration_estimate: filter.max_duration,
            ..Default::default()
        })
        .await?;

    articles.retain(|a| filter.matches(a));
    articles.sort_by(|a, b| {
        b.creation_time
            .cmp(&a.creation_time)
            .then(a.article.article_id.cmp(&b.article.article_id))
    });
    Ok(articles)
}
