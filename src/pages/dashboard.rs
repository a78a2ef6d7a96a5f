use crate::api::{
    ApiResult, ArticleData, ArticleDataNewProps, ArticleDataViewProps, ArticleNewProps,
    ArticleSection, ArticleSectionNewProps, ArticleSectionViewProps, CriticaApi,
};
use crate::session::ApiKey;

pub const PATH: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleEntry {
    pub data: ArticleData,
    /// Ordered by position, then variant.
    pub sections: Vec<ArticleSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardData {
    pub articles: Vec<ArticleEntry>,
}

impl DashboardData {
    pub fn article(&self, article_id: i64) -> Option<&ArticleEntry> {
        self.articles
            .iter()
            .find(|a| a.data.article.article_id == article_id)
    }
}

/// The creator's current articles joined with their sections.
pub async fn load(api: &dyn CriticaApi, api_key: &ApiKey) -> ApiResult<DashboardData> {
    let mut article_data = api
        .article_data_view(&ArticleDataViewProps {
            creator_user_id: Some(vec![api_key.creator_user_id]),
            only_recent: true,
            api_key: api_key.key.clone(),
            ..Default::default()
        })
        .await?;
    article_data.sort_by(|a, b| b.creation_time.cmp(&a.creation_time));

    if article_data.is_empty() {
        return Ok(DashboardData {
            articles: Vec::new(),
        });
    }

    let sections = api
        .article_section_view(&ArticleSectionViewProps {
            article_id: Some(article_data.iter().map(|d| d.article.article_id).collect()),
            only_recent: true,
            api_key: api_key.key.clone(),
            ..Default::default()
        })
        .await?;

    let articles = article_data
        .into_iter()
        .map(|data| {
            let mut own = sections
                .iter()
                .filter(|s| s.article.article_id == data.article.article_id)
                .cloned()
                .collect::<Vec<_>>();
            own.sort_by_key(|s| (s.position, s.variant, s.article_section_id));
            ArticleEntry {
                data,
                sections: own,
            }
        })
        .collect();

    Ok(DashboardData { articles })
}

pub async fn create_article(
    api: &dyn CriticaApi,
    api_key: &ApiKey,
    title: &str,
    duration_estimate: i64,
) -> ApiResult<ArticleData> {
    let created = api
        .article_new(&ArticleNewProps {
            title: title.trim().to_owned(),
            duration_estimate,
            api_key: api_key.key.clone(),
        })
        .await?;
    tracing::info!(article_id = created.article.article_id, "created article");
    Ok(created)
}

/// Submits a new metadata version; the server keeps the old ones.
pub async fn update_article(
    api: &dyn CriticaApi,
    api_key: &ApiKey,
    article_id: i64,
    title: &str,
    duration_estimate: i64,
    active: bool,
) -> ApiResult<ArticleData> {
    let updated = api
        .article_data_new(&ArticleDataNewProps {
            article_id,
            title: title.trim().to_owned(),
            duration_estimate,
            active,
            api_key: api_key.key.clone(),
        })
        .await?;
    tracing::info!(article_id, active, "submitted article data");
    Ok(updated)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSection {
    pub article_id: i64,
    pub position: i64,
    pub variant: i64,
    pub section_text: String,
    pub active: bool,
}

pub async fn add_section(
    api: &dyn CriticaApi,
    api_key: &ApiKey,
    section: NewSection,
) -> ApiResult<ArticleSection> {
    let created = api
        .article_section_new(&ArticleSectionNewProps {
            article_id: section.article_id,
            position: section.position,
            variant: section.variant,
            section_text: section.section_text,
            active: section.active,
            api_key: api_key.key.clone(),
        })
        .await?;
    tracing::info!(
        article_id = created.article.article_id,
        position = created.position,
        variant = created.variant,
        "added section"
    );
    Ok(created)
}
