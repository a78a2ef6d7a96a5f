use serde::{Deserialize, Serialize};

use crate::api::error::{ApiResult, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub service: String,
    pub version_major: i64,
    pub version_minor: i64,
    pub version_rev: i64,
    pub app_pub_origin: String,
    pub auth_service_external_url: String,
    pub auth_pub_api_href: String,
    pub auth_authenticator_href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub article_id: i64,
    pub creation_time: i64,
    pub creator_user_id: i64,
}

/// One version of an article's metadata. The newest active row is canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleData {
    pub article_data_id: i64,
    pub creation_time: i64,
    pub creator_user_id: i64,
    pub article: Article,
    pub title: String,
    pub duration_estimate: i64,
    pub active: bool,
}

/// One step of an article's reveal sequence.
///
/// `variant == 0` is the human-written continuation, anything else is a
/// distractor shown alongside it at the same `position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSection {
    pub article_section_id: i64,
    pub creation_time: i64,
    pub creator_user_id: i64,
    pub article: Article,
    pub position: i64,
    pub variant: i64,
    pub section_text: String,
    pub active: bool,
}

impl ArticleSection {
    pub fn is_correct(&self) -> bool {
        self.variant == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleNewProps {
    pub title: String,
    pub duration_estimate: i64,
    pub api_key: String,
}

impl ArticleNewProps {
    pub fn validate(&self) -> ApiResult<()> {
        validate_duration(self.duration_estimate)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDataNewProps {
    pub article_id: i64,
    pub title: String,
    pub duration_estimate: i64,
    pub active: bool,
    pub api_key: String,
}

impl ArticleDataNewProps {
    pub fn validate(&self) -> ApiResult<()> {
        validate_duration(self.duration_estimate)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSectionNewProps {
    pub article_id: i64,
    pub position: i64,
    pub variant: i64,
    pub section_text: String,
    pub active: bool,
    pub api_key: String,
}

impl ArticleSectionNewProps {
    pub fn validate(&self) -> ApiResult<()> {
        if self.position < 0 {
            return Err(ErrorCode::InvalidPosition);
        }
        Ok(())
    }
}

fn validate_duration(duration_estimate: i64) -> ApiResult<()> {
    if duration_estimate <= 0 {
        return Err(ErrorCode::InvalidDuration);
    }
    Ok(())
}

// List filters below are IN predicates; `None` leaves the field out of the
// request body entirely.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleViewProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_user_id: Option<Vec<i64>>,
    pub api_key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDataViewProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_data_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_user_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_duration_estimate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration_estimate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    pub only_recent: bool,
    pub api_key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSectionViewProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_section_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_user_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    pub only_recent: bool,
    pub api_key: String,
}

/// Public reads have no auth-gated filters; the server only returns the
/// latest active versions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDataViewPublicProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_data_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_user_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_duration_estimate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration_estimate: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSectionViewPublicProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_section_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_user_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<Vec<i64>>,
}
