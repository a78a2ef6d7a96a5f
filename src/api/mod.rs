//! Typed access to the Critica HTTP+JSON API.
//!
//! Every call resolves to [`ApiResult`]: either the decoded payload or one of
//! the fixed [`ErrorCode`]s. Pages only see the [`CriticaApi`] trait.

pub mod error;
pub mod http;
pub mod model;

use async_trait::async_trait;

pub use error::{ApiResult, ErrorCode, first_or};
pub use http::HttpApi;
pub use model::*;

#[async_trait]
pub trait CriticaApi: Send + Sync {
    async fn info(&self) -> ApiResult<Info>;

    async fn article_new(&self, props: &ArticleNewProps) -> ApiResult<ArticleData>;
    async fn article_data_new(&self, props: &ArticleDataNewProps) -> ApiResult<ArticleData>;
    async fn article_section_new(
        &self,
        props: &ArticleSectionNewProps,
    ) -> ApiResult<ArticleSection>;

    async fn article_view(&self, props: &ArticleViewProps) -> ApiResult<Vec<Article>>;
    async fn article_data_view(&self, props: &ArticleDataViewProps)
    -> ApiResult<Vec<ArticleData>>;
    async fn article_section_view(
        &self,
        props: &ArticleSectionViewProps,
    ) -> ApiResult<Vec<ArticleSection>>;

    async fn article_data_view_public(
        &self,
        props: &ArticleDataViewPublicProps,
    ) -> ApiResult<Vec<ArticleData>>;
    async fn article_section_view_public(
        &self,
        props: &ArticleSectionViewPublicProps,
    ) -> ApiResult<Vec<ArticleSection>>;
}
