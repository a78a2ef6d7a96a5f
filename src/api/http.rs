use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::error::{ApiResult, ErrorCode};
use crate::api::model::*;
use crate::api::CriticaApi;

pub fn endpoint_url(base_url: &str, path: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!("{base_url}/{path}")
}

/// [`CriticaApi`] over HTTP. Each operation is a JSON POST.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("build api http client")?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<P, T>(&self, path: &str, props: &P) -> ApiResult<T>
    where
        P: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let endpoint = endpoint_url(&self.base_url, path);
        tracing::debug!(%endpoint, "api request");

        let response = match self
            .client
            .post(&endpoint)
            .header(USER_AGENT, concat!("critica/", env!("CARGO_PKG_VERSION")))
            .json(props)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%endpoint, ?err, "api request failed");
                return Err(ErrorCode::Network);
            }
        };

        let status = response.status().as_u16();
        let raw = match response.text().await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%endpoint, ?err, "read api response body");
                return Err(ErrorCode::Network);
            }
        };

        let result = decode_response(status, &raw);
        if let Err(code) = &result {
            tracing::debug!(%endpoint, status, %code, "api error");
        }
        result
    }
}

/// Normalizes a response: 2xx bodies decode as `T`, anything else as an
/// [`ErrorCode`].
pub fn decode_response<T: DeserializeOwned>(status: u16, raw: &str) -> ApiResult<T> {
    if (200..300).contains(&status) {
        return serde_json::from_str(raw).map_err(|_| ErrorCode::DecodeError);
    }
    Err(serde_json::from_str::<ErrorCode>(raw).unwrap_or(ErrorCode::Unknown))
}

#[async_trait]
impl CriticaApi for HttpApi {
    async fn info(&self) -> ApiResult<Info> {
        self.call("info", &serde_json::json!({})).await
    }

    async fn article_new(&self, props: &ArticleNewProps) -> ApiResult<ArticleData> {
        props.validate()?;
        self.call("article/new", props).await
    }

    async fn article_data_new(&self, props: &ArticleDataNewProps) -> ApiResult<ArticleData> {
        props.validate()?;
        self.call("article_data/new", props).await
    }

    async fn article_section_new(
        &self,
        props: &ArticleSectionNewProps,
    ) -> ApiResult<ArticleSection> {
        props.validate()?;
        self.call("article_section/new", props).await
    }

    async fn article_view(&self, props: &ArticleViewProps) -> ApiResult<Vec<Article>> {
        self.call("article/view", props).await
    }

    async fn article_data_view(
        &self,
        props: &ArticleDataViewProps,
    ) -> ApiResult<Vec<ArticleData>> {
        self.call("article_data/view", props).await
    }

    async fn article_section_view(
        &self,
        props: &ArticleSectionViewProps,
    ) -> ApiResult<Vec<ArticleSection>> {
        self.call("article_section/view", props).await
    }

    async fn article_data_view_public(
        &self,
        props: &ArticleDataViewPublicProps,
    ) -> ApiResult<Vec<ArticleData>> {
        self.call("article_data/view_public", props).await
    }

    async fn article_section_view_public(
        &self,
        props: &ArticleSectionViewPublicProps,
    ) -> ApiResult<Vec<ArticleSection>> {
        self.call("article_section/view_public", props).await
    }
}
