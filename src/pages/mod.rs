//! Data loading for each page.
//!
//! A page awaits its loader and ends in exactly one of the [`Load`] states.
//! There is no partial success: any failed request fails the whole load.

pub mod article_search;
pub mod article_view;
pub mod dashboard;

use std::future::Future;

use crate::api::{ApiResult, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Load<T> {
    Pending,
    Failed(ErrorCode),
    Ready(T),
}

impl<T> From<ApiResult<T>> for Load<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(value) => Load::Ready(value),
            Err(code) => Load::Failed(code),
        }
    }
}

/// Awaits `load` unless `cancel` completes first. A cancelled load is
/// dropped and stays [`Load::Pending`].
pub async fn scoped<T, L, C>(load: L, cancel: C) -> Load<T>
where
    L: Future<Output = ApiResult<T>>,
    C: Future<Output = ()>,
{
    tokio::select! {
        result = load => Load::from(result),
        () = cancel => {
            tracing::debug!("load cancelled; discarding result");
            Load::Pending
        }
    }
}
