//! Paged list resources.
//!
//! Jira returns long lists in pages of `{ "startAt", "maxResults", "total", "values" }`,
//! the search resource uses `issues` instead of `values`. The next page is requested
//! with `startAt` set to the number of items seen so far.
use futures::{stream, Stream, StreamExt, TryStreamExt};
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{Jira, JiraError, Result};

#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub total: usize,
    #[serde(alias = "issues")]
    pub values: Option<Vec<T>>,
}

impl<T> Page<T> {
    fn empty() -> Self {
        Page {
            total: 0,
            values: None,
        }
    }

    /// Where the following page starts, or `None` if this page is the last one.
    /// An empty page is always the last, whatever `total` says.
    #[must_use]
    pub fn next_start(&self, start_at: usize) -> Option<usize> {
        match &self.values {
            Some(values) if !values.is_empty() && start_at + values.len() < self.total => {
                Some(start_at + values.len())
            }
            _ => None,
        }
    }
}

impl Jira {
    #[cfg_attr(doc, aquamarine::aquamarine)]
    /// Streams every item of a paged resource, fetching a page only when the
    /// items of the previous page have been consumed.
    ///
    /// ```mermaid
    /// sequenceDiagram
    ///     participant C as caller
    ///     participant J as Jira
    ///     C->>J: GET resource?startAt=0
    ///     J-->>C: 50 of 150
    ///     C->>J: GET resource?startAt=50
    ///     J-->>C: 50 of 150
    ///     C->>J: GET resource?startAt=100
    ///     J-->>C: 50 of 150, done
    /// ```
    ///
    /// With `empty_on_404` a 404 response ends the stream without an error.
    /// Dropping the stream stops further requests.
    pub fn paginate<'a, T>(
        &'a self,
        resource: String,
        empty_on_404: bool,
    ) -> impl Stream<Item = Result<T>> + Send + 'a
    where
        T: DeserializeOwned + Send + 'a,
    {
        stream::try_unfold(Some(0_usize), move |next_start| {
            let resource = resource.clone();
            async move { self.next_page::<T>(&resource, next_start, empty_on_404).await }
        })
        .map_ok(|items: Vec<T>| stream::iter(items.into_iter().map(Ok::<T, JiraError>)))
        .try_flatten()
        .boxed()
    }

    async fn next_page<T>(
        &self,
        resource: &str,
        next_start: Option<usize>,
        empty_on_404: bool,
    ) -> Result<Option<(Vec<T>, Option<usize>)>>
    where
        T: DeserializeOwned,
    {
        let Some(start_at) = next_start else {
            return Ok(None);
        };
        let page = self.fetch_page::<T>(resource, start_at, empty_on_404).await?;
        let following = page.next_start(start_at);
        Ok(Some((page.values.unwrap_or_default(), following)))
    }

    async fn fetch_page<T>(&self, resource: &str, start_at: usize, empty_on_404: bool) -> Result<Page<T>>
    where
        T: DeserializeOwned,
    {
        let separator = if resource.contains('?') { '&' } else { '?' };
        let paged = format!("{resource}{separator}startAt={start_at}");
        debug!("Querying: {paged}");
        match self.get::<Page<T>>(&paged).await {
            Err(JiraError::NotFound(url)) if empty_on_404 => {
                debug!("Received 404 response from {url}, no items.");
                Ok(Page::empty())
            }
            other => other,
        }
    }
}
