//! Cursor pagination as a stream.
//!
//! List endpoints return a page of items plus the cursor (`lastFileId`,
//! `lastShareId`) to pass for the next page; `-1` marks the last page.

use crate::error::{Pan123Error, Result};
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;

/// Cursor value that marks the final page.
pub(crate) const LAST_PAGE: i64 = -1;

/// Yield every item of every page, calling `fetch` with the cursor of the
/// previous page (`None` for the first).
pub(crate) fn paginate<T, F, Fut>(fetch: F) -> impl Stream<Item = Result<T>>
where
    F: FnMut(Option<i64>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, i64)>>,
{
    stream::try_unfold((fetch, Some(None)), |(mut fetch, cursor)| async move {
        let Some(cursor) = cursor else {
            return Ok::<_, Pan123Error>(None);
        };
        let (items, last) = fetch(cursor).await?;
        let next = (last != LAST_PAGE).then_some(Some(last));
        let page = stream::iter(items.into_iter().map(Ok::<T, Pan123Error>));
        Ok(Some((page, (fetch, next))))
    })
    .try_flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn follows_cursor_until_last_page() {
        let seen = Mutex::new(Vec::new());
        let items: Vec<u32> = paginate(|cursor| {
            seen.lock().unwrap().push(cursor);
            async move {
                Ok(match cursor {
                    None => (vec![1, 2], 10),
                    Some(10) => (vec![3], 20),
                    _ => (vec![4], LAST_PAGE),
                })
            }
        })
        .try_collect()
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(*seen.lock().unwrap(), vec![None, Some(10), Some(20)]);
    }

    #[tokio::test]
    async fn stops_on_error() {
        let result: Result<Vec<u32>> = paginate(|cursor| async move {
            match cursor {
                None => Ok((vec![1], 5)),
                _ => Err(Pan123Error::Validation("boom".into())),
            }
        })
        .try_collect()
        .await;
        assert!(result.is_err());
    }
}
