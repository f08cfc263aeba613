//! Pagination runtime: page envelopes plus the lazy pager abstractions the
//! generated continuation methods construct.

use std::{future::Future, pin::Pin, task::{Context as TaskContext, Poll}};

use futures_core::Stream;

use crate::{Context, Response, Result};

/// One page of a paged sequence: the items plus the continuation cursor.
#[derive(Debug, Clone)]
pub struct Page<T> {
  items: Vec<T>,
  next_link: Option<String>,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, next_link: Option<String>) -> Self {
    Self { items, next_link }
  }

  #[must_use]
  pub fn items(&self) -> &[T] {
    &self.items
  }

  pub fn into_items(self) -> Vec<T> {
    self.items
  }

  #[must_use]
  pub fn next_link(&self) -> Option<&str> {
    self.next_link.as_deref()
  }
}

pub type PageFuture<T> = Pin<Box<dyn Future<Output = Result<Response<Page<T>>>> + Send>>;

/// Fetches the first page.
pub type PageFetcher<T> = Box<dyn Fn(Context) -> PageFuture<T> + Send>;

/// Fetches a page by its continuation link.
pub type NextPageFetcher<T> = Box<dyn Fn(String, Context) -> PageFuture<T> + Send>;

enum PagerState<T> {
  Start,
  Fetching(PageFuture<T>),
  Continuation(String),
  Done,
}

/// Lazily-driven async page stream.
///
/// Nothing is fetched until the stream is polled; the continuation closure is
/// invoked once per `next_link` until the service stops returning one.
pub struct Pager<T> {
  first: PageFetcher<T>,
  next: Option<NextPageFetcher<T>>,
  context: Context,
  state: PagerState<T>,
}

impl<T> Pager<T> {
  pub fn new(first: PageFetcher<T>, next: Option<NextPageFetcher<T>>, context: Context) -> Self {
    Self {
      first,
      next,
      context,
      state: PagerState::Start,
    }
  }
}

impl<T: Unpin> Stream for Pager<T> {
  type Item = Result<Page<T>>;

  fn poll_next(self: Pin<&mut Self>, task: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
    let this = self.get_mut();
    loop {
      match std::mem::replace(&mut this.state, PagerState::Done) {
        PagerState::Start => {
          this.state = PagerState::Fetching((this.first)(this.context.clone()));
        }
        PagerState::Continuation(link) => {
          let Some(next) = this.next.as_ref() else {
            return Poll::Ready(None);
          };
          this.state = PagerState::Fetching(next(link, this.context.clone()));
        }
        PagerState::Fetching(mut future) => match future.as_mut().poll(task) {
          Poll::Pending => {
            this.state = PagerState::Fetching(future);
            return Poll::Pending;
          }
          Poll::Ready(Ok(response)) => {
            let page = response.into_body();
            this.state = match page.next_link() {
              Some(link) if this.next.is_some() => PagerState::Continuation(link.to_string()),
              _ => PagerState::Done,
            };
            return Poll::Ready(Some(Ok(page)));
          }
          Poll::Ready(Err(error)) => {
            this.state = PagerState::Done;
            return Poll::Ready(Some(Err(error)));
          }
        },
        PagerState::Done => return Poll::Ready(None),
      }
    }
  }
}

/// Blocking first-page fetcher.
pub type SyncPageFetcher<T> = Box<dyn Fn(Context) -> Result<Response<Page<T>>> + Send>;

/// Blocking continuation fetcher.
pub type SyncNextPageFetcher<T> = Box<dyn Fn(String, Context) -> Result<Response<Page<T>>> + Send>;

/// Blocking page iterator; the synchronous sibling of [`Pager`].
pub struct PageIterator<T> {
  first: SyncPageFetcher<T>,
  next: Option<SyncNextPageFetcher<T>>,
  context: Context,
  continuation: Option<String>,
  started: bool,
  done: bool,
}

impl<T> PageIterator<T> {
  pub fn new(first: SyncPageFetcher<T>, next: Option<SyncNextPageFetcher<T>>, context: Context) -> Self {
    Self {
      first,
      next,
      context,
      continuation: None,
      started: false,
      done: false,
    }
  }
}

impl<T> Iterator for PageIterator<T> {
  type Item = Result<Page<T>>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }

    let fetched = if !self.started {
      self.started = true;
      (self.first)(self.context.clone())
    } else {
      let link = self.continuation.take()?;
      let next = self.next.as_ref()?;
      next(link, self.context.clone())
    };

    match fetched {
      Ok(response) => {
        let page = response.into_body();
        match page.next_link() {
          Some(link) if self.next.is_some() => self.continuation = Some(link.to_string()),
          _ => self.done = true,
        }
        Some(Ok(page))
      }
      Err(error) => {
        self.done = true;
        Some(Err(error))
      }
    }
  }
}

impl<T> std::fmt::Debug for Pager<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pager").finish_non_exhaustive()
  }
}

impl<T> std::fmt::Debug for PageIterator<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PageIterator").finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use http::HeaderMap;

  use super::*;
  use crate::Error;

  fn page_response<T>(items: Vec<T>, next_link: Option<&str>) -> Result<Response<Page<T>>> {
    Ok(Response::new(200, HeaderMap::new(), Page::new(items, next_link.map(String::from))))
  }

  #[test]
  fn test_page_iterator_follows_continuations() {
    let iterator = PageIterator::new(
      Box::new(|_context| page_response(vec![1, 2], Some("page-2"))),
      Some(Box::new(|link, _context| {
        assert_eq!(link, "page-2");
        page_response(vec![3], None)
      })),
      Context::none(),
    );

    let pages: Vec<_> = iterator.collect();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].as_ref().unwrap().items(), &[1, 2]);
    assert_eq!(pages[1].as_ref().unwrap().items(), &[3]);
  }

  #[test]
  fn test_page_iterator_without_next_fetcher_stops_after_first() {
    let iterator = PageIterator::new(
      Box::new(|_context| page_response(vec![1], Some("page-2"))),
      None,
      Context::none(),
    );

    let pages: Vec<_> = iterator.collect();
    assert_eq!(pages.len(), 1);
  }

  #[test]
  fn test_page_iterator_surfaces_errors_and_stops() {
    let iterator: PageIterator<i32> = PageIterator::new(
      Box::new(|_context| Err(Error::http_status(500))),
      None,
      Context::none(),
    );

    let pages: Vec<_> = iterator.collect();
    assert_eq!(pages.len(), 1);
    assert!(pages[0].is_err());
  }
}
