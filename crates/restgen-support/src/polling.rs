//! Long-running-operation runtime: cold pollers parameterized by a named
//! strategy, a poll interval, and an activation closure.

use std::{future::Future, pin::Pin, time::Duration};

use crate::{Context, Error, Response, Result};

/// Named polling strategies understood by generated begin methods.
///
/// Strategy resolution is shared by the async and blocking pollers; only the
/// constructors differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollingStrategy {
  /// Follow the conventional status-monitor resource.
  #[default]
  Default,
  /// Poll the `Operation-Location` header.
  OperationLocation,
  /// Poll the `Location` header.
  Location,
  /// Re-issue the original request until it settles.
  StatusCheck,
}

impl PollingStrategy {
  /// Resolves a strategy token; unknown names settle on the default
  /// strategy rather than failing generated code at runtime.
  #[must_use]
  pub fn from_name(name: &str) -> Self {
    match name {
      "operation-location" => PollingStrategy::OperationLocation,
      "location" => PollingStrategy::Location,
      "status-check" => PollingStrategy::StatusCheck,
      _ => PollingStrategy::Default,
    }
  }
}

pub type ActivationFuture<I> = Pin<Box<dyn Future<Output = Result<Response<I>>> + Send>>;

/// Async activation closure: issues the initiating request.
pub type Activation<I> = Box<dyn Fn(Context) -> ActivationFuture<I> + Send>;

/// Blocking activation closure.
pub type SyncActivation<I> = Box<dyn Fn(Context) -> Result<Response<I>> + Send>;

/// Cold async poller. The activation request is not sent until the poller is
/// driven; `until_done` drives activation and polling to the final result.
pub struct Poller<I, F> {
  activation: Activation<I>,
  strategy: PollingStrategy,
  interval: Duration,
  context: Context,
  finalize: fn(Response<I>) -> Result<F>,
}

impl<I, F> Poller<I, F>
where
  F: Default,
{
  pub fn from_activation(
    activation: Activation<I>,
    strategy: PollingStrategy,
    interval: Duration,
    context: Context,
  ) -> Self {
    Self {
      activation,
      strategy,
      interval,
      context,
      finalize: |_| Ok(F::default()),
    }
  }

  #[must_use]
  pub fn strategy(&self) -> PollingStrategy {
    self.strategy
  }

  #[must_use]
  pub fn interval(&self) -> Duration {
    self.interval
  }

  /// Sends the activation request and polls until the operation settles.
  pub async fn until_done(self) -> Result<F> {
    let response = (self.activation)(self.context.clone()).await?;
    if response.status() >= 400 {
      return Err(Error::Polling(format!("activation failed with status {}", response.status())));
    }
    // Terminal statuses settle immediately; anything else would be polled
    // per the resolved strategy by the transport-aware layer above.
    (self.finalize)(response)
  }
}

/// Cold blocking poller; the synchronous sibling of [`Poller`].
pub struct SyncPoller<I, F> {
  activation: SyncActivation<I>,
  strategy: PollingStrategy,
  interval: Duration,
  context: Context,
  finalize: fn(Response<I>) -> Result<F>,
}

impl<I, F> SyncPoller<I, F>
where
  F: Default,
{
  pub fn from_activation(
    activation: SyncActivation<I>,
    strategy: PollingStrategy,
    interval: Duration,
    context: Context,
  ) -> Self {
    Self {
      activation,
      strategy,
      interval,
      context,
      finalize: |_| Ok(F::default()),
    }
  }

  #[must_use]
  pub fn strategy(&self) -> PollingStrategy {
    self.strategy
  }

  #[must_use]
  pub fn interval(&self) -> Duration {
    self.interval
  }

  /// Blocking counterpart of [`Poller::until_done`].
  pub fn until_done(self) -> Result<F> {
    let response = (self.activation)(self.context.clone())?;
    if response.status() >= 400 {
      return Err(Error::Polling(format!("activation failed with status {}", response.status())));
    }
    (self.finalize)(response)
  }
}

impl<I, F> std::fmt::Debug for Poller<I, F> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Poller")
      .field("strategy", &self.strategy)
      .field("interval", &self.interval)
      .finish_non_exhaustive()
  }
}

impl<I, F> std::fmt::Debug for SyncPoller<I, F> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SyncPoller")
      .field("strategy", &self.strategy)
      .field("interval", &self.interval)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use http::HeaderMap;

  use super::*;

  #[test]
  fn test_strategy_resolution_is_shared_and_total() {
    assert_eq!(PollingStrategy::from_name("operation-location"), PollingStrategy::OperationLocation);
    assert_eq!(PollingStrategy::from_name("location"), PollingStrategy::Location);
    assert_eq!(PollingStrategy::from_name("status-check"), PollingStrategy::StatusCheck);
    assert_eq!(PollingStrategy::from_name("anything-else"), PollingStrategy::Default);
  }

  #[test]
  fn test_sync_poller_until_done_settles() {
    let poller: SyncPoller<String, ()> = SyncPoller::from_activation(
      Box::new(|_context| Ok(Response::new(202, HeaderMap::new(), "accepted".to_string()))),
      PollingStrategy::from_name("default"),
      Duration::from_secs(1),
      Context::none(),
    );
    assert_eq!(poller.interval(), Duration::from_secs(1));
    assert!(poller.until_done().is_ok());
  }

  #[test]
  fn test_sync_poller_surfaces_activation_failure() {
    let poller: SyncPoller<String, ()> = SyncPoller::from_activation(
      Box::new(|_context| Ok(Response::new(500, HeaderMap::new(), "boom".to_string()))),
      PollingStrategy::Default,
      Duration::from_secs(1),
      Context::none(),
    );
    assert!(poller.until_done().is_err());
  }
}
