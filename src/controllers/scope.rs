// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screen lifetime scope.

use crate::error::{AppError, Result};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Cancellation scope tied to a mounted screen.
///
/// Reads run through [`ScreenScope::run`]; once the scope is closed, pending
/// reads are abandoned and resolve to `None`. Writes run through
/// [`ScreenScope::commit`], which always lets the write finish and only
/// withholds its result. Child scopes close with their parent.
#[derive(Debug, Clone, Default)]
pub struct ScreenScope {
    token: CancellationToken,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope closed when either it or `self` is closed.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Close the scope, abandoning every action still in flight.
    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `action` unless the scope closes first.
    ///
    /// Returns `None` if the scope was closed before or while the action ran.
    pub async fn run<F: Future>(&self, action: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            output = action => (!self.token.is_cancelled()).then_some(output),
        }
    }

    /// Run a write to completion on the runtime, even if the scope closes.
    ///
    /// Returns the write's result while the scope is open, or `None` once it
    /// has closed; the write itself is never cut short.
    pub async fn commit<F, T>(&self, write: F) -> Option<Result<T>>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::spawn(write);
        self.run(handle).await.map(|joined| match joined {
            Ok(result) => result,
            Err(e) => Err(AppError::Internal(anyhow::anyhow!("Write task failed: {}", e))),
        })
    }
}
