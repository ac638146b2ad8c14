//! Interceptor Registry - ordered builder for interceptor chains.

use crate::chain::Chain;
use crate::terminal::Terminal;
use crate::{Interceptor, Stage};
use log::debug;
use std::fmt;

/// Registry for constructing interceptor chains.
///
/// `Registry` holds an ordered list of interceptors. [`build`](Registry::build)
/// wraps a fresh [`Terminal`] with each of them in registration order, so the
/// first registered interceptor is innermost (transport side) and the last one
/// outermost (application side). One registry can build a chain for every
/// connection; each build calls every interceptor exactly once.
///
/// # Example
///
/// ```ignore
/// use rtc_interceptor::Registry;
///
/// let registry = Registry::new()
///     .with(NackResponder::default())
///     .with(StatsInterceptor::default());
///
/// let chain = registry.build("pc-1");
/// ```
///
/// # Helper Function Pattern
///
/// ```ignore
/// fn register_default_interceptors(registry: Registry) -> Registry {
///     registry
///         .with(NackResponder::default())
///         .with(StatsInterceptor::default())
/// }
///
/// let registry = register_default_interceptors(Registry::new());
/// let chain = registry.build("pc-1");
/// ```
pub struct Registry<C: ?Sized = str> {
    interceptors: Vec<Box<dyn Interceptor<C>>>,
}

impl<C: ?Sized> Default for Registry<C> {
    fn default() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }
}

impl<C: ?Sized> Registry<C> {
    /// Create a new empty registry.
    ///
    /// Chains built from an empty registry hand every packet back unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interceptor after the ones already registered.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let registry = Registry::new()
    ///     .with(ReportInterceptor::default())
    ///     .with(StatsInterceptor::default());
    /// ```
    pub fn with<I>(mut self, interceptor: I) -> Self
    where
        I: Interceptor<C> + 'static,
    {
        self.add(Box::new(interceptor));
        self
    }

    /// Register a closure as an interceptor.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let registry = Registry::new()
    ///     .with_fn(|_conn: &str, next| Box::new(SsrcRewriter { next, ssrc: 1 }));
    /// ```
    pub fn with_fn<F>(self, f: F) -> Self
    where
        F: Fn(&C, Box<dyn Stage>) -> Box<dyn Stage> + Send + Sync + 'static,
    {
        self.with(f)
    }

    /// Register a boxed interceptor after the ones already registered.
    pub fn add(&mut self, interceptor: Box<dyn Interceptor<C>>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Build the interceptor chain for one connection.
    pub fn build(&self, conn: &C) -> Chain {
        debug!(
            "building interceptor chain with {} interceptors",
            self.interceptors.len()
        );

        let stage = self
            .interceptors
            .iter()
            .fold(Box::new(Terminal::new()) as Box<dyn Stage>, |next, interceptor| {
                interceptor.intercept(conn, next)
            });

        Chain::new(stage)
    }
}

impl<C: ?Sized> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
