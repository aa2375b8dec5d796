//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::watch;

use crate::aladhan::AladhanClient;
use crate::cache::CachedAladhanClient;
use crate::config::ServerConfig;
use crate::domain::Location;
use crate::schedule::{Clock, SystemClock};

/// Shared application state.
///
/// Generic over the prayer times source so handlers can run against the
/// mock client in tests.
pub struct AppState<S = CachedAladhanClient<AladhanClient>> {
    /// Prayer times source, normally the cached Aladhan client
    pub source: Arc<S>,

    /// Server configuration (defaults for params and adjustments)
    pub config: Arc<ServerConfig>,

    /// Where "now" comes from
    pub clock: Arc<dyn Clock>,

    /// Feeds the home monitor, when one is running
    pub home: Option<Arc<watch::Sender<Location>>>,
}

impl<S> AppState<S> {
    /// Create a new app state on the system clock.
    pub fn new(source: S, config: ServerConfig) -> Self {
        Self::with_clock(Arc::new(source), config, Arc::new(SystemClock))
    }

    pub fn with_clock(source: Arc<S>, config: ServerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            config: Arc::new(config),
            clock,
            home: None,
        }
    }

    pub fn with_home(mut self, home: Arc<watch::Sender<Location>>) -> Self {
        self.home = Some(home);
        self
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
            home: self.home.clone(),
        }
    }
}
