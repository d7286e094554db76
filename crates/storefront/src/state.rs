//! Application state shared across handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use detach_core::{Catalog, CatalogError};

use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::services::{LogSink, NotificationSink, SmtpSink};

/// Error building application state at startup.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("content error: {0}")]
    Content(#[from] ContentError),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The catalog and content are
/// read-only after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    content: ContentStore,
    notifier: Arc<dyn NotificationSink>,
    quote_turn: AtomicUsize,
}

impl AppState {
    /// Create application state from its parts.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        content: ContentStore,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                content,
                notifier,
                quote_turn: AtomicUsize::new(0),
            }),
        }
    }

    /// Build state from configuration: load the catalog and content, and
    /// pick the SMTP sink when email is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file or content directory is invalid,
    /// or the SMTP relay cannot be set up.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading catalog file");
                Catalog::load(path)?
            }
            None => Catalog::detach(),
        };
        tracing::info!(
            garments = catalog.garments.len(),
            designs = catalog.designs.len(),
            "Catalog ready"
        );

        let content = ContentStore::load(&config.content_dir)?;

        let notifier: Arc<dyn NotificationSink> = match &config.smtp {
            Some(smtp) => {
                tracing::info!(host = %smtp.host, "Submissions will be emailed");
                Arc::new(SmtpSink::new(smtp)?)
            }
            None => {
                tracing::warn!("DETACH_SMTP_HOST not set, submissions will only be logged");
                Arc::new(LogSink)
            }
        };

        Ok(Self::new(config, catalog, content, notifier))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the loaded content pages.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Get the notification sink for submissions.
    #[must_use]
    pub fn notifier(&self) -> &dyn NotificationSink {
        self.inner.notifier.as_ref()
    }

    /// Advance the about-page quote rotation, returning this view's turn.
    pub fn next_quote_turn(&self) -> usize {
        self.inner.quote_turn.fetch_add(1, Ordering::Relaxed)
    }
}
