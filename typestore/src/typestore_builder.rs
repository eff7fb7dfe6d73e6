use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::store::RemoteStore;
use crate::typestore::Typestore;
use crate::typestore_config::TypestoreConfig;
use std::sync::Arc;

/// Builder for opening a [Typestore] client.
///
/// Configuration errors are captured and reported when [TypestoreBuilder::open]
/// is called, so the builder chain itself never fails.
///
/// # Examples
///
/// ```rust,ignore
/// use typestore::{InMemoryStore, Typestore};
///
/// let db = Typestore::builder()
///     .remote(InMemoryStore::default())
///     .strict_schema(false)
///     .open()
///     .await?;
/// ```
#[derive(Default)]
pub struct TypestoreBuilder {
    error: Option<StoreError>,
    config: TypestoreConfig,
    remote: Option<Arc<dyn RemoteStore>>,
}

impl TypestoreBuilder {
    pub fn new() -> Self {
        TypestoreBuilder {
            error: None,
            config: TypestoreConfig::new(),
            remote: None,
        }
    }

    /// Sets the remote store the client talks to. Required.
    pub fn remote<S: RemoteStore + 'static>(self, store: S) -> Self {
        self.shared_remote(Arc::new(store))
    }

    /// Same as [TypestoreBuilder::remote] for a store that is already shared.
    pub fn shared_remote(mut self, store: Arc<dyn RemoteStore>) -> Self {
        if self.remote.is_some() {
            if self.error.is_none() {
                log::error!("Remote store is already configured");
                self.error = Some(StoreError::new(
                    "Remote store is already configured",
                    ErrorKind::InvalidOperation,
                ));
            }
            return self;
        }
        self.remote = Some(store);
        self
    }

    /// Rejects fields unknown to a record's schema on write. Defaults to `true`.
    pub fn strict_schema(self, strict: bool) -> Self {
        self.config.set_strict_schema(strict);
        self
    }

    /// Validates documents against the record's schema on read. Defaults to `true`.
    pub fn validate_reads(self, validate: bool) -> Self {
        self.config.set_validate_reads(validate);
        self
    }

    /// Opens the remote store and returns a ready client.
    ///
    /// # Errors
    ///
    /// - the first error captured while building
    /// - `InvalidOperation` if no remote store was set
    /// - any error raised by the store's `open`
    pub async fn open(self) -> StoreResult<Typestore> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let remote = match self.remote {
            Some(remote) => remote,
            None => {
                log::error!("No remote store configured");
                return Err(StoreError::new(
                    "No remote store configured, call remote() before open()",
                    ErrorKind::InvalidOperation,
                ));
            }
        };

        remote.open().await?;
        self.config.freeze();
        log::info!(
            "Typestore opened (strict_schema: {}, validate_reads: {})",
            self.config.strict_schema(),
            self.config.validate_reads()
        );
        Ok(Typestore::new(self.config, remote))
    }
}
