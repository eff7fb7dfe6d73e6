//! Client configuration.

use crate::codec::RecordCodec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Configuration shared by a [crate::Typestore] client and its operations.
///
/// Values are set through [crate::TypestoreBuilder] and frozen once the
/// client is opened.
///
/// # Defaults
/// - `strict_schema`: `true`, fields unknown to a record's schema are rejected
///   on write. When `false` they are passed through unchecked.
/// - `validate_reads`: `true`, decoded documents are validated against the
///   schema before mapping.
#[derive(Clone)]
pub struct TypestoreConfig {
    inner: Arc<TypestoreConfigInner>,
}

impl Default for TypestoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TypestoreConfig {
    pub fn new() -> Self {
        TypestoreConfig {
            inner: Arc::new(TypestoreConfigInner {
                strict_schema: AtomicBool::new(true),
                validate_reads: AtomicBool::new(true),
                frozen: AtomicBool::new(false),
            }),
        }
    }

    pub fn strict_schema(&self) -> bool {
        self.inner.strict_schema.load(Ordering::Relaxed)
    }

    pub fn validate_reads(&self) -> bool {
        self.inner.validate_reads.load(Ordering::Relaxed)
    }

    /// The codec built from the current settings.
    pub fn codec(&self) -> RecordCodec {
        RecordCodec::new(self.strict_schema(), self.validate_reads())
    }

    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.load(Ordering::Relaxed)
    }

    pub(crate) fn set_strict_schema(&self, strict: bool) {
        if !self.is_frozen() {
            self.inner.strict_schema.store(strict, Ordering::Relaxed);
        }
    }

    pub(crate) fn set_validate_reads(&self, validate: bool) {
        if !self.is_frozen() {
            self.inner.validate_reads.store(validate, Ordering::Relaxed);
        }
    }

    pub(crate) fn freeze(&self) {
        self.inner.frozen.store(true, Ordering::Relaxed);
    }
}

struct TypestoreConfigInner {
    strict_schema: AtomicBool,
    validate_reads: AtomicBool,
    frozen: AtomicBool,
}
