use crate::models::{Counter, Note, Profile, Share};
use typestore::errors::StoreResult;
use typestore::{collection, Collection, InMemoryStore, InMemoryStoreConfig, Typestore};

/// A client over a fresh in-memory store plus the collections the tests use.
#[derive(Clone)]
pub struct TestContext {
    db: Typestore,
    store: InMemoryStore,
    notes: Collection<Note>,
    shares: Collection<Share>,
    profiles: Collection<Profile>,
    counters: Collection<Counter>,
}

impl TestContext {
    pub fn db(&self) -> &Typestore {
        &self.db
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    pub fn notes(&self) -> &Collection<Note> {
        &self.notes
    }

    pub fn shares(&self) -> &Collection<Share> {
        &self.shares
    }

    pub fn profiles(&self) -> &Collection<Profile> {
        &self.profiles
    }

    pub fn counters(&self) -> &Collection<Counter> {
        &self.counters
    }
}

pub async fn create_test_context() -> StoreResult<TestContext> {
    create_context(true, true).await
}

/// A context whose client passes unknown fields through and skips read validation.
pub async fn create_lenient_context() -> StoreResult<TestContext> {
    create_context(false, false).await
}

async fn create_context(strict_schema: bool, validate_reads: bool) -> StoreResult<TestContext> {
    let store = InMemoryStore::new(InMemoryStoreConfig::new());
    let db = Typestore::builder()
        .remote(store.clone())
        .strict_schema(strict_schema)
        .validate_reads(validate_reads)
        .open()
        .await?;

    Ok(TestContext {
        db,
        store,
        notes: collection("notes")?,
        shares: collection("shares")?,
        profiles: collection("profiles")?,
        counters: collection("counters")?,
    })
}

pub async fn cleanup(ctx: TestContext) -> StoreResult<()> {
    ctx.db.shutdown().await
}
