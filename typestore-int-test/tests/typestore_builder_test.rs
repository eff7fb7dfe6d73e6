use std::sync::Arc;
use typestore::errors::{ErrorKind, StoreResult};
use typestore::{
    add, field_update, get, get_by_id, set, update, update_fields, InMemoryStore, InMemoryStoreConfig, Patch,
    RemoteStore, Typestore,
};
use typestore_int_test::models::note;
use typestore_int_test::test_util::{cleanup, create_test_context};

#[ctor::ctor]
fn init() {
    colog::init();
}

#[tokio::test]
async fn test_open_requires_remote() {
    let err = Typestore::builder()
        .strict_schema(false)
        .open()
        .await
        .err()
        .expect("open without a remote store");
    assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
}

#[tokio::test]
async fn test_open_with_shared_remote() -> StoreResult<()> {
    let store = InMemoryStore::default();
    let remote: Arc<dyn RemoteStore> = Arc::new(store.clone());
    let db = Typestore::builder().shared_remote(remote).open().await?;

    let notes = typestore::collection("notes")?;
    add(&db, &notes, &note("Hello")).await?;
    assert_eq!(store.document_count(), 1);

    db.shutdown().await
}

#[tokio::test]
async fn test_custom_auto_id_length() -> StoreResult<()> {
    let config = InMemoryStoreConfig::new();
    config.set_auto_id_length(8)?;
    let db = Typestore::builder()
        .remote(InMemoryStore::new(config))
        .open()
        .await?;

    let notes = typestore::collection("notes")?;
    let doc = add(&db, &notes, &note("Hello")).await?;
    assert_eq!(doc.id().len(), 8);

    db.shutdown().await
}

#[tokio::test]
async fn test_operations_fail_after_shutdown() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db().clone();
    let written = set(&db, ctx.notes(), "test", &note("Test")).await?;
    cleanup(ctx.clone()).await?;

    assert!(db.is_closed());
    assert!(ctx.store().is_closed());

    let errors = vec![
        add(&db, ctx.notes(), &note("x")).await.err(),
        set(&db, ctx.notes(), "test", &note("x")).await.err(),
        update(&db, written.reference(), Patch::new().set("text", "x")).await.err(),
        update_fields(&db, written.reference(), vec![field_update(&["text"], "x")?])
            .await
            .err(),
    ];
    for err in errors {
        assert_eq!(err.expect("operation after shutdown").kind(), &ErrorKind::StoreClosed);
    }

    let err = get(&db, written.reference()).await.expect_err("get after shutdown");
    assert_eq!(err.kind(), &ErrorKind::StoreClosed);
    let err = get_by_id(&db, ctx.notes(), "test")
        .await
        .expect_err("get_by_id after shutdown");
    assert_eq!(err.kind(), &ErrorKind::StoreClosed);

    Ok(())
}

#[tokio::test]
async fn test_shutdown_twice_is_noop() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db().clone();

    cleanup(ctx).await?;
    db.shutdown().await?;
    assert!(db.is_closed());
    Ok(())
}
