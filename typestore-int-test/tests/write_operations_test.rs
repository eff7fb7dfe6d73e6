use typestore::errors::{ErrorKind, StoreResult};
use typestore::{
    add, field, field_update, get, set, update, update_by_id, update_fields, Document, FieldUpdate, Patch,
};
use typestore_int_test::models::{address, note, profile, Note, Profile, Visibility};
use typestore_int_test::test_util::{cleanup, create_test_context};

#[ctor::ctor]
fn init() {
    colog::init();
}

#[tokio::test]
async fn test_add_assigns_id() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db();

    let first = add(db, ctx.notes(), &note("Hello, cruel world!")).await?;
    let second = add(db, ctx.notes(), &note("Hello, cruel world!")).await?;

    assert_eq!(first.id().len(), 20);
    assert!(first.id().chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(first.id(), second.id());
    assert_eq!(first.reference().collection(), ctx.notes());
    assert_eq!(first.data(), &note("Hello, cruel world!"));
    assert_eq!(ctx.store().document_count(), 2);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_set_creates_document_with_given_id() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db();

    let doc = set(db, ctx.notes(), "test", &note("Test note")).await?;
    assert_eq!(doc.id(), "test");
    assert_eq!(doc.reference().to_string(), "notes/test");

    let stored = get(db, doc.reference()).await?.expect("note exists");
    assert_eq!(stored.data(), &note("Test note"));

    cleanup(ctx).await
}

#[tokio::test]
async fn test_set_rejects_invalid_id() -> StoreResult<()> {
    let ctx = create_test_context().await?;

    for id in ["", "a/b", ".", "..", "__id__"] {
        let err = set(ctx.db(), ctx.notes(), id, &note("Test note"))
            .await
            .expect_err("invalid id accepted");
        assert_eq!(err.kind(), &ErrorKind::InvalidId, "id {:?}", id);
    }
    assert_eq!(ctx.store().document_count(), 0);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_set_overwrites_whole_document() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db();

    let mut alice = profile("Alice");
    alice.nickname = Some("Al".to_string());
    set(db, ctx.profiles(), "alice", &alice).await?;

    let replacement = profile("Alice Liddell");
    set(db, ctx.profiles(), "alice", &replacement).await?;

    let stored = get(db, &ctx.profiles().doc("alice")?).await?.expect("profile exists");
    assert_eq!(stored.data(), &replacement);
    assert_eq!(stored.data().nickname, None);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_update_merges_top_level_fields() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db();

    let mut alice = profile("Alice");
    alice.nickname = Some("Al".to_string());
    let doc = set(db, ctx.profiles(), "alice", &alice).await?;

    update(
        db,
        doc.reference(),
        Patch::new()
            .set("name", "Alice Liddell")
            .set("address", address("Oxford", "OX1")),
    )
    .await?;

    let stored = get(db, doc.reference()).await?.expect("profile exists");
    assert_eq!(stored.data().name, "Alice Liddell");
    assert_eq!(stored.data().address, address("Oxford", "OX1"));
    assert_eq!(stored.data().nickname, Some("Al".to_string()));
    assert_eq!(stored.data().scores, vec![1, 2, 3]);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_update_skips_absent_fields() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db();

    let mut alice = profile("Alice");
    alice.nickname = Some("Al".to_string());
    let doc = set(db, ctx.profiles(), "alice", &alice).await?;

    let nickname: Option<String> = None;
    update(
        db,
        doc.reference(),
        Patch::new().set("name", "Alicia").set("nickname", nickname),
    )
    .await?;

    let stored = get(db, doc.reference()).await?.expect("profile exists");
    assert_eq!(stored.data().name, "Alicia");
    assert_eq!(stored.data().nickname, Some("Al".to_string()));

    cleanup(ctx).await
}

#[tokio::test]
async fn test_update_fields_leaves_siblings_untouched() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db();

    let doc = set(db, ctx.profiles(), "alice", &profile("Alice")).await?;

    update_fields(
        db,
        doc.reference(),
        vec![field_update(&["address", "city"], "Porto")?],
    )
    .await?;

    let stored = get(db, doc.reference()).await?.expect("profile exists");
    assert_eq!(stored.data().address, address("Porto", "1000-001"));
    assert_eq!(stored.data().name, "Alice");
    assert_eq!(stored.data().visibility, Visibility::Public);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_update_fields_with_several_paths() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db();

    let doc = set(db, ctx.profiles(), "alice", &profile("Alice")).await?;

    update_fields(
        db,
        doc.reference(),
        vec![
            field(&["address", "zip"])?.set("4000-001"),
            field(&["visibility"])?.set("Private"),
            field(&["scores"])?.set(vec![9i64]),
        ],
    )
    .await?;

    let stored = get(db, doc.reference()).await?.expect("profile exists");
    assert_eq!(stored.data().address, address("Lisbon", "4000-001"));
    assert_eq!(stored.data().visibility, Visibility::Private);
    assert_eq!(stored.data().scores, vec![9]);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_update_by_id_accepts_both_shapes() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db();

    set(db, ctx.profiles(), "alice", &profile("Alice")).await?;

    update_by_id(db, ctx.profiles(), "alice", Patch::<Profile>::new().set("name", "Alicia")).await?;
    update_by_id(
        db,
        ctx.profiles(),
        "alice",
        field_update(&["address", "city"], "Faro")?,
    )
    .await?;

    let stored = get(db, &ctx.profiles().doc("alice")?).await?.expect("profile exists");
    assert_eq!(stored.data().name, "Alicia");
    assert_eq!(stored.data().address.city, "Faro");

    cleanup(ctx).await
}

#[tokio::test]
async fn test_update_missing_document_is_not_found() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db();
    let missing = ctx.notes().doc("missing")?;

    let err = update(db, &missing, Patch::new().set("text", "x"))
        .await
        .expect_err("update of a missing document");
    assert_eq!(err.kind(), &ErrorKind::NotFound);

    let err = update_fields(db, &missing, vec![field_update(&["text"], "x")?])
        .await
        .expect_err("field update of a missing document");
    assert_eq!(err.kind(), &ErrorKind::NotFound);

    assert!(get(db, &missing).await?.is_none());
    cleanup(ctx).await
}

#[tokio::test]
async fn test_empty_updates_are_rejected() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db();
    let doc = add(db, ctx.notes(), &note("Hello")).await?;

    let err = update(db, doc.reference(), Patch::new())
        .await
        .expect_err("empty patch");
    assert_eq!(err.kind(), &ErrorKind::InvalidOperation);

    let err = update_fields(db, doc.reference(), Vec::<FieldUpdate>::new())
        .await
        .expect_err("empty field updates");
    assert_eq!(err.kind(), &ErrorKind::InvalidOperation);

    cleanup(ctx).await
}

#[tokio::test]
async fn test_overlapping_field_paths_are_rejected() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db();
    let doc = set(db, ctx.profiles(), "alice", &profile("Alice")).await?;

    let mut replacement = Document::new();
    replacement.put("city", "Porto")?;
    replacement.put("zip", "4000-001")?;

    let err = update_fields(
        db,
        doc.reference(),
        vec![
            field(&["address"])?.set(replacement),
            field(&["address", "city"])?.set("Braga"),
        ],
    )
    .await
    .expect_err("overlapping paths");
    assert_eq!(err.kind(), &ErrorKind::InvalidOperation);

    let err = update_fields(
        db,
        doc.reference(),
        vec![field(&["name"])?.set("A"), field(&["name"])?.set("B")],
    )
    .await
    .expect_err("duplicate paths");
    assert_eq!(err.kind(), &ErrorKind::InvalidOperation);

    let stored = get(db, doc.reference()).await?.expect("profile exists");
    assert_eq!(stored.data(), &profile("Alice"));

    cleanup(ctx).await
}

#[tokio::test]
async fn test_collection_handle() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let notes = ctx.db().collection(ctx.notes());

    let added = notes.add(&note("Hello")).await?;
    notes.set("test", &note("Test note")).await?;
    notes.update(added.id(), Patch::new().set("text", "Hello again")).await?;
    notes
        .update_fields("test", vec![field_update(&["text"], "Edited")?])
        .await?;

    let hello = notes.get(added.id()).await?.expect("note exists");
    assert_eq!(hello.data(), &note("Hello again"));
    let test = notes.get("test").await?.expect("note exists");
    assert_eq!(test.data(), &note("Edited"));
    assert_eq!(notes.doc("test")?, *test.reference());
    assert!(notes.get("missing").await?.is_none());

    cleanup(ctx).await
}

#[tokio::test]
async fn test_sub_collections_are_separate() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    let db = ctx.db();

    let alice = set(db, ctx.profiles(), "alice", &profile("Alice")).await?;
    let alice_notes = alice.reference().sub_collection::<Note>("notes")?;
    assert_eq!(alice_notes.path().to_string(), "profiles/alice/notes");

    let nested = set(db, &alice_notes, "test", &note("Alice's note")).await?;
    let top_level = set(db, ctx.notes(), "test", &note("Top level note")).await?;

    assert_ne!(nested.reference(), top_level.reference());
    let read = get(db, nested.reference()).await?.expect("nested note exists");
    assert_eq!(read.data(), &note("Alice's note"));
    let read = get(db, top_level.reference()).await?.expect("top level note exists");
    assert_eq!(read.data(), &note("Top level note"));

    cleanup(ctx).await
}

#[tokio::test]
async fn test_offline_store_fails_writes() -> StoreResult<()> {
    let ctx = create_test_context().await?;
    ctx.store().set_offline(true);

    let err = add(ctx.db(), ctx.notes(), &note("Hello"))
        .await
        .expect_err("add while offline");
    assert_eq!(err.kind(), &ErrorKind::WriteError);

    ctx.store().set_offline(false);
    add(ctx.db(), ctx.notes(), &note("Hello")).await?;
    cleanup(ctx).await
}
