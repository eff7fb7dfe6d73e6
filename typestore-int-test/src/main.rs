use typestore::errors::StoreResult;
use typestore::{
    add, array_union, field_update, get, get_by_id, increment, server_date, set, update, update_by_id, Doc,
    FieldValue, Patch, Record,
};
use typestore_int_test::models::{note, Share, ShareMeta};
use typestore_int_test::test_util::{cleanup, create_test_context};

fn print_doc<T: Record>(title: &str, doc: &Doc<T>) -> StoreResult<()> {
    println!("{}", title);
    println!("{}", doc.to_json_string()?);
    Ok(())
}

#[tokio::main]
async fn main() -> StoreResult<()> {
    colog::init();
    let ctx = create_test_context().await?;
    let db = ctx.db();

    let added_note = add(db, ctx.notes(), &note("Hello, cruel world!")).await?;
    print_doc("The document structure:", &added_note)?;

    let test_note = set(db, ctx.notes(), "test", &note("Test note")).await?;
    log::info!("Set {}", test_note.reference());

    let share = Share {
        note: added_note.reference().clone(),
        tags: vec!["test".into(), "demo".into(), "docs".into()],
        shared_at: FieldValue::server(server_date()),
        meta: ShareMeta {
            views: FieldValue::literal(0),
            likes: FieldValue::literal(0),
        },
        comment: None,
    };
    let added_share = add(db, ctx.shares(), &share).await?;

    update(
        db,
        added_share.reference(),
        Patch::new()
            .set("comment", "Hi, check this out!")
            .set("tags", array_union(vec!["docs", "documentation"])),
    )
    .await?;

    update_by_id(
        db,
        ctx.shares(),
        added_share.id(),
        vec![field_update(&["meta", "views"], increment(100500))?],
    )
    .await?;

    let share_from_db = get(db, added_share.reference()).await?;
    let same_share = get_by_id(db, ctx.shares(), added_share.id()).await?;
    if share_from_db != same_share {
        log::warn!("Reads by reference and by id disagree");
    }

    match share_from_db {
        Some(doc) => print_doc("The updated & retrieved document:", &doc)?,
        None => log::warn!("Share {} disappeared", added_share.reference()),
    }

    cleanup(ctx).await
}
