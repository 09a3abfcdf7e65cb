// Savepoint nesting: inner begin/rollback only undoes the inner work.

use trxscope::db::query::table;
use trxscope::{trans, TrxNesting};

use crate::common::{insert_note, note_bodies, pool, request_for, sqlite_state};

#[actix_web::test]
async fn inner_rollback_keeps_outer_work() {
    let (_file, state) = sqlite_state(TrxNesting::Savepoint).await;
    let req = request_for(&state);

    trans::begin(Some(&req)).await.unwrap();
    insert_note(&table(Some(&req), "notes", None, None).unwrap(), "keep")
        .await
        .unwrap();

    trans::begin(Some(&req)).await.unwrap();
    insert_note(&table(Some(&req), "notes", None, None).unwrap(), "discard")
        .await
        .unwrap();
    trans::rollback(Some(&req)).await.unwrap();

    trans::commit(Some(&req)).await.unwrap();
    assert_eq!(note_bodies(&pool(&state)).await, vec!["keep".to_string()]);
}

#[actix_web::test]
async fn outer_rollback_discards_committed_savepoint() {
    let (_file, state) = sqlite_state(TrxNesting::Savepoint).await;
    let req = request_for(&state);

    trans::begin(Some(&req)).await.unwrap();
    trans::begin(Some(&req)).await.unwrap();
    insert_note(&table(Some(&req), "notes", None, None).unwrap(), "inner")
        .await
        .unwrap();
    trans::commit(Some(&req)).await.unwrap();

    trans::rollback(Some(&req)).await.unwrap();
    assert!(note_bodies(&pool(&state)).await.is_empty());
}

#[actix_web::test]
async fn commit_all_releases_every_level() {
    let (_file, state) = sqlite_state(TrxNesting::Savepoint).await;
    let req = request_for(&state);

    for body in ["one", "two", "three"] {
        trans::begin(Some(&req)).await.unwrap();
        insert_note(&table(Some(&req), "notes", None, None).unwrap(), body)
            .await
            .unwrap();
    }
    trans::commit_all(Some(&req)).await.unwrap();

    assert_eq!(
        note_bodies(&pool(&state)).await,
        vec!["one".to_string(), "two".to_string(), "three".to_string()]
    );
}

#[actix_web::test]
async fn begin_after_top_completed_through_a_handle_opens_a_new_trx() {
    let (_file, state) = sqlite_state(TrxNesting::Savepoint).await;
    let req = request_for(&state);

    trans::begin(Some(&req)).await.unwrap();
    insert_note(&table(Some(&req), "notes", None, None).unwrap(), "first")
        .await
        .unwrap();
    let first = trans::get_trx(Some(&req)).unwrap().unwrap();
    first.commit().await.unwrap();

    trans::begin(Some(&req)).await.unwrap();
    let second = trans::get_trx(Some(&req)).unwrap().expect("new trx on top");
    assert!(!second.same_as(&first));
    assert!(!second.is_completed().await);

    insert_note(&table(Some(&req), "notes", None, None).unwrap(), "second")
        .await
        .unwrap();
    trans::rollback(Some(&req)).await.unwrap();
    trans::commit(Some(&req)).await.unwrap();

    assert_eq!(note_bodies(&pool(&state)).await, vec!["first".to_string()]);
}

#[actix_web::test]
async fn completed_top_falls_back_to_the_open_entry_below() {
    let (_file, state) = sqlite_state(TrxNesting::Savepoint).await;
    let req = request_for(&state);

    trans::begin(Some(&req)).await.unwrap();
    let outer = trans::get_trx(Some(&req)).unwrap().unwrap();
    trans::begin(Some(&req)).await.unwrap();
    trans::get_trx(Some(&req)).unwrap().unwrap().commit().await.unwrap();

    trans::begin(Some(&req)).await.unwrap();
    insert_note(&table(Some(&req), "notes", None, None).unwrap(), "nested")
        .await
        .unwrap();
    trans::commit(Some(&req)).await.unwrap();

    // The new entry was a savepoint of `outer`; rolling `outer` back discards it.
    trans::commit(Some(&req)).await.unwrap();
    assert!(!outer.is_completed().await);
    trans::rollback(Some(&req)).await.unwrap();
    assert!(note_bodies(&pool(&state)).await.is_empty());
}
