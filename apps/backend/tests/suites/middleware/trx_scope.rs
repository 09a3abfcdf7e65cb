use actix_web::{test, web, App, HttpRequest, HttpResponse};
use trxscope::db::query::table;
use trxscope::{trans, AppError, TrxNesting, TrxScope, TrxStack};

use crate::common::{count_notes, insert_note, pool, sqlite_state};

async fn insert_and_forget(req: HttpRequest) -> Result<HttpResponse, AppError> {
    trans::begin(Some(&req)).await?;
    insert_note(&table(Some(&req), "notes", None, None)?, "left open").await?;
    Ok(HttpResponse::Ok().finish())
}

async fn insert_and_commit(req: HttpRequest) -> Result<HttpResponse, AppError> {
    trans::begin(Some(&req)).await?;
    insert_note(&table(Some(&req), "notes", None, None)?, "committed").await?;
    trans::commit(Some(&req)).await?;
    Ok(HttpResponse::Ok().finish())
}

async fn fail_with_two_open(req: HttpRequest) -> Result<HttpResponse, AppError> {
    trans::begin(Some(&req)).await?;
    insert_note(&table(Some(&req), "notes", None, None)?, "outer").await?;
    trans::begin(Some(&req)).await?;
    Err(AppError::internal("handler gave up"))
}

async fn stack_depth(req: HttpRequest) -> HttpResponse {
    let depth = TrxStack::from_req(&req).map(|s| s.depth());
    HttpResponse::Ok().body(format!("{depth:?}"))
}

macro_rules! scoped_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(TrxScope)
                .app_data(web::Data::new($state.clone()))
                .route("/forget", web::post().to(insert_and_forget))
                .route("/commit", web::post().to(insert_and_commit))
                .route("/fail", web::post().to(fail_with_two_open))
                .route("/depth", web::get().to(stack_depth)),
        )
        .await
    };
}

#[actix_web::test]
async fn stack_is_installed_empty() {
    let (_file, state) = sqlite_state(TrxNesting::Independent).await;
    let app = scoped_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/depth").to_request()).await;
    assert_eq!(test::read_body(resp).await, "Some(0)");
}

#[actix_web::test]
async fn open_transaction_is_rolled_back_after_the_response() {
    let (_file, state) = sqlite_state(TrxNesting::Independent).await;
    let app = scoped_app!(state);

    let resp = test::call_service(&app, test::TestRequest::post().uri("/forget").to_request()).await;
    assert!(resp.status().is_success());
    assert_eq!(count_notes(&pool(&state)).await, 0);
}

#[actix_web::test]
async fn committed_work_survives() {
    let (_file, state) = sqlite_state(TrxNesting::Independent).await;
    let app = scoped_app!(state);

    let resp = test::call_service(&app, test::TestRequest::post().uri("/commit").to_request()).await;
    assert!(resp.status().is_success());
    assert_eq!(count_notes(&pool(&state)).await, 1);
}

#[actix_web::test]
async fn error_response_rolls_back_every_level() {
    let (_file, state) = sqlite_state(TrxNesting::Independent).await;
    let app = scoped_app!(state);

    let resp = test::call_service(&app, test::TestRequest::post().uri("/fail").to_request()).await;
    assert!(resp.status().is_server_error());
    assert_eq!(count_notes(&pool(&state)).await, 0);

    // The connections went back to the pool; later requests still work.
    let resp = test::call_service(&app, test::TestRequest::post().uri("/commit").to_request()).await;
    assert!(resp.status().is_success());
    assert_eq!(count_notes(&pool(&state)).await, 1);
}

#[actix_web::test]
async fn savepoint_mode_is_cleaned_up_as_well() {
    let (_file, state) = sqlite_state(TrxNesting::Savepoint).await;
    let app = scoped_app!(state);

    let resp = test::call_service(&app, test::TestRequest::post().uri("/fail").to_request()).await;
    assert!(resp.status().is_server_error());
    assert_eq!(count_notes(&pool(&state)).await, 0);
}
