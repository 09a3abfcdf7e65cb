use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpMessage, HttpRequest, HttpResponse};
use backend_test_support::problem_details::assert_problem_details;
use trxscope::middleware::request_trace::{TraceId, TRACE_HEADER};
use trxscope::{trans, AppError, RequestTrace};

async fn echo_trace(req: HttpRequest) -> HttpResponse {
    let id = req
        .extensions()
        .get::<TraceId>()
        .map(|t| t.0.clone())
        .unwrap_or_default();
    HttpResponse::Ok().body(id)
}

async fn missing_context() -> Result<HttpResponse, AppError> {
    trans::commit(None).await?;
    Ok(HttpResponse::Ok().finish())
}

#[actix_web::test]
async fn header_matches_the_extension() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/trace", web::get().to(echo_trace)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/trace").to_request()).await;
    let header = resp
        .headers()
        .get(TRACE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("trace header");
    let body = test::read_body(resp).await;

    assert!(!header.is_empty());
    assert_eq!(body, header.as_bytes());
}

#[actix_web::test]
async fn every_request_gets_a_new_id() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/trace", web::get().to(echo_trace)),
    )
    .await;

    let a = test::call_service(&app, test::TestRequest::get().uri("/trace").to_request()).await;
    let b = test::call_service(&app, test::TestRequest::get().uri("/trace").to_request()).await;
    assert_ne!(a.headers().get(TRACE_HEADER), b.headers().get(TRACE_HEADER));
}

#[actix_web::test]
async fn missing_request_context_renders_problem_details() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/fail", web::get().to(missing_context)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/fail").to_request()).await;
    let problem = assert_problem_details(
        resp,
        StatusCode::INTERNAL_SERVER_ERROR,
        "INVALID_ARGUMENT",
        Some("trans.commit"),
    )
    .await;
    assert!(problem.type_.ends_with("/INVALID_ARGUMENT"));
}
