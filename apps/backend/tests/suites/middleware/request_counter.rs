use actix_web::{test, web, App, HttpResponse};
use backend_test_support::logging::CapturedLogs;
use trxscope::{RequestCount, RequestCounter};

async fn ping() -> HttpResponse {
    HttpResponse::Ok().body("pong")
}

#[actix_web::test]
async fn counts_and_logs_every_request() {
    let logs = CapturedLogs::new();
    let _guard = logs.install();

    let count = RequestCount::new();
    let app = test::init_service(
        App::new()
            .wrap(RequestCounter::new(count.clone()))
            .route("/ping", web::get().to(ping)),
    )
    .await;

    for _ in 0..3 {
        let resp = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        assert!(resp.status().is_success());
    }
    assert_eq!(count.get(), 3);

    let events = logs.events_with_message("starter");
    let counts: Vec<u64> = events
        .iter()
        .filter_map(|e| e["fields"]["router_count"].as_u64())
        .collect();
    assert_eq!(counts, vec![1, 2, 3]);

    for event in &events {
        assert_eq!(event["fields"]["tag"], "starter");
        assert_eq!(event["fields"]["http.method"], "GET");
        assert_eq!(event["fields"]["url.path"], "/ping");
    }
}

#[actix_web::test]
async fn unmatched_routes_are_counted_too() {
    let count = RequestCount::new();
    let app = test::init_service(
        App::new()
            .wrap(RequestCounter::new(count.clone()))
            .route("/ping", web::get().to(ping)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/nope").to_request()).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    let resp = test::call_service(&app, test::TestRequest::post().uri("/ping").to_request()).await;
    assert!(resp.status().is_client_error());

    assert_eq!(count.get(), 2);
}

#[actix_web::test]
async fn counter_is_shared_across_app_instances() {
    let count = RequestCount::new();
    let first = test::init_service(
        App::new()
            .wrap(RequestCounter::new(count.clone()))
            .route("/ping", web::get().to(ping)),
    )
    .await;
    let second = test::init_service(
        App::new()
            .wrap(RequestCounter::new(count.clone()))
            .route("/ping", web::get().to(ping)),
    )
    .await;

    test::call_service(&first, test::TestRequest::get().uri("/ping").to_request()).await;
    test::call_service(&second, test::TestRequest::get().uri("/ping").to_request()).await;
    test::call_service(&first, test::TestRequest::get().uri("/ping").to_request()).await;

    assert_eq!(count.get(), 3);
}
