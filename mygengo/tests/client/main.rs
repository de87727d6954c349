use mygengo::{Client, Error, JobStatus, Tier};
use mygengo_common::helper::sign_hmac_sha1;
use mygengo_common::sign::json_signing_message;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const API_KEY: &str = "public";
const PRIVATE_KEY: &str = "private";

fn get_client(server: &MockServer) -> Client {
    Client::builder()
        .api_key(API_KEY)
        .private_key(PRIVATE_KEY)
        .base_url(&server.uri())
        .retry_delay(Duration::from_millis(10))
        .min_request_interval(Duration::ZERO)
        .build()
}

fn ok(response: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"opstat": "ok", "response": response}))
}

fn form_fields(req: &Request) -> HashMap<String, String> {
    url::form_urlencoded::parse(&req.body).into_owned().collect()
}

/// `data` field of a POST/PUT body, decoded.
fn data_of(req: &Request) -> Value {
    let fields = form_fields(req);
    serde_json::from_str(&fields["data"]).unwrap()
}

async fn single_request(server: &MockServer) -> Request {
    let mut reqs = server.received_requests().await.unwrap();
    assert_eq!(reqs.len(), 1);
    reqs.remove(0)
}

// region    --- envelope
#[tokio::test]
async fn balance_returns_credits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/balance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"opstat":"ok","response":{"credits":"120.00"}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let balance = get_client(&server).get_account_balance().await.unwrap();
    assert_eq!(balance, "120.00");
}

#[tokio::test]
async fn api_error_carries_code_and_msg() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/balance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"opstat":"error","err":{"code":2,"msg":"Invalid API key"}}"#),
        )
        .mount(&server)
        .await;

    let e = get_client(&server).get_account_balance().await.unwrap_err();
    assert!(matches!(e, Error::Api { .. }));
    assert_eq!(e.code(), 2);
    assert_eq!(e.msg(), "Invalid API key");
}

#[tokio::test]
async fn missing_opstat_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/balance"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"response":{"credits":"120.00"}}"#),
        )
        .mount(&server)
        .await;

    let e = get_client(&server).get_account_balance().await.unwrap_err();
    assert!(matches!(e, Error::Json(_)));
    assert_eq!(e.code(), Error::JSON_CODE);
}

#[tokio::test]
async fn missing_extracted_field_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate/job/5"))
        .respond_with(ok(json!({"jobs": []})))
        .mount(&server)
        .await;

    let e = get_client(&server).get_job(5).build().send().await.unwrap_err();
    assert!(matches!(e, Error::Json(_)));
}
// endregion --- envelope

// region    --- retry
#[tokio::test]
async fn retries_503_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/balance"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/account/balance"))
        .respond_with(ok(json!({"credits": "7.50"})))
        .expect(1)
        .mount(&server)
        .await;

    let balance = get_client(&server).get_account_balance().await.unwrap();
    assert_eq!(balance, "7.50");

    // the retried request is the same request, not re-signed
    let reqs = server.received_requests().await.unwrap();
    assert_eq!(reqs.len(), 3);
    assert!(reqs.iter().all(|r| r.url == reqs[0].url));
}

#[tokio::test]
async fn retries_exhausted_surfaces_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/balance"))
        .respond_with(ResponseTemplate::new(503).set_body_string("please wait"))
        .expect(3)
        .mount(&server)
        .await;

    let e = get_client(&server).get_account_balance().await.unwrap_err();
    match &e {
        Error::Http { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "please wait");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(e.code(), 503);
}

#[tokio::test]
async fn retries_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate/service/languages"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/translate/service/languages"))
        .respond_with(ok(json!([{"lc": "fr", "language": "French"}])))
        .expect(1)
        .mount(&server)
        .await;

    let langs = get_client(&server).get_languages().await.unwrap();
    assert_eq!(langs[0]["lc"], "fr");
}

#[tokio::test]
async fn other_status_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/stats"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let e = get_client(&server).get_account_stats().await.unwrap_err();
    assert!(matches!(e, Error::Http { .. }));
    assert_eq!(e.code(), 404);
}

#[tokio::test]
async fn single_try_does_not_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/stats"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_key(API_KEY)
        .private_key(PRIVATE_KEY)
        .base_url(&server.uri())
        .num_tries(1)
        .build();
    let e = client.get_account_stats().await.unwrap_err();
    assert_eq!(e.code(), 503);
}

#[tokio::test]
async fn connection_failure_is_connection_error() {
    // nothing listens on port 1
    let client = Client::builder()
        .api_key(API_KEY)
        .private_key(PRIVATE_KEY)
        .base_url("http://127.0.0.1:1/v1/")
        .retry_delay(Duration::from_millis(10))
        .build();
    let e = client.get_account_balance().await.unwrap_err();
    assert!(matches!(e, Error::Connection(_)));
    assert_eq!(e.code(), Error::CONNECTION_CODE);
}
// endregion --- retry

// region    --- signing
#[tokio::test]
async fn get_request_is_signed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate/service/language_pairs"))
        .and(query_param("lc_src", "en"))
        .and(query_param("api_key", API_KEY))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    get_client(&server)
        .get_language_pairs(Some("en"))
        .await
        .unwrap();

    let req = single_request(&server).await;
    assert_eq!(
        req.headers.get("accept").unwrap().to_str().unwrap(),
        "application/json"
    );
    let query = req.url.query().unwrap();
    let (unsigned, api_sig) = query.split_once("&api_sig=").unwrap();
    assert!(unsigned.starts_with("api_key=public&lc_src=en&ts="));
    assert_eq!(api_sig, sign_hmac_sha1(PRIVATE_KEY, unsigned).unwrap());
}

#[tokio::test]
async fn post_request_is_signed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate/job/9/comment"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    get_client(&server)
        .submit_job_comment(9, "see https://example.com/style-guide, merci beaucoup é")
        .await
        .unwrap();

    let req = single_request(&server).await;
    assert_eq!(
        req.headers.get("content-type").unwrap().to_str().unwrap(),
        "application/x-www-form-urlencoded"
    );
    let fields = form_fields(&req);
    assert_eq!(fields["api_key"], API_KEY);
    assert_eq!(
        fields["data"],
        r#"{"body":"see https://example.com/style-guide, merci beaucoup \u00e9"}"#
    );

    let data: Value = serde_json::from_str(&fields["data"]).unwrap();
    let message = json_signing_message(API_KEY, &fields["ts"], &data).unwrap();
    assert!(message.contains(r"https:\/\/example.com\/style-guide"));
    assert_eq!(fields["api_sig"], sign_hmac_sha1(PRIVATE_KEY, &message).unwrap());
}
// endregion --- signing

// region    --- operations
#[tokio::test]
async fn submit_job_sends_defaults_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate/job"))
        .respond_with(ok(json!({"job": {"job_id": "1", "body_src": "big red car"}})))
        .expect(1)
        .mount(&server)
        .await;

    let job = get_client(&server)
        .submit_job()
        .text("big red car")
        .target("fr")
        .build()
        .send()
        .await
        .unwrap();
    assert_eq!(job["body_src"], "big red car");

    let req = single_request(&server).await;
    assert_eq!(
        data_of(&req),
        json!({"job": {
            "body_src": "big red car",
            "lc_src": "en",
            "lc_tgt": "fr",
            "tier": "machine",
            "auto_approve": "0"
        }})
    );
}

#[tokio::test]
async fn submit_job_with_all_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate/job"))
        .respond_with(ok(json!({"job": {"job_id": "2"}})))
        .mount(&server)
        .await;

    get_client(&server)
        .submit_job()
        .text("hello")
        .target("ja")
        .source("en")
        .tier(Tier::Standard)
        .auto_approve(true)
        .slug("greeting")
        .custom_data("{\"id\":3}")
        .comment("informal")
        .callback_url("https://example.com/cb")
        .build()
        .send()
        .await
        .unwrap();

    let job = &data_of(&single_request(&server).await)["job"];
    assert_eq!(job["tier"], "standard");
    assert_eq!(job["auto_approve"], "1");
    assert_eq!(job["slug"], "greeting");
    assert_eq!(job["custom_data"], "{\"id\":3}");
    assert_eq!(job["comment"], "informal");
    assert_eq!(job["callback_url"], "https://example.com/cb");
}

#[tokio::test]
async fn submit_custom_job_is_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate/job"))
        .respond_with(ok(json!({"job": {"job_id": "3"}})))
        .mount(&server)
        .await;

    let custom = json!({"body_src": "x", "lc_src": "en", "lc_tgt": "de", "tier": "pro", "force": 1});
    let job = get_client(&server).submit_custom_job(&custom).await.unwrap();
    assert_eq!(job["job_id"], "3");
    assert_eq!(data_of(&single_request(&server).await), json!({"job": custom}));
}

#[tokio::test]
async fn submit_job_group_flags() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate/jobs"))
        .respond_with(ok(json!({"group_id": 11, "jobs": []})))
        .mount(&server)
        .await;

    let jobs = json!({"job_1": {"body_src": "a", "lc_src": "en", "lc_tgt": "fr", "tier": "machine"}});
    let resp = get_client(&server)
        .submit_job_group()
        .jobs(&jobs)
        .as_group(true)
        .build()
        .send()
        .await
        .unwrap();
    assert_eq!(resp["group_id"], 11);

    let data = data_of(&single_request(&server).await);
    assert_eq!(data, json!({"jobs": jobs, "as_group": "1", "process": "1"}));
}

#[tokio::test]
async fn get_job_with_pre_mt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate/job/42"))
        .and(query_param("pre_mt", "1"))
        .respond_with(ok(json!({"job": {"job_id": "42", "status": "approved"}})))
        .expect(1)
        .mount(&server)
        .await;

    let job = get_client(&server)
        .get_job(42)
        .pre_mt(true)
        .build()
        .send()
        .await
        .unwrap();
    assert_eq!(job["status"], "approved");
}

#[tokio::test]
async fn get_job_without_pre_mt_omits_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate/job/42"))
        .respond_with(ok(json!({"job": {"job_id": "42"}})))
        .mount(&server)
        .await;

    get_client(&server).get_job(42).build().send().await.unwrap();
    let req = single_request(&server).await;
    assert!(!req.url.query().unwrap().contains("pre_mt"));
}

#[tokio::test]
async fn job_sub_resources_extract_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate/job/8/revisions"))
        .respond_with(ok(json!({"job_id": "8", "revisions": [{"rev_id": "1"}]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/translate/job/8/revision/1"))
        .respond_with(ok(json!({"revision": {"body_tgt": "voiture"}})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/translate/job/8/feedback"))
        .respond_with(ok(json!({"feedback": {"rating": "5.0"}})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/translate/job/8/comments"))
        .respond_with(ok(json!({"thread": [{"body": "hi", "author": "customer"}]})))
        .mount(&server)
        .await;

    let client = get_client(&server);
    let revisions = client.get_job_revisions(8).await.unwrap();
    assert_eq!(revisions, json!([{"rev_id": "1"}]));
    let revision = client.get_job_revision(8, 1).await.unwrap();
    assert_eq!(revision["revision"]["body_tgt"], "voiture");
    let feedback = client.get_job_feedback(8).await.unwrap();
    assert_eq!(feedback["rating"], "5.0");
    let thread = client.get_job_comments(8).await.unwrap();
    assert_eq!(thread[0]["author"], "customer");
}

#[tokio::test]
async fn preview_is_returned_raw() {
    let server = MockServer::start().await;
    let jpeg = vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10];
    Mock::given(method("GET"))
        .and(path("/translate/job/4/preview"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(jpeg.clone()))
        .mount(&server)
        .await;

    let image = get_client(&server).get_job_preview(4).await.unwrap();
    assert_eq!(image.as_ref(), jpeg.as_slice());
}

#[tokio::test]
async fn update_job_uses_put() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/translate/job/6"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    get_client(&server)
        .update_job(6)
        .param("rating", "4")
        .param("for_translator", "thanks")
        .action("approve")
        .build()
        .send()
        .await
        .unwrap();

    let data = data_of(&single_request(&server).await);
    assert_eq!(
        data,
        json!({"action": "approve", "rating": "4", "for_translator": "thanks"})
    );
}

#[tokio::test]
async fn cancel_job_uses_signed_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/translate/job/6"))
        .and(query_param("api_key", API_KEY))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    get_client(&server).cancel_job(6).await.unwrap();
    let req = single_request(&server).await;
    assert!(req.url.query().unwrap().contains("&api_sig="));
    assert!(req.body.is_empty());
}

#[tokio::test]
async fn get_jobs_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate/jobs"))
        .and(query_param("status", "available"))
        .and(query_param("timestamp_after", "1300000000"))
        .and(query_param("count", "10"))
        .respond_with(ok(json!([{"job_id": "1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = get_client(&server)
        .get_jobs()
        .status(JobStatus::Available)
        .timestamp_after(1_300_000_000)
        .count(10)
        .build()
        .send()
        .await
        .unwrap();
    assert_eq!(jobs[0]["job_id"], "1");
}

#[tokio::test]
async fn get_job_group_extracts_jobs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate/jobs/77"))
        .respond_with(ok(json!({"jobs": [{"job_id": "1"}, {"job_id": "2"}]})))
        .mount(&server)
        .await;

    let jobs = get_client(&server).get_job_group(77).await.unwrap();
    assert_eq!(jobs.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn language_pairs_without_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate/service/language_pairs"))
        .respond_with(ok(json!([{"lc_src": "en", "lc_tgt": "ja"}])))
        .mount(&server)
        .await;

    get_client(&server).get_language_pairs(None).await.unwrap();
    let req = single_request(&server).await;
    assert!(!req.url.query().unwrap().contains("lc_src"));
}

#[tokio::test]
async fn account_stats_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/stats"))
        .respond_with(ok(json!({"credits_spent": "10.00", "user_since": 1234567890})))
        .mount(&server)
        .await;

    let stats = get_client(&server).get_account_stats().await.unwrap();
    assert_eq!(stats["user_since"], 1234567890);
}
// endregion --- operations

#[tokio::test]
async fn consecutive_requests_are_spaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/stats"))
        .respond_with(ok(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_key(API_KEY)
        .private_key(PRIVATE_KEY)
        .base_url(&server.uri())
        .min_request_interval(Duration::from_millis(200))
        .build();

    let start = Instant::now();
    client.get_account_stats().await.unwrap();
    client.get_account_stats().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(200));
}
