use std::time::Duration;

use common::model::{Document, ScanType};
use common::requests::{LoginRequest, UploadFile};
use common::resources::keys;
use common::test_harness::MockTransport;
use common::transform::{analysis_results, compliance_score};
use common::{
    ApiConfig, ApiError, ComplianceClient, ManualTimer, MemoryStore, Method, RequestBody,
    SessionStore,
};
use futures::executor::block_on;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

type Client = ComplianceClient<MockTransport, MemoryStore, ManualTimer>;

struct Fixture {
    transport: MockTransport,
    store: MemoryStore,
    timer: ManualTimer,
    client: Client,
}

fn fixture() -> Fixture {
    let _ = env_logger::builder().is_test(true).try_init();
    let transport = MockTransport::new();
    let store = MemoryStore::new();
    let timer = ManualTimer::new();
    let client = ComplianceClient::new(
        transport.clone(),
        store.clone(),
        timer.clone(),
        ApiConfig::with_base_url(Some("http://api.test/")),
    );
    Fixture {
        transport,
        store,
        timer,
        client,
    }
}

fn document(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "filename": format!("{id}.pdf"),
        "original_filename": name,
        "file_type": "pdf",
        "file_size": 2048,
        "uploaded_at": "2025-01-05T10:00:00"
    })
}

fn user() -> Value {
    json!({"id": "u-1", "email": "ana@example.com", "full_name": "Ana", "is_active": true})
}

#[test]
fn deleting_a_document_refetches_the_list_once() {
    let fx = fixture();
    fx.transport.respond(
        Method::Get,
        "/documents",
        200,
        json!({"documents": [document("d-1", "policy.pdf"), document("d-2", "soc2.pdf")], "total": 2}),
    );
    fx.transport.respond(
        Method::Get,
        "/documents",
        200,
        json!({"documents": [document("d-2", "soc2.pdf")], "total": 1}),
    );
    fx.transport.respond_raw(Method::Delete, "/documents/d-1", 204, "");

    let docs = fx.client.documents();
    assert!(block_on(docs.list()).unwrap().contains("d-1"));
    // Fresh read is served from cache.
    block_on(docs.list()).unwrap();
    assert_eq!(fx.transport.count(Method::Get, "/documents"), 1);

    block_on(docs.delete("d-1")).unwrap();
    let refreshed = block_on(docs.list()).unwrap();
    block_on(docs.list()).unwrap();

    assert_eq!(fx.transport.count(Method::Get, "/documents"), 2);
    assert!(!refreshed.contains("d-1"));
    assert_eq!(refreshed.ids(), vec!["d-2".to_string()]);
}

#[test]
fn logout_drops_token_before_the_next_request() {
    let fx = fixture();
    fx.transport.respond(
        Method::Post,
        "/auth/login",
        200,
        json!({"access_token": "tok-1", "token_type": "bearer"}),
    );
    fx.transport.respond(Method::Get, "/auth/me", 200, user());
    fx.transport
        .respond(Method::Get, "/jobs", 200, json!({"jobs": [], "total": 0}));

    let login = LoginRequest {
        email: " ana@example.com ".into(),
        password: "hunter22".into(),
    };
    let signed_in = block_on(fx.client.auth().login(&login)).unwrap();
    assert_eq!(signed_in.email, "ana@example.com");
    assert!(fx.client.session().is_authenticated());

    let form = fx.transport.requests()[0].body.clone();
    assert_eq!(
        form,
        RequestBody::Form(vec![
            ("username".into(), "ana@example.com".into()),
            ("password".into(), "hunter22".into()),
        ])
    );

    block_on(fx.client.jobs().list()).unwrap();
    fx.client.auth().logout();
    assert_eq!(fx.store.get("token"), None);
    assert_eq!(fx.store.get("user"), None);
    assert!(fx.client.cache().is_empty());

    block_on(fx.client.jobs().list()).unwrap();
    let bearers: Vec<Option<String>> = fx
        .transport
        .requests()
        .iter()
        .filter(|r| r.path == "/jobs")
        .map(|r| r.bearer.clone())
        .collect();
    assert_eq!(bearers, vec![Some("tok-1".to_string()), None]);
}

#[test]
fn failed_profile_fetch_leaves_no_token_behind() {
    let fx = fixture();
    fx.transport.respond(
        Method::Post,
        "/auth/login",
        200,
        json!({"access_token": "tok-1"}),
    );
    fx.transport
        .respond(Method::Get, "/auth/me", 401, json!({"detail": "Could not validate credentials"}));

    let login = LoginRequest {
        email: "ana@example.com".into(),
        password: "hunter22".into(),
    };
    let err = block_on(fx.client.auth().login(&login)).unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(fx.client.session().token(), None);
}

#[test]
fn analysis_without_documents_never_reaches_the_network() {
    let fx = fixture();

    let err = block_on(fx.client.jobs().start_analysis(&[], ScanType::Quick)).unwrap_err();

    assert_eq!(err, ApiError::Validation("Please upload documents first".into()));
    assert!(fx.transport.requests().is_empty());
}

#[test]
fn starting_analysis_posts_every_document_and_invalidates_jobs() {
    let fx = fixture();
    fx.transport
        .respond(Method::Get, "/jobs", 200, json!({"jobs": [], "total": 0}));
    fx.transport.respond(
        Method::Post,
        "/jobs/evidence-run",
        200,
        json!({"id": "j-9", "job_type": "evidence_run", "status": "PENDING", "scan_type": "full"}),
    );

    block_on(fx.client.jobs().list()).unwrap();
    let documents: Vec<Document> = [document("d-1", "a.pdf"), document("d-2", "b.pdf")]
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap())
        .collect();
    let job = block_on(fx.client.jobs().start_analysis(&documents, ScanType::Full)).unwrap();
    block_on(fx.client.jobs().list()).unwrap();

    assert_eq!(job.id, "j-9");
    let post = fx
        .transport
        .requests()
        .into_iter()
        .find(|r| r.method == Method::Post)
        .unwrap();
    assert_eq!(post.url, "http://api.test/jobs/evidence-run");
    assert_eq!(
        post.body,
        RequestBody::Json(json!({
            "framework": "soc2",
            "document_ids": ["d-1", "d-2"],
            "scan_type": "full"
        }))
    );
    assert_eq!(fx.transport.count(Method::Get, "/jobs"), 2);
}

#[test]
fn controls_stay_cached_for_an_hour() {
    let fx = fixture();
    let path = "/controls?framework=soc2&scan_type=quick";
    fx.transport.respond(
        Method::Get,
        path,
        200,
        json!({"controls": [{
            "id": "c-1", "control_id": "CC6.1", "framework": "soc2",
            "title": "Logical Access", "check_type": "ai_prompt", "category": "Access Control"
        }], "total": 1}),
    );

    let controls = fx.client.controls();
    block_on(controls.list("soc2", ScanType::Quick)).unwrap();
    fx.timer.advance(Duration::from_secs(59 * 60));
    block_on(controls.list("soc2", ScanType::Quick)).unwrap();
    assert_eq!(fx.transport.count(Method::Get, path), 1);

    fx.timer.advance(Duration::from_secs(2 * 60));
    block_on(controls.list("soc2", ScanType::Quick)).unwrap();
    assert_eq!(fx.transport.count(Method::Get, path), 2);
}

#[test]
fn default_window_expires_documents_after_thirty_seconds() {
    let fx = fixture();
    fx.transport
        .respond(Method::Get, "/documents", 200, json!({"documents": [], "total": 0}));

    block_on(fx.client.documents().list()).unwrap();
    fx.timer.advance(Duration::from_secs(31));
    block_on(fx.client.documents().list()).unwrap();

    assert_eq!(fx.transport.count(Method::Get, "/documents"), 2);
}

#[test]
fn rejected_upload_is_not_sent() {
    let fx = fixture();
    let file = UploadFile::new("payroll.xlsx", "application/vnd.ms-excel", vec![1, 2, 3]);

    let err = block_on(fx.client.documents().upload(file)).unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(fx.transport.requests().is_empty());
}

#[test]
fn upload_is_multipart_and_refreshes_documents() {
    let fx = fixture();
    fx.transport
        .respond(Method::Get, "/documents", 200, json!({"documents": [], "total": 0}));
    fx.transport
        .respond(Method::Post, "/documents/upload", 200, document("d-3", "policy.md"));

    block_on(fx.client.documents().list()).unwrap();
    let file = UploadFile::new("policy.md", "text/markdown", b"# Access".to_vec());
    let uploaded = block_on(fx.client.documents().upload(file.clone())).unwrap();
    block_on(fx.client.documents().list()).unwrap();

    assert_eq!(uploaded.id, "d-3");
    let sent = fx.transport.requests();
    assert_eq!(
        sent[1].body,
        RequestBody::Multipart {
            field: "file".into(),
            file
        }
    );
    assert_eq!(fx.transport.count(Method::Get, "/documents"), 2);
}

#[test]
fn run_invalidates_the_job_detail() {
    let fx = fixture();
    let pending = json!({"id": "j-1", "job_type": "evidence_run", "status": "FAILED"});
    let running = json!({"id": "j-1", "job_type": "evidence_run", "status": "RUNNING"});
    fx.transport.respond(Method::Get, "/jobs/j-1", 200, pending);
    fx.transport.respond(Method::Get, "/jobs/j-1", 200, running.clone());
    fx.transport.respond(Method::Post, "/jobs/j-1/run", 200, running);

    let jobs = fx.client.jobs();
    assert!(block_on(jobs.get("j-1")).unwrap().status.can_run());
    block_on(jobs.run("j-1")).unwrap();
    let after = block_on(jobs.get("j-1")).unwrap();

    assert_eq!(after.status.as_str(), "RUNNING");
    assert_eq!(fx.transport.count(Method::Get, "/jobs/j-1"), 2);
}

#[test]
fn dashboard_score_matches_reported_counts() {
    let fx = fixture();
    fx.transport.respond(
        Method::Get,
        "/jobs/j-1",
        200,
        json!({"id": "j-1", "job_type": "evidence_run", "status": "SUCCEEDED", "total_controls": 8}),
    );
    fx.transport.respond(
        Method::Get,
        "/jobs/j-1/evidence",
        200,
        json!({"evidence": [], "total": 8, "passing": 5, "failing": 1, "needs_review": 2}),
    );

    let job = block_on(fx.client.jobs().get("j-1")).unwrap();
    let evidence = block_on(fx.client.jobs().evidence("j-1")).unwrap();
    let results = analysis_results(&job, &evidence, None);

    assert_eq!(results.score(), 63);
    assert_eq!(compliance_score(5, 8), 63);
    assert_eq!((results.passing, results.failing, results.needs_review), (5, 1, 2));
    assert_eq!(results.total_controls, 8);
}

#[test]
fn cache_keys_nest_under_their_resource() {
    assert!(keys::job_evidence("j-1").starts_with(&keys::jobs()));
    assert!(keys::controls("soc2", ScanType::Full).starts_with(&common::cache::QueryKey::new(["controls"])));
    assert!(!keys::documents().starts_with(&keys::jobs()));
}

#[test]
fn demo_report_downloads_pdf_bytes_for_the_named_organization() {
    let fx = fixture();
    fx.transport.respond_bytes(
        Method::Get,
        "/reports/demo?organization_name=Acme%20Corporation",
        200,
        b"%PDF-1.4 demo".to_vec(),
    );

    let pdf = block_on(fx.client.reports().demo("Acme Corporation")).unwrap();
    let again = block_on(fx.client.reports().demo("Acme Corporation")).unwrap();

    assert_eq!(pdf, b"%PDF-1.4 demo".to_vec());
    assert_eq!(again, pdf);
    let sent = fx.transport.requests();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].bearer, None);
    assert_eq!(sent[0].url, "http://api.test/reports/demo?organization_name=Acme%20Corporation");
}
