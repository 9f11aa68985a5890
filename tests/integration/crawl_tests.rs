//! Integration tests for the crawl loop
//!
//! These tests use wiremock to stand in for the case-search site and
//! tempfile for the output directory, and run the controller end-to-end
//! with zero pacing and backoff.

use docket_harvest::config::{parse_config, Config};
use docket_harvest::crawler::{crawl_all, CrawlController};
use docket_harvest::output::StopReason;
use docket_harvest::storage::FileStore;
use docket_harvest::CrawlOutcome;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a configuration pointing at the mock server
///
/// `crawl` is appended to the `[crawl]` table; `rest` holds the remaining
/// tables (`[case]`, `[[court]]`, ...).
fn test_config(base_url: &str, crawl: &str, rest: &str) -> Config {
    let toml = format!(
        r#"
[site]
base-url = "{}"

[request]
timeout-secs = 5

[crawl]
base-delay-ms = 0
jitter-ms = 0
backoff-unit-ms = 0
{}

{}
"#,
        base_url, crawl, rest
    );
    parse_config(&toml).expect("test config should be valid")
}

fn row(event: &str, description: &str, documents: &[(&str, &str)]) -> String {
    let entries: String = documents
        .iter()
        .map(|(href, doc_type)| {
            format!(
                r#"<tr><td><a href="{}">View</a></td><td>{}</td></tr>"#,
                href, doc_type
            )
        })
        .collect();

    format!(
        r#"<tr><td>01/15/2024</td><td>{}</td><td>{}</td><td><table class="docGrid"><tbody>{}</tbody></table></td></tr>"#,
        event, description, entries
    )
}

fn panel(label: &str, rows: &[String]) -> String {
    format!(
        r#"<div class="panel panel-default">
             <div class="panel-heading"><div class="panel-heading-content">{}</div></div>
             <div class="panel-body">
               <table class="rgMasterTable">
                 <thead><tr><th>Date</th><th>Event Type</th><th>Description</th><th>Document</th></tr></thead>
                 <tbody>{}</tbody>
               </table>
             </div>
           </div>"#,
        label,
        rows.concat()
    )
}

fn page(panels: &[String]) -> String {
    format!(
        "<html><head><title>Case</title></head><body>{}</body></html>",
        panels.concat()
    )
}

fn empty_case_page() -> String {
    page(&[panel("Case Events", &[])])
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

fn pdf(content: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/pdf")
        .set_body_bytes(content.to_vec())
}

#[tokio::test]
async fn test_refused_petition_is_saved_with_disposition() {
    let server = MockServer::start().await;
    let body = page(&[panel(
        "Case Events",
        &[
            row("PDR DISP", "Refused", &[]),
            row("PDR FILED", "", &[("/SearchMedia.aspx?id=pdr", "Petition")]),
        ],
    )]);

    Mock::given(method("GET"))
        .and(path("/Case.aspx"))
        .and(query_param("cn", "PD-0451-24"))
        .and(query_param("coa", "coscca"))
        .respond_with(html(body))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/SearchMedia.aspx"))
        .and(query_param("id", "pdr"))
        .respond_with(pdf(b"%PDF-petition"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(
        &server.uri(),
        "",
        r#"
[case]
pattern = "PD-{seq:04}-{year}"
year = 24

[output]
directory = "PDRs"

[[court]]
code = "coscca"
start = 451
end = 451
"#,
    );

    let dir = TempDir::new().unwrap();
    let mut controller =
        CrawlController::from_config(&config, &config.courts[0], FileStore::new(dir.path()))
            .unwrap();
    let report = controller.run(451, Some(451)).await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.matched, 1);
    assert_eq!(report.documents_saved, 1);
    assert!(report.failed_ids.is_empty());
    assert_eq!(report.stop_reason, StopReason::EndReached { last: 451 });

    let saved = dir.path().join("PDRs").join("PD-0451-24 PDR (refused).pdf");
    assert_eq!(std::fs::read(saved).unwrap(), b"%PDF-petition");
}

#[tokio::test]
async fn test_only_brief_of_notice_and_brief_pair_is_downloaded() {
    let server = MockServer::start().await;
    let body = page(&[
        panel("Case Events", &[row("NOTICE OF APPEAL", "", &[])]),
        panel(
            "Appellate Briefs",
            &[
                row(
                    "BRIEF FILED",
                    "State",
                    &[("/docs/state-brief.pdf", "Brief")],
                ),
                row(
                    "BRIEF FILED",
                    "Appellant",
                    &[
                        ("/docs/notice.pdf", "Notice"),
                        ("/docs/appellant-brief.pdf", "Brief"),
                    ],
                ),
            ],
        ),
    ]);

    Mock::given(method("GET"))
        .and(path("/Case.aspx"))
        .and(query_param("cn", "01-24-00516-CR"))
        .respond_with(html(body))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/appellant-brief.pdf"))
        .respond_with(pdf(b"%PDF-brief"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/notice.pdf"))
        .respond_with(pdf(b"%PDF-notice"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/state-brief.pdf"))
        .respond_with(pdf(b"%PDF-state"))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(
        &server.uri(),
        "",
        r#"
[case]
pattern = "{court:02}-{year}-{seq:05}-{suffix}"
year = 24
suffix = "CR"

[output]
directory = "CA{court:02}_20{year}_Briefs"

[[court]]
number = 1
start = 516
end = 516
"#,
    );

    let dir = TempDir::new().unwrap();
    let mut controller =
        CrawlController::from_config(&config, &config.courts[0], FileStore::new(dir.path()))
            .unwrap();
    let report = controller.run(516, Some(516)).await.unwrap();

    assert_eq!(report.documents_saved, 1);

    let out_dir = dir.path().join("CA01_2024_Briefs");
    let names: Vec<String> = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["01-24-00516-CR Appellant Brief.pdf".to_string()]);
    assert_eq!(
        std::fs::read(out_dir.join("01-24-00516-CR Appellant Brief.pdf")).unwrap(),
        b"%PDF-brief"
    );
}

#[tokio::test]
async fn test_miss_streak_stops_open_ended_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Case.aspx"))
        .respond_with(html(page(&[])))
        .expect(50)
        .mount(&server)
        .await;

    let config = test_config(
        &server.uri(),
        "",
        r#"
[case]
pattern = "PD-{seq:04}-{year}"
year = 24

[[court]]
start = 1
"#,
    );

    let dir = TempDir::new().unwrap();
    let mut controller =
        CrawlController::from_config(&config, &config.courts[0], FileStore::new(dir.path()))
            .unwrap();
    let report = controller.run(1, None).await.unwrap();

    assert_eq!(report.processed, 50);
    assert_eq!(report.matched, 0);
    assert_eq!(
        report.stop_reason,
        StopReason::MissStreak {
            last: 50,
            streak: 50
        }
    );
    assert_ne!(report.stop_reason, StopReason::EndReached { last: 50 });
}

#[tokio::test]
async fn test_miss_streak_stops_bounded_run_before_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Case.aspx"))
        .respond_with(html(page(&[])))
        .expect(50)
        .mount(&server)
        .await;

    let config = test_config(
        &server.uri(),
        "",
        r#"
[case]
pattern = "PD-{seq:04}-{year}"
year = 24

[[court]]
start = 1
end = 200
"#,
    );

    let dir = TempDir::new().unwrap();
    let mut controller =
        CrawlController::from_config(&config, &config.courts[0], FileStore::new(dir.path()))
            .unwrap();
    let report = controller.run(1, Some(200)).await.unwrap();

    assert_eq!(report.processed, 50);
    assert_eq!(
        report.stop_reason,
        StopReason::MissStreak {
            last: 50,
            streak: 50
        }
    );
}

#[tokio::test]
async fn test_start_past_end_processes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(empty_case_page()))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(
        &server.uri(),
        "",
        r#"
[case]
pattern = "PD-{seq:04}-{year}"
year = 24

[[court]]
start = 1
"#,
    );

    let dir = TempDir::new().unwrap();
    let mut controller =
        CrawlController::from_config(&config, &config.courts[0], FileStore::new(dir.path()))
            .unwrap();
    let report = controller.run(10, Some(5)).await.unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(report.documents_saved, 0);
    assert!(report.failed_ids.is_empty());
    assert_eq!(report.stop_reason, StopReason::EndReached { last: 5 });
}

#[tokio::test]
async fn test_match_resets_miss_streak() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Case.aspx"))
        .and(query_param("cn", "PD-0003-24"))
        .respond_with(html(empty_case_page()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Case.aspx"))
        .respond_with(html(page(&[])))
        .mount(&server)
        .await;

    let config = test_config(
        &server.uri(),
        "miss-threshold = 3",
        r#"
[case]
pattern = "PD-{seq:04}-{year}"
year = 24

[[court]]
start = 1
"#,
    );

    let dir = TempDir::new().unwrap();
    let mut controller =
        CrawlController::from_config(&config, &config.courts[0], FileStore::new(dir.path()))
            .unwrap();
    let report = controller.run(1, None).await.unwrap();

    // 1, 2 miss; 3 matches; 4, 5, 6 miss
    assert_eq!(report.processed, 6);
    assert_eq!(report.matched, 1);
    assert_eq!(report.documents_saved, 0);
    assert_eq!(
        report.stop_reason,
        StopReason::MissStreak { last: 6, streak: 3 }
    );
}

#[tokio::test]
async fn test_failed_case_is_reported_and_run_continues() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Case.aspx"))
        .and(query_param("cn", "PD-0002-24"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Case.aspx"))
        .respond_with(html(empty_case_page()))
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(
        &server.uri(),
        "max-attempts = 2",
        r#"
[case]
pattern = "PD-{seq:04}-{year}"
year = 24

[[court]]
start = 1
end = 3
"#,
    );

    let dir = TempDir::new().unwrap();
    let mut controller =
        CrawlController::from_config(&config, &config.courts[0], FileStore::new(dir.path()))
            .unwrap();
    let report = controller.run(1, Some(3)).await.unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.matched, 2);
    assert_eq!(report.stop_reason, StopReason::EndReached { last: 3 });
    let failed: Vec<&str> = report.failed_ids.iter().map(|id| id.as_str()).collect();
    assert_eq!(failed, vec!["PD-0002-24"]);
}

#[tokio::test]
async fn test_transient_error_recovers_within_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Case.aspx"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Case.aspx"))
        .respond_with(html(empty_case_page()))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(
        &server.uri(),
        "",
        r#"
[case]
pattern = "PD-{seq:04}-{year}"
year = 24

[[court]]
start = 7
end = 7
"#,
    );

    let dir = TempDir::new().unwrap();
    let mut controller =
        CrawlController::from_config(&config, &config.courts[0], FileStore::new(dir.path()))
            .unwrap();
    let report = controller.run(7, Some(7)).await.unwrap();

    assert_eq!(report.matched, 1);
    assert!(report.failed_ids.is_empty());
}

#[tokio::test]
async fn test_download_failure_marks_case_failed() {
    let server = MockServer::start().await;
    let body = page(&[panel(
        "Case Events",
        &[row("PDR FILED", "", &[("/docs/missing.pdf", "Petition")])],
    )]);

    Mock::given(method("GET"))
        .and(path("/Case.aspx"))
        .respond_with(html(body))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = test_config(
        &server.uri(),
        "max-attempts = 1",
        r#"
[case]
pattern = "PD-{seq:04}-{year}"
year = 24

[[court]]
start = 1
end = 1
"#,
    );

    let dir = TempDir::new().unwrap();
    let mut controller =
        CrawlController::from_config(&config, &config.courts[0], FileStore::new(dir.path()))
            .unwrap();
    let report = controller.run(1, Some(1)).await.unwrap();

    assert_eq!(report.matched, 1);
    assert_eq!(report.documents_saved, 0);
    assert_eq!(report.failed_ids.len(), 1);
    assert_eq!(report.failed_ids[0].as_str(), "PD-0001-24");
}

#[tokio::test]
async fn test_probe_does_not_download() {
    let server = MockServer::start().await;
    let body = page(&[panel(
        "Case Events",
        &[
            row("PDR DISP", "Petition Granted", &[]),
            row("PDR FILED", "", &[("/docs/pdr.pdf", "Petition")]),
        ],
    )]);

    Mock::given(method("GET"))
        .and(path("/Case.aspx"))
        .respond_with(html(body))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/pdr.pdf"))
        .respond_with(pdf(b"%PDF"))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(
        &server.uri(),
        "",
        r#"
[case]
pattern = "PD-{seq:04}-{year}"
year = 24

[[court]]
start = 1
"#,
    );

    let dir = TempDir::new().unwrap();
    let controller =
        CrawlController::from_config(&config, &config.courts[0], FileStore::new(dir.path()))
            .unwrap();
    let (id, outcome) = controller.probe(12).await.unwrap();

    assert_eq!(id.as_str(), "PD-0012-24");
    match outcome {
        CrawlOutcome::Matched {
            documents,
            disposition,
        } => {
            assert_eq!(documents.len(), 1);
            assert_eq!(
                controller.filename(&id, &documents[0], disposition),
                "PD-0012-24 PDR (granted).pdf"
            );
        }
        other => panic!("unexpected outcome: {}", other),
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_crawl_all_runs_each_court_into_its_own_directory() {
    let server = MockServer::start().await;
    for (cn, href) in [
        ("01-24-00001-CR", "/docs/one.pdf"),
        ("14-24-00001-CR", "/docs/fourteen.pdf"),
    ] {
        let body = page(&[
            panel("Case Events", &[]),
            panel(
                "Appellate Briefs",
                &[row("BRIEF FILED", "Appellee", &[(href, "Brief")])],
            ),
        ]);
        Mock::given(method("GET"))
            .and(path("/Case.aspx"))
            .and(query_param("cn", cn))
            .respond_with(html(body))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/docs/one.pdf"))
        .respond_with(pdf(b"one"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/fourteen.pdf"))
        .respond_with(pdf(b"fourteen"))
        .mount(&server)
        .await;

    let config = test_config(
        &server.uri(),
        "",
        r#"
[case]
pattern = "{court:02}-{year}-{seq:05}-{suffix}"
year = 24
suffix = "CR"

[output]
directory = "CA{court:02}_20{year}_Briefs"

[[court]]
number = 1
end = 1

[[court]]
number = 14
end = 1
"#,
    );

    let dir = TempDir::new().unwrap();
    let reports = crawl_all(&config, dir.path()).await.unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].label, "CA01_2024_Briefs");
    assert_eq!(reports[1].label, "CA14_2024_Briefs");
    assert_eq!(
        std::fs::read(
            dir.path()
                .join("CA01_2024_Briefs")
                .join("01-24-00001-CR Appellee Brief.pdf")
        )
        .unwrap(),
        b"one"
    );
    assert_eq!(
        std::fs::read(
            dir.path()
                .join("CA14_2024_Briefs")
                .join("14-24-00001-CR Appellee Brief.pdf")
        )
        .unwrap(),
        b"fourteen"
    );
}
