mod common;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use common::{memory_history, test_config};
use docugen::error::{ANALYSIS_UNAVAILABLE_MESSAGE, CONTENT_RETRIEVAL_MESSAGE};
use docugen::services::{build_analysis_service, MockAnalysisService};
use docugen::{
    AnalysisService, Config, DocumentationGenerator, DocumentationRecord, GenerationError,
    HistoryStore, ProcessingStatus,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const PROJECT_URL: &str = "https://github.com/acme/widgets";

/// 后端收到的一次请求
#[derive(Debug, Clone)]
struct SeenRequest {
    method: String,
    path: String,
    body: String,
}

/// 固定响应的本地后端：POST /analyze 和 GET /result/{id}
struct CannedBackend {
    addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl CannedBackend {
    async fn start(analyze: (u16, String), result: (u16, String)) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log = seen.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let log = log.clone();
                let analyze = analyze.clone();
                let result = result.clone();
                tokio::spawn(async move {
                    handle(stream, log, analyze, result).await;
                });
            }
        });

        Self { addr, seen }
    }

    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

async fn handle(
    mut stream: TcpStream,
    log: Arc<Mutex<Vec<SeenRequest>>>,
    analyze: (u16, String),
    result: (u16, String),
) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };

    let (status, body) = match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/analyze") => analyze,
        ("GET", path) if path.starts_with("/result/") => result,
        _ => (404, r#"{"message":"no such route"}"#.to_string()),
    };
    log.lock().unwrap().push(request);

    let response = format!(
        "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn read_request(stream: &mut TcpStream) -> Option<SeenRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some(SeenRequest { method, path, body })
}

/// 一份字段齐全的文档
async fn full_record() -> DocumentationRecord {
    MockAnalysisService::new(&Config::headless())
        .generate("job-42", PROJECT_URL)
        .await
        .unwrap()
}

fn ok_ticket() -> (u16, String) {
    (200, json!({ "analysisId": "job-42", "projectName": "Widgets" }).to_string())
}

async fn http_generator(base_url: String) -> (DocumentationGenerator, Arc<HistoryStore>) {
    let config = Config {
        api_base_url: base_url,
        request_timeout_secs: 5,
        ..test_config()
    };
    assert!(!config.is_mock_mode());

    let service = build_analysis_service(&config).unwrap();
    let history = memory_history().await;
    let generator = DocumentationGenerator::new(&config, service, history.clone());
    (generator, history)
}

#[tokio::test]
async fn test_http_backend_full_run() {
    let record = full_record().await;
    let backend = CannedBackend::start(
        ok_ticket(),
        (200, serde_json::to_string(&record).unwrap()),
    )
    .await;
    // 末尾的斜杠会被去掉
    let (generator, history) = http_generator(format!("{}/", backend.base_url())).await;

    let result = generator.submit(PROJECT_URL).await.unwrap();
    assert_eq!(result, record);

    let snapshot = generator.snapshot();
    assert_eq!(snapshot.status, ProcessingStatus::Complete);
    assert_eq!(snapshot.progress, 100);
    assert_eq!(snapshot.document.as_deref(), Some(&record));

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/analyze");
    let sent: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent, json!({ "url": PROJECT_URL }));
    assert_eq!(requests[1].method, "GET");
    assert_eq!(requests[1].path, "/result/job-42");

    let entries = history.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].url, PROJECT_URL);
    assert_eq!(entries[0].project_name, record.project_name);
}

#[tokio::test]
async fn test_http_analyze_error_message_is_shown() {
    let backend = CannedBackend::start(
        (500, json!({ "message": "Repository not found" }).to_string()),
        (200, "{}".to_string()),
    )
    .await;
    let (generator, history) = http_generator(backend.base_url()).await;

    let result = generator.submit(PROJECT_URL).await;
    assert_eq!(
        result,
        Err(GenerationError::ServiceUnavailable("Repository not found".to_string()))
    );

    let snapshot = generator.snapshot();
    assert_eq!(snapshot.status, ProcessingStatus::Error);
    assert_eq!(snapshot.progress, 10);
    assert_eq!(snapshot.last_error.as_deref(), Some("Repository not found"));

    // 第二次调用不会发生
    assert_eq!(backend.requests().len(), 1);
    assert!(history.entries().await.is_empty());
}

#[tokio::test]
async fn test_http_result_error_field_is_shown() {
    let backend = CannedBackend::start(
        ok_ticket(),
        (502, json!({ "error": "analysis expired" }).to_string()),
    )
    .await;
    let (generator, _history) = http_generator(backend.base_url()).await;

    let result = generator.submit(PROJECT_URL).await;
    assert_eq!(
        result,
        Err(GenerationError::ContentRetrievalFailed("analysis expired".to_string()))
    );
    assert_eq!(generator.snapshot().progress, 40);
}

#[tokio::test]
async fn test_http_error_without_message_uses_fallback() {
    let backend = CannedBackend::start(
        (500, "internal failure".to_string()),
        (200, "{}".to_string()),
    )
    .await;
    let (generator, _history) = http_generator(backend.base_url()).await;

    let result = generator.submit(PROJECT_URL).await;
    assert_eq!(
        result,
        Err(GenerationError::ServiceUnavailable(ANALYSIS_UNAVAILABLE_MESSAGE.to_string()))
    );
}

#[tokio::test]
async fn test_http_record_missing_key_is_content_failure() {
    let mut body = serde_json::to_value(full_record().await).unwrap();
    body.as_object_mut().unwrap().remove("appendix");

    let backend = CannedBackend::start(ok_ticket(), (200, body.to_string())).await;
    let (generator, history) = http_generator(backend.base_url()).await;

    let result = generator.submit(PROJECT_URL).await;
    assert_eq!(
        result,
        Err(GenerationError::ContentRetrievalFailed(CONTENT_RETRIEVAL_MESSAGE.to_string()))
    );

    let snapshot = generator.snapshot();
    assert_eq!(snapshot.status, ProcessingStatus::Error);
    assert_eq!(snapshot.last_error.as_deref(), Some(CONTENT_RETRIEVAL_MESSAGE));
    assert!(snapshot.document.is_none());
    assert!(history.entries().await.is_empty());
}

#[tokio::test]
async fn test_http_unreachable_backend_uses_fallback() {
    // 先占用再释放一个端口，保证没有服务监听
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (generator, history) = http_generator(format!("http://{}", addr)).await;

    let result = generator.submit(PROJECT_URL).await;
    assert_eq!(
        result,
        Err(GenerationError::ServiceUnavailable(ANALYSIS_UNAVAILABLE_MESSAGE.to_string()))
    );

    let snapshot = generator.snapshot();
    assert_eq!(snapshot.status, ProcessingStatus::Error);
    assert_eq!(snapshot.last_error.as_deref(), Some(ANALYSIS_UNAVAILABLE_MESSAGE));
    assert!(history.entries().await.is_empty());
}
