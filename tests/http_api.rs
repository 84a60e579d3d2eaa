//! # HTTP API Tests
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot` against a
//! recording backend, the direct backend with a missing device, and the CUPS
//! backend with a stand-in `lp`.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use printbridge::{
    PrintBridgeError, Settings, SettingsStore,
    backend::{self, BackendConfig, BackendKind, PrintBackend},
    printer::PrinterDescriptor,
    server::{self, AppState},
};

// ============================================================================
// HELPERS
// ============================================================================

/// Backend that records documents instead of printing them.
#[derive(Default)]
struct RecordingBackend {
    printed: Mutex<Vec<(Settings, String)>>,
    printers: Vec<PrinterDescriptor>,
    fail_listing: bool,
}

impl PrintBackend for RecordingBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::SpoolUnix
    }

    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, PrintBridgeError> {
        if self.fail_listing {
            return Err(PrintBridgeError::Enumeration(
                "lpstat exited with exit status: 1: scheduler is not running".to_string(),
            ));
        }
        Ok(self.printers.clone())
    }

    fn print(&self, document: &str, settings: &Settings) -> Result<(), PrintBridgeError> {
        self.printed
            .lock()
            .unwrap()
            .push((settings.clone(), document.to_string()));
        Ok(())
    }
}

fn app(config_dir: &Path, backend: Arc<dyn PrintBackend>) -> Router {
    let state = AppState::new(Arc::new(SettingsStore::in_dir(config_dir)), backend);
    server::router(Arc::new(state))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// /print
// ============================================================================

#[tokio::test]
async fn test_print_end_to_end_example() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::in_dir(dir.path());
    store
        .save(&Settings {
            printer_name: "POS_PRINTER".into(),
            paper_width: 48,
        })
        .unwrap();

    let recorder = Arc::new(RecordingBackend::default());
    let (status, body) = send(
        app(dir.path(), recorder.clone()),
        post_json(
            "/print",
            json!({"text": "Hello", "items": ["Item 1: $10", "Total: $10"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "message": "Print job completed"}));

    let printed = recorder.printed.lock().unwrap();
    assert_eq!(printed.len(), 1);
    assert_eq!(printed[0].0.printer_name, "POS_PRINTER");
    assert_eq!(printed[0].1, "Hello\nItem 1: $10\nTotal: $10\n");
}

#[tokio::test]
async fn test_print_empty_body_prints_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(RecordingBackend::default());
    let (status, _) = send(app(dir.path(), recorder.clone()), post_json("/print", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(recorder.printed.lock().unwrap()[0].1, "");
}

#[tokio::test]
async fn test_print_malformed_json_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(RecordingBackend::default());
    let request = Request::builder()
        .method("POST")
        .uri("/print")
        .header("content-type", "application/json")
        .body(Body::from("{ text: "))
        .unwrap();

    let (status, body) = send(app(dir.path(), recorder.clone()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(recorder.printed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_print_without_content_type_is_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(RecordingBackend::default());
    let request = Request::builder()
        .method("POST")
        .uri("/print")
        .body(Body::from(r#"{"items": ["Total: $10"]}"#))
        .unwrap();

    let (status, body) = send(app(dir.path(), recorder.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(recorder.printed.lock().unwrap()[0].1, "Total: $10\n");
}

#[tokio::test]
async fn test_print_no_body_prints_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(RecordingBackend::default());
    let request = Request::builder()
        .method("POST")
        .uri("/print")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(app(dir.path(), recorder.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(recorder.printed.lock().unwrap()[0].1, "");
}

#[tokio::test]
async fn test_print_printer_not_connected_is_500() {
    let config_dir = tempfile::tempdir().unwrap();
    let dev_root = tempfile::tempdir().unwrap();
    let backend = backend::build(
        BackendKind::Direct,
        &BackendConfig {
            device_root: dev_root.path().to_path_buf(),
            default_device: dev_root.path().join("usb/lp0"),
            temp_dir: dev_root.path().to_path_buf(),
            ..BackendConfig::default()
        },
    );

    let (status, body) = send(
        app(config_dir.path(), backend),
        post_json("/print", json!({"text": "Hello"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("not connected"), "{}", message);
    assert!(std::fs::read_dir(dev_root.path()).unwrap().next().is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn test_print_spool_failure_is_500_and_leaves_no_temp_file() {
    use std::os::unix::fs::PermissionsExt;

    let config_dir = tempfile::tempdir().unwrap();
    let bin = tempfile::tempdir().unwrap();
    let spool = tempfile::tempdir().unwrap();

    let lp = bin.path().join("lp");
    std::fs::write(&lp, "#!/bin/sh\necho 'lp: Error - scheduler not responding.' >&2\nexit 1\n")
        .unwrap();
    std::fs::set_permissions(&lp, std::fs::Permissions::from_mode(0o755)).unwrap();

    let backend = backend::build(
        BackendKind::SpoolUnix,
        &BackendConfig {
            temp_dir: spool.path().to_path_buf(),
            lp_program: lp,
            ..BackendConfig::default()
        },
    );

    let (status, body) = send(
        app(config_dir.path(), backend),
        post_json("/print", json!({"items": ["a", "b"]})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("scheduler not responding")
    );
    assert!(std::fs::read_dir(spool.path()).unwrap().next().is_none());
}

// ============================================================================
// /printers
// ============================================================================

#[tokio::test]
async fn test_printers_lists_names() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(RecordingBackend {
        printers: vec![PrinterDescriptor::new("POS_PRINTER"), PrinterDescriptor::new("Label")],
        ..RecordingBackend::default()
    });

    let (status, body) = send(app(dir.path(), recorder), get("/printers")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"printers": [{"name": "POS_PRINTER"}, {"name": "Label"}]})
    );
}

#[tokio::test]
async fn test_printers_none_configured_is_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        app(dir.path(), Arc::new(RecordingBackend::default())),
        get("/printers"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"printers": []}));
}

#[tokio::test]
async fn test_printers_failure_is_500_with_error_field() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(RecordingBackend {
        fail_listing: true,
        ..RecordingBackend::default()
    });

    let (status, body) = send(app(dir.path(), recorder), get("/printers")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("scheduler is not running"));
}

// ============================================================================
// /settings
// ============================================================================

#[tokio::test]
async fn test_settings_defaults_before_save() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        app(dir.path(), Arc::new(RecordingBackend::default())),
        get("/settings"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"printerName": "", "paperWidth": 48}));
}

#[tokio::test]
async fn test_settings_reflect_saved_values() {
    let dir = tempfile::tempdir().unwrap();
    SettingsStore::in_dir(dir.path())
        .save(&Settings {
            printer_name: "X".into(),
            paper_width: 80,
        })
        .unwrap();

    let (status, body) = send(
        app(dir.path(), Arc::new(RecordingBackend::default())),
        get("/settings"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"printerName": "X", "paperWidth": 80}));
}

#[tokio::test]
async fn test_settings_saved_by_another_store_are_served() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(RecordingBackend::default());
    let app = app(dir.path(), recorder.clone());

    let (_, before) = send(app.clone(), get("/settings")).await;
    assert_eq!(before, json!({"printerName": "", "paperWidth": 48}));

    // Same directory, separate store, as `printbridge settings set` does
    SettingsStore::in_dir(dir.path())
        .save(&Settings {
            printer_name: "X".into(),
            paper_width: 80,
        })
        .unwrap();

    let (status, after) = send(app.clone(), get("/settings")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after, json!({"printerName": "X", "paperWidth": 80}));

    send(app, post_json("/print", json!({"text": "Hello"}))).await;
    let printed = recorder.printed.lock().unwrap();
    assert_eq!(printed[0].0.printer_name, "X");
    assert_eq!(printed[0].0.paper_width, 80);
}

#[tokio::test]
async fn test_settings_corrupt_file_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("settings.json"), "\u{0}garbage").unwrap();

    let (status, body) = send(
        app(dir.path(), Arc::new(RecordingBackend::default())),
        get("/settings"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"printerName": "", "paperWidth": 48}));
}

// ============================================================================
// CORS
// ============================================================================

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .uri("/settings")
        .header("origin", "http://pos.example")
        .body(Body::empty())
        .unwrap();

    let response = app(dir.path(), Arc::new(RecordingBackend::default()))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
