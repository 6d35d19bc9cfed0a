//! End-to-end detect flow against a canned localhost responder.
//!
//! The responder speaks just enough HTTP/1.1 for one request: read headers,
//! read `Content-Length` body bytes, answer with a fixed status and body, and
//! hand the captured request back to the test for assertions.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;

fn serve_once(status: u16, body: &'static str) -> (String, mpsc::Receiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind responder");
    let addr = listener.local_addr().expect("responder addr");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let request = read_request(&mut stream);

        let reason = if status == 200 { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().expect("flush response");

        let _ = tx.send(request);
    });

    (format!("http://{addr}/detect"), rx)
}

fn read_request(stream: &mut impl Read) -> Vec<u8> {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buf).expect("read request");
        if n == 0 {
            return request;
        }
        request.extend_from_slice(&buf[..n]);
        if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let content_length = content_length(&request[..header_end]);
    while request.len() - header_end < content_length {
        let n = stream.read(&mut buf).expect("read body");
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
    }

    request
}

fn content_length(headers: &[u8]) -> usize {
    String::from_utf8_lossy(headers)
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().ok())?
        })
        .unwrap_or(0)
}

fn write_scope_image(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("scope.jpg");
    std::fs::write(&path, b"\xff\xd8\xff\xe0fake-jpeg-bytes").expect("write image");
    path
}

#[test]
fn detect_renders_report_from_service_response() {
    let (url, request_rx) = serve_once(
        200,
        r#"{
            "total_count": 3,
            "boxes": [
                {"width": 1, "height": 1},
                {"width": 2, "height": 2},
                {"width": 3, "height": 3}
            ],
            "status": "MODERATE",
            "risk_score": 12
        }"#,
    );

    let temp = tempfile::tempdir().unwrap();
    let image = write_scope_image(temp.path());

    let mut cmd = Command::cargo_bin("plastiscan").unwrap();
    cmd.args(["detect", "--api-url", url.as_str(), "--file"]).arg(&image);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Total Microplastics Detected: 3"))
        .stdout(predicates::str::contains("MODERATE"))
        .stdout(predicates::str::contains(
            "Microplastic 1: Width = 100.0 nm | Height = 100.0 nm | Size ≈ 100.0 nm",
        ))
        .stdout(predicates::str::contains(
            "Microplastic 3: Width = 300.0 nm | Height = 300.0 nm | Size ≈ 300.0 nm",
        ))
        .stdout(predicates::str::contains("Min Size"))
        .stdout(predicates::str::contains("Average Size"))
        .stdout(predicates::str::contains("Max Size"));

    // The request must be a multipart upload with the image under 'file'.
    let request = request_rx.recv().expect("captured request");
    let text = String::from_utf8_lossy(&request);
    assert!(text.starts_with("POST /detect HTTP/1.1"));
    assert!(text.contains("multipart/form-data; boundary="));
    assert!(text.contains("Content-Disposition: form-data; name=\"file\"; filename=\"image.jpg\""));
    assert!(text.contains("Content-Type: image/jpeg"));
    assert!(request
        .windows(15)
        .any(|w| w == b"fake-jpeg-bytes"));
}

#[test]
fn detect_json_output_is_machine_readable() {
    let (url, _request_rx) = serve_once(
        200,
        r#"{"total_count": 2, "boxes": [{"width": 1, "height": 4}, {"width": 2, "height": 2}], "status": "LOW", "risk_score": 3.5}"#,
    );

    let temp = tempfile::tempdir().unwrap();
    let image = write_scope_image(temp.path());

    let mut cmd = Command::cargo_bin("plastiscan").unwrap();
    cmd.args(["detect", "--output", "json", "--api-url", url.as_str(), "--file"])
        .arg(&image);
    let assert = cmd.assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON report");

    assert_eq!(report["total_count"], 2);
    assert_eq!(report["status"], "LOW");
    assert_eq!(report["risk_score"], 3.5);
    assert_eq!(report["risk_threshold"], 15.0);
    // Both boxes have equal-area 200nm sizes.
    assert_eq!(report["breakdown"]["samples"][0]["size_nm"], 200.0);
    assert_eq!(report["breakdown"]["samples"][1]["size_nm"], 200.0);
}

#[test]
fn detect_missing_boxes_key_is_the_nothing_detected_state() {
    let (url, _request_rx) = serve_once(200, r#"{"total_count": 0, "status": "CLEAN"}"#);

    let temp = tempfile::tempdir().unwrap();
    let image = write_scope_image(temp.path());

    let mut cmd = Command::cargo_bin("plastiscan").unwrap();
    cmd.args(["detect", "--api-url", url.as_str(), "--file"]).arg(&image);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("No microplastics detected."))
        .stdout(predicates::str::contains("CLEAN"));
}

#[test]
fn detect_non_200_halts_with_diagnostics_and_no_chart() {
    let (url, _request_rx) = serve_once(500, "backend exploded");

    let temp = tempfile::tempdir().unwrap();
    let image = write_scope_image(temp.path());

    let mut cmd = Command::cargo_bin("plastiscan").unwrap();
    cmd.args(["detect", "--api-url", url.as_str(), "--file"]).arg(&image);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("HTTP 500"))
        .stderr(predicates::str::contains("backend exploded"))
        .stdout(predicates::str::contains("Size Category Counts").not());
}

#[test]
fn detect_connection_failure_halts_with_transport_error() {
    // Bind and immediately drop a listener to get a port nothing answers on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let temp = tempfile::tempdir().unwrap();
    let image = write_scope_image(temp.path());

    let mut cmd = Command::cargo_bin("plastiscan").unwrap();
    let api_url = format!("http://127.0.0.1:{port}/detect");
    cmd.args([
        "detect",
        "--api-url",
        api_url.as_str(),
        "--timeout",
        "5",
        "--file",
    ])
    .arg(&image);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Could not connect to detection API"));
}