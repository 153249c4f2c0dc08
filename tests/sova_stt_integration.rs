//! Integration tests for the Sova STT provider
//!
//! A wiremock server stands in for the Sova ASR REST API. These tests verify:
//! - Reply mapping to success and error results
//! - WAV framing of the uploaded payload
//! - Multipart field, file name and content type
//! - Request budget, unreachable server and cancellation
//! - Independence of concurrent sessions

use std::time::{Duration, Instant};

use bytes::Bytes;
use futures::StreamExt;
use sova_stt::core::stt::{
    SovaSTT, SovaSTTConfig, SpeechMetadata, SpeechResult, SpeechResultState, create_stt_provider,
};
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const OK_PRIVET: &str = r#"{"r":[{"response_code":0,"response":[{"text":"привет"}]}]}"#;

fn pcm_stream(parts: Vec<Vec<u8>>) -> impl futures::Stream<Item = Bytes> + Send {
    futures::stream::iter(parts.into_iter().map(Bytes::from))
}

async fn asr_server(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/asr"))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

/// File content of the single multipart part
fn uploaded_file(request: &Request) -> Vec<u8> {
    let body = &request.body;
    let start = find(body, b"\r\n\r\n").expect("part headers") + 4;
    let end = rfind(body, b"\r\n--").expect("closing boundary");
    body[start..end].to_vec()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

fn le_i32(data: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
}

fn le_i16(data: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes(data[offset..offset + 2].try_into().unwrap())
}

async fn single_request(server: &MockServer) -> Request {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.into_iter().next().unwrap()
}

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Matches requests whose raw body contains a byte marker
struct BodyContains(&'static [u8]);

impl Match for BodyContains {
    fn matches(&self, request: &Request) -> bool {
        find(&request.body, self.0).is_some()
    }
}

// =============================================================================
// Reply Mapping
// =============================================================================

#[tokio::test]
async fn test_transcribe_success() {
    let server = asr_server(ResponseTemplate::new(200).set_body_string(OK_PRIVET)).await;
    let stt = SovaSTT::new(&server.uri()).unwrap();

    let result = stt.transcribe(pcm_stream(vec![vec![0u8; 3200]])).await;

    assert_eq!(result, SpeechResult::success("привет"));
    assert_eq!(result.state, SpeechResultState::Success);
}

#[tokio::test]
async fn test_transcribe_takes_first_hypothesis() {
    let body = r#"{"r":[{"response_code":0,"response":[{"text":"один"},{"text":"два"}]}]}"#;
    let server = asr_server(ResponseTemplate::new(200).set_body_string(body)).await;
    let stt = SovaSTT::new(&server.uri()).unwrap();

    let result = stt.transcribe(pcm_stream(vec![vec![1u8; 320]])).await;
    assert_eq!(result.text, "один");
}

#[tokio::test]
async fn test_transcribe_empty_text_is_success() {
    let body = r#"{"r":[{"response_code":0,"response":[{"text":""}]}]}"#;
    let server = asr_server(ResponseTemplate::new(200).set_body_string(body)).await;
    let stt = SovaSTT::new(&server.uri()).unwrap();

    let result = stt.transcribe(pcm_stream(vec![vec![0u8; 320]])).await;
    assert_eq!(result, SpeechResult::success(""));
}

#[tokio::test]
async fn test_transcribe_rejected_by_server() {
    let body = r#"{"r":[{"response_code":3,"response":[]}]}"#;
    let server = asr_server(ResponseTemplate::new(200).set_body_string(body)).await;
    let stt = SovaSTT::new(&server.uri()).unwrap();

    let result = stt.transcribe(pcm_stream(vec![vec![0u8; 320]])).await;
    assert_eq!(result, SpeechResult::error());
    assert!(result.text.is_empty());
}

#[tokio::test]
async fn test_transcribe_malformed_replies() {
    let bodies = [
        "not json",
        r#"{"r":[]}"#,
        r#"{"result":"ok"}"#,
        r#"{"r":[{"response_code":0,"response":[]}]}"#,
        r#"{"r":[{"response_code":0,"response":[{"txt":"x"}]}]}"#,
        "",
    ];

    for body in bodies {
        let server = asr_server(ResponseTemplate::new(200).set_body_string(body)).await;
        let stt = SovaSTT::new(&server.uri()).unwrap();

        let result = stt.transcribe(pcm_stream(vec![vec![0u8; 320]])).await;
        assert_eq!(result, SpeechResult::error(), "body {body:?} must map to error");
    }
}

// =============================================================================
// Upload Framing
// =============================================================================

#[tokio::test]
async fn test_upload_is_wav_framed() {
    let server = asr_server(ResponseTemplate::new(200).set_body_string(OK_PRIVET)).await;
    let stt = SovaSTT::new(&server.uri()).unwrap();

    stt.transcribe(pcm_stream(vec![vec![7u8; 3200]])).await;

    let file = uploaded_file(&single_request(&server).await);
    assert_eq!(file.len(), 3244);
    assert_eq!(&file[0..4], b"RIFF");
    assert_eq!(le_i32(&file, 4), 3244);
    assert_eq!(&file[8..16], b"WAVEfmt ");
    assert_eq!(le_i32(&file, 16), 16);
    assert_eq!(le_i16(&file, 20), 1);
    assert_eq!(le_i16(&file, 22), 1);
    assert_eq!(le_i32(&file, 24), 16000);
    assert_eq!(le_i32(&file, 28), 32000);
    assert_eq!(le_i16(&file, 32), 2);
    assert_eq!(le_i16(&file, 34), 16);
    assert_eq!(&file[36..40], b"data");
    assert_eq!(le_i32(&file, 40), 3200);
    assert!(file[44..].iter().all(|&b| b == 7));
}

#[tokio::test]
async fn test_upload_concatenates_chunks_in_order() {
    let server = asr_server(ResponseTemplate::new(200).set_body_string(OK_PRIVET)).await;
    let stt = SovaSTT::new(&server.uri()).unwrap();

    let chunks = vec![b"first-".to_vec(), Vec::new(), b"second-".to_vec(), b"third".to_vec()];
    stt.transcribe(pcm_stream(chunks)).await;

    let file = uploaded_file(&single_request(&server).await);
    assert_eq!(&file[44..], b"first-second-third");
    assert_eq!(le_i32(&file, 40), 18);
}

#[tokio::test]
async fn test_empty_audio_still_sends_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/asr"))
        .respond_with(ResponseTemplate::new(200).set_body_string(OK_PRIVET))
        .expect(1)
        .mount(&server)
        .await;
    let stt = SovaSTT::new(&server.uri()).unwrap();

    let result = stt.transcribe(pcm_stream(Vec::new())).await;
    assert_eq!(result, SpeechResult::success("привет"));

    let file = uploaded_file(&single_request(&server).await);
    assert_eq!(file.len(), 44);
    assert_eq!(le_i32(&file, 4), 44);
    assert_eq!(le_i32(&file, 40), 0);
}

#[tokio::test]
async fn test_pre_framed_wav_passes_through() {
    let server = asr_server(ResponseTemplate::new(200).set_body_string(OK_PRIVET)).await;
    let stt = SovaSTT::new(&server.uri()).unwrap();

    let mut wav = b"RIFF".to_vec();
    wav.extend_from_slice(&[0x24, 0, 0, 0]);
    wav.extend_from_slice(b"WAVEfmt already framed elsewhere");
    let (head, tail) = wav.split_at(6);

    stt.transcribe(pcm_stream(vec![head.to_vec(), tail.to_vec()])).await;

    let file = uploaded_file(&single_request(&server).await);
    assert_eq!(file, wav);
}

#[tokio::test]
async fn test_multipart_part_layout() {
    let server = asr_server(ResponseTemplate::new(200).set_body_string(OK_PRIVET)).await;
    let stt = SovaSTT::new(&server.uri()).unwrap();

    stt.transcribe(pcm_stream(vec![vec![0u8; 64]])).await;

    let request = single_request(&server).await;
    let content_type = request
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));

    let head_end = find(&request.body, b"\r\n\r\n").unwrap();
    let part_headers = String::from_utf8_lossy(&request.body[..head_end]).to_lowercase();
    assert!(part_headers.contains(r#"name="audio_blob_0""#));
    assert!(part_headers.contains(r#"filename="stream.wav""#));
    assert!(part_headers.contains("content-type: audio/wav"));
}

// =============================================================================
// Failure Modes
// =============================================================================

#[test]
fn test_default_request_budget() {
    let config = SovaSTTConfig::new("http://localhost:8888").unwrap();
    assert_eq!(config.request_timeout, Duration::from_secs(15));
    assert_eq!(config.stream_timeout, None);
}

#[tokio::test]
async fn test_request_timeout_maps_to_error() {
    let server = asr_server(
        ResponseTemplate::new(200)
            .set_body_string(OK_PRIVET)
            .set_delay(Duration::from_secs(5)),
    )
    .await;
    let config = SovaSTTConfig::new(&server.uri())
        .unwrap()
        .with_request_timeout(Duration::from_millis(300));
    let stt = SovaSTT::with_config(config).unwrap();

    let started = Instant::now();
    let result = stt.transcribe(pcm_stream(vec![vec![0u8; 320]])).await;

    assert_eq!(result, SpeechResult::error());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_unreachable_server_maps_to_error() {
    let stt = SovaSTT::new(&format!("http://127.0.0.1:{}", free_port())).unwrap();

    let result = stt.transcribe(pcm_stream(vec![vec![0u8; 320]])).await;
    assert_eq!(result, SpeechResult::error());
}

#[tokio::test]
async fn test_error_status_with_valid_body_is_parsed() {
    let server = asr_server(ResponseTemplate::new(500).set_body_string(OK_PRIVET)).await;
    let stt = SovaSTT::new(&server.uri()).unwrap();

    let result = stt.transcribe(pcm_stream(vec![vec![0u8; 320]])).await;
    assert_eq!(result, SpeechResult::success("привет"));
}

#[tokio::test]
async fn test_dropping_future_cancels_session() {
    let server = asr_server(
        ResponseTemplate::new(200)
            .set_body_string(OK_PRIVET)
            .set_delay(Duration::from_secs(10)),
    )
    .await;
    let stt = SovaSTT::new(&server.uri()).unwrap();

    let started = Instant::now();
    let outcome = tokio::time::timeout(
        Duration::from_millis(300),
        stt.transcribe(pcm_stream(vec![vec![0u8; 320]])),
    )
    .await;

    assert!(outcome.is_err());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_aborted_task_does_not_complete() {
    let server = asr_server(
        ResponseTemplate::new(200)
            .set_body_string(OK_PRIVET)
            .set_delay(Duration::from_secs(10)),
    )
    .await;
    let stt = SovaSTT::new(&server.uri()).unwrap();

    let handle =
        tokio::spawn(async move { stt.transcribe(pcm_stream(vec![vec![0u8; 320]])).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.abort();

    let joined = handle.await;
    assert!(joined.unwrap_err().is_cancelled());
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_concurrent_sessions_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/asr"))
        .and(BodyContains(b"session-one"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"r":[{"response_code":0,"response":[{"text":"один"}]}]}"#)
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/asr"))
        .and(BodyContains(b"session-two"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"r":[{"response_code":0,"response":[{"text":"два"}]}]}"#),
        )
        .mount(&server)
        .await;

    let stt = SovaSTT::new(&server.uri()).unwrap();
    let (one, two) = tokio::join!(
        stt.transcribe(pcm_stream(vec![b"session-".to_vec(), b"one".to_vec()])),
        stt.transcribe(pcm_stream(vec![b"session-".to_vec(), b"two".to_vec()])),
    );

    assert_eq!(one, SpeechResult::success("один"));
    assert_eq!(two, SpeechResult::success("два"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        let file = uploaded_file(request);
        assert_eq!(file.len(), 44 + "session-one".len());
    }
}

// =============================================================================
// Host Contract
// =============================================================================

#[tokio::test]
async fn test_process_audio_stream_through_factory() {
    let server = asr_server(ResponseTemplate::new(200).set_body_string(OK_PRIVET)).await;
    let provider = create_stt_provider(&server.uri()).unwrap();

    let stream = futures::stream::iter(vec![Bytes::from_static(&[0u8; 640])]).boxed();
    let result = provider
        .process_audio_stream(SpeechMetadata::default(), stream)
        .await;

    assert_eq!(result, SpeechResult::success("привет"));
}

#[tokio::test]
async fn test_process_audio_stream_ignores_metadata_mismatch() {
    let server = asr_server(ResponseTemplate::new(200).set_body_string(OK_PRIVET)).await;
    let provider = create_stt_provider(&server.uri()).unwrap();

    let metadata = SpeechMetadata {
        language: "en-US".to_string(),
        ..Default::default()
    };
    let stream = futures::stream::iter(vec![Bytes::from_static(b"pcm")]).boxed();
    let result = provider.process_audio_stream(metadata, stream).await;

    assert_eq!(result.state, SpeechResultState::Success);
}
