use sentidash::config::GatewayConfig;
use sentidash::{DataGateway, FilterValue, HttpGateway, SentidashError};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// A request as seen by the one-shot server.
struct Captured {
    request_line: String,
    body: String,
}

/// Serve exactly one HTTP request with `status` and `body`, reporting what was received.
fn serve_once(status: &'static str, body: String) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut content_length = 0usize;
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).unwrap();
            if header == "\r\n" || header.is_empty() {
                break;
            }
            let lower = header.to_ascii_lowercase();
            if let Some(value) = lower.strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap();
            }
        }
        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();

        let _ = tx.send(Captured {
            request_line: request_line.trim_end().to_string(),
            body: String::from_utf8(request_body).unwrap(),
        });
    });

    (base_url, rx)
}

fn envelope(inner: &str) -> String {
    serde_json::json!({ "payload": inner }).to_string()
}

fn gateway(base_url: &str) -> HttpGateway {
    HttpGateway::from_config(&GatewayConfig {
        base_url: base_url.to_string(),
        timeout_ms: 2_000,
    })
}

#[test]
fn test_chart_request_carries_filter_and_decodes_envelope() {
    let (base_url, rx) = serve_once(
        "200 OK",
        envelope(
            r#"{"data_values":[0.1,0.6,0.3],"data_labels":[-1,0,1],"subreddit_name":"worldnews"}"#,
        ),
    );

    let chart = gateway(&base_url)
        .fetch_chart(&FilterValue::new("worldnews"))
        .unwrap();
    assert_eq!(chart.values, vec![0.1, 0.6, 0.3]);
    assert_eq!(chart.labels, vec!["-1", "0", "1"]);
    assert_eq!(chart.scope_name, "worldnews");

    let captured = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(captured.request_line, "GET /get_data?vals=worldnews HTTP/1.1");
}

#[test]
fn test_selector_request_sends_empty_vals() {
    let (base_url, rx) = serve_once("200 OK", envelope(r#"{"data_labels":["all","news"]}"#));

    let options = gateway(&base_url).fetch_select_options().unwrap();
    assert_eq!(options.options, vec!["all", "news"]);

    let captured = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(captured.request_line, "GET /update_select?vals= HTTP/1.1");
}

#[test]
fn test_submit_posts_json_string_body() {
    let (base_url, rx) = serve_once("200 OK", r#""news""#.to_string());

    let ack = gateway(&base_url)
        .submit_select_value(&FilterValue::new("news"))
        .unwrap();
    assert_eq!(ack, r#""news""#);

    let captured = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(captured.request_line, "POST /get_select_value HTTP/1.1");
    assert_eq!(captured.body, r#""news""#);
}

#[test]
fn test_server_error_is_fetch_failed() {
    let (base_url, _rx) = serve_once("500 Internal Server Error", String::new());

    let err = gateway(&base_url)
        .fetch_rows(&FilterValue::all())
        .unwrap_err();
    assert!(matches!(err, SentidashError::FetchFailed { .. }), "{err}");
    assert!(err.to_string().contains("500"), "{err}");
    assert_eq!(err.endpoint(), "/update_rows");
}

#[test]
fn test_single_encoded_body_is_shape_invalid() {
    let (base_url, _rx) = serve_once(
        "200 OK",
        r#"{"payload":{"histogram_counts":[[1,2,3]]}}"#.to_string(),
    );

    let err = gateway(&base_url)
        .fetch_histogram(&FilterValue::all())
        .unwrap_err();
    assert!(
        matches!(err, SentidashError::PayloadShapeInvalid { .. }),
        "{err}"
    );
}
