use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use graphite_bridge::fetch::{Fetcher, HttpClient};
use graphite_bridge::metrics::{BridgeMetrics, Stage};
use graphite_bridge::output::{GraphiteSink, SinkAddr};
use graphite_bridge::scheduler::Scheduler;
use graphite_bridge::server;

const EXPOSITION: &str = "\
# HELP foo A gauge.
# TYPE foo gauge
foo{label=\"x\"} 3.14 1000
# TYPE requests_total counter
requests_total{method=\"GET\",code=\"200\"} 7 2000
";

/// Answers a single GET with `body`, returning the URL to scrape.
fn serve_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.ends_with(b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain; version=0.0.4\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
        .unwrap();
    });

    format!("http://{}/metrics", addr)
}

/// Collects everything written over each accepted connection.
fn graphite_listener() -> (SinkAddr, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let mut received = String::new();
            stream.unwrap().read_to_string(&mut received).unwrap();
            if tx.send(received).is_err() {
                return;
            }
        }
    });

    (SinkAddr::new("127.0.0.1", port), rx)
}

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn single_shot_scrape_is_pushed_to_graphite() {
    let target = serve_once(EXPOSITION);
    let (graphite, received) = graphite_listener();
    let metrics = BridgeMetrics::new().unwrap();

    let fetcher = Fetcher::new(HttpClient::new(Some(Duration::from_secs(5))).unwrap(), target, 0);
    Scheduler::new(fetcher, GraphiteSink::new(graphite), metrics.clone())
        .with_prefix("app")
        .with_interval(Duration::from_secs(3600))
        .single(true)
        .run();

    let pushed = received.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(
        "app.foo.label.x 3.14 1\napp.requests_total.code.200.method.GET 7 2\n",
        pushed
    );

    assert_eq!(1, metrics.scrapes());
    assert_eq!(2, metrics.pushed_records());
    assert_eq!(0, metrics.cycle_errors(Stage::Fetch));
    assert_eq!(0, metrics.cycle_errors(Stage::Push));
}

#[test]
fn unreachable_target_exhausts_retries_without_pushing() {
    let target = format!("http://127.0.0.1:{}/metrics", closed_port());
    let (graphite, received) = graphite_listener();
    let metrics = BridgeMetrics::new().unwrap();

    let fetcher = Fetcher::new(HttpClient::new(None).unwrap(), target, 2)
        .with_retry_delay(Duration::from_millis(5));
    Scheduler::new(fetcher, GraphiteSink::new(graphite), metrics.clone())
        .single(true)
        .run();

    assert_eq!(1, metrics.scrapes());
    assert_eq!(1, metrics.cycle_errors(Stage::Fetch));
    assert_eq!(0, metrics.pushed_records());
    assert!(received.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn unreachable_graphite_is_counted() {
    let target = serve_once("foo 1\n");
    let metrics = BridgeMetrics::new().unwrap();

    let fetcher = Fetcher::new(HttpClient::new(None).unwrap(), target, 0);
    let sink = GraphiteSink::new(SinkAddr::new("127.0.0.1", closed_port()));
    Scheduler::new(fetcher, sink, metrics.clone()).single(true).run();

    assert_eq!(1, metrics.scrapes());
    assert_eq!(1, metrics.cycle_errors(Stage::Push));
    assert_eq!(0, metrics.pushed_records());
}

#[test]
fn metrics_endpoint_reports_cycles() {
    let target = serve_once("foo 1\nbar 2\n");
    let (graphite, received) = graphite_listener();
    let metrics = BridgeMetrics::new().unwrap();
    metrics.set_scrape_interval(Duration::from_secs(30));

    let listener = server::bind(0).unwrap();
    let port = listener.local_addr().unwrap().port();
    server::spawn(listener, metrics.clone()).unwrap();

    let fetcher = Fetcher::new(HttpClient::new(None).unwrap(), target, 0);
    Scheduler::new(fetcher, GraphiteSink::new(graphite), metrics.clone())
        .single(true)
        .run();
    received.recv_timeout(Duration::from_secs(5)).unwrap();

    let body = reqwest::blocking::get(format!("http://127.0.0.1:{}/metrics", port))
        .unwrap()
        .text()
        .unwrap();

    assert!(body.contains("graphite_bridge_scrape_interval_seconds 30"), "{}", body);
    assert!(body.contains("graphite_bridge_scrape_total 1"), "{}", body);
    assert!(body.contains("graphite_bridge_pushed_records_total 2"), "{}", body);
    assert!(body.contains("graphite_bridge_scrape_duration_seconds"), "{}", body);
}

#[test]
fn fetch_returns_body_verbatim() {
    let target = serve_once(EXPOSITION);
    let body = graphite_bridge::fetch::fetch(&target, 0).unwrap();
    assert_eq!(EXPOSITION, body);
}
