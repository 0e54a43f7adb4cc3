//! HTTP endpoint publishing the bridge's own metrics.

use std::convert::Infallible;
use std::future;
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::thread;

use hyper::{
    header,
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server, StatusCode,
};
use tracing::{error, info};

use crate::metrics::BridgeMetrics;

/// Binds the metrics port on all interfaces.
///
/// Done up front so a taken port fails startup instead of a background thread.
pub fn bind(port: u16) -> io::Result<TcpListener> {
    TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port)))
}

/// Serves `metrics` on `listener` from a dedicated thread, on any path.
pub fn spawn(listener: TcpListener, metrics: BridgeMetrics) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("metrics-server".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_io()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!(error = %e, "cannot start metrics server runtime");
                    return;
                }
            };

            runtime.block_on(serve(listener, metrics));
        })
}

async fn serve(listener: TcpListener, metrics: BridgeMetrics) {
    let addr = listener.local_addr().ok();
    let builder = match Server::from_tcp(listener) {
        Ok(builder) => builder,
        Err(e) => {
            error!(error = %e, "cannot listen for metrics requests");
            return;
        }
    };

    info!(addr = ?addr, "serving internal metrics");

    let server = builder.serve(make_service_fn(move |_| {
        let metrics = metrics.clone();
        future::ready(Ok::<_, Infallible>(service_fn(move |req| {
            let response = render(&metrics, &req);
            future::ready(Ok::<_, Infallible>(response))
        })))
    }));

    if let Err(e) = server.await {
        error!(error = %e, "metrics server failed");
    }
}

fn render(metrics: &BridgeMetrics, _req: &Request<Body>) -> Response<Body> {
    let response = match metrics.render() {
        Ok(buffer) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, metrics.content_type())
            .body(Body::from(buffer)),
        Err(e) => Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(Body::from(e.to_string())),
    };
    response.unwrap_or_else(|_| Response::new(Body::empty()))
}
