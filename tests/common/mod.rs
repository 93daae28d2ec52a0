#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

pub const SESSION_COOKIE: &str = "ecp-session=mock";

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub cookie: Option<String>,
    pub body: String,
}

/// Mock device answering every request to a path with a fixed status and body
///
/// Paths without a configured answer get a 404. Every response sets the
/// session cookie [`SESSION_COOKIE`].
pub struct MockDevice {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockDevice {
    pub async fn start(answers: &[(&str, u16, &str)]) -> Self {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("failed to bind mock device");
        let addr = listener.local_addr().expect("mock device has no address");

        let answers: Arc<HashMap<String, (u16, String)>> = Arc::new(
            answers
                .iter()
                .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let answers = answers.clone();
                let recorded = recorded.clone();

                tokio::spawn(async move {
                    let _ = serve(stream, &answers, &recorded).await;
                });
            }
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    pub fn ip(&self) -> IpAddr {
        self.addr.ip()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("poisoned request log").clone()
    }

    pub fn requested_paths(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| format!("{} {}", request.method, request.path))
            .collect()
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    answers: &HashMap<String, (u16, String)>,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(&mut stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    // Read HTTP headers
    let mut content_length = 0;
    let mut authorization = None;
    let mut cookie = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 || line.trim().is_empty() {
            break;
        }

        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            match name.to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.parse().unwrap_or(0),
                "authorization" => authorization = Some(value.to_string()),
                "cookie" => cookie = Some(value.to_string()),
                _ => {}
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).await?;

    recorded
        .lock()
        .expect("poisoned request log")
        .push(RecordedRequest {
            method,
            path: path.clone(),
            authorization,
            cookie,
            body: String::from_utf8_lossy(&body).into_owned(),
        });

    let (status, response_body) = answers
        .get(&path)
        .cloned()
        .unwrap_or_else(|| (404, "Not Found".to_string()));

    let http_response = format!(
        "HTTP/1.1 {status} Mock\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nSet-Cookie: {SESSION_COOKIE}; Path=/\r\nConnection: close\r\n\r\n{}",
        response_body.len(),
        response_body
    );

    stream.write_all(http_response.as_bytes()).await?;
    stream.shutdown().await
}

/// Address on which nothing listens
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("failed to bind probe listener");
    listener.local_addr().expect("listener has no address")
}
