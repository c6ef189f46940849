//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use command_gateway::config::GatewayConfig;
use command_gateway::http::HttpServer;
use command_gateway::lifecycle::Shutdown;
use command_gateway::backend::TcpCommandClient;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One command as the mock engine received it.
#[derive(Debug, Clone)]
pub struct ReceivedCommand {
    pub command: String,
    pub params: BTreeMap<String, String>,
}

/// Reply the mock engine sends back.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockReply {
    pub fn ok(headers: &[(&str, &str)]) -> Self {
        Self {
            status_line: "200 OK".into(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: String::new(),
        }
    }

    pub fn status(status_line: &str) -> Self {
        Self {
            status_line: status_line.into(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.into();
        self
    }

    fn encode(&self) -> Vec<u8> {
        let mut out = format!("{}\r\n", self.status_line);
        for (name, value) in &self.headers {
            out.push_str(&format!("{name}: {value}\r\n"));
        }
        out.push_str(&format!("Content-Length: {}\r\n\r\n", self.body.len()));
        out.push_str(&self.body);
        out.into_bytes()
    }
}

/// Handle to a running mock engine.
#[derive(Clone)]
pub struct MockEngine {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<ReceivedCommand>>>,
}

impl MockEngine {
    pub fn received(&self) -> Vec<ReceivedCommand> {
        self.received.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<ReceivedCommand> {
        self.received.lock().unwrap().last().cloned()
    }
}

/// Start a programmable mock command engine on an ephemeral port.
pub async fn start_mock_engine<F>(f: F) -> MockEngine
where
    F: Fn(&ReceivedCommand) -> MockReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let received = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let log = received.clone();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let f = f.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let _ = serve_one(socket, f.as_ref(), &log).await;
            });
        }
    });

    MockEngine { addr, received }
}

async fn serve_one<F>(
    mut socket: TcpStream,
    f: &F,
    log: &Mutex<Vec<ReceivedCommand>>,
) -> std::io::Result<()>
where
    F: Fn(&ReceivedCommand) -> MockReply,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let text = String::from_utf8_lossy(&buf).into_owned();
    let mut lines = text.split("\r\n");
    let command = lines.next().unwrap_or_default().to_string();
    let params = lines
        .filter_map(|line| line.split_once(": "))
        .filter(|(name, _)| *name != "Content-Length")
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    let received = ReceivedCommand { command, params };
    let reply = f(&received);
    log.lock().unwrap().push(received);

    socket.write_all(&reply.encode()).await?;
    socket.shutdown().await
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start the gateway against `engine_addr`. Returns its base URL.
pub async fn start_gateway(engine_addr: SocketAddr, shutdown: &Shutdown) -> String {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.listener.max_body_bytes = 4096;
    config.backend.address = engine_addr.to_string();
    config.backend.connect_timeout_secs = 2;
    config.backend.read_timeout_secs = 2;
    config.service.name = "it-gateway".into();

    let engine = Arc::new(TcpCommandClient::new(&config.backend));
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, engine).unwrap();

    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    format!("http://{addr}")
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
