#![allow(dead_code)]

use homesim::readiness::ReadyEvent;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use reqwest::Client;
use serde_json::Value;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStderr, Command};
use tokio::time::timeout;
use uuid::Uuid;

pub const GATEWAY_BIN: &str = env!("CARGO_BIN_EXE_gateway");
pub const LED_BIN: &str = env!("CARGO_BIN_EXE_led");
pub const GAS_BIN: &str = env!("CARGO_BIN_EXE_gas");

/// Number of extra requests fired before the asserted one, to check that
/// discovery is idempotent.
pub const REDUNDANT_REQUESTS: usize = 2;
pub const READY_TIMEOUT: Duration = Duration::from_secs(10);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const EXIT_TIMEOUT: Duration = Duration::from_secs(4);

pub struct Gateway {
    pub process: Child,
    pub port: u16,
}

impl Gateway {
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

/// Spawns the gateway on an ephemeral port and waits for its readiness line.
pub async fn start_gateway() -> Gateway {
    let mut process = Command::new(GATEWAY_BIN)
        .env("HOMESIM_GATEWAY__PORT", "0")
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .expect("failed to spawn the gateway");

    match await_ready(&mut process).await {
        ReadyEvent::Listening { port } => Gateway { process, port },
        other => panic!("the gateway announced {other:?} instead of listening"),
    }
}

pub struct SimulatorProcess {
    pub process: Child,
    pub di: Uuid,
    pub href: String,
    pub endpoint: String,
}

/// Spawns one simulator binary pointed at the gateway and waits until it has
/// registered its resource.
pub async fn start_simulator(bin: &str, gateway_port: u16) -> SimulatorProcess {
    let mut process = Command::new(bin)
        .env("HOMESIM_GATEWAY__PORT", gateway_port.to_string())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .expect("failed to spawn the simulator");

    match await_ready(&mut process).await {
        ReadyEvent::Registered { di, href, endpoint } => SimulatorProcess { process, di, href, endpoint },
        other => panic!("the simulator announced {other:?} instead of registering"),
    }
}

/// Reads the single readiness line from a child's stdout, bounded by
/// `READY_TIMEOUT`.
async fn await_ready(process: &mut Child) -> ReadyEvent {
    let stdout = process.stdout.take().expect("the child's stdout must be piped");
    let mut lines = BufReader::new(stdout).lines();
    let line = timeout(READY_TIMEOUT, lines.next_line())
        .await
        .expect("timed out waiting for the readiness line")
        .expect("failed to read the child's stdout")
        .expect("the child exited without announcing readiness");
    serde_json::from_str(&line).expect("malformed readiness line")
}

/// Scans a child's stderr for the private endpoint a simulator logs once it
/// is bound, each line bounded by `READY_TIMEOUT`. The caller keeps the
/// reader, so the pipe stays open for whatever the child logs afterwards.
pub async fn await_endpoint_log(lines: &mut Lines<BufReader<ChildStderr>>) -> String {
    loop {
        let line = timeout(READY_TIMEOUT, lines.next_line())
            .await
            .expect("timed out waiting for the endpoint log line")
            .expect("failed to read the child's stderr")
            .expect("the child's stderr closed before it logged an endpoint");
        if let Some(index) = line.find("http://127.0.0.1:") {
            let port: String = line[index + "http://127.0.0.1:".len()..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            return format!("http://127.0.0.1:{port}");
        }
    }
}

pub fn client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("failed to build the HTTP client")
}

/// Fires `REDUNDANT_REQUESTS` extra GETs at the path, then returns the body
/// of one more. Discovery must answer all of them successfully.
pub async fn probe_discovery(client: &Client, base_url: &str, path: &str) -> Value {
    let url = format!("{base_url}{path}");
    for _ in 0..REDUNDANT_REQUESTS {
        let response = client.get(&url).send().await.expect("discovery request failed");
        assert!(response.status().is_success(), "discovery answered {}", response.status());
    }

    let response = client.get(&url).send().await.expect("discovery request failed");
    assert!(response.status().is_success(), "discovery answered {}", response.status());
    response.json().await.expect("discovery answered a malformed body")
}

pub fn interrupt(process: &Child) {
    send_signal(process, Signal::SIGINT);
}

pub fn terminate(process: &Child) {
    send_signal(process, Signal::SIGTERM);
}

fn send_signal(process: &Child, signal: Signal) {
    let pid = process.id().expect("the child already exited");
    signal::kill(Pid::from_raw(pid as i32), signal).expect("failed to signal the child");
}

/// Reaps the child, bounded by `EXIT_TIMEOUT`.
pub async fn await_exit(process: &mut Child) -> std::process::ExitStatus {
    timeout(EXIT_TIMEOUT, process.wait())
        .await
        .expect("timed out waiting for the child to exit")
        .expect("failed to reap the child")
}

/// Reads a streaming response until every needle appeared, then closes the
/// stream and returns everything read.
pub async fn read_stream_until_all(response: reqwest::Response, needles: &[&str]) -> String {
    use futures::StreamExt;

    let mut stream = response.bytes_stream();
    let mut text = String::new();
    while !needles.iter().all(|needle| text.contains(needle)) {
        let chunk = timeout(REQUEST_TIMEOUT, stream.next())
            .await
            .expect("timed out waiting for a stream chunk")
            .expect("the stream ended early")
            .expect("failed to read the stream");
        text.push_str(&String::from_utf8_lossy(&chunk));
    }
    text
}

/// Interrupts every simulator, reaps them, then does the same to the
/// gateway. All of them must exit cleanly.
pub async fn shut_down(mut gateway: Gateway, mut simulators: Vec<SimulatorProcess>) {
    for simulator in &simulators {
        interrupt(&simulator.process);
    }
    for simulator in &mut simulators {
        let status = await_exit(&mut simulator.process).await;
        assert!(status.success(), "a simulator exited with {status}");
    }

    interrupt(&gateway.process);
    let status = await_exit(&mut gateway.process).await;
    assert!(status.success(), "the gateway exited with {status}");
}
