use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static BEARER_SERVER: OnceLock<TestServer> = OnceLock::new();
static BASIC_SERVER: OnceLock<TestServer> = OnceLock::new();

#[allow(dead_code)]
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn(auth_scheme: &str) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/todos-api-rust");
        cmd.env("TODOS_API_PORT", port.to_string())
            .env("TODOS_AUTH_SCHEME", auth_scheme)
            .env("TODOS_BCRYPT_COST", "4")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/api/ping", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

/// Server running the default Bearer/JWT scheme.
#[allow(dead_code)]
pub async fn ensure_server() -> Result<&'static TestServer> {
    let server =
        BEARER_SERVER.get_or_init(|| TestServer::spawn("bearer").expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Server running the Basic scheme on its own port.
#[allow(dead_code)]
pub async fn ensure_basic_server() -> Result<&'static TestServer> {
    let server =
        BASIC_SERVER.get_or_init(|| TestServer::spawn("basic").expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Register a user on the given server and return the issued token.
#[allow(dead_code)]
pub async fn register(server: &TestServer, username: &str, password: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/register", server.base_url))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "register failed with {}",
        res.status()
    );
    Ok(res.text().await?)
}
