use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Standard chromedriver port
pub const DEFAULT_PORT: u16 = 9515;

/// Common paths where chromedriver might be installed
const CHROMEDRIVER_PATHS: &[&str] = &[
    "/usr/bin/chromedriver",
    "/usr/local/bin/chromedriver",
    "/usr/lib/chromium/chromedriver",
    "/usr/lib/chromium-browser/chromedriver",
    "/snap/bin/chromium.chromedriver",
    "/opt/homebrew/bin/chromedriver",
];

pub fn webdriver_url(port: u16) -> String {
    format!("http://localhost:{}", port)
}

/// Find the chromedriver binary: an explicit path first, then PATH, then
/// the usual install locations.
pub fn find_chromedriver(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    if let Ok(output) = Command::new("which").arg("chromedriver").output()
        && output.status.success()
        && let Ok(path) = String::from_utf8(output.stdout)
    {
        let path = path.trim();
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    CHROMEDRIVER_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Handle to a running chromedriver. The process is killed on drop.
pub struct ChromeDriverProcess {
    child: Child,
    port: u16,
}

impl ChromeDriverProcess {
    pub fn webdriver_url(&self) -> String {
        webdriver_url(self.port)
    }
}

impl Drop for ChromeDriverProcess {
    fn drop(&mut self) {
        info!("Shutting down chromedriver...");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Start chromedriver on `port` and wait until `/status` reports ready.
pub async fn launch_chromedriver(
    port: u16,
    explicit: Option<&Path>,
) -> Result<ChromeDriverProcess, String> {
    let binary = find_chromedriver(explicit).ok_or_else(|| {
        "chromedriver not found. Install it or set driver.chromedriver_path".to_string()
    })?;

    info!("Launching chromedriver from: {}", binary.display());

    let child = Command::new(&binary)
        .arg(format!("--port={}", port))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("Failed to launch chromedriver: {}", e))?;

    info!("chromedriver launched with PID: {}", child.id());

    // Owning the child from here on kills it if startup times out.
    let process = ChromeDriverProcess { child, port };
    let url = format!("{}/status", process.webdriver_url());
    let client = reqwest::Client::new();

    for attempt in 1..=30 {
        sleep(Duration::from_millis(200)).await;

        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("chromedriver ready after {} attempts", attempt);
                return Ok(process);
            }
            Ok(_) => {
                warn!("chromedriver responded but not ready yet (attempt {})", attempt);
            }
            Err(_) => {
                if attempt % 5 == 0 {
                    info!("Waiting for chromedriver... (attempt {})", attempt);
                }
            }
        }
    }

    Err("chromedriver did not become ready within timeout".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        assert_eq!(webdriver_url(DEFAULT_PORT), "http://localhost:9515");
    }

    #[test]
    fn test_explicit_missing_path() {
        assert!(find_chromedriver(Some(Path::new("/nonexistent/chromedriver"))).is_none());
    }

    #[test]
    fn test_find_binary_does_not_panic() {
        let _ = find_chromedriver(None);
    }
}
