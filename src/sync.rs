use crate::dataset::Dataset;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const PR_DATA_PATH: &str = "/pr_data";

/// Determine the server the dashboard talks to.
///
/// If the `PR_DASHBOARD_URL` environment variable is set, its value takes
/// precedence over the URL stored in the application settings. Blank values
/// on either side are skipped.
pub fn resolve_base_url(settings_url: Option<&str>) -> String {
    std::env::var("PR_DASHBOARD_URL")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            settings_url
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

pub fn pr_data_url(base_url: &str) -> String {
    format!("{}{PR_DATA_PATH}", base_url.trim_end_matches('/'))
}

#[derive(Debug)]
pub enum FetchError {
    Status(u16, String),
    Transport(Box<ureq::Error>),
    Io(std::io::Error),
    Decode(serde_json::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Status(code, body) => write!(f, "Server returned {code}: {body}"),
            FetchError::Transport(e) => write!(f, "Request failed: {e}"),
            FetchError::Io(e) => write!(f, "Failed to read response: {e}"),
            FetchError::Decode(e) => write!(f, "Invalid PR data: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Status(..) => None,
            FetchError::Transport(e) => Some(&**e),
            FetchError::Io(e) => Some(e),
            FetchError::Decode(e) => Some(e),
        }
    }
}

fn fetch_pr_data_with_url(url: &str) -> Result<Dataset, FetchError> {
    let response = ureq::get(url).set("Accept", "application/json").call();
    let body = match response {
        Ok(r) => r.into_string().map_err(FetchError::Io)?,
        Err(ureq::Error::Status(code, r)) => {
            let body = r.into_string().unwrap_or_default();
            return Err(FetchError::Status(code, body));
        }
        Err(e) => return Err(FetchError::Transport(Box::new(e))),
    };
    serde_json::from_str(&body).map_err(FetchError::Decode)
}

/// Fetch the PR history for every exercise from the dashboard server.
///
/// A single blocking GET is issued against `<base_url>/pr_data`. There is no
/// timeout, retry or caching; the caller decides what to do with a failure.
pub fn fetch_pr_data(base_url: &str) -> Result<Dataset, FetchError> {
    let url = pr_data_url(base_url);
    log::info!("Fetching PR data from {url}");
    let dataset = fetch_pr_data_with_url(&url)?;
    log::info!("Loaded PR data for {} exercises", dataset.len());
    Ok(dataset)
}
