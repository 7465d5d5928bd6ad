// Downloading the race documents.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value as JSValue;
use std::time::Duration;

use crate::report::*;

/// The race pages of the 2020 presidential election.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://static01.nyt.com/elections-assets/2020/data/api/2020-11-03/race-page/{state}/president.json";

const STATE_PLACEHOLDER: &str = "{state}";

const TIMEOUT: Duration = Duration::from_secs(30);

pub struct Fetcher {
    client: Client,
    url_template: String,
}

impl Fetcher {
    pub fn new(url_template: &str) -> ReportResult<Fetcher> {
        ensure!(
            url_template.contains(STATE_PLACEHOLDER),
            InvalidUrlTemplateSnafu {
                template: url_template
            }
        );
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .context(HttpClientSnafu {})?;
        Ok(Fetcher {
            client,
            url_template: url_template.to_string(),
        })
    }

    pub fn state_url(&self, state: &str) -> String {
        self.url_template.replace(STATE_PLACEHOLDER, state)
    }

    /// Fetches the document of a state. Only a 200 response is accepted, and it must be JSON.
    pub fn fetch(&self, state: &str) -> ReportResult<JSValue> {
        let url = self.state_url(state);
        debug!("fetch: {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .context(FetchSnafu { url: url.clone() })?;
        let status = response.status();
        ensure!(
            status == StatusCode::OK,
            HttpStatusSnafu {
                url: url.clone(),
                status: status.to_string(),
            }
        );
        let body = response.text().context(FetchSnafu { url })?;
        serde_json::from_str(&body).context(ParsingJsonSnafu {})
    }

    /// Fetches the document of a state and stores it as `<out_dir>/<state>.json`.
    ///
    /// Returns the path of the file.
    pub fn download(&self, state: &str, out_dir: &str) -> ReportResult<String> {
        let js = self.fetch(state)?;
        let out = state_input_path(out_dir, state);
        fs::write(&out, to_pretty_json(&js)?).context(WritingFileSnafu { path: out.clone() })?;
        Ok(out)
    }
}

/// JSON with an indentation of 4 spaces.
pub fn to_pretty_json(js: &JSValue) -> ReportResult<Vec<u8>> {
    let mut buffer: Vec<u8> = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    js.serialize(&mut ser).context(ParsingJsonSnafu {})?;
    Ok(buffer)
}
