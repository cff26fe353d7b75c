//! Shared blocking HTTP client

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::Result;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REDIRECTS: usize = 10;

/// Build the client used for archive, package and release metadata requests.
///
/// Release asset URLs redirect to a CDN, so redirects are followed. No overall
/// request timeout is set because package downloads can be large.
pub fn client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("apksetup/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    Ok(client)
}
