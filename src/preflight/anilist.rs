//! AniList API preflight check.

use super::CheckResult;
use crate::services::anilist::AniListClient;

/// Check if the AniList API answers a search.
pub async fn check() -> CheckResult {
    let client = match AniListClient::new() {
        Ok(client) => client,
        Err(e) => {
            return CheckResult::fail("AniList API", &e.to_string(), "Check your TLS setup")
        }
    };

    match client.search("Frieren").await {
        Ok(_) => CheckResult::ok("AniList API", "connected"),
        Err(_) => CheckResult::fail(
            "AniList API",
            "connection failed",
            "Check your network connection, or plan with --offline",
        ),
    }
}
