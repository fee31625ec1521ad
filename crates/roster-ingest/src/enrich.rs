//! [`EnrichmentClient`]: fills in age, gender and nationality for a name.
//!
//! The three lookups run concurrently via [`tokio::try_join!`]. Each returns
//! its own value, and the results are merged only once all three have
//! succeeded. The first failure ends the join: the other in-flight request
//! futures are dropped, which aborts their connections.
//!
//! No retries happen here. The pipeline dead-letters failed messages instead.

use std::time::Duration;

use reqwest::Client;
use roster_core::person::PersonDraft;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::{EnrichError, Lookup};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Endpoints of the lookup services. Each is called as `GET <url>?name=<name>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
  pub age_url:         String,
  pub gender_url:      String,
  pub nationality_url: String,
  /// Per-request deadline covering connect, send and body read.
  pub timeout_secs:    u64,
}

impl Default for EnrichmentConfig {
  fn default() -> Self {
    Self {
      age_url:         "https://api.agify.io".to_string(),
      gender_url:      "https://api.genderize.io".to_string(),
      nationality_url: "https://api.nationalize.io".to_string(),
      timeout_secs:    10,
    }
  }
}

// ─── Upstream payloads ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AgeResponse {
  /// Read as a float; some providers emit integral floats.
  age: f64,
}

#[derive(Debug, Deserialize)]
struct GenderResponse {
  gender: String,
}

#[derive(Debug, Deserialize)]
struct NationalityResponse {
  country: Vec<CountryCandidate>,
}

/// One entry of the nationality service's candidate list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryCandidate {
  pub country_id:  String,
  pub probability: f64,
}

/// Pick the candidate with the strictly highest probability.
///
/// Ties keep the first candidate seen in list order. `None` only for an empty
/// list.
pub fn select_nationality(candidates: &[CountryCandidate]) -> Option<&CountryCandidate> {
  let (first, rest) = candidates.split_first()?;
  Some(rest.iter().fold(first, |best, c| if c.probability > best.probability { c } else { best }))
}

// ─── Result ──────────────────────────────────────────────────────────────────

/// The merged outcome of all three lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
  pub age:         i64,
  pub gender:      String,
  pub nationality: String,
}

impl Enrichment {
  /// Overwrite the enrichment fields of `draft`.
  pub fn apply_to(self, draft: &mut PersonDraft) {
    draft.age = self.age;
    draft.gender = self.gender;
    draft.nationality = self.nationality;
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct EnrichmentClient {
  http:   Client,
  config: EnrichmentConfig,
}

impl EnrichmentClient {
  pub fn new(config: EnrichmentConfig) -> Result<Self, EnrichError> {
    let http = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(EnrichError::Client)?;
    Ok(Self { http, config })
  }

  /// Run all three lookups for `name` and merge them.
  pub async fn lookup(&self, name: &str) -> Result<Enrichment, EnrichError> {
    let (age, gender, nationality) =
      tokio::try_join!(self.age(name), self.gender(name), self.nationality(name))?;
    debug!(name, age, %gender, %nationality, "enriched name");
    Ok(Enrichment { age, gender, nationality })
  }

  /// Enrich `draft` in place from its given name.
  ///
  /// On error the draft is left untouched; callers must not persist it.
  pub async fn enrich(&self, draft: &mut PersonDraft) -> Result<(), EnrichError> {
    self.lookup(&draft.name).await?.apply_to(draft);
    Ok(())
  }

  async fn age(&self, name: &str) -> Result<i64, EnrichError> {
    let body: AgeResponse = self.fetch(Lookup::Age, &self.config.age_url, name).await?;
    // Truncates toward zero; out-of-range values are caught by validation.
    Ok(body.age as i64)
  }

  async fn gender(&self, name: &str) -> Result<String, EnrichError> {
    let body: GenderResponse = self.fetch(Lookup::Gender, &self.config.gender_url, name).await?;
    Ok(body.gender)
  }

  async fn nationality(&self, name: &str) -> Result<String, EnrichError> {
    let body: NationalityResponse =
      self.fetch(Lookup::Nationality, &self.config.nationality_url, name).await?;
    select_nationality(&body.country)
      .map(|c| c.country_id.clone())
      .ok_or(EnrichError::NoCandidate)
  }

  async fn fetch<T: DeserializeOwned>(
    &self,
    lookup: Lookup,
    url:    &str,
    name:   &str,
  ) -> Result<T, EnrichError> {
    let resp = self
      .http
      .get(url)
      .query(&[("name", name)])
      .send()
      .await
      .map_err(|source| EnrichError::UpstreamUnavailable { lookup, source })?;

    let status = resp.status();
    if !status.is_success() {
      return Err(EnrichError::UpstreamBadStatus { lookup, status });
    }

    let body = resp
      .bytes()
      .await
      .map_err(|source| EnrichError::UpstreamUnavailable { lookup, source })?;
    serde_json::from_slice(&body).map_err(|source| EnrichError::UpstreamBadPayload { lookup, source })
  }
}
