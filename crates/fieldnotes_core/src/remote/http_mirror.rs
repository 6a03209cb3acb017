//! `reqwest`-backed mirror client for the public demo posts API.
//!
//! Read path: `GET {base}/posts?_limit=N`.
//! Write path: `POST {base}/posts` with `{title, body}`.

use super::{MirrorClient, MirrorError, MirrorOperation, MirrorResult, MirroredNote};
use crate::clock::{Clock, SystemClock};
use crate::config::MirrorConfig;
use crate::model::note::{deserialize_note_id, format_timestamp, Note, NoteId};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use log::{error, info};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Deserialize)]
struct RemotePost {
    #[serde(deserialize_with = "deserialize_note_id")]
    id: NoteId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

#[derive(Debug, Serialize)]
struct NewRemotePost<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedRemotePost {
    #[serde(deserialize_with = "deserialize_note_id")]
    id: NoteId,
}

/// HTTP mirror client. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct HttpMirrorClient {
    http: Client,
    base_url: String,
    seed_limit: u32,
    clock: Arc<dyn Clock>,
}

impl HttpMirrorClient {
    pub fn new(config: &MirrorConfig) -> MirrorResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Builds a client whose seed dates are derived from `clock`.
    pub fn with_clock(config: &MirrorConfig, clock: Arc<dyn Clock>) -> MirrorResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(MirrorError::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            seed_limit: config.seed_limit,
            clock,
        })
    }

    fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }
}

#[async_trait]
impl MirrorClient for HttpMirrorClient {
    async fn fetch_seed(&self) -> MirrorResult<Vec<Note>> {
        let operation = MirrorOperation::FetchSeed;
        let started_at = Instant::now();

        let result: MirrorResult<Vec<RemotePost>> = async {
            let response = self
                .http
                .get(self.posts_url())
                .query(&[("_limit", self.seed_limit)])
                .send()
                .await
                .map_err(|source| MirrorError::Network { operation, source })?;
            decode_success::<Vec<RemotePost>>(operation, response).await
        }
        .await;

        let posts = log_outcome(operation, started_at, result)?;
        let now = self.clock.now();
        let notes = posts
            .into_iter()
            .enumerate()
            .map(|(index, post)| Note {
                id: post.id,
                title: post.title,
                description: post.body,
                image: None,
                location: None,
                date: format_timestamp(seed_date(now, index)),
            })
            .collect::<Vec<_>>();

        info!(
            "event=remote_fetch_seed module=remote status=ok count={}",
            notes.len()
        );
        Ok(notes)
    }

    async fn mirror(&self, note: &Note) -> MirrorResult<MirroredNote> {
        let operation = MirrorOperation::Mirror;
        let started_at = Instant::now();

        let result: MirrorResult<CreatedRemotePost> = async {
            let response = self
                .http
                .post(self.posts_url())
                .json(&NewRemotePost {
                    title: note.title.as_str(),
                    body: note.description.as_str(),
                })
                .send()
                .await
                .map_err(|source| MirrorError::Network { operation, source })?;
            decode_success::<CreatedRemotePost>(operation, response).await
        }
        .await;

        let created = log_outcome(operation, started_at, result)?;
        info!(
            "event=remote_mirror module=remote status=ok note_id={} remote_id={}",
            note.id, created.id
        );
        Ok(MirroredNote {
            remote_id: created.id,
            note: note.clone(),
        })
    }
}

/// Fabricated timeline for seed notes: entry `index` is `index` days old.
fn seed_date(now: DateTime<Utc>, index: usize) -> DateTime<Utc> {
    i64::try_from(index)
        .ok()
        .and_then(TimeDelta::try_days)
        .and_then(|age| now.checked_sub_signed(age))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

async fn decode_success<T: DeserializeOwned>(
    operation: MirrorOperation,
    response: Response,
) -> MirrorResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(MirrorError::Status {
            operation,
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| MirrorError::Network { operation, source })?;
    serde_json::from_str(&body).map_err(|source| MirrorError::Decode { operation, source })
}

fn log_outcome<T>(
    operation: MirrorOperation,
    started_at: Instant,
    result: MirrorResult<T>,
) -> MirrorResult<T> {
    if let Err(err) = &result {
        error!(
            "event=remote_{operation} module=remote status=error duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::seed_date;
    use chrono::{TimeZone, Utc};

    #[test]
    fn seed_dates_step_back_one_day_per_index() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(seed_date(now, 0), now);
        assert_eq!(
            seed_date(now, 1),
            Utc.with_ymd_and_hms(2024, 2, 29, 9, 0, 0).unwrap()
        );
    }
}
