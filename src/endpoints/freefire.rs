//! Free Fire likes service.
//!
//! `sendlikes` is the one endpoint whose `success: false` answers still carry
//! a useful `data` block (the player's likes before and after), so it is read
//! through [`Client::request_json`] and classified here instead of going
//! through [`Client::call`].

use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::endpoints::expect_envelope;
use crate::{Client, RequestDescriptor, Response, ResponseEnvelope, Result};

/// Free Fire endpoints.
pub struct FreeFire<'a> {
    client: &'a Client,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    pub rules: LikesRules,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesRules {
    /// Below this many likes added, a send does not count against the quota.
    pub min_likes: u64,
    #[serde(default)]
    pub min_likes_description: Option<String>,
}

/// What a `sendlikes` call did to a player's profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesReport {
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub uid: Option<Value>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub initial_likes: Option<u64>,
    #[serde(default)]
    pub final_likes: Option<u64>,
    #[serde(default)]
    pub likes_added: u64,
    #[serde(default)]
    pub usage_counted: bool,
    #[serde(default)]
    pub usage_status: Option<String>,
    #[serde(default)]
    pub keystats: Option<Value>,
    #[serde(default)]
    pub min_likes_required: Option<u64>,
}

/// Classified answer of `sendlikes`.
#[derive(Debug, Clone)]
pub enum LikesOutcome {
    /// Likes were sent and the request counted against the key's quota.
    Counted(LikesReport),
    /// Likes were sent but too few to count.
    NotCounted(LikesReport),
    /// The service refused; `report` is set when it still described the player.
    Rejected {
        error_code: Option<String>,
        message: String,
        report: Option<LikesReport>,
    },
}

impl LikesOutcome {
    pub fn report(&self) -> Option<&LikesReport> {
        match self {
            LikesOutcome::Counted(report) | LikesOutcome::NotCounted(report) => Some(report),
            LikesOutcome::Rejected { report, .. } => report.as_ref(),
        }
    }
}

/// Player ids bucketed by outcome, in the order they were sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikesSummary {
    pub successful: Vec<String>,
    pub not_counted: Vec<String>,
    pub failed: Vec<String>,
}

impl<'a> FreeFire<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// `GET /freefire/info`
    pub async fn info(&self) -> Result<Response<ServiceInfo>> {
        self.client.get("/freefire/info").await
    }

    /// `GET /freefire/sendlikes?playerId=`
    ///
    /// # Errors
    ///
    /// A refusal inside a 2xx answer is [`LikesOutcome::Rejected`], not an
    /// error. The service answers 403 when the key's plan does not include
    /// this endpoint and 400 for a malformed player id; both surface as
    /// [`ClientError::ClientSide`].
    pub async fn send_likes(&self, player_id: &str) -> Result<Response<LikesOutcome>> {
        let response = self
            .client
            .request_json(Self::send_likes_descriptor(player_id))
            .await?;
        response.try_map(classify)
    }

    /// Sends likes to each player in turn, `delay` apart, and buckets the
    /// player ids by outcome. Errors count as failed.
    pub async fn send_likes_to_players<I, S>(&self, player_ids: I, delay: Duration) -> LikesSummary
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let player_ids: Vec<String> = player_ids.into_iter().map(Into::into).collect();
        let descriptors = player_ids
            .iter()
            .map(|id| Self::send_likes_descriptor(id));

        let results = self.client.request_sequence(descriptors, delay).await;

        let mut summary = LikesSummary::default();
        for (player_id, result) in player_ids.into_iter().zip(results) {
            let outcome = result.and_then(|response| {
                response.try_map(|payload, raw_body, status| {
                    classify(expect_envelope(payload, raw_body, status)?, raw_body, status)
                })
            });

            match outcome.map(|response| response.data) {
                Ok(LikesOutcome::Counted(_)) => summary.successful.push(player_id),
                Ok(LikesOutcome::NotCounted(_)) => summary.not_counted.push(player_id),
                Ok(LikesOutcome::Rejected { .. }) => summary.failed.push(player_id),
                Err(e) => {
                    tracing::warn!(player_id = %player_id, error = %e, "Sending likes failed");
                    summary.failed.push(player_id);
                }
            }
        }

        tracing::info!(
            successful = summary.successful.len(),
            not_counted = summary.not_counted.len(),
            failed = summary.failed.len(),
            "Likes batch finished"
        );

        summary
    }

    fn send_likes_descriptor(player_id: &str) -> RequestDescriptor {
        RequestDescriptor::get("/freefire/sendlikes").with_query_param("playerId", player_id)
    }
}

fn classify(
    envelope: ResponseEnvelope,
    raw_body: &str,
    status: StatusCode,
) -> Result<LikesOutcome> {
    match envelope {
        ResponseEnvelope::Failure {
            error_code,
            message,
            ..
        } => Ok(LikesOutcome::Rejected {
            error_code,
            message,
            report: rejected_report(raw_body),
        }),
        success => {
            let report: LikesReport = success.into_data(raw_body, status)?;
            if report.usage_counted {
                Ok(LikesOutcome::Counted(report))
            } else {
                Ok(LikesOutcome::NotCounted(report))
            }
        }
    }
}

/// The envelope drops `data` on failure; recover it from the raw body.
fn rejected_report(raw_body: &str) -> Option<LikesReport> {
    let mut body: Value = serde_json::from_str(raw_body).ok()?;
    let data = body.get_mut("data")?.take();
    serde_json::from_value(data).ok()
}
