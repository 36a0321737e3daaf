// src/services/aggregator.rs

//! Job aggregation across upstream mirrors.
//!
//! Mirrors are tried strictly in order, one at a time. The first mirror that
//! answers `200 OK` with a JSON object wins; if none does, the last failure is surfaced as
//! [`AppError::UpstreamUnavailable`].

use std::sync::Arc;

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{JobBatch, RawRecord};
use crate::services::normalizer::normalize;
use crate::services::upstream::{JsonSource, QueryParams};
use crate::utils::fields::{as_count, first_present};

/// Payload keys that may hold the job list, in priority order.
pub const JOB_LIST_KEYS: [&str; 2] = ["jobs", "data"];

/// Payload keys that may hold the reported total, in priority order.
pub const TOTAL_KEYS: [&str; 2] = ["job-count", "total"];

/// Progress of a fallback run over the mirror list.
enum MirrorState {
    Trying(usize),
    Succeeded(RawRecord),
    Failed(AppError),
}

/// Fetches and normalizes job listings from a prioritized list of mirrors.
#[derive(Clone)]
pub struct JobAggregator {
    source: Arc<dyn JsonSource>,
    endpoints: Vec<String>,
}

impl JobAggregator {
    /// Create an aggregator over `endpoints`, highest priority first.
    pub fn new(source: Arc<dyn JsonSource>, endpoints: Vec<String>) -> Self {
        Self { source, endpoints }
    }

    /// List jobs matching the optional search text and category.
    ///
    /// `limit` is forwarded as the upstream `limit` parameter when given;
    /// `None` leaves the upstream default in place.
    pub async fn list_jobs(
        &self,
        query: Option<&str>,
        category: Option<&str>,
        limit: Option<u32>,
    ) -> Result<JobBatch> {
        let params = build_params(query, category, limit);
        let payload = self.fetch_first(&params).await?;
        Ok(extract_jobs(&payload))
    }

    async fn fetch_first(&self, params: &QueryParams) -> Result<RawRecord> {
        let mut last_error = None;
        let mut state = MirrorState::Trying(0);
        loop {
            state = match state {
                MirrorState::Trying(index) if index < self.endpoints.len() => {
                    let endpoint = &self.endpoints[index];
                    match self.source.fetch_mirror(endpoint, params).await {
                        Ok(payload) => {
                            if index > 0 {
                                log::info!(
                                    "Upstream mirror {} succeeded after {} failure(s)",
                                    endpoint,
                                    index
                                );
                            }
                            MirrorState::Succeeded(payload)
                        }
                        Err(error) => {
                            log::warn!("Upstream mirror {} failed: {}", endpoint, error);
                            last_error = Some(error);
                            MirrorState::Trying(index + 1)
                        }
                    }
                }
                MirrorState::Trying(attempts) => match last_error.take() {
                    Some(last) => MirrorState::Failed(AppError::UpstreamUnavailable {
                        attempts,
                        last: Box::new(last),
                    }),
                    None => MirrorState::Failed(AppError::config(
                        "no upstream job endpoints configured",
                    )),
                },
                MirrorState::Succeeded(payload) => return Ok(payload),
                MirrorState::Failed(error) => {
                    log::error!("{}", error);
                    return Err(error);
                }
            };
        }
    }
}

fn build_params(query: Option<&str>, category: Option<&str>, limit: Option<u32>) -> QueryParams {
    let mut params = QueryParams::new();
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        params.push(("search", q.to_string()));
    }
    if let Some(c) = category.filter(|c| !c.is_empty()) {
        params.push(("category", c.to_string()));
    }
    if let Some(limit) = limit {
        params.push(("limit", limit.to_string()));
    }
    params
}

/// Pull the job list and total out of a payload and normalize every
/// object-shaped record. Other list elements are dropped.
pub fn extract_jobs(payload: &RawRecord) -> JobBatch {
    let raw_items: &[Value] = match first_present(payload, &JOB_LIST_KEYS) {
        Some(Value::Array(items)) => items,
        _ => &[],
    };
    let fallback = i64::try_from(raw_items.len()).unwrap_or(i64::MAX);
    let total = first_present(payload, &TOTAL_KEYS)
        .and_then(as_count)
        .unwrap_or(fallback);

    let items = raw_items
        .iter()
        .filter_map(Value::as_object)
        .map(normalize)
        .collect();

    JobBatch { items, total }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    /// Scripted source: per-target canned responses plus a call log.
    #[derive(Default)]
    pub(crate) struct ScriptedSource {
        responses: HashMap<String, Vec<std::result::Result<Value, String>>>,
        call_log: Mutex<Vec<(String, QueryParams)>>,
    }

    impl ScriptedSource {
        pub(crate) fn ok(mut self, target: &str, body: Value) -> Self {
            self.responses
                .entry(target.to_string())
                .or_default()
                .push(Ok(body));
            self
        }

        pub(crate) fn fail(mut self, target: &str, message: &str) -> Self {
            self.responses
                .entry(target.to_string())
                .or_default()
                .push(Err(message.to_string()));
            self
        }

        pub(crate) fn calls(&self) -> Vec<(String, QueryParams)> {
            self.call_log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JsonSource for ScriptedSource {
        async fn fetch(&self, target: &str, params: &QueryParams) -> Result<RawRecord> {
            let call_index = {
                let mut calls = self.call_log.lock().unwrap();
                calls.push((target.to_string(), params.clone()));
                calls.iter().filter(|(t, _)| t == target).count() - 1
            };
            let scripted = self
                .responses
                .get(target)
                .and_then(|r| r.get(call_index).or_else(|| r.last()));
            match scripted {
                Some(Ok(Value::Object(map))) => Ok(map.clone()),
                Some(Ok(other)) => Err(AppError::UpstreamShape {
                    url: target.to_string(),
                    found: if other.is_array() { "array" } else { "scalar" },
                }),
                Some(Err(message)) => Err(AppError::upstream(target, message)),
                None => Err(AppError::upstream(target, "no scripted response")),
            }
        }
    }

    const M1: &str = "https://m1.example/api/remote-jobs";
    const M2: &str = "https://m2.example/api/remote-jobs";

    fn aggregator(source: ScriptedSource) -> (JobAggregator, Arc<ScriptedSource>) {
        let source = Arc::new(source);
        let agg = JobAggregator::new(source.clone(), vec![M1.to_string(), M2.to_string()]);
        (agg, source)
    }

    #[tokio::test]
    async fn test_params_order_and_omission() {
        let (agg, source) = aggregator(ScriptedSource::default().ok(M1, json!({"jobs": []})));
        agg.list_jobs(Some("rust"), Some("software-dev"), Some(40))
            .await
            .unwrap();
        agg.list_jobs(Some(""), None, None).await.unwrap();

        let calls = source.calls();
        assert_eq!(
            calls[0].1,
            vec![
                ("search", "rust".to_string()),
                ("category", "software-dev".to_string()),
                ("limit", "40".to_string()),
            ]
        );
        assert!(calls[1].1.is_empty());
    }

    #[tokio::test]
    async fn test_second_mirror_used_when_first_fails() {
        let (agg, source) = aggregator(
            ScriptedSource::default()
                .fail(M1, "status 500 Internal Server Error")
                .ok(M2, json!({"jobs": [{"id": 1, "title": "From mirror two"}], "job-count": 1})),
        );

        let batch = agg.list_jobs(None, None, Some(20)).await.unwrap();
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.items[0].title, "From mirror two");
        assert_eq!(batch.total, 1);

        let targets: Vec<String> = source.calls().into_iter().map(|(t, _)| t).collect();
        assert_eq!(targets, vec![M1.to_string(), M2.to_string()]);
    }

    #[tokio::test]
    async fn test_first_success_stops_the_walk() {
        let (agg, source) = aggregator(
            ScriptedSource::default()
                .ok(M1, json!({"jobs": []}))
                .ok(M2, json!({"jobs": [{"id": 2}]})),
        );
        let batch = agg.list_jobs(None, None, None).await.unwrap();
        assert!(batch.items.is_empty());
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_all_mirrors_fail_reports_last_cause() {
        let (agg, _) = aggregator(
            ScriptedSource::default()
                .fail(M1, "status 500")
                .ok(M2, json!(["not", "an", "object"])),
        );
        match agg.list_jobs(None, None, Some(20)).await {
            Err(AppError::UpstreamUnavailable { attempts, last }) => {
                assert_eq!(attempts, 2);
                match *last {
                    AppError::UpstreamShape { ref url, .. } => assert_eq!(url, M2),
                    ref other => panic!("unexpected last cause {other:?}"),
                }
            }
            other => panic!("expected UpstreamUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_endpoints_is_config_error() {
        let agg = JobAggregator::new(Arc::new(ScriptedSource::default()), Vec::new());
        assert!(matches!(
            agg.list_jobs(None, None, None).await,
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_total_falls_back_to_raw_length() {
        let payload = json!({"jobs": [{"id": 1}, {"id": 2}]});
        let batch = extract_jobs(payload.as_object().unwrap());
        assert_eq!(batch.total, 2);
    }

    #[test]
    fn test_total_key_priority_and_coercion() {
        let cases = [
            (json!({"jobs": [{}], "job-count": 57, "total": 9}), 57),
            (json!({"jobs": [{}], "job-count": 0, "total": 9}), 9),
            (json!({"jobs": [{}], "total": "12"}), 12),
            (json!({"jobs": [{}, {}], "job-count": "lots"}), 2),
            (json!({"jobs": [{}, {}, {}], "job-count": {"n": 1}}), 3),
            (json!({"jobs": [{}, {}], "job-count": -7}), -7),
        ];
        for (payload, expected) in cases {
            assert_eq!(extract_jobs(payload.as_object().unwrap()).total, expected);
        }
    }

    #[test]
    fn test_list_key_priority_and_filtering() {
        let payload = json!({
            "jobs": [],
            "data": [{"id": "a"}, "junk", 5, null, {"id": "b"}]
        });
        let batch = extract_jobs(payload.as_object().unwrap());
        let ids: Vec<&str> = batch.items.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        // Non-object elements still count towards the fallback total.
        assert_eq!(batch.total, 5);
    }

    #[test]
    fn test_non_list_jobs_value_is_empty() {
        let payload = json!({"jobs": {"id": 1}});
        let batch = extract_jobs(payload.as_object().unwrap());
        assert!(batch.items.is_empty());
        assert_eq!(batch.total, 0);
    }
}
