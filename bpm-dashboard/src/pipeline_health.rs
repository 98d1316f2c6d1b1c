use crate::{model::HealthStatus, state::AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::json;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Source of the status reported by `/pipeline-health`.
pub trait HealthProbe: Send + Sync {
    fn check(&self) -> HealthStatus;
}

/// Mock probe: reports failing with a fixed probability, independently on
/// every call. Not connected to any real pipeline.
pub struct RandomHealthProbe {
    failing_ratio: f64,
    rng: Mutex<StdRng>,
}

impl RandomHealthProbe {
    pub fn new(failing_ratio: f64, seed: Option<u64>) -> anyhow::Result<Self> {
        if !(0.0..=1.0).contains(&failing_ratio) {
            return Err(anyhow::anyhow!(
                "Invalid failing_ratio {}: must be within 0.0..=1.0",
                failing_ratio
            ));
        }
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            failing_ratio,
            rng: Mutex::new(rng),
        })
    }

    pub fn failing_ratio(&self) -> f64 {
        self.failing_ratio
    }
}

impl HealthProbe for RandomHealthProbe {
    fn check(&self) -> HealthStatus {
        let draw: f64 = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen();
        if draw < self.failing_ratio {
            HealthStatus::Failing
        } else {
            HealthStatus::Passing
        }
    }
}

/// Probe that always answers the same thing.
pub struct FixedHealthProbe(pub HealthStatus);

impl HealthProbe for FixedHealthProbe {
    fn check(&self) -> HealthStatus {
        self.0
    }
}

pub async fn pipeline_health_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.health.check() {
        HealthStatus::Passing => {
            debug!("Pipeline health: passing");
            (StatusCode::OK, Json(json!({ "status": "passing" }))).into_response()
        }
        // unknown is never reported by the service
        _ => {
            debug!("Pipeline health: failing");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "failing" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(probe: impl HealthProbe + 'static) -> Arc<AppState> {
        Arc::new(AppState::with_probe("data", Arc::new(probe)))
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = hyper::body::to_bytes(resp.into_body())
            .await
            .expect("bytes");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[test]
    fn rejects_ratio_out_of_range() {
        assert!(RandomHealthProbe::new(1.5, None).is_err());
        assert!(RandomHealthProbe::new(-0.1, None).is_err());
        assert!(RandomHealthProbe::new(0.0, None).is_ok());
    }

    #[test]
    fn failing_rate_close_to_configured_ratio() {
        let probe = RandomHealthProbe::new(0.3, Some(7)).expect("probe");
        const DRAWS: usize = 5000;
        let failing = (0..DRAWS)
            .filter(|_| probe.check() == HealthStatus::Failing)
            .count();
        let rate = failing as f64 / DRAWS as f64;
        assert!(
            (0.26..=0.34).contains(&rate),
            "failing rate {} too far from 0.3",
            rate
        );
    }

    #[test]
    fn random_probe_never_reports_unknown() {
        let probe = RandomHealthProbe::new(0.5, Some(1)).expect("probe");
        assert!((0..1000).all(|_| probe.check() != HealthStatus::Unknown));
    }

    #[test]
    fn extreme_ratios_are_deterministic() {
        let always = RandomHealthProbe::new(1.0, None).expect("probe");
        let never = RandomHealthProbe::new(0.0, None).expect("probe");
        for _ in 0..100 {
            assert_eq!(always.check(), HealthStatus::Failing);
            assert_eq!(never.check(), HealthStatus::Passing);
        }
    }

    #[tokio::test]
    async fn passing_returns_200() {
        let resp =
            pipeline_health_handler(State(state_with(FixedHealthProbe(HealthStatus::Passing))))
                .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({ "status": "passing" }));
    }

    #[tokio::test]
    async fn failing_returns_503() {
        let resp =
            pipeline_health_handler(State(state_with(FixedHealthProbe(HealthStatus::Failing))))
                .await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(resp).await, json!({ "status": "failing" }));
    }

    #[tokio::test]
    async fn handler_returns_only_the_two_bodies() {
        let state = Arc::new(AppState::with_probe(
            "data",
            Arc::new(RandomHealthProbe::new(0.3, Some(99)).expect("probe")),
        ));
        let mut failing = 0usize;
        const CALLS: usize = 1000;
        for _ in 0..CALLS {
            let resp = pipeline_health_handler(State(state.clone())).await;
            let status = resp.status();
            let body = body_json(resp).await;
            match status {
                StatusCode::OK => assert_eq!(body, json!({ "status": "passing" })),
                StatusCode::SERVICE_UNAVAILABLE => {
                    assert_eq!(body, json!({ "status": "failing" }));
                    failing += 1;
                }
                other => panic!("unexpected status {}", other),
            }
        }
        let rate = failing as f64 / CALLS as f64;
        assert!((0.24..=0.36).contains(&rate), "failing rate {}", rate);
    }
}
