//! Prometheus request metrics for the CityInfo routes.
//!
//! Requests are labelled by matched route pattern (`/api/v1/cities/{id}`),
//! never by raw path, so city and point of interest ids do not mint new
//! series. Health checks and the scrape endpoint are not counted, and every
//! series carries the selected city store.

use std::collections::HashMap;
use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;

const NAMESPACE: &str = "cityinfo";
const METRICS_PATH: &str = "/metrics";
/// Endpoint label for requests that matched no route.
const UNMATCHED_ENDPOINT: &str = "unmatched";
const UNCOUNTED_PATHS: [&str; 3] = ["/health/ready", "/health/live", METRICS_PATH];

/// Build the Prometheus middleware exposing `/metrics`, labelling every
/// series with `store` (`memory` or `postgres`).
///
/// # Errors
/// Returns [`std::io::Error`] when the metrics registry rejects a collector.
pub fn make_metrics(store: &str) -> std::io::Result<PrometheusMetrics> {
    let labels = HashMap::from([("store".to_owned(), store.to_owned())]);
    UNCOUNTED_PATHS
        .iter()
        .fold(
            PrometheusMetricsBuilder::new(NAMESPACE)
                .endpoint(METRICS_PATH)
                .const_labels(labels)
                .mask_unmatched_patterns(UNMATCHED_ENDPOINT),
            |builder, path| builder.exclude(*path),
        )
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}

/// Optional metrics wrapper; the disabled variant only boxes the body.
#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        match metrics {
            Some(metrics) => Self::Enabled(Arc::new(metrics)),
            None => Self::Disabled,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self.clone() {
            MetricsLayer::Enabled(metrics) => {
                let fut = Compat::new((*metrics).clone()).new_transform(service);
                Box::pin(async move {
                    let svc = fut.await?;
                    Ok(boxed::service(svc))
                })
            }
            MetricsLayer::Disabled => Box::pin(async move {
                let svc = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
                Ok(boxed::service(svc))
            }),
        }
    }
}
