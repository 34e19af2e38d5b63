//! Valhalla HTTP client.
//!
//! | Call     | Path                                                    |
//! |----------|---------------------------------------------------------|
//! | locate   | `/locate`                                               |
//! | matrix   | `/sources_to_targets`, then `/matrix` + `action` on 404 |
//! | route    | `/route` (GeoJSON shape, polyline fallback)             |
//!
//! A 404 means "this action is not served at this path".  For the matrix it
//! moves on to the next candidate path; once every path has answered 404 the
//! call fails with [`ServiceError::Unavailable`].  The first path that
//! answers is remembered for the rest of the client's lifetime.

use std::sync::OnceLock;
use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use rd_core::{GeoPoint, ServiceConfig};
use rd_polyline::DEFAULT_PRECISION;

use crate::service::{CostGrid, LocateOutcome, Locator, MatrixService, RouteService, RouteTrip};
use crate::transport::{ReqwestTransport, Transport};
use crate::wire::{LocateRequest, LocateResponse, MatrixRequest, MatrixResponse, RouteRequest, RouteResponse};
use crate::{ServiceError, ServiceResult};

/// Longest response excerpt kept in a [`ServiceError::Status`].
const BODY_EXCERPT: usize = 200;

// ── Matrix endpoints ──────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatrixEndpoint {
    /// Native Valhalla action path.
    SourcesToTargets,
    /// Generic wrapper path that dispatches on an `action` field.
    Matrix,
}

impl MatrixEndpoint {
    pub const ALL: [MatrixEndpoint; 2] = [MatrixEndpoint::SourcesToTargets, MatrixEndpoint::Matrix];

    pub fn path(self) -> &'static str {
        match self {
            MatrixEndpoint::SourcesToTargets => "/sources_to_targets",
            MatrixEndpoint::Matrix => "/matrix",
        }
    }

    fn action(self) -> Option<&'static str> {
        match self {
            MatrixEndpoint::SourcesToTargets => None,
            MatrixEndpoint::Matrix => Some("sources_to_targets"),
        }
    }
}

// ── ValhallaClient ────────────────────────────────────────────────────────────

/// Client for one routing-engine instance (one network snapshot).
pub struct ValhallaClient<T: Transport = ReqwestTransport> {
    config:          ServiceConfig,
    transport:       T,
    matrix_endpoint: OnceLock<MatrixEndpoint>,
}

impl ValhallaClient<ReqwestTransport> {
    /// Validate `config` and open a pooled HTTP client.
    pub fn new(config: ServiceConfig) -> ServiceResult<Self> {
        config.validate()?;
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }
}

impl<T: Transport> ValhallaClient<T> {
    pub fn with_transport(config: ServiceConfig, transport: T) -> Self {
        Self { config, transport, matrix_endpoint: OnceLock::new() }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The matrix path that answered, once one has.
    pub fn matrix_endpoint(&self) -> Option<MatrixEndpoint> {
        self.matrix_endpoint.get().copied()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// POST `request` to `path`.  `Ok(None)` means the path answered 404.
    fn post<Q: Serialize, R: DeserializeOwned>(
        &self,
        path:    &str,
        request: &Q,
        timeout: Duration,
    ) -> ServiceResult<Option<R>> {
        let url = self.url(path);
        let body = serde_json::to_value(request)
            .map_err(|source| ServiceError::Encode { url: url.clone(), source })?;

        let reply = self.transport.post_json(&url, &body, timeout)?;
        if reply.is_not_found() {
            debug!("{url} answered 404");
            return Ok(None);
        }
        if !reply.is_success() {
            let mut excerpt = reply.body;
            if excerpt.len() > BODY_EXCERPT {
                let cut = (0..=BODY_EXCERPT).rev().find(|&i| excerpt.is_char_boundary(i)).unwrap_or(0);
                excerpt.truncate(cut);
            }
            return Err(ServiceError::Status { url, status: reply.status, body: excerpt });
        }

        serde_json::from_str(&reply.body)
            .map(Some)
            .map_err(|e| ServiceError::Shape { url, reason: e.to_string() })
    }

    fn unavailable(&self, what: &'static str, tried: &[&str]) -> ServiceError {
        ServiceError::Unavailable {
            base_url: self.config.base_url.clone(),
            what,
            tried:    tried.join(", "),
        }
    }

    fn post_route(&self, from: GeoPoint, to: GeoPoint, shape_format: Option<&'static str>) -> ServiceResult<RouteResponse> {
        let request = RouteRequest::new(from, to, &self.config.costing, shape_format);
        self.post(
            "/route",
            &request,
            self.config.timeouts.route(),
        )?
        .ok_or_else(|| self.unavailable("route", &["/route"]))
    }
}

impl<T: Transport> Locator for ValhallaClient<T> {
    fn locate(&self, at: GeoPoint) -> ServiceResult<LocateOutcome> {
        let response: LocateResponse = self
            .post("/locate", &LocateRequest::single(at), self.config.timeouts.locate())?
            .ok_or_else(|| self.unavailable("locate", &["/locate"]))?;
        Ok(response.outcome())
    }
}

impl<T: Transport> MatrixService for ValhallaClient<T> {
    fn matrix(&self, sources: &[GeoPoint], targets: &[GeoPoint]) -> ServiceResult<CostGrid> {
        let candidates: &[MatrixEndpoint] = match self.matrix_endpoint.get() {
            Some(known) => std::slice::from_ref(known),
            None => &MatrixEndpoint::ALL,
        };

        for &endpoint in candidates {
            let request = MatrixRequest {
                action: endpoint.action(),
                ..MatrixRequest::new(sources, targets, &self.config.costing)
            };
            let answer: Option<MatrixResponse> =
                self.post(endpoint.path(), &request, self.config.timeouts.matrix())?;

            if let Some(response) = answer {
                if self.matrix_endpoint.set(endpoint).is_ok() && endpoint != MatrixEndpoint::SourcesToTargets {
                    debug!("{} serves the matrix at {}", self.config.base_url, endpoint.path());
                }
                return response.into_grid().map_err(|reason| ServiceError::Shape {
                    url: self.url(endpoint.path()),
                    reason,
                });
            }
        }

        let tried: Vec<&str> = candidates.iter().map(|e| e.path()).collect();
        Err(self.unavailable("matrix", &tried))
    }
}

impl<T: Transport> RouteService for ValhallaClient<T> {
    fn route(&self, from: GeoPoint, to: GeoPoint) -> ServiceResult<RouteTrip> {
        let mut response = self.post_route(from, to, Some("geojson"))?;
        let mut geometry = match response.first_shape() {
            Some(shape) => shape.geometry(DEFAULT_PRECISION)?,
            None => None,
        };

        if geometry.is_none() {
            warn!("{}: unsupported GeoJSON shape for {from} -> {to}, retrying with polyline", self.config.base_url);
            response = self.post_route(from, to, None)?;
            geometry = match response.first_shape() {
                Some(shape) => shape.geometry(DEFAULT_PRECISION)?,
                None => None,
            };
        }

        let geometry = geometry.ok_or_else(|| ServiceError::Shape {
            url:    self.url("/route"),
            reason: format!("no usable leg shape for {from} -> {to}"),
        })?;

        Ok(RouteTrip {
            geometry,
            time_s:    response.trip.summary.time,
            length_km: response.trip.summary.length,
        })
    }
}
