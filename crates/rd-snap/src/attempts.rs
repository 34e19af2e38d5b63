//! The sampling loop as a bounded iterator.
//!
//! Each call to [`Iterator::next`] draws one candidate, locates it, and
//! applies the [`SnapPolicy`].  The iterator ends when `count` points have
//! been accepted, when `max_tries` draws have been made, or right after a
//! fatal locate failure, whichever comes first.

use std::thread;
use std::time::Duration;

use log::debug;
use rd_core::{GeoPoint, Point, PointId, SampleRng, SnapConfig};
use rd_service::{Locator, ServiceError};

use crate::{SnapDecision, SnapPolicy};

/// What happened to one draw.
#[derive(Debug)]
pub enum DrawOutcome {
    /// Accepted; ids follow acceptance order starting at 1.
    Accepted(Point),
    TooFar { snapped: GeoPoint, distance_m: f64 },
    NoMatch,
    /// The locate call failed.  The draw is discarded but still counts
    /// toward `max_tries`.
    LocateFailed(ServiceError),
}

/// One iteration of the sampling loop.
#[derive(Debug)]
pub struct Draw {
    /// 1-based draw number.
    pub attempt:   usize,
    pub candidate: GeoPoint,
    pub outcome:   DrawOutcome,
}

impl Draw {
    #[inline]
    pub fn accepted(&self) -> Option<&Point> {
        match &self.outcome {
            DrawOutcome::Accepted(p) => Some(p),
            _ => None,
        }
    }
}

pub struct SnapAttempts<'l, L: Locator + ?Sized> {
    locator:  &'l L,
    config:   SnapConfig,
    policy:   SnapPolicy,
    rng:      SampleRng,
    attempts: usize,
    accepted: usize,
    halted:   bool,
}

impl<'l, L: Locator + ?Sized> SnapAttempts<'l, L> {
    pub fn new(locator: &'l L, config: SnapConfig) -> Self {
        Self {
            locator,
            policy: SnapPolicy::new(config.max_snap_distance_m),
            rng: SampleRng::new(config.seed),
            config,
            attempts: 0,
            accepted: 0,
            halted: false,
        }
    }

    /// Draws made so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Points accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    fn pause(&self) {
        let delay = self.config.call_delay();
        if delay > Duration::ZERO {
            thread::sleep(delay);
        }
    }
}

impl<L: Locator + ?Sized> Iterator for SnapAttempts<'_, L> {
    type Item = Draw;

    fn next(&mut self) -> Option<Draw> {
        if self.halted || self.accepted >= self.config.count || self.attempts >= self.config.max_tries {
            return None;
        }

        self.attempts += 1;
        let candidate = self.rng.point_in(&self.config.bbox);
        let located = self.locator.locate(candidate);
        self.pause();

        let outcome = match located {
            Err(e) => {
                debug!("draw {}: locate {candidate} failed: {e}", self.attempts);
                self.halted = e.is_fatal();
                DrawOutcome::LocateFailed(e)
            }
            Ok(found) => match self.policy.evaluate(candidate, found) {
                SnapDecision::Accept { snapped, distance_m } => {
                    self.accepted += 1;
                    let id = PointId::from_ordinal(self.accepted - 1);
                    DrawOutcome::Accepted(Point::new(id, snapped, distance_m))
                }
                SnapDecision::TooFar { snapped, distance_m } => {
                    debug!("draw {}: {candidate} snapped {distance_m:.1} m away, rejected", self.attempts);
                    DrawOutcome::TooFar { snapped, distance_m }
                }
                SnapDecision::NoMatch => DrawOutcome::NoMatch,
            },
        };

        Some(Draw { attempt: self.attempts, candidate, outcome })
    }
}
