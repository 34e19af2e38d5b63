//! Collects a complete point set or fails.

use log::info;
use rd_core::{Point, SnapConfig};
use rd_service::Locator;

use crate::{DrawOutcome, SnapAttempts, SnapError, SnapResult};

pub struct PointSnapper<'l, L: Locator + ?Sized> {
    locator: &'l L,
    config:  SnapConfig,
}

impl<'l, L: Locator + ?Sized> PointSnapper<'l, L> {
    pub fn new(locator: &'l L, config: SnapConfig) -> SnapResult<Self> {
        config.validate()?;
        Ok(Self { locator, config })
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn attempts(&self) -> SnapAttempts<'l, L> {
        SnapAttempts::new(self.locator, self.config.clone())
    }

    /// Draw until `count` points are accepted.
    ///
    /// Returns exactly `count` points with ids `1..=count`, or
    /// [`SnapError::InsufficientPoints`] when `max_tries` runs out first.
    /// A fatal locate failure (endpoint missing) aborts immediately.
    pub fn generate(&self) -> SnapResult<Vec<Point>> {
        let mut points = Vec::with_capacity(self.config.count);
        let mut rejected = 0usize;
        let mut failed = 0usize;
        let mut draws = self.attempts();

        for draw in draws.by_ref() {
            match draw.outcome {
                DrawOutcome::Accepted(p) => points.push(p),
                DrawOutcome::LocateFailed(e) if e.is_fatal() => return Err(SnapError::Service(e)),
                DrawOutcome::LocateFailed(_) => failed += 1,
                DrawOutcome::TooFar { .. } | DrawOutcome::NoMatch => rejected += 1,
            }
        }

        let tries = draws.attempts();
        if points.len() < self.config.count {
            return Err(SnapError::InsufficientPoints {
                requested: self.config.count,
                accepted:  points.len(),
                tries,
            });
        }

        info!(
            "accepted {} points in {tries} draws ({rejected} rejected, {failed} locate failures)",
            points.len()
        );
        Ok(points)
    }
}
