/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::*;
use serde::{Deserialize, Serialize};

mod overspeeding;
mod route_deviation;

pub use overspeeding::OverspeedingHandler;
pub use route_deviation::RouteDeviationHandler;

/// Overspeed severity escalates to high beyond this multiple of the limit.
pub const OVERSPEED_HIGH_MULTIPLIER: f64 = 1.2;
/// Out-of-route severity escalates to high beyond this distance from the fence.
pub const OUT_OF_ROUTE_HIGH_DISTANCE_METERS: f64 = 1000.0;

/// Represents the result of a detection check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DetectionResult {
    OverspeedingDetected {
        location: Point,
        timestamp: TimeStamp,
        speed: f64,
        speed_limit: f64,
    },
    OutOfRouteDetected {
        location: Point,
        timestamp: TimeStamp,
        distance_from_route: f64,
    },
}

/// Context data needed for detection, assembled once per appended trip point.
#[derive(Debug, Clone)]
pub struct DetectionContext {
    pub driver_id: DriverId,
    pub trip_id: TripId,
    pub route: Option<Route>,
    pub location: Point,
    pub timestamp: TimeStamp,
    pub speed: Option<SpeedInKmPerHour>,
}

/// Trait for core detection logic. Checks are independent : each handler may
/// fire for the same sample, so a single point can yield several results.
pub trait DetectionHandler: Send + Sync {
    /// Name of the detection type
    fn name(&self) -> &'static str;

    /// Check if detection applies for this context
    fn is_enabled(&self, context: &DetectionContext) -> bool;

    /// Perform the detection check
    fn check(&self, context: &DetectionContext) -> Option<DetectionResult>;
}
