/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::detection::{DetectionContext, DetectionHandler, DetectionResult};
use crate::common::geofence::{check_geofence, distance_from_geofence};
use crate::common::types::Point;

pub struct RouteDeviationHandler;

impl RouteDeviationHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RouteDeviationHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionHandler for RouteDeviationHandler {
    fn name(&self) -> &'static str {
        "route_deviation"
    }

    fn is_enabled(&self, context: &DetectionContext) -> bool {
        // Fence evaluation is fail-open, so only routes that actually carry a
        // fence can place a point outside.
        context
            .route
            .as_ref()
            .is_some_and(|route| route.geofence.is_some())
    }

    fn check(&self, context: &DetectionContext) -> Option<DetectionResult> {
        let geofence = context.route.as_ref()?.geofence.as_ref();
        let Point { lat, lon } = context.location;

        if check_geofence(lat, lon, geofence) {
            return None;
        }

        Some(DetectionResult::OutOfRouteDetected {
            location: context.location.clone(),
            timestamp: context.timestamp,
            distance_from_route: distance_from_geofence(lat, lon, geofence),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::*;
    use chrono::Utc;

    fn context(lat: f64, lon: f64, geofence: Option<Geofence>) -> DetectionContext {
        DetectionContext {
            driver_id: DriverId("driver-1".to_string()),
            trip_id: TripId("trip-1".to_string()),
            route: Some(Route {
                route_id: RouteId("route-1".to_string()),
                name: "Campus Loop".to_string(),
                stops: vec![],
                geofence,
                speed_limit: None,
                assigned_driver: None,
                is_active: true,
            }),
            location: Point {
                lat: Latitude(lat),
                lon: Longitude(lon),
            },
            timestamp: TimeStamp(Utc::now()),
            speed: None,
        }
    }

    #[test]
    fn fires_outside_a_circular_fence_with_clamped_distance() {
        let circle = CircleBounds {
            center: [0.0, 0.0],
            radius: 500.0,
        };
        let fence = Geofence::Circle(circle);
        let handler = RouteDeviationHandler::new();

        let ctx = context(0.0, 0.02, Some(fence.clone()));
        assert!(handler.is_enabled(&ctx));
        match handler.check(&ctx) {
            Some(DetectionResult::OutOfRouteDetected {
                distance_from_route,
                ..
            }) => {
                let expected = crate::common::geo::distance_between_in_meters(
                    &ctx.location,
                    &Point {
                        lat: Latitude(0.0),
                        lon: Longitude(0.0),
                    },
                ) - 500.0;
                assert!((distance_from_route - expected).abs() < 1e-9);
            }
            other => panic!("expected out-of-route detection, got {other:?}"),
        }

        assert!(handler.check(&context(0.0, 0.001, Some(fence))).is_none());
    }

    #[test]
    fn silent_for_routes_without_a_fence() {
        let handler = RouteDeviationHandler::new();
        let ctx = context(50.0, 50.0, None);

        assert!(!handler.is_enabled(&ctx));
        assert!(handler.check(&ctx).is_none());
    }

    #[test]
    fn unknown_fence_kind_never_fires() {
        let handler = RouteDeviationHandler::new();
        assert!(handler
            .check(&context(50.0, 50.0, Some(Geofence::Unknown)))
            .is_none());
    }
}
