/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::geo::distance_between_in_meters;
use crate::common::types::*;
use crate::domain::action::trip;
use crate::domain::types::location::*;
use crate::environment::AppState;
use crate::outbound::publisher::publish_event;
use crate::outbound::types::Topic;
use crate::tools::error::AppError;
use crate::tools::prometheus::{BULK_LOCATION_ERRORS, LOCATION_UPDATES};
use actix_web::web::Data;
use chrono::Utc;
use tracing::{error, info};

fn validate_location_request(request: &UpdateDriverLocationRequest) -> Result<(), AppError> {
    let Latitude(lat) = request.pt.lat;
    let Longitude(lon) = request.pt.lon;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::ValidationFailed(format!(
            "latitude {lat} out of range [-90, 90]"
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::ValidationFailed(format!(
            "longitude {lon} out of range [-180, 180]"
        )));
    }
    if let Some(SpeedInKmPerHour(speed)) = request.speed {
        if speed < 0.0 {
            return Err(AppError::ValidationFailed(format!(
                "speed {speed} must be non-negative"
            )));
        }
    }
    if let Some(Direction(heading)) = request.heading {
        if !(0.0..360.0).contains(&heading) {
            return Err(AppError::ValidationFailed(format!(
                "heading {heading} out of range [0, 360)"
            )));
        }
    }
    if let Some(Accuracy(accuracy)) = request.acc {
        if accuracy < 0.0 {
            return Err(AppError::ValidationFailed(format!(
                "accuracy {accuracy} must be non-negative"
            )));
        }
    }
    Ok(())
}

/// Persists one driver sample and best-effort forwards it to the driver's
/// ongoing trip. Trail append and detection failures are logged and
/// swallowed : the sample is accepted the moment it is durably stored.
pub async fn update_driver_location(
    data: Data<AppState>,
    driver_id: DriverId,
    request: UpdateDriverLocationRequest,
) -> Result<APISuccess, AppError> {
    validate_location_request(&request)?;

    let sample = DriverLocation {
        driver_id: driver_id.clone(),
        pt: request.pt,
        speed: request.speed,
        heading: request.heading,
        accuracy: request.acc,
        ts: request.ts.unwrap_or(TimeStamp(Utc::now())),
        is_tracking: true,
    };

    let sample = data.locations.append(sample).await?;
    LOCATION_UPDATES.inc();
    info!(tag = "[Location Update]", driver_id = %driver_id.inner(), ts = %sample.ts.inner());

    publish_event(&*data.publisher, Topic::LocationUpdate, &sample);

    if let Err(err) = trip::forward_to_ongoing_trip(&data, &sample).await {
        error!(
            tag = "[Trip Trail Append Failed]",
            driver_id = %driver_id.inner(),
            error = %err.message()
        );
    }

    Ok(APISuccess::default())
}

/// Batched ingestion for devices that buffered samples offline. Items are
/// processed strictly in request order; a bad item is reported per-index and
/// skipped without failing the rest of the batch.
pub async fn bulk_driver_location(
    data: Data<AppState>,
    driver_id: DriverId,
    request: BulkDriverLocationRequest,
) -> Result<BulkDriverLocationResponse, AppError> {
    if request.locations.len() > data.bulk_location_limit {
        return Err(AppError::LargeBulkPayload(
            request.locations.len(),
            data.bulk_location_limit,
        ));
    }

    let mut saved = 0;
    let mut errors = Vec::new();

    for (index, item) in request.locations.into_iter().enumerate() {
        match update_driver_location(data.clone(), driver_id.clone(), item).await {
            Ok(_) => saved += 1,
            Err(err) => {
                BULK_LOCATION_ERRORS.inc();
                errors.push(BulkLocationError {
                    index,
                    error_code: err.code(),
                    message: err.message(),
                });
            }
        }
    }

    Ok(BulkDriverLocationResponse { saved, errors })
}

/// Marks the driver as no longer tracking. Idempotent : a driver with no
/// samples or an already stopped one succeeds without effect.
pub async fn stop_tracking(data: Data<AppState>, driver_id: DriverId) -> Result<APISuccess, AppError> {
    data.locations.set_tracking(&driver_id, false).await?;
    info!(tag = "[Tracking Stopped]", driver_id = %driver_id.inner());
    Ok(APISuccess::default())
}

pub async fn get_driver_location(
    data: Data<AppState>,
    driver_id: DriverId,
) -> Result<DriverLocationResponse, AppError> {
    let history = data
        .locations
        .history_for_driver(&driver_id, data.location_history_limit)
        .await?;
    let latest = history
        .first()
        .cloned()
        .ok_or_else(|| AppError::DriverLocationNotFound(driver_id.inner()))?;

    Ok(DriverLocationResponse { latest, history })
}

pub async fn get_latest_locations(data: Data<AppState>) -> Result<Vec<DriverLocation>, AppError> {
    data.locations.latest_per_driver().await
}

fn eta_to_stops(route: &Route, position: &Point, speed: Option<SpeedInKmPerHour>) -> Vec<StopEta> {
    let mut stops = route.stops.clone();
    stops.sort_by_key(|stop| stop.eta_order);

    stops
        .into_iter()
        .map(|stop| {
            let distance = distance_between_in_meters(position, &stop.pt).round();
            let eta_minutes = speed
                .filter(|SpeedInKmPerHour(kmph)| *kmph > 0.0)
                .map(|SpeedInKmPerHour(kmph)| ((distance / 1000.0) / kmph * 60.0).round() as i64);
            StopEta {
                stop_name: stop.name,
                pt: stop.pt,
                distance,
                eta_minutes,
            }
        })
        .collect()
}

/// Fleet snapshot : every actively tracking driver's latest fix, joined with
/// their ongoing trip's route (when any) to estimate arrival at each stop.
pub async fn live_buses(data: Data<AppState>) -> Result<Vec<LiveBus>, AppError> {
    let latest = data.locations.latest_per_driver().await?;
    let mut buses = Vec::with_capacity(latest.len());

    for sample in latest.into_iter().filter(|sample| sample.is_tracking) {
        let ongoing = data.trips.ongoing_for_driver(&sample.driver_id).await?;
        let route = match &ongoing {
            Some(trip) => data.routes.find(&trip.route_id).await?,
            None => None,
        };

        buses.push(LiveBus {
            driver_id: sample.driver_id,
            bus_id: ongoing.as_ref().and_then(|trip| trip.bus_id.clone()),
            route_id: route.as_ref().map(|route| route.route_id.clone()),
            route_name: route.as_ref().map(|route| route.name.clone()),
            eta_to_stops: route
                .as_ref()
                .map(|route| eta_to_stops(route, &sample.pt, sample.speed))
                .unwrap_or_default(),
            pt: sample.pt,
            speed: sample.speed,
            heading: sample.heading,
            ts: sample.ts,
        });
    }

    Ok(buses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(lat: f64, lon: f64) -> UpdateDriverLocationRequest {
        UpdateDriverLocationRequest {
            pt: Point {
                lat: Latitude(lat),
                lon: Longitude(lon),
            },
            ts: None,
            speed: None,
            heading: None,
            acc: None,
        }
    }

    #[test]
    fn coordinates_outside_their_ranges_are_rejected() {
        assert!(validate_location_request(&request(12.97, 77.59)).is_ok());
        assert!(validate_location_request(&request(90.0, 180.0)).is_ok());
        assert!(validate_location_request(&request(91.0, 77.59)).is_err());
        assert!(validate_location_request(&request(12.97, -180.5)).is_err());
    }

    #[test]
    fn negative_speed_and_wrapped_heading_are_rejected() {
        let mut bad_speed = request(12.97, 77.59);
        bad_speed.speed = Some(SpeedInKmPerHour(-1.0));
        assert!(validate_location_request(&bad_speed).is_err());

        let mut bad_heading = request(12.97, 77.59);
        bad_heading.heading = Some(Direction(360.0));
        assert!(validate_location_request(&bad_heading).is_err());

        let mut ok = request(12.97, 77.59);
        ok.speed = Some(SpeedInKmPerHour(0.0));
        ok.heading = Some(Direction(0.0));
        ok.acc = Some(Accuracy(5.0));
        assert!(validate_location_request(&ok).is_ok());
    }

    #[test]
    fn eta_is_skipped_while_stationary() {
        let route = Route {
            route_id: RouteId("route-1".to_string()),
            name: "Morning Pickup".to_string(),
            stops: vec![
                Stop {
                    name: "Gate B".to_string(),
                    pt: Point {
                        lat: Latitude(0.0),
                        lon: Longitude(0.02),
                    },
                    eta_order: 2,
                },
                Stop {
                    name: "Gate A".to_string(),
                    pt: Point {
                        lat: Latitude(0.0),
                        lon: Longitude(0.01),
                    },
                    eta_order: 1,
                },
            ],
            geofence: None,
            speed_limit: None,
            assigned_driver: None,
            is_active: true,
        };
        let here = Point {
            lat: Latitude(0.0),
            lon: Longitude(0.0),
        };

        let idle = eta_to_stops(&route, &here, Some(SpeedInKmPerHour(0.0)));
        assert_eq!(idle.len(), 2);
        // Stops come back in eta_order, not insertion order.
        assert_eq!(idle[0].stop_name, "Gate A");
        assert!(idle.iter().all(|stop| stop.eta_minutes.is_none()));

        let moving = eta_to_stops(&route, &here, Some(SpeedInKmPerHour(30.0)));
        // ~1113m at 30 km/h is just over two minutes.
        assert_eq!(moving[0].eta_minutes, Some(2));
        assert!(moving[1].distance > moving[0].distance);
    }
}
