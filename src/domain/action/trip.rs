/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::geo::{average_speed, max_speed, total_distance};
use crate::common::types::*;
use crate::domain::action::detection;
use crate::domain::types::trip::StartTripRequest;
use crate::environment::AppState;
use crate::outbound::publisher::publish_event;
use crate::outbound::types::{
    Topic, TripEndedPayload, TripEventType, TripLocationPayload, TripStartedPayload,
};
use crate::tools::error::AppError;
use crate::tools::prometheus::TRIP_POINTS_APPENDED;
use actix_web::web::Data;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

const RECENT_TRIPS_LIMIT: usize = 20;

fn trip_point_from_sample(sample: &DriverLocation) -> TripPoint {
    TripPoint {
        pt: sample.pt.clone(),
        ts: sample.ts,
        speed: sample.speed,
        heading: sample.heading,
        accuracy: sample.accuracy,
    }
}

/// Opens a trip for the driver on the given route.
///
/// A driver can hold at most one ongoing trip. The early lookup here gives a
/// clean conflict response on the common path; the store enforces the same
/// guard atomically, so two racing starts still end with exactly one winner.
pub async fn start_trip(
    data: Data<AppState>,
    driver_id: DriverId,
    request: StartTripRequest,
) -> Result<Trip, AppError> {
    if data.trips.ongoing_for_driver(&driver_id).await?.is_some() {
        return Err(AppError::TripAlreadyOngoing(driver_id.inner()));
    }

    let route = data
        .routes
        .find(&request.route_id)
        .await?
        .ok_or_else(|| AppError::RouteNotFound(request.route_id.inner()))?;

    if let Some(assigned) = &route.assigned_driver {
        if assigned != &driver_id {
            return Err(AppError::DriverNotAssignedToRoute(
                driver_id.inner(),
                route.route_id.inner(),
            ));
        }
    }

    // Tracking must already be live : the trip trail is seeded from the
    // driver's latest fix so the trail is never empty.
    let latest = data
        .locations
        .latest_for_driver(&driver_id)
        .await?
        .ok_or_else(|| AppError::NoLocationForTripStart(driver_id.inner()))?;

    let trip = Trip {
        trip_id: TripId(Uuid::new_v4().to_string()),
        driver_id: driver_id.clone(),
        route_id: route.route_id,
        bus_id: request.bus_id,
        status: TripStatus::Ongoing,
        start_time: TimeStamp(Utc::now()),
        end_time: None,
        start_location: latest.pt.clone(),
        end_location: None,
        distance_meters: 0.0,
        avg_speed: None,
        max_speed: None,
        location_points: vec![trip_point_from_sample(&latest)],
    };

    let trip = data.trips.create_ongoing(trip).await?;
    info!(tag = "[Trip Started]", trip_id = %trip.trip_id.inner(), driver_id = %driver_id.inner());

    publish_event(
        &*data.publisher,
        Topic::TripUpdate,
        &TripStartedPayload {
            event: TripEventType::Started,
            trip: trip.clone(),
        },
    );

    Ok(trip)
}

/// Closes the trip and fixes its aggregates. The end location prefers the
/// driver's latest fix over the last trail point, since the trail may lag a
/// few samples behind live ingestion.
pub async fn end_trip(
    data: Data<AppState>,
    driver_id: DriverId,
    trip_id: TripId,
) -> Result<Trip, AppError> {
    let trip = data
        .trips
        .find(&trip_id)
        .await?
        .filter(|trip| trip.driver_id == driver_id && trip.status == TripStatus::Ongoing)
        .ok_or_else(|| AppError::OngoingTripNotFound(trip_id.inner()))?;

    let end_location = match data.locations.latest_for_driver(&driver_id).await? {
        Some(latest) => Some(latest.pt),
        None => trip.location_points.last().map(|point| point.pt.clone()),
    };

    let completed = Trip {
        status: TripStatus::Completed,
        end_time: Some(TimeStamp(Utc::now())),
        end_location,
        distance_meters: total_distance(&trip.location_points),
        avg_speed: Some(average_speed(&trip.location_points)),
        max_speed: Some(max_speed(&trip.location_points)),
        ..trip
    };

    let completed = data.trips.complete(completed).await?;
    info!(
        tag = "[Trip Ended]",
        trip_id = %completed.trip_id.inner(),
        driver_id = %driver_id.inner(),
        distance_meters = completed.distance_meters
    );

    publish_event(
        &*data.publisher,
        Topic::TripUpdate,
        &TripEndedPayload {
            event: TripEventType::Ended,
            trip: completed.clone(),
        },
    );

    Ok(completed)
}

/// Appends a freshly ingested sample to the driver's ongoing trip, if any,
/// then runs detection over it. A driver without an ongoing trip is the
/// normal case and a silent no-op.
pub async fn forward_to_ongoing_trip(
    data: &Data<AppState>,
    sample: &DriverLocation,
) -> Result<(), AppError> {
    let Some(ongoing) = data.trips.ongoing_for_driver(&sample.driver_id).await? else {
        return Ok(());
    };

    let point = trip_point_from_sample(sample);
    let Some(trip) = data
        .trips
        .append_point(&ongoing.trip_id, &sample.driver_id, point.clone())
        .await?
    else {
        // Trip ended between the lookup and the append.
        return Ok(());
    };

    TRIP_POINTS_APPENDED.inc();

    detection::check_trip_point(data, &trip, sample).await;

    publish_event(
        &*data.publisher,
        Topic::TripUpdate,
        &TripLocationPayload {
            event: TripEventType::Location,
            trip_id: trip.trip_id,
            driver_id: trip.driver_id,
            location: point,
        },
    );

    Ok(())
}

pub async fn get_ongoing_trip(data: Data<AppState>, driver_id: DriverId) -> Result<Trip, AppError> {
    data.trips
        .ongoing_for_driver(&driver_id)
        .await?
        .ok_or_else(|| AppError::OngoingTripNotFound(driver_id.inner()))
}

pub async fn recent_trips(data: Data<AppState>, driver_id: DriverId) -> Result<Vec<Trip>, AppError> {
    data.trips
        .recent_for_driver(&driver_id, RECENT_TRIPS_LIMIT)
        .await
}

pub async fn get_trip(data: Data<AppState>, trip_id: TripId) -> Result<Trip, AppError> {
    data.trips
        .find(&trip_id)
        .await?
        .ok_or_else(|| AppError::TripNotFound(trip_id.inner()))
}

pub async fn trip_locations(data: Data<AppState>, trip_id: TripId) -> Result<Vec<TripPoint>, AppError> {
    get_trip(data, trip_id)
        .await
        .map(|trip| trip.location_points)
}
