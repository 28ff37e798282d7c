/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use actix_web::web::Data;
use bus_tracking_service::common::types::*;
use bus_tracking_service::domain::action::{alert, location, trip};
use bus_tracking_service::domain::types::alert::AlertListQuery;
use bus_tracking_service::domain::types::location::{
    BulkDriverLocationRequest, UpdateDriverLocationRequest,
};
use bus_tracking_service::domain::types::route::UpsertRouteRequest;
use bus_tracking_service::domain::types::trip::StartTripRequest;
use bus_tracking_service::environment::{AppConfig, AppState};
use bus_tracking_service::outbound::publisher::BroadcastEventPublisher;
use bus_tracking_service::outbound::types::Topic;
use bus_tracking_service::storage::InMemoryStore;
use bus_tracking_service::tools::error::AppError;
use bus_tracking_service::tools::logger::{LogLevel, LoggerConfig};
use chrono::{Duration, Utc};
use std::sync::Arc;

fn test_config() -> AppConfig {
    AppConfig {
        port: 0,
        workers: 1,
        logger_cfg: LoggerConfig {
            level: LogLevel::OFF,
            log_to_file: false,
        },
        default_speed_limit_kmph: 60.0,
        location_history_limit: 50,
        bulk_location_limit: 100,
        event_buffer_size: 64,
    }
}

fn test_state() -> Data<AppState> {
    let store = Arc::new(InMemoryStore::new());
    let publisher = Arc::new(BroadcastEventPublisher::new(64));
    Data::new(AppState::with_parts(store, publisher, &test_config()))
}

fn point(lat: f64, lon: f64) -> Point {
    Point {
        lat: Latitude(lat),
        lon: Longitude(lon),
    }
}

fn sample_at(lat: f64, lon: f64, speed: Option<f64>) -> UpdateDriverLocationRequest {
    UpdateDriverLocationRequest {
        pt: point(lat, lon),
        ts: Some(TimeStamp(Utc::now())),
        speed: speed.map(SpeedInKmPerHour),
        heading: None,
        acc: None,
    }
}

async fn seed_route(
    data: &Data<AppState>,
    speed_limit: Option<f64>,
    geofence: Option<Geofence>,
    assigned_driver: Option<&str>,
) -> RouteId {
    let route = bus_tracking_service::domain::action::route::upsert_route(
        data.clone(),
        UpsertRouteRequest {
            route_id: None,
            name: "Morning Pickup".to_string(),
            stops: vec![],
            geofence,
            speed_limit: speed_limit.map(SpeedInKmPerHour),
            assigned_driver: assigned_driver.map(|id| DriverId(id.to_string())),
        },
    )
    .await
    .expect("route upsert should succeed");
    route.route_id
}

#[tokio::test]
async fn trip_start_requires_a_location_sample() {
    let data = test_state();
    let driver_id = DriverId("driver-1".to_string());
    let route_id = seed_route(&data, None, None, None).await;

    let result = trip::start_trip(
        data.clone(),
        driver_id,
        StartTripRequest {
            route_id,
            bus_id: None,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::NoLocationForTripStart(_))));
}

#[tokio::test]
async fn trip_trail_is_seeded_with_the_latest_sample() {
    let data = test_state();
    let driver_id = DriverId("driver-1".to_string());
    let route_id = seed_route(&data, None, None, None).await;

    location::update_driver_location(data.clone(), driver_id.clone(), sample_at(12.97, 77.59, None))
        .await
        .expect("location update should succeed");

    let trip = trip::start_trip(
        data.clone(),
        driver_id.clone(),
        StartTripRequest {
            route_id,
            bus_id: Some(BusId("bus-7".to_string())),
        },
    )
    .await
    .expect("trip start should succeed");

    assert_eq!(trip.status, TripStatus::Ongoing);
    assert_eq!(trip.location_points.len(), 1);
    assert_eq!(trip.start_location, point(12.97, 77.59));
    assert_eq!(trip.location_points[0].pt, point(12.97, 77.59));

    let ongoing = trip::get_ongoing_trip(data.clone(), driver_id)
        .await
        .expect("ongoing trip should be found");
    assert_eq!(ongoing.trip_id, trip.trip_id);
}

#[tokio::test]
async fn a_second_start_conflicts_until_the_trip_ends() {
    let data = test_state();
    let driver_id = DriverId("driver-1".to_string());
    let route_id = seed_route(&data, None, None, None).await;

    location::update_driver_location(data.clone(), driver_id.clone(), sample_at(12.97, 77.59, None))
        .await
        .expect("location update should succeed");

    let first = trip::start_trip(
        data.clone(),
        driver_id.clone(),
        StartTripRequest {
            route_id: route_id.clone(),
            bus_id: None,
        },
    )
    .await
    .expect("first trip start should succeed");

    let second = trip::start_trip(
        data.clone(),
        driver_id.clone(),
        StartTripRequest {
            route_id: route_id.clone(),
            bus_id: None,
        },
    )
    .await;
    assert!(matches!(second, Err(AppError::TripAlreadyOngoing(_))));

    let ended = trip::end_trip(data.clone(), driver_id.clone(), first.trip_id)
        .await
        .expect("trip end should succeed");
    assert_eq!(ended.status, TripStatus::Completed);
    assert!(ended.end_time.is_some());

    trip::start_trip(
        data.clone(),
        driver_id,
        StartTripRequest {
            route_id,
            bus_id: None,
        },
    )
    .await
    .expect("start after end should succeed");
}

#[tokio::test]
async fn trip_start_is_forbidden_for_an_unassigned_driver() {
    let data = test_state();
    let driver_id = DriverId("driver-2".to_string());
    let route_id = seed_route(&data, None, None, Some("driver-1")).await;

    location::update_driver_location(data.clone(), driver_id.clone(), sample_at(12.97, 77.59, None))
        .await
        .expect("location update should succeed");

    let result = trip::start_trip(
        data.clone(),
        driver_id,
        StartTripRequest {
            route_id,
            bus_id: None,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::DriverNotAssignedToRoute(_, _))));
}

#[tokio::test]
async fn ended_trips_carry_distance_and_speed_aggregates() {
    let data = test_state();
    let driver_id = DriverId("driver-1".to_string());
    let route_id = seed_route(&data, None, None, None).await;

    let base = Utc::now();
    let fixes = [
        (0.0, 0.0, 0.0, base),
        (0.0, 0.001, 40.0, base + Duration::minutes(10)),
        (0.0, 0.002, 42.0, base + Duration::minutes(20)),
    ];

    location::update_driver_location(
        data.clone(),
        driver_id.clone(),
        UpdateDriverLocationRequest {
            pt: point(fixes[0].0, fixes[0].1),
            ts: Some(TimeStamp(fixes[0].3)),
            speed: Some(SpeedInKmPerHour(fixes[0].2)),
            heading: None,
            acc: None,
        },
    )
    .await
    .expect("location update should succeed");

    let trip = trip::start_trip(
        data.clone(),
        driver_id.clone(),
        StartTripRequest {
            route_id,
            bus_id: None,
        },
    )
    .await
    .expect("trip start should succeed");

    for (lat, lon, speed, ts) in &fixes[1..] {
        location::update_driver_location(
            data.clone(),
            driver_id.clone(),
            UpdateDriverLocationRequest {
                pt: point(*lat, *lon),
                ts: Some(TimeStamp(*ts)),
                speed: Some(SpeedInKmPerHour(*speed)),
                heading: None,
                acc: None,
            },
        )
        .await
        .expect("location update should succeed");
    }

    let ended = trip::end_trip(data.clone(), driver_id, trip.trip_id)
        .await
        .expect("trip end should succeed");

    assert_eq!(ended.location_points.len(), 3);
    // Two 0.001 degree hops along the equator, ~111.2m each.
    assert!((ended.distance_meters - 222.4).abs() < 1.0);
    // Mean of the positive reported speeds [40, 42].
    assert_eq!(ended.avg_speed, Some(SpeedInKmPerHour(41.0)));
    assert_eq!(ended.max_speed, Some(SpeedInKmPerHour(42.0)));
    assert_eq!(ended.end_location, Some(point(0.0, 0.002)));
}

#[tokio::test]
async fn overspeeding_on_a_trip_emits_an_alert() {
    let data = test_state();
    let driver_id = DriverId("driver-1".to_string());
    let route_id = seed_route(&data, Some(50.0), None, None).await;
    let mut events = data.publisher.subscribe();

    location::update_driver_location(data.clone(), driver_id.clone(), sample_at(12.97, 77.59, Some(30.0)))
        .await
        .expect("location update should succeed");
    trip::start_trip(
        data.clone(),
        driver_id.clone(),
        StartTripRequest {
            route_id,
            bus_id: None,
        },
    )
    .await
    .expect("trip start should succeed");

    // Within limit, no alert.
    location::update_driver_location(data.clone(), driver_id.clone(), sample_at(12.971, 77.59, Some(45.0)))
        .await
        .expect("location update should succeed");
    // Over the limit but inside the 1.2x buffer.
    location::update_driver_location(data.clone(), driver_id.clone(), sample_at(12.972, 77.59, Some(55.0)))
        .await
        .expect("location update should succeed");
    // Past the buffer.
    location::update_driver_location(data.clone(), driver_id.clone(), sample_at(12.973, 77.59, Some(61.0)))
        .await
        .expect("location update should succeed");

    let alerts = alert::list_alerts(
        data.clone(),
        AlertListQuery {
            alert_type: Some(AlertType::Overspeed),
            ..Default::default()
        },
    )
    .await
    .expect("alert listing should succeed");

    assert_eq!(alerts.len(), 2);
    // Newest first.
    assert_eq!(alerts[0].severity, Severity::High);
    assert_eq!(alerts[1].severity, Severity::Medium);
    assert_eq!(
        alerts[1].message,
        "Driver exceeded speed limit: 55.0 km/h (limit: 50.0 km/h)"
    );

    let mut alert_events = 0;
    while let Ok(event) = events.try_recv() {
        if event.topic == Topic::AlertNew {
            alert_events += 1;
        }
    }
    assert_eq!(alert_events, 2);
}

#[tokio::test]
async fn leaving_the_route_fence_emits_an_out_of_route_alert() {
    let data = test_state();
    let driver_id = DriverId("driver-1".to_string());
    let route_id = seed_route(
        &data,
        None,
        Some(Geofence::Circle(CircleBounds {
            center: [0.0, 0.0],
            radius: 500.0,
        })),
        None,
    )
    .await;

    location::update_driver_location(data.clone(), driver_id.clone(), sample_at(0.0, 0.0, None))
        .await
        .expect("location update should succeed");
    trip::start_trip(
        data.clone(),
        driver_id.clone(),
        StartTripRequest {
            route_id,
            bus_id: None,
        },
    )
    .await
    .expect("trip start should succeed");

    // ~1112m from the fence center, ~612m outside the 500m radius.
    location::update_driver_location(data.clone(), driver_id.clone(), sample_at(0.01, 0.0, None))
        .await
        .expect("location update should succeed");

    let alerts = alert::list_alerts(
        data.clone(),
        AlertListQuery {
            alert_type: Some(AlertType::OutOfRoute),
            ..Default::default()
        },
    )
    .await
    .expect("alert listing should succeed");

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Medium);
    let distance = alerts[0]
        .distance_from_route
        .expect("out of route alert should carry a distance");
    assert!((distance - 612.0).abs() < 5.0);

    let acknowledged = alert::acknowledge_alert(
        data.clone(),
        alerts[0].alert_id.clone(),
        OperatorId("operator-1".to_string()),
    )
    .await
    .expect("acknowledge should succeed");
    assert!(acknowledged.acknowledged);

    let count = alert::unacknowledged_count(data.clone())
        .await
        .expect("count should succeed");
    assert_eq!(count.count, 0);
}

#[tokio::test]
async fn bulk_ingestion_reports_bad_items_by_index() {
    let data = test_state();
    let driver_id = DriverId("driver-1".to_string());

    let base = Utc::now();
    let mut locations: Vec<UpdateDriverLocationRequest> = (0..5)
        .map(|i| UpdateDriverLocationRequest {
            pt: point(12.97 + 0.001 * i as f64, 77.59),
            ts: Some(TimeStamp(base + Duration::seconds(i))),
            speed: None,
            heading: None,
            acc: None,
        })
        .collect();
    locations[2].pt.lat = Latitude(91.0);

    let response = location::bulk_driver_location(
        data.clone(),
        driver_id.clone(),
        BulkDriverLocationRequest { locations },
    )
    .await
    .expect("bulk ingestion should succeed");

    assert_eq!(response.saved, 4);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].index, 2);
    assert_eq!(response.errors[0].error_code, "VALIDATION_FAILED");

    let stored = location::get_driver_location(data.clone(), driver_id)
        .await
        .expect("driver location should exist");
    assert_eq!(stored.history.len(), 4);
    assert_eq!(stored.latest.ts, TimeStamp(base + Duration::seconds(4)));
}

#[tokio::test]
async fn bulk_ingestion_rejects_oversized_batches() {
    let data = test_state();
    let driver_id = DriverId("driver-1".to_string());

    let locations = (0..101)
        .map(|_| sample_at(12.97, 77.59, None))
        .collect::<Vec<_>>();

    let result = location::bulk_driver_location(
        data.clone(),
        driver_id,
        BulkDriverLocationRequest { locations },
    )
    .await;

    assert!(matches!(result, Err(AppError::LargeBulkPayload(101, 100))));
}

#[tokio::test]
async fn stopping_tracking_hides_the_bus_from_the_live_view() {
    let data = test_state();
    let driver_id = DriverId("driver-1".to_string());

    location::update_driver_location(data.clone(), driver_id.clone(), sample_at(12.97, 77.59, Some(20.0)))
        .await
        .expect("location update should succeed");

    let live = location::live_buses(data.clone())
        .await
        .expect("live view should succeed");
    assert_eq!(live.len(), 1);

    location::stop_tracking(data.clone(), driver_id.clone())
        .await
        .expect("stop tracking should succeed");

    let live = location::live_buses(data.clone())
        .await
        .expect("live view should succeed");
    assert!(live.is_empty());

    // Idempotent for drivers with no samples at all.
    location::stop_tracking(data.clone(), DriverId("driver-9".to_string()))
        .await
        .expect("stop tracking on an unknown driver should succeed");
}
