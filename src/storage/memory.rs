/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use super::{AlertFilter, AlertRepository, LocationRepository, RouteRepository, TripRepository};
use crate::common::types::*;
use crate::tools::error::AppError;
use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct TripsInner {
    by_id: FxHashMap<TripId, Trip>,
    // {driver, status=ongoing} uniqueness guard. Mutated only while holding
    // the write lock together with by_id, so check-then-insert is atomic.
    ongoing_by_driver: FxHashMap<DriverId, TripId>,
}

/// In-process durable store. Each collection has its own lock; drivers write
/// independently and need no cross-driver coordination.
#[derive(Default)]
pub struct InMemoryStore {
    locations: RwLock<FxHashMap<DriverId, Vec<DriverLocation>>>,
    trips: RwLock<TripsInner>,
    routes: RwLock<FxHashMap<RouteId, Route>>,
    alerts: RwLock<Vec<Alert>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn latest_of(samples: &[DriverLocation]) -> Option<&DriverLocation> {
    samples.iter().max_by_key(|sample| sample.ts)
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn append(&self, sample: DriverLocation) -> Result<DriverLocation, AppError> {
        let mut locations = self.locations.write().await;
        locations
            .entry(sample.driver_id.clone())
            .or_default()
            .push(sample.clone());
        Ok(sample)
    }

    async fn latest_for_driver(
        &self,
        driver_id: &DriverId,
    ) -> Result<Option<DriverLocation>, AppError> {
        let locations = self.locations.read().await;
        Ok(locations
            .get(driver_id)
            .and_then(|samples| latest_of(samples))
            .cloned())
    }

    async fn history_for_driver(
        &self,
        driver_id: &DriverId,
        limit: usize,
    ) -> Result<Vec<DriverLocation>, AppError> {
        let locations = self.locations.read().await;
        let mut history = locations.get(driver_id).cloned().unwrap_or_default();
        history.sort_by(|a, b| b.ts.cmp(&a.ts));
        history.truncate(limit);
        Ok(history)
    }

    async fn latest_per_driver(&self) -> Result<Vec<DriverLocation>, AppError> {
        let locations = self.locations.read().await;
        Ok(locations
            .values()
            .filter_map(|samples| latest_of(samples))
            .cloned()
            .collect())
    }

    async fn set_tracking(
        &self,
        driver_id: &DriverId,
        is_tracking: bool,
    ) -> Result<Option<DriverLocation>, AppError> {
        let mut locations = self.locations.write().await;
        let Some(samples) = locations.get_mut(driver_id) else {
            return Ok(None);
        };
        let Some(latest) = samples.iter_mut().max_by_key(|sample| sample.ts) else {
            return Ok(None);
        };
        latest.is_tracking = is_tracking;
        Ok(Some(latest.clone()))
    }
}

#[async_trait]
impl TripRepository for InMemoryStore {
    async fn create_ongoing(&self, trip: Trip) -> Result<Trip, AppError> {
        let mut trips = self.trips.write().await;
        if trips.ongoing_by_driver.contains_key(&trip.driver_id) {
            return Err(AppError::TripAlreadyOngoing(trip.driver_id.inner()));
        }
        trips
            .ongoing_by_driver
            .insert(trip.driver_id.clone(), trip.trip_id.clone());
        trips.by_id.insert(trip.trip_id.clone(), trip.clone());
        Ok(trip)
    }

    async fn find(&self, trip_id: &TripId) -> Result<Option<Trip>, AppError> {
        let trips = self.trips.read().await;
        Ok(trips.by_id.get(trip_id).cloned())
    }

    async fn ongoing_for_driver(&self, driver_id: &DriverId) -> Result<Option<Trip>, AppError> {
        let trips = self.trips.read().await;
        Ok(trips
            .ongoing_by_driver
            .get(driver_id)
            .and_then(|trip_id| trips.by_id.get(trip_id))
            .cloned())
    }

    async fn append_point(
        &self,
        trip_id: &TripId,
        driver_id: &DriverId,
        point: TripPoint,
    ) -> Result<Option<Trip>, AppError> {
        let mut trips = self.trips.write().await;
        let Some(trip) = trips.by_id.get_mut(trip_id) else {
            return Ok(None);
        };
        if trip.status != TripStatus::Ongoing || trip.driver_id != *driver_id {
            return Ok(None);
        }
        trip.location_points.push(point);
        Ok(Some(trip.clone()))
    }

    async fn complete(&self, trip: Trip) -> Result<Trip, AppError> {
        let mut trips = self.trips.write().await;
        trips.ongoing_by_driver.remove(&trip.driver_id);
        trips.by_id.insert(trip.trip_id.clone(), trip.clone());
        Ok(trip)
    }

    async fn recent_for_driver(
        &self,
        driver_id: &DriverId,
        limit: usize,
    ) -> Result<Vec<Trip>, AppError> {
        let trips = self.trips.read().await;
        let mut recent: Vec<Trip> = trips
            .by_id
            .values()
            .filter(|trip| trip.driver_id == *driver_id)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        recent.truncate(limit);
        Ok(recent)
    }
}

#[async_trait]
impl RouteRepository for InMemoryStore {
    async fn upsert(&self, route: Route) -> Result<Route, AppError> {
        let mut routes = self.routes.write().await;
        routes.insert(route.route_id.clone(), route.clone());
        Ok(route)
    }

    async fn find(&self, route_id: &RouteId) -> Result<Option<Route>, AppError> {
        let routes = self.routes.read().await;
        Ok(routes.get(route_id).cloned())
    }
}

#[async_trait]
impl AlertRepository for InMemoryStore {
    async fn create(&self, alert: Alert) -> Result<Alert, AppError> {
        let mut alerts = self.alerts.write().await;
        alerts.push(alert.clone());
        Ok(alert)
    }

    async fn list(&self, filter: &AlertFilter, limit: usize) -> Result<Vec<Alert>, AppError> {
        let alerts = self.alerts.read().await;
        let mut matched: Vec<Alert> = alerts
            .iter()
            .filter(|alert| {
                filter
                    .driver_id
                    .as_ref()
                    .map_or(true, |driver_id| alert.driver_id == *driver_id)
                    && filter
                        .alert_type
                        .map_or(true, |alert_type| alert.alert_type == alert_type)
                    && filter
                        .severity
                        .map_or(true, |severity| alert.severity == severity)
                    && filter
                        .acknowledged
                        .map_or(true, |acknowledged| alert.acknowledged == acknowledged)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(limit);
        Ok(matched)
    }

    async fn acknowledge(
        &self,
        alert_id: &AlertId,
        by: OperatorId,
        at: TimeStamp,
    ) -> Result<Option<Alert>, AppError> {
        let mut alerts = self.alerts.write().await;
        let Some(alert) = alerts.iter_mut().find(|alert| alert.alert_id == *alert_id) else {
            return Ok(None);
        };
        alert.acknowledged = true;
        alert.acknowledged_by = Some(by);
        alert.acknowledged_at = Some(at);
        Ok(Some(alert.clone()))
    }

    async fn unacknowledged_count(&self) -> Result<u64, AppError> {
        let alerts = self.alerts.read().await;
        Ok(alerts.iter().filter(|alert| !alert.acknowledged).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample(driver_id: &str, lon: f64, ts: TimeStamp) -> DriverLocation {
        DriverLocation {
            driver_id: DriverId(driver_id.to_string()),
            pt: Point {
                lat: Latitude(12.97),
                lon: Longitude(lon),
            },
            speed: None,
            heading: None,
            accuracy: None,
            ts,
            is_tracking: true,
        }
    }

    fn ongoing_trip(trip_id: &str, driver_id: &str) -> Trip {
        Trip {
            trip_id: TripId(trip_id.to_string()),
            driver_id: DriverId(driver_id.to_string()),
            route_id: RouteId("route-1".to_string()),
            bus_id: None,
            status: TripStatus::Ongoing,
            start_time: TimeStamp(Utc::now()),
            end_time: None,
            start_location: Point {
                lat: Latitude(12.97),
                lon: Longitude(77.59),
            },
            end_location: None,
            distance_meters: 0.0,
            avg_speed: None,
            max_speed: None,
            location_points: vec![],
        }
    }

    #[tokio::test]
    async fn latest_is_derived_by_max_timestamp_not_insert_order() {
        let store = InMemoryStore::new();
        let now = Utc::now();

        store
            .append(sample("d1", 77.60, TimeStamp(now)))
            .await
            .unwrap();
        // Late-arriving older sample, e.g. replayed from an offline queue.
        store
            .append(sample("d1", 77.59, TimeStamp(now - Duration::minutes(5))))
            .await
            .unwrap();

        let latest = store
            .latest_for_driver(&DriverId("d1".to_string()))
            .await
            .unwrap()
            .expect("driver has samples");
        assert_eq!(latest.pt.lon, Longitude(77.60));
    }

    #[tokio::test]
    async fn second_ongoing_trip_for_same_driver_is_rejected() {
        let store = InMemoryStore::new();

        store.create_ongoing(ongoing_trip("t1", "d1")).await.unwrap();
        let err = store
            .create_ongoing(ongoing_trip("t2", "d1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TripAlreadyOngoing(_)));

        // A different driver is unaffected.
        store.create_ongoing(ongoing_trip("t3", "d2")).await.unwrap();
    }

    #[tokio::test]
    async fn completing_a_trip_releases_the_ongoing_guard() {
        let store = InMemoryStore::new();
        let mut trip = store.create_ongoing(ongoing_trip("t1", "d1")).await.unwrap();

        trip.status = TripStatus::Completed;
        store.complete(trip).await.unwrap();

        assert!(store
            .ongoing_for_driver(&DriverId("d1".to_string()))
            .await
            .unwrap()
            .is_none());
        store.create_ongoing(ongoing_trip("t2", "d1")).await.unwrap();
    }

    #[tokio::test]
    async fn append_point_noops_for_foreign_or_completed_trips() {
        let store = InMemoryStore::new();
        let trip = store.create_ongoing(ongoing_trip("t1", "d1")).await.unwrap();

        let point = TripPoint {
            pt: Point {
                lat: Latitude(12.97),
                lon: Longitude(77.59),
            },
            ts: TimeStamp(Utc::now()),
            speed: None,
            heading: None,
            accuracy: None,
        };

        // Wrong driver.
        assert!(store
            .append_point(&trip.trip_id, &DriverId("d2".to_string()), point.clone())
            .await
            .unwrap()
            .is_none());

        // Missing trip.
        assert!(store
            .append_point(&TripId("nope".to_string()), &trip.driver_id, point.clone())
            .await
            .unwrap()
            .is_none());

        // Right trip and driver.
        let updated = store
            .append_point(&trip.trip_id, &trip.driver_id, point.clone())
            .await
            .unwrap()
            .expect("append should succeed");
        assert_eq!(updated.location_points.len(), 1);

        // Completed trip.
        let mut done = updated;
        done.status = TripStatus::Completed;
        store.complete(done).await.unwrap();
        assert!(store
            .append_point(&trip.trip_id, &trip.driver_id, point)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn stop_tracking_flips_only_the_latest_sample() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store
            .append(sample("d1", 77.59, TimeStamp(now - Duration::minutes(1))))
            .await
            .unwrap();
        store
            .append(sample("d1", 77.60, TimeStamp(now)))
            .await
            .unwrap();

        let updated = store
            .set_tracking(&DriverId("d1".to_string()), false)
            .await
            .unwrap()
            .expect("driver has samples");
        assert!(!updated.is_tracking);
        assert_eq!(updated.pt.lon, Longitude(77.60));

        // Unknown driver is a quiet no-op.
        assert!(store
            .set_tracking(&DriverId("ghost".to_string()), false)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn alert_filters_and_acknowledgement() {
        let store = InMemoryStore::new();
        let now = Utc::now();

        let alert = Alert {
            alert_id: AlertId("a1".to_string()),
            alert_type: AlertType::Overspeed,
            driver_id: DriverId("d1".to_string()),
            trip_id: None,
            route_id: None,
            location: Point {
                lat: Latitude(12.97),
                lon: Longitude(77.59),
            },
            speed: Some(SpeedInKmPerHour(70.0)),
            speed_limit: Some(SpeedInKmPerHour(50.0)),
            distance_from_route: None,
            message: "Driver exceeded speed limit: 70.0 km/h (limit: 50.0 km/h)".to_string(),
            severity: Severity::High,
            acknowledged: false,
            acknowledged_by: None,
            acknowledged_at: None,
            created_at: TimeStamp(now),
        };
        store.create(alert).await.unwrap();

        assert_eq!(store.unacknowledged_count().await.unwrap(), 1);

        let filter = AlertFilter {
            alert_type: Some(AlertType::OutOfRoute),
            ..Default::default()
        };
        assert!(store.list(&filter, 50).await.unwrap().is_empty());

        store
            .acknowledge(
                &AlertId("a1".to_string()),
                OperatorId("ops-1".to_string()),
                TimeStamp(now),
            )
            .await
            .unwrap()
            .expect("alert exists");
        assert_eq!(store.unacknowledged_count().await.unwrap(), 0);
    }
}
