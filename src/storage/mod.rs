/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::*;
use crate::tools::error::AppError;
use async_trait::async_trait;

pub mod memory;

pub use memory::InMemoryStore;

/// Append-only driver sample history. "Latest" is always derived by max
/// capture timestamp per driver, never by a materialized current-position row.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn append(&self, sample: DriverLocation) -> Result<DriverLocation, AppError>;
    async fn latest_for_driver(
        &self,
        driver_id: &DriverId,
    ) -> Result<Option<DriverLocation>, AppError>;
    /// Newest first, at most `limit` samples.
    async fn history_for_driver(
        &self,
        driver_id: &DriverId,
        limit: usize,
    ) -> Result<Vec<DriverLocation>, AppError>;
    async fn latest_per_driver(&self) -> Result<Vec<DriverLocation>, AppError>;
    /// Flips the tracking flag on the driver's most recent sample. Returns
    /// None (not an error) when the driver has no samples yet.
    async fn set_tracking(
        &self,
        driver_id: &DriverId,
        is_tracking: bool,
    ) -> Result<Option<DriverLocation>, AppError>;
}

#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Stores a new ongoing trip, enforcing at most one ongoing trip per
    /// driver. Fails with `TripAlreadyOngoing` when the guard trips, even for
    /// two concurrent start requests.
    async fn create_ongoing(&self, trip: Trip) -> Result<Trip, AppError>;
    async fn find(&self, trip_id: &TripId) -> Result<Option<Trip>, AppError>;
    async fn ongoing_for_driver(&self, driver_id: &DriverId) -> Result<Option<Trip>, AppError>;
    /// Appends a point to the trail. Returns the updated trip, or None when
    /// the trip is missing, not ongoing, or owned by a different driver :
    /// best-effort by design, point ingestion must not fail the caller.
    async fn append_point(
        &self,
        trip_id: &TripId,
        driver_id: &DriverId,
        point: TripPoint,
    ) -> Result<Option<Trip>, AppError>;
    /// Replaces the stored trip with its completed form and releases the
    /// ongoing-trip guard for the driver.
    async fn complete(&self, trip: Trip) -> Result<Trip, AppError>;
    /// Newest start time first, at most `limit` trips.
    async fn recent_for_driver(
        &self,
        driver_id: &DriverId,
        limit: usize,
    ) -> Result<Vec<Trip>, AppError>;
}

#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn upsert(&self, route: Route) -> Result<Route, AppError>;
    async fn find(&self, route_id: &RouteId) -> Result<Option<Route>, AppError>;
}

#[derive(Debug, Default, Clone)]
pub struct AlertFilter {
    pub driver_id: Option<DriverId>,
    pub alert_type: Option<AlertType>,
    pub severity: Option<Severity>,
    pub acknowledged: Option<bool>,
}

#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn create(&self, alert: Alert) -> Result<Alert, AppError>;
    /// Newest first, at most `limit` alerts.
    async fn list(&self, filter: &AlertFilter, limit: usize) -> Result<Vec<Alert>, AppError>;
    async fn acknowledge(
        &self,
        alert_id: &AlertId,
        by: OperatorId,
        at: TimeStamp,
    ) -> Result<Option<Alert>, AppError>;
    async fn unacknowledged_count(&self) -> Result<u64, AppError>;
}
