/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

macro_rules! impl_getter {
    ($type:ident, $inner:ty) => {
        impl $type {
            pub fn inner(&self) -> $inner {
                self.0.to_owned()
            }
        }
    };
}

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct DriverId(pub String);
impl_getter!(DriverId, String);

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct TripId(pub String);
impl_getter!(TripId, String);

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct RouteId(pub String);
impl_getter!(RouteId, String);

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct AlertId(pub String);
impl_getter!(AlertId, String);

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct BusId(pub String);
impl_getter!(BusId, String);

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct OperatorId(pub String);
impl_getter!(OperatorId, String);

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy)]
pub struct Latitude(pub f64);
impl_getter!(Latitude, f64);

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy)]
pub struct Longitude(pub f64);
impl_getter!(Longitude, f64);

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, PartialOrd, Copy)]
pub struct SpeedInKmPerHour(pub f64);
impl_getter!(SpeedInKmPerHour, f64);

/// Compass heading of the vehicle, degrees in [0, 360).
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy)]
pub struct Direction(pub f64);
impl_getter!(Direction, f64);

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, PartialOrd, Copy)]
pub struct Accuracy(pub f64);
impl_getter!(Accuracy, f64);

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Hash, Ord)]
pub struct TimeStamp(pub DateTime<Utc>);
impl_getter!(TimeStamp, DateTime<Utc>);

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Point {
    pub lat: Latitude,
    pub lon: Longitude,
}

/// A fence vertex as authored by the route editor : [lat, lon].
pub type GeoVertex = [f64; 2];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CircleBounds {
    pub center: GeoVertex,
    /// Meters.
    pub radius: f64,
}

/// Allowed-travel region of a route. Fence evaluation is fail-open : a route
/// with no fence, or a fence kind this service does not know, never produces
/// out-of-route alerts, so a newer fence kind pushed by the route collaborator
/// degrades to "inside" instead of rejecting the route.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "coords", rename_all = "snake_case")]
pub enum Geofence {
    Polygon(Vec<GeoVertex>),
    Circle(CircleBounds),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, EnumString, Display, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub enum TripStatus {
    #[strum(serialize = "ongoing")]
    #[serde(rename = "ongoing")]
    Ongoing,
    #[strum(serialize = "completed")]
    #[serde(rename = "completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, EnumString, Display, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub enum AlertType {
    #[strum(serialize = "overspeed")]
    #[serde(rename = "overspeed")]
    Overspeed,
    #[strum(serialize = "out_of_route")]
    #[serde(rename = "out_of_route")]
    OutOfRoute,
    #[strum(serialize = "other")]
    #[serde(rename = "other")]
    Other,
}

#[derive(
    Debug, Clone, Copy, EnumString, Display, Serialize, Deserialize, Eq, Hash, PartialEq, PartialOrd, Ord,
)]
pub enum Severity {
    #[strum(serialize = "low")]
    #[serde(rename = "low")]
    Low,
    #[strum(serialize = "medium")]
    #[serde(rename = "medium")]
    Medium,
    #[strum(serialize = "high")]
    #[serde(rename = "high")]
    High,
}

/// One GPS fix reported by a driver device. Samples are append-only : a new
/// fix supersedes but never overwrites older ones, and "latest" is derived by
/// max capture timestamp per driver.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DriverLocation {
    pub driver_id: DriverId,
    pub pt: Point,
    pub speed: Option<SpeedInKmPerHour>,
    pub heading: Option<Direction>,
    pub accuracy: Option<Accuracy>,
    pub ts: TimeStamp,
    pub is_tracking: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TripPoint {
    pub pt: Point,
    pub ts: TimeStamp,
    pub speed: Option<SpeedInKmPerHour>,
    pub heading: Option<Direction>,
    pub accuracy: Option<Accuracy>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub trip_id: TripId,
    pub driver_id: DriverId,
    pub route_id: RouteId,
    pub bus_id: Option<BusId>,
    pub status: TripStatus,
    pub start_time: TimeStamp,
    pub end_time: Option<TimeStamp>,
    pub start_location: Point,
    pub end_location: Option<Point>,
    /// Populated at completion only.
    pub distance_meters: f64,
    pub avg_speed: Option<SpeedInKmPerHour>,
    pub max_speed: Option<SpeedInKmPerHour>,
    pub location_points: Vec<TripPoint>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub name: String,
    pub pt: Point,
    pub eta_order: u32,
}

/// Read-only input to the core, owned by the route-management collaborator.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub route_id: RouteId,
    pub name: String,
    pub stops: Vec<Stop>,
    pub geofence: Option<Geofence>,
    pub speed_limit: Option<SpeedInKmPerHour>,
    pub assigned_driver: Option<DriverId>,
    pub is_active: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub alert_id: AlertId,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub driver_id: DriverId,
    pub trip_id: Option<TripId>,
    pub route_id: Option<RouteId>,
    pub location: Point,
    pub speed: Option<SpeedInKmPerHour>,
    pub speed_limit: Option<SpeedInKmPerHour>,
    /// Meters, out-of-route alerts only.
    pub distance_from_route: Option<f64>,
    pub message: String,
    pub severity: Severity,
    pub acknowledged: bool,
    pub acknowledged_by: Option<OperatorId>,
    pub acknowledged_at: Option<TimeStamp>,
    pub created_at: TimeStamp,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct APISuccess {
    result: String,
}

impl Default for APISuccess {
    fn default() -> Self {
        Self {
            result: "Success".to_string(),
        }
    }
}
