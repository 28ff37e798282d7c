/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UpdateDriverLocationRequest {
    pub pt: Point,
    /// Capture timestamp. Defaults to arrival time when the device omits it.
    pub ts: Option<TimeStamp>,
    pub speed: Option<SpeedInKmPerHour>,
    pub heading: Option<Direction>,
    pub acc: Option<Accuracy>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BulkDriverLocationRequest {
    pub locations: Vec<UpdateDriverLocationRequest>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BulkLocationError {
    pub index: usize,
    pub error_code: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BulkDriverLocationResponse {
    pub saved: usize,
    pub errors: Vec<BulkLocationError>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DriverLocationResponse {
    pub latest: DriverLocation,
    pub history: Vec<DriverLocation>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StopEta {
    pub stop_name: String,
    pub pt: Point,
    /// Meters, rounded to the nearest whole meter.
    pub distance: f64,
    /// Linear estimate from the current speed; None while stationary.
    pub eta_minutes: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LiveBus {
    pub driver_id: DriverId,
    pub bus_id: Option<BusId>,
    pub route_id: Option<RouteId>,
    pub route_name: Option<String>,
    pub pt: Point,
    pub speed: Option<SpeedInKmPerHour>,
    pub heading: Option<Direction>,
    pub ts: TimeStamp,
    pub eta_to_stops: Vec<StopEta>,
}
