/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, EnumString, Display, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub enum Topic {
    #[strum(serialize = "location:update")]
    #[serde(rename = "location:update")]
    LocationUpdate,
    #[strum(serialize = "trip:update")]
    #[serde(rename = "trip:update")]
    TripUpdate,
    #[strum(serialize = "alert:new")]
    #[serde(rename = "alert:new")]
    AlertNew,
}

#[derive(Debug, Clone, Copy, EnumString, Display, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub enum TripEventType {
    #[strum(serialize = "started")]
    #[serde(rename = "started")]
    Started,
    #[strum(serialize = "ended")]
    #[serde(rename = "ended")]
    Ended,
    #[strum(serialize = "location")]
    #[serde(rename = "location")]
    Location,
}

/// One event fanned out to connected observers. Delivery is at-least-once
/// and fire-and-forget, no acknowledgement is expected from subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub topic: Topic,
    pub payload: Value,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TripStartedPayload {
    pub event: TripEventType,
    pub trip: Trip,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TripEndedPayload {
    pub event: TripEventType,
    pub trip: Trip,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TripLocationPayload {
    pub event: TripEventType,
    pub trip_id: TripId,
    pub driver_id: DriverId,
    pub location: TripPoint,
}
