/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::{
    get, post,
    web::{Data, Json, Path},
};

use crate::{
    common::types::*,
    domain::{action::trip, types::trip::StartTripRequest},
    environment::AppState,
    tools::error::AppError,
};

#[post("/driver/{driverId}/trip/start")]
async fn start_trip(
    data: Data<AppState>,
    param_obj: Json<StartTripRequest>,
    path: Path<String>,
) -> Result<Json<Trip>, AppError> {
    let request_body = param_obj.into_inner();
    let driver_id = DriverId(path.into_inner());

    Ok(Json(trip::start_trip(data, driver_id, request_body).await?))
}

#[post("/driver/{driverId}/trip/{tripId}/end")]
async fn end_trip(
    data: Data<AppState>,
    path: Path<(String, String)>,
) -> Result<Json<Trip>, AppError> {
    let (driver_id, trip_id) = path.into_inner();

    Ok(Json(
        trip::end_trip(data, DriverId(driver_id), TripId(trip_id)).await?,
    ))
}

#[get("/driver/{driverId}/trip/ongoing")]
async fn get_ongoing_trip(
    data: Data<AppState>,
    path: Path<String>,
) -> Result<Json<Trip>, AppError> {
    let driver_id = DriverId(path.into_inner());

    Ok(Json(trip::get_ongoing_trip(data, driver_id).await?))
}

#[get("/driver/{driverId}/trips")]
async fn get_recent_trips(
    data: Data<AppState>,
    path: Path<String>,
) -> Result<Json<Vec<Trip>>, AppError> {
    let driver_id = DriverId(path.into_inner());

    Ok(Json(trip::recent_trips(data, driver_id).await?))
}
