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
    domain::{action::location, types::location::*},
    environment::AppState,
    tools::error::AppError,
};

#[post("/driver/{driverId}/location")]
async fn update_driver_location(
    data: Data<AppState>,
    param_obj: Json<UpdateDriverLocationRequest>,
    path: Path<String>,
) -> Result<Json<APISuccess>, AppError> {
    let request_body = param_obj.into_inner();
    let driver_id = DriverId(path.into_inner());

    Ok(Json(
        location::update_driver_location(data, driver_id, request_body).await?,
    ))
}

#[post("/driver/{driverId}/location/bulk")]
async fn bulk_driver_location(
    data: Data<AppState>,
    param_obj: Json<BulkDriverLocationRequest>,
    path: Path<String>,
) -> Result<Json<BulkDriverLocationResponse>, AppError> {
    let request_body = param_obj.into_inner();
    let driver_id = DriverId(path.into_inner());

    Ok(Json(
        location::bulk_driver_location(data, driver_id, request_body).await?,
    ))
}

#[post("/driver/{driverId}/location/stop")]
async fn stop_tracking(
    data: Data<AppState>,
    path: Path<String>,
) -> Result<Json<APISuccess>, AppError> {
    let driver_id = DriverId(path.into_inner());

    Ok(Json(location::stop_tracking(data, driver_id).await?))
}

#[get("/driver/{driverId}/location")]
async fn get_driver_location(
    data: Data<AppState>,
    path: Path<String>,
) -> Result<Json<DriverLocationResponse>, AppError> {
    let driver_id = DriverId(path.into_inner());

    Ok(Json(location::get_driver_location(data, driver_id).await?))
}

#[get("/buses/live")]
async fn get_live_buses(data: Data<AppState>) -> Result<Json<Vec<LiveBus>>, AppError> {
    Ok(Json(location::live_buses(data).await?))
}
