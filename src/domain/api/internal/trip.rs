/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::{
    get,
    web::{Data, Json, Path},
};

use crate::{
    common::types::*, domain::action::trip, environment::AppState, tools::error::AppError,
};

#[get("/internal/trip/{tripId}")]
async fn trip_details(data: Data<AppState>, path: Path<String>) -> Result<Json<Trip>, AppError> {
    let trip_id = TripId(path.into_inner());

    Ok(Json(trip::get_trip(data, trip_id).await?))
}

#[get("/internal/trip/{tripId}/locations")]
async fn trip_locations(
    data: Data<AppState>,
    path: Path<String>,
) -> Result<Json<Vec<TripPoint>>, AppError> {
    let trip_id = TripId(path.into_inner());

    Ok(Json(trip::trip_locations(data, trip_id).await?))
}
