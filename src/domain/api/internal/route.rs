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
    domain::{action::route, types::route::UpsertRouteRequest},
    environment::AppState,
    tools::error::AppError,
};

#[post("/internal/route")]
async fn upsert_route(
    data: Data<AppState>,
    param_obj: Json<UpsertRouteRequest>,
) -> Result<Json<Route>, AppError> {
    let request_body = param_obj.into_inner();

    Ok(Json(route::upsert_route(data, request_body).await?))
}

#[get("/internal/route/{routeId}")]
async fn get_route(data: Data<AppState>, path: Path<String>) -> Result<Json<Route>, AppError> {
    let route_id = RouteId(path.into_inner());

    Ok(Json(route::get_route(data, route_id).await?))
}
