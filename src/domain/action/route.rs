/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::*;
use crate::domain::types::route::UpsertRouteRequest;
use crate::environment::AppState;
use crate::tools::error::AppError;
use actix_web::web::Data;
use tracing::info;
use uuid::Uuid;

/// Accepts a route definition from the route-management collaborator.
/// Routes arrive whole; an upsert replaces any previous definition under the
/// same id.
pub async fn upsert_route(
    data: Data<AppState>,
    request: UpsertRouteRequest,
) -> Result<Route, AppError> {
    let route = Route {
        route_id: request
            .route_id
            .unwrap_or_else(|| RouteId(Uuid::new_v4().to_string())),
        name: request.name,
        stops: request.stops,
        geofence: request.geofence,
        speed_limit: request.speed_limit,
        assigned_driver: request.assigned_driver,
        is_active: true,
    };

    let route = data.routes.upsert(route).await?;
    info!(tag = "[Route Upserted]", route_id = %route.route_id.inner());
    Ok(route)
}

pub async fn get_route(data: Data<AppState>, route_id: RouteId) -> Result<Route, AppError> {
    data.routes
        .find(&route_id)
        .await?
        .ok_or_else(|| AppError::RouteNotFound(route_id.inner()))
}
