/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::{
    get, post,
    web::{Data, Json, Path, Query},
};

use crate::{
    common::types::*,
    domain::{
        action::alert,
        types::alert::{AcknowledgeAlertRequest, AlertListQuery, UnacknowledgedCountResponse},
    },
    environment::AppState,
    tools::error::AppError,
};

#[get("/internal/alerts")]
async fn list_alerts(
    data: Data<AppState>,
    query: Query<AlertListQuery>,
) -> Result<Json<Vec<Alert>>, AppError> {
    Ok(Json(alert::list_alerts(data, query.into_inner()).await?))
}

#[post("/internal/alert/{alertId}/acknowledge")]
async fn acknowledge_alert(
    data: Data<AppState>,
    param_obj: Json<AcknowledgeAlertRequest>,
    path: Path<String>,
) -> Result<Json<Alert>, AppError> {
    let request_body = param_obj.into_inner();
    let alert_id = AlertId(path.into_inner());

    Ok(Json(
        alert::acknowledge_alert(data, alert_id, request_body.acknowledged_by).await?,
    ))
}

#[get("/internal/alerts/unacknowledged/count")]
async fn unacknowledged_count(
    data: Data<AppState>,
) -> Result<Json<UnacknowledgedCountResponse>, AppError> {
    Ok(Json(alert::unacknowledged_count(data).await?))
}
