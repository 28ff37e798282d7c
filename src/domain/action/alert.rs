/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::*;
use crate::domain::types::alert::{AlertListQuery, UnacknowledgedCountResponse};
use crate::environment::AppState;
use crate::storage::AlertFilter;
use crate::tools::error::AppError;
use actix_web::web::Data;
use chrono::Utc;
use tracing::info;

const DEFAULT_ALERT_LIST_LIMIT: usize = 50;

pub async fn list_alerts(
    data: Data<AppState>,
    query: AlertListQuery,
) -> Result<Vec<Alert>, AppError> {
    let filter = AlertFilter {
        driver_id: query.driver_id.map(DriverId),
        alert_type: query.alert_type,
        severity: query.severity,
        acknowledged: query.acknowledged,
    };
    data.alerts
        .list(&filter, query.limit.unwrap_or(DEFAULT_ALERT_LIST_LIMIT))
        .await
}

/// Marks the alert as handled by an operator. Re-acknowledging records the
/// latest operator and timestamp.
pub async fn acknowledge_alert(
    data: Data<AppState>,
    alert_id: AlertId,
    acknowledged_by: OperatorId,
) -> Result<Alert, AppError> {
    let alert = data
        .alerts
        .acknowledge(&alert_id, acknowledged_by, TimeStamp(Utc::now()))
        .await?
        .ok_or_else(|| AppError::AlertNotFound(alert_id.inner()))?;

    info!(tag = "[Alert Acknowledged]", alert_id = %alert.alert_id.inner());
    Ok(alert)
}

pub async fn unacknowledged_count(
    data: Data<AppState>,
) -> Result<UnacknowledgedCountResponse, AppError> {
    let count = data.alerts.unacknowledged_count().await?;
    Ok(UnacknowledgedCountResponse { count })
}
