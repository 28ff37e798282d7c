/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::{
    get,
    web::{Data, Json},
};
use serde::{Deserialize, Serialize};

use crate::{environment::AppState, tools::error::AppError};

#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseData {
    pub result: String,
}

#[get("/healthcheck")]
async fn health_check(data: Data<AppState>) -> Result<Json<ResponseData>, AppError> {
    // The store backs every endpoint; a failing read here means the service
    // cannot do useful work.
    data.locations
        .latest_per_driver()
        .await
        .map_err(|err| AppError::InternalError(format!("Health check failed : {}", err.message())))?;

    Ok(Json(ResponseData {
        result: "Service Is Up".to_string(),
    }))
}
