/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    error_message: String,
    pub error_code: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal Error : {0}")]
    InternalError(String),
    #[error("Invalid Request : {0}")]
    InvalidRequest(String),
    #[error("Validation Failed : {0}")]
    ValidationFailed(String),
    #[error("Unprocessible Request : {0}")]
    UnprocessibleRequest(String),
    #[error("Driver already has an ongoing trip : DriverId - {0}")]
    TripAlreadyOngoing(String),
    #[error("Ongoing trip not found : TripId - {0}")]
    OngoingTripNotFound(String),
    #[error("Trip not found : TripId - {0}")]
    TripNotFound(String),
    #[error("Route not found : RouteId - {0}")]
    RouteNotFound(String),
    #[error("Alert not found : AlertId - {0}")]
    AlertNotFound(String),
    #[error("No location found for driver : DriverId - {0}")]
    DriverLocationNotFound(String),
    #[error("Driver is not assigned to route : DriverId - {0}, RouteId - {1}")]
    DriverNotAssignedToRoute(String, String),
    #[error("No location data, tracking must be started first : DriverId - {0}")]
    NoLocationForTripStart(String),
    #[error("Bulk payload of {0} samples exceeds allowed maximum of {1}")]
    LargeBulkPayload(usize, usize),
    #[error("Serialization Error : {0}")]
    SerializationError(String),
    #[error("Alert emission failed : {0}")]
    AlertEmissionFailed(String),
    #[error("Event publish failed : {0}")]
    EventPublishFailed(String),
}

impl AppError {
    fn error_message(&self) -> ErrorBody {
        ErrorBody {
            error_message: self.message(),
            error_code: self.code(),
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn code(&self) -> String {
        match self {
            AppError::InternalError(_) => "INTERNAL_ERROR",
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::ValidationFailed(_) => "VALIDATION_FAILED",
            AppError::UnprocessibleRequest(_) => "UNPROCESSIBLE_REQUEST",
            AppError::TripAlreadyOngoing(_) => "TRIP_ALREADY_ONGOING",
            AppError::OngoingTripNotFound(_) => "ONGOING_TRIP_NOT_FOUND",
            AppError::TripNotFound(_) => "TRIP_NOT_FOUND",
            AppError::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            AppError::AlertNotFound(_) => "ALERT_NOT_FOUND",
            AppError::DriverLocationNotFound(_) => "DRIVER_LOCATION_NOT_FOUND",
            AppError::DriverNotAssignedToRoute(_, _) => "DRIVER_NOT_ASSIGNED_TO_ROUTE",
            AppError::NoLocationForTripStart(_) => "NO_LOCATION_FOR_TRIP_START",
            AppError::LargeBulkPayload(_, _) => "LARGE_BULK_PAYLOAD",
            AppError::SerializationError(_) => "SERIALIZATION_ERROR",
            AppError::AlertEmissionFailed(_) => "ALERT_EMISSION_FAILED",
            AppError::EventPublishFailed(_) => "EVENT_PUBLISH_FAILED",
        }
        .to_string()
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(self.error_message())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::UnprocessibleRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::TripAlreadyOngoing(_) => StatusCode::CONFLICT,
            AppError::OngoingTripNotFound(_) => StatusCode::NOT_FOUND,
            AppError::TripNotFound(_) => StatusCode::NOT_FOUND,
            AppError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlertNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DriverLocationNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DriverNotAssignedToRoute(_, _) => StatusCode::FORBIDDEN,
            AppError::NoLocationForTripStart(_) => StatusCode::PRECONDITION_FAILED,
            AppError::LargeBulkPayload(_, _) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::AlertEmissionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::EventPublishFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
