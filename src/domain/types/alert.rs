/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlertListQuery {
    pub driver_id: Option<String>,
    #[serde(rename = "type")]
    pub alert_type: Option<AlertType>,
    pub severity: Option<Severity>,
    pub acknowledged: Option<bool>,
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeAlertRequest {
    pub acknowledged_by: OperatorId,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UnacknowledgedCountResponse {
    pub count: u64,
}
