/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::detection::{DetectionContext, DetectionHandler, DetectionResult};
use crate::common::types::*;

pub struct OverspeedingHandler {
    default_speed_limit: SpeedInKmPerHour,
}

impl OverspeedingHandler {
    pub fn new(default_speed_limit: SpeedInKmPerHour) -> Self {
        Self {
            default_speed_limit,
        }
    }

    /// Route speed limit when the route carries one, global default otherwise.
    fn effective_limit(&self, context: &DetectionContext) -> f64 {
        context
            .route
            .as_ref()
            .and_then(|route| route.speed_limit)
            .unwrap_or(self.default_speed_limit)
            .inner()
    }
}

impl DetectionHandler for OverspeedingHandler {
    fn name(&self) -> &'static str {
        "overspeeding"
    }

    fn is_enabled(&self, context: &DetectionContext) -> bool {
        // A missing or zero speed carries no overspeed signal.
        matches!(context.speed, Some(SpeedInKmPerHour(speed)) if speed > 0.0)
    }

    fn check(&self, context: &DetectionContext) -> Option<DetectionResult> {
        let SpeedInKmPerHour(speed) = context.speed?;
        let speed_limit = self.effective_limit(context);

        if speed > 0.0 && speed > speed_limit {
            return Some(DetectionResult::OverspeedingDetected {
                location: context.location.clone(),
                timestamp: context.timestamp,
                speed,
                speed_limit,
            });
        }
        None
    }
}
