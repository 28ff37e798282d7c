/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use super::types::{Event, Topic};
use crate::tools::error::AppError;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, error};

/// Fan-out of alert/trip/location events to connected observers.
///
/// Injected explicitly wherever events are emitted. Publication must never
/// block or fail ingestion : a slow, lagging or absent subscriber is the
/// subscriber's problem, not the caller's.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, topic: Topic, payload: Value);
}

/// In-process publisher over a `tokio::sync::broadcast` channel. Lagging
/// receivers are skipped by the channel rather than waited on.
pub struct BroadcastEventPublisher {
    tx: broadcast::Sender<Event>,
}

impl BroadcastEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl EventPublisher for BroadcastEventPublisher {
    fn publish(&self, topic: Topic, payload: Value) {
        // SendError here only means nobody is subscribed right now.
        if self.tx.send(Event { topic, payload }).is_err() {
            debug!(topic = %topic, "No subscribers connected, event dropped");
        }
    }
}

/// Serializes and publishes, logging and swallowing serialization failures so
/// event emission can never surface into the ingestion request path.
pub fn publish_event<T: Serialize>(publisher: &dyn EventPublisher, topic: Topic, payload: &T) {
    match serde_json::to_value(payload)
        .map_err(|err| AppError::SerializationError(err.to_string()))
    {
        Ok(payload) => publisher.publish(topic, payload),
        Err(err) => error!(tag = "[Event Publish Failed]", topic = %topic, error = %err.message()),
    }
}
