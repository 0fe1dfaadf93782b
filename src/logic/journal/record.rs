use serde::{Deserialize, Serialize};

use crate::logic::events::Event;
use crate::logic::labeling::Label;

/// One classified event, as written to the prediction file and the journal.
///
/// Field names follow the sanitized table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub eventid: String,
    pub src_ip: String,
    pub src_port: Option<u16>,
    pub dst_ip: String,
    pub dst_port: Option<u16>,
    pub session: String,
    pub protocol: String,
    pub message: String,
    pub sensor: String,
    pub timestamp: String,
    pub attack: bool,
}

impl PredictionRecord {
    pub fn new(event: &Event, label: Label) -> Self {
        Self {
            eventid: event.event_id.clone(),
            src_ip: event.source_ip.clone(),
            src_port: event.source_port,
            dst_ip: event.dest_ip.clone(),
            dst_port: event.dest_port,
            session: event.session_id.clone(),
            protocol: event.protocol.clone(),
            message: event.message.clone(),
            sensor: event.sensor_id.clone(),
            timestamp: event.timestamp.clone(),
            attack: label.is_attack(),
        }
    }
}
