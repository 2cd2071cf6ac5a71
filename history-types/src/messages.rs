use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Discrete UI update sent by the client; applied one at a time per session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ScreenEvent {
    SelectDate { date: String },
    PreviousWeek,
    NextWeek,
    ToggleCalendar,
    CloseCalendar,
    PreviousMonth,
    NextMonth,
    PickCalendarDate { date: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub profile_name: String,
    pub guest: bool,
}
