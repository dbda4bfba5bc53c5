use serde::{Deserialize, Serialize};
use shiftcheck_domain::Staff;
use ts_rs::TS;

/// Incoming payload for roster creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/create-staff-request.ts"
)]
pub struct CreateStaffRequest {
    /// Display name; the roster id is derived from it.
    pub name: String,
    /// Active flag; defaults to active.
    pub active: Option<bool>,
}

/// Incoming payload for roster updates (rename and/or active toggle).
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/update-staff-request.ts"
)]
pub struct UpdateStaffRequest {
    /// New display name, when renaming.
    pub name: Option<String>,
    /// New active flag, when toggling.
    pub active: Option<bool>,
}

/// One row of a bulk roster import.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/import-staff-row.ts"
)]
pub struct ImportStaffRow {
    /// Display name.
    pub name: String,
    /// Active flag; defaults to active.
    pub active: Option<bool>,
}

/// Incoming payload for a bulk roster import.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/import-staff-request.ts"
)]
pub struct ImportStaffRequest {
    /// Rows to upsert by derived id.
    pub rows: Vec<ImportStaffRow>,
}

/// API representation of a roster entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/staff-response.ts"
)]
pub struct StaffResponse {
    /// Roster id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the member is selectable for shifts.
    pub active: bool,
}

impl From<Staff> for StaffResponse {
    fn from(value: Staff) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            name: value.name().as_str().to_owned(),
            active: value.active(),
        }
    }
}
