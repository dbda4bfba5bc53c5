use shiftcheck_application::{FormService, StaffService, SubmissionService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Form authoring and loading.
    pub form_service: FormService,
    /// Staff roster management.
    pub staff_service: StaffService,
    /// Submission submit flow and browsing.
    pub submission_service: SubmissionService,
    /// Static bearer token guarding the admin routes.
    pub admin_token: String,
}
