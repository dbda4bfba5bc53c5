use serde_json::{Map, Value};
use shiftcheck_application::FormSession;
use shiftcheck_core::AppError;
use shiftcheck_domain::FormDef;

use crate::error::ApiResult;

/// Builds a session and replays a client's answer map into it.
///
/// Values are applied in document order, mirroring the renderer's evaluation
/// order, so a value for a field revealed by an earlier answer lands after
/// the answer that reveals it. Unknown field ids are rejected; values for
/// fields that stay hidden are unregistered by the session itself.
pub(super) fn session_with_answers(
    form: FormDef,
    answers: &Map<String, Value>,
) -> ApiResult<FormSession> {
    let mut session = FormSession::new(form)?;

    for field_id in answers.keys() {
        if session.form().field(field_id).is_none() {
            return Err(AppError::Validation(format!(
                "unknown field '{}' for form '{}'",
                field_id,
                session.form().id().as_str()
            ))
            .into());
        }
    }

    let field_ids: Vec<String> = session
        .form()
        .fields()
        .map(|field| field.id().as_str().to_owned())
        .collect();

    for field_id in field_ids {
        if let Some(value) = answers.get(field_id.as_str()) {
            session.set_answer(field_id.as_str(), value.clone())?;
        }
    }

    Ok(session)
}
