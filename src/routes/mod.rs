//! Intent dispatch: the interface between a rendering front-end and the store.
//!
//! A front-end sends one [`Intent`] per user action and gets back an
//! [`IntentResponse`] carrying a toast, the current session and optional data.

use serde::{Deserialize, Serialize};

use crate::db::models::{
    CreateCampaign, CreateDonation, CreateFoodRequest, DonationStatus, RequestStatus, UserRole,
};
use crate::error::{AppError, AppResult, ErrorBody};
use crate::services::auth::{RegisterForm, Session};
use crate::AppState;

pub mod auth;
pub mod campaigns;
pub mod donations;
pub mod requests;
pub mod snapshot;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    Login { username: String, password: String },
    Logout,
    Register(RegisterForm),
    SubmitDonation(CreateDonation),
    DeleteDonation { id: String },
    UpdateDonationStatus { id: String, status: DonationStatus },
    SubmitRequest(CreateFoodRequest),
    UpdateRequestStatus { id: String, status: RequestStatus },
    CreateCampaign(CreateCampaign),
    Snapshot,
    Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub dismiss_after_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toast: Option<Toast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub session: Option<Session>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// What a handler produced on success.
#[derive(Debug, Default)]
pub struct Reply {
    /// Already localized toast text.
    pub message: Option<String>,
    pub data: Option<serde_json::Value>,
}

impl Reply {
    pub fn message(message: String) -> Self {
        Reply {
            message: Some(message),
            data: None,
        }
    }

    pub fn data(data: serde_json::Value) -> Self {
        Reply {
            message: None,
            data: Some(data),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Session check for role-gated intents.
pub fn require_role<'a>(session: Option<&'a Session>, allowed: &[UserRole]) -> AppResult<&'a Session> {
    let session = session.ok_or(AppError::Unauthorized)?;
    if !allowed.contains(&session.role) {
        tracing::debug!(
            "User '{}' ({}) denied",
            session.username,
            session.role.as_str()
        );
        return Err(AppError::Forbidden("auth.role_not_allowed".to_string()));
    }
    Ok(session)
}

/// Run one intent. `session` is the caller's login state and is updated by
/// login and logout.
pub async fn dispatch(state: &AppState, session: &mut Option<Session>, intent: Intent) -> IntentResponse {
    let result = match intent {
        Intent::Login { username, password } => {
            auth::login(state, session, &username, &password).await
        }
        Intent::Logout => auth::logout(state, session),
        Intent::Register(form) => auth::register(state, form).await,
        Intent::SubmitDonation(input) => donations::submit(state, session.as_ref(), input).await,
        Intent::DeleteDonation { id } => donations::delete(state, session.as_ref(), &id).await,
        Intent::UpdateDonationStatus { id, status } => {
            donations::update_status(state, session.as_ref(), &id, status).await
        }
        Intent::SubmitRequest(input) => requests::submit(state, session.as_ref(), input).await,
        Intent::UpdateRequestStatus { id, status } => {
            requests::update_status(state, session.as_ref(), &id, status).await
        }
        Intent::CreateCampaign(input) => campaigns::create(state, session.as_ref(), input).await,
        Intent::Snapshot => snapshot::snapshot(state, session.as_ref()).await,
        Intent::Report => snapshot::report(state, session.as_ref()).await,
    };

    respond(state, session.clone(), result)
}

/// Turn a handler result into a response with a toast.
pub fn respond(state: &AppState, session: Option<Session>, result: AppResult<Reply>) -> IntentResponse {
    let dismiss_after_ms = state.config.ui.toast_dismiss_ms;

    match result {
        Ok(reply) => IntentResponse {
            ok: true,
            toast: reply.message.map(|message| Toast {
                kind: ToastKind::Success,
                message,
                dismiss_after_ms,
            }),
            error: None,
            session,
            data: reply.data,
        },
        Err(e) => {
            let body = e.to_body(Some(state.lang()));
            IntentResponse {
                ok: false,
                toast: Some(Toast {
                    kind: ToastKind::Error,
                    message: body.message.clone(),
                    dismiss_after_ms,
                }),
                error: Some(body),
                session,
                data: None,
            }
        }
    }
}

/// Response for input that could not be parsed as an intent.
pub fn malformed(state: &AppState, session: Option<Session>, detail: &str) -> IntentResponse {
    tracing::warn!("Malformed intent: {}", detail);
    respond(
        state,
        session,
        Err(AppError::BadRequest("error.malformed_intent".to_string())),
    )
}


#[cfg(test)]
mod tests {
    use super::test_support::{session, state};
    use super::*;

    #[test]
    fn intents_parse_from_json() {
        let intent: Intent = serde_json::from_str(
            r#"{"intent":"submit_donation","name":"Restaurante A","type":"Comida preparada","quantity":50}"#,
        )
        .unwrap();
        assert!(matches!(intent, Intent::SubmitDonation(ref d) if d.quantity == 50));

        let intent: Intent = serde_json::from_str(
            r#"{"intent":"register","username":"ana","password":"x","role":"restaurant","adminCode":""}"#,
        )
        .unwrap();
        assert!(matches!(intent, Intent::Register(_)));

        let intent: Intent =
            serde_json::from_str(r#"{"intent":"update_request_status","id":"1","status":"approved"}"#)
                .unwrap();
        assert!(matches!(
            intent,
            Intent::UpdateRequestStatus { status: RequestStatus::Approved, .. }
        ));
    }

    #[test]
    fn unknown_status_does_not_parse() {
        let parsed = serde_json::from_str::<Intent>(
            r#"{"intent":"update_donation_status","id":"1","status":"lost"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn require_role_checks_session() {
        assert!(matches!(
            require_role(None, &[UserRole::Administrator]),
            Err(AppError::Unauthorized)
        ));
        let s = session(UserRole::Beneficiary);
        assert!(matches!(
            require_role(s.as_ref(), &[UserRole::Administrator]),
            Err(AppError::Forbidden(_))
        ));
        assert!(require_role(s.as_ref(), &[UserRole::Beneficiary]).is_ok());
    }

    #[tokio::test]
    async fn errors_become_error_toasts() {
        let (state, _) = state().await;
        let mut session = None;

        let response = dispatch(&state, &mut session, Intent::Report).await;

        assert!(!response.ok);
        let toast = response.toast.unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.dismiss_after_ms, 3000);
        assert_eq!(response.error.unwrap().code, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn malformed_input_reports_bad_request() {
        let (state, _) = state().await;
        let response = malformed(&state, None, "expected value at line 1");
        assert!(!response.ok);
        assert_eq!(response.error.unwrap().code, "BAD_REQUEST");
    }
}
