use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::multipart::Multipart;
use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};

use crate::api::{ApiError, ApiState};
use crate::mail::{Attachment, MailClient, OutboundEmail};

const REQUIRED_FIELDS: [&str; 3] = ["name", "email", "why"];

/// Field order for the notification email body.
const FIELD_LABELS: [(&str, &str); 11] = [
    ("name", "Name"),
    ("email", "Email"),
    ("phone", "Phone"),
    ("track", "Track"),
    ("currentStatus", "Current status"),
    ("school", "School"),
    ("linkedin", "LinkedIn"),
    ("portfolio", "Portfolio"),
    ("hearAbout", "Heard about us via"),
    ("goals", "Goals"),
    ("why", "Why APEX"),
];

/// Accepts a multipart application form and relays it to the admissions
/// inbox, resume attached and reply-to pointed at the applicant.
pub async fn handle(
    State(state): State<Arc<ApiState>>,
    mut form: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut resume: Option<(String, Vec<u8>)> = None;
    let mut sat_score: Option<(String, Vec<u8>)> = None;

    while let Some(field) = form
        .next_field()
        .await
        .map_err(|err| ApiError::Validation(format!("malformed form body: {err}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "resume" => {
                let filename = field.file_name().unwrap_or("resume.pdf").to_string();
                let bytes = field.bytes().await.map_err(|err| {
                    ApiError::Validation(format!("unreadable resume upload: {err}"))
                })?;
                if !bytes.is_empty() {
                    resume = Some((filename, bytes.to_vec()));
                }
            }
            "satScore" => {
                let filename = field.file_name().unwrap_or("sat-score.pdf").to_string();
                let bytes = field.bytes().await.map_err(|err| {
                    ApiError::Validation(format!("unreadable SAT score upload: {err}"))
                })?;
                if !bytes.is_empty() {
                    sat_score = Some((filename, bytes.to_vec()));
                }
            }
            _ => {
                let value = field.text().await.map_err(|err| {
                    ApiError::Validation(format!("unreadable field {name}: {err}"))
                })?;
                if !value.trim().is_empty() {
                    fields.insert(name, value);
                }
            }
        }
    }

    for required in REQUIRED_FIELDS {
        if !fields.contains_key(required) {
            return Err(ApiError::Validation(format!("{required} is required")));
        }
    }
    let (resume_name, resume_bytes) =
        resume.ok_or_else(|| ApiError::Validation("resume file is required".to_string()))?;

    let api_key = state
        .config
        .resend_api_key
        .clone()
        .ok_or(ApiError::Config("RESEND_API_KEY"))?;
    let to = state
        .config
        .apply_to_email
        .clone()
        .ok_or(ApiError::Config("APPLY_TO_EMAIL"))?;

    let mut lines = Vec::new();
    for (key, label) in FIELD_LABELS {
        if let Some(value) = fields.get(key) {
            lines.push(format!("{label}: {value}"));
        }
    }
    let mut attachments = vec![Attachment {
        filename: resume_name,
        content: BASE64.encode(&resume_bytes),
    }];
    if let Some((filename, bytes)) = sat_score {
        attachments.push(Attachment {
            filename,
            content: BASE64.encode(&bytes),
        });
    }

    let applicant = fields["name"].clone();
    let email = OutboundEmail {
        from: state.config.apply_from_email.clone(),
        to: vec![to],
        reply_to: fields["email"].clone(),
        subject: format!("New APEX application: {applicant}"),
        text: lines.join("\n"),
        attachments,
    };

    let mail = MailClient::new(
        state.http.clone(),
        api_key,
        state.config.resend_base_url.clone(),
    );
    mail.send(&email).await?;
    log::info!("application relayed for {applicant}");
    Ok(Json(json!({ "ok": true })))
}
