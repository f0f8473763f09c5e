//! Mail-message scanning: decodes message bodies, looks for disease
//! mentions and summarises the detections across an inbox.
//!
//! Messages use the shape returned by the Gmail API (`format=full`).
//! Fetching them is the caller's job; [`MailSession`] only carries the
//! credential so it never lives in global state.

use std::{collections::BTreeMap, fmt};

use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::STANDARD},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;
use crate::{
    catalog::{EMAIL_CATEGORY_HINTS, EMAIL_DISEASE_MENTIONS},
    random::RandomSource,
    types::{CategoryLabel, Disease},
};

const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Confidence when only a category word was found
pub const CATEGORY_HINT_CONFIDENCE: f64 = 0.6;
/// Confidence when nothing medical was found
pub const NO_SIGNAL_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailHeader {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailBody {
    /// Base64url-encoded content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<EmailBody>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPayload {
    #[serde(default)]
    pub headers: Vec<EmailHeader>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<EmailBody>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<EmailPart>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub id: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<EmailPayload>,
}

impl EmailMessage {
    /// Exact-name header lookup, empty when absent
    pub fn header(&self, name: &str) -> &str {
        self.payload
            .as_ref()
            .and_then(|payload| payload.headers.iter().find(|header| header.name == name))
            .map(|header| header.value.as_str())
            .unwrap_or("")
    }
}

/// Credential for the mail collaborator, owned by whoever drives the session
#[derive(Clone, PartialEq, Eq)]
pub enum MailSession {
    /// Offline mode serving the canned demo messages
    Demo,
    /// OAuth access token
    Token(String),
}

impl MailSession {
    pub fn is_demo(&self) -> bool {
        matches!(self, MailSession::Demo)
    }

    /// Value for the `Authorization` header of mail API requests
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            MailSession::Demo => None,
            MailSession::Token(token) => Some(format!("Bearer {}", token)),
        }
    }

    /// Messages available without a mail API, `None` for token sessions
    pub fn offline_messages(&self, count: usize) -> Option<Vec<EmailMessage>> {
        self.is_demo().then(|| demo_emails(count))
    }
}

impl fmt::Debug for MailSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailSession::Demo => f.write_str("Demo"),
            MailSession::Token(_) => f.write_str("Token(<redacted>)"),
        }
    }
}

fn decode_body(data: &str) -> Option<String> {
    let normalized = data.replace('+', "-").replace('/', "_");
    let bytes = BODY_ENGINE.decode(normalized.trim()).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Subject, body and every decodable part, space-separated and lowercased
pub fn extract_email_text(message: &EmailMessage) -> String {
    let Some(payload) = &message.payload else {
        return String::new();
    };

    let mut text = String::new();
    text.push_str(message.header("Subject"));
    text.push(' ');

    let bodies = payload
        .body
        .iter()
        .chain(payload.parts.iter().filter_map(|part| part.body.as_ref()));
    for body in bodies {
        let Some(data) = body.data.as_deref() else { continue };
        match decode_body(data) {
            Some(decoded) => {
                text.push_str(&decoded);
                text.push(' ');
            }
            None => debug!("Skipping undecodable body in message {}", message.id),
        }
    }

    text.to_lowercase()
}

/// Outcome of scanning one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EmailAnalysis {
    pub detected_disease: String,
    pub category: CategoryLabel,
    pub confidence: f64,
}

impl EmailAnalysis {
    pub fn is_finding(&self) -> bool {
        self.detected_disease != Disease::Normal.name()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Scan lowercased message text for disease mentions, then for category words
pub fn analyze_email_text(text: &str, rng: &mut dyn RandomSource) -> EmailAnalysis {
    for (category, mentions) in EMAIL_DISEASE_MENTIONS {
        if let Some(mention) = mentions.iter().find(|mention| text.contains(*mention)) {
            return EmailAnalysis {
                detected_disease: capitalize(mention),
                category: *category,
                confidence: 0.75 + rng.next_f64() * 0.2,
            };
        }
    }

    let hinted = EMAIL_CATEGORY_HINTS
        .iter()
        .find(|(_, hints)| hints.iter().any(|hint| text.contains(hint)));
    match hinted {
        Some((category, _)) => EmailAnalysis {
            detected_disease: Disease::Normal.name().to_string(),
            category: *category,
            confidence: CATEGORY_HINT_CONFIDENCE,
        },
        None => EmailAnalysis {
            detected_disease: Disease::Normal.name().to_string(),
            category: CategoryLabel::Skin,
            confidence: NO_SIGNAL_CONFIDENCE,
        },
    }
}

/// Per-message record kept in the inbox report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub subject: String,
    pub from: String,
    pub date: String,
    pub text: String,
    pub analysis: EmailAnalysis,
}

/// A non-normal finding and the subject of the message it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmailDetection {
    pub disease: String,
    pub category: CategoryLabel,
    pub confidence: f64,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSummary {
    pub total_emails: usize,
    pub categories: BTreeMap<CategoryLabel, Vec<String>>,
    pub most_common: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboxReport {
    pub emails: Vec<EmailRecord>,
    pub diseases: Vec<EmailDetection>,
    pub summary: EmailSummary,
}

/// Group detections by category and find the most frequent disease.
/// Among equally frequent diseases the one first seen later wins.
pub fn summarize(detections: &[EmailDetection]) -> EmailSummary {
    let mut categories: BTreeMap<CategoryLabel, Vec<String>> = BTreeMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for detection in detections {
        categories
            .entry(detection.category)
            .or_default()
            .push(detection.disease.clone());
        match counts.iter_mut().find(|(disease, _)| *disease == detection.disease) {
            Some((_, count)) => *count += 1,
            None => counts.push((detection.disease.as_str(), 1)),
        }
    }

    let most_common = counts
        .iter()
        .copied()
        .reduce(|best, candidate| if best.1 > candidate.1 { best } else { candidate })
        .map(|(disease, _)| disease.to_string());

    EmailSummary {
        total_emails: detections.len(),
        categories,
        most_common,
    }
}

/// Analyse every message and build the inbox report
pub fn analyze_emails(messages: &[EmailMessage], rng: &mut dyn RandomSource) -> InboxReport {
    let mut emails = Vec::with_capacity(messages.len());
    let mut diseases = Vec::new();

    for message in messages {
        let text = extract_email_text(message);
        let analysis = analyze_email_text(&text, rng);
        let subject = message.header("Subject").to_string();

        if analysis.is_finding() {
            diseases.push(EmailDetection {
                disease: analysis.detected_disease.clone(),
                category: analysis.category,
                confidence: analysis.confidence,
                email: subject.clone(),
            });
        }

        emails.push(EmailRecord {
            subject,
            from: message.header("From").to_string(),
            date: message.header("Date").to_string(),
            text,
            analysis,
        });
    }

    let summary = summarize(&diseases);
    info!(
        "📬 Analyzed {} emails, {} findings, most common: {}",
        emails.len(),
        diseases.len(),
        summary.most_common.as_deref().unwrap_or("none")
    );

    InboxReport {
        emails,
        diseases,
        summary,
    }
}

fn demo_message(id: &str, snippet: &str, subject: &str, from: &str, body: &str, date: &str) -> EmailMessage {
    let header = |name: &str, value: &str| EmailHeader {
        name: name.to_string(),
        value: value.to_string(),
    };
    EmailMessage {
        id: id.to_string(),
        snippet: snippet.to_string(),
        payload: Some(EmailPayload {
            headers: vec![
                header("Subject", subject),
                header("From", from),
                header("Date", date),
            ],
            body: Some(EmailBody {
                data: Some(STANDARD.encode(body)),
            }),
            parts: Vec::new(),
        }),
    }
}

/// Up to three canned messages: a skin, a dental and a chest report
pub fn demo_emails(count: usize) -> Vec<EmailMessage> {
    let date = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let messages = [
        demo_message(
            "demo1",
            "Patient report: Skin condition diagnosed as Actinic Keratosis. Please review attached images.",
            "Medical Report - Skin Condition",
            "doctor@hospital.com",
            "Patient presents with scaly patches on sun-exposed areas. Diagnosis: Actinic Keratosis. Treatment recommended.",
            &date,
        ),
        demo_message(
            "demo2",
            "Dental checkup results: Gum swelling detected. Recommend follow-up appointment.",
            "Dental Examination Results",
            "dentist@clinic.com",
            "Patient examination shows gum swelling and mild inflammation. Diagnosis: Gum Swelling. Maintain oral hygiene.",
            &date,
        ),
        demo_message(
            "demo3",
            "Chest X-ray results: Signs of pneumonia detected. Please consult immediately.",
            "Chest X-Ray Report - PNEUMONIA",
            "radiologist@hospital.com",
            "Chest X-ray shows cloudy areas in lungs. Diagnosis: PNEUMONIA. Immediate medical attention required.",
            &date,
        ),
    ];
    messages.into_iter().take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn detection(disease: &str, category: CategoryLabel) -> EmailDetection {
        EmailDetection {
            disease: disease.to_string(),
            category,
            confidence: 0.8,
            email: String::new(),
        }
    }

    #[test]
    fn test_extract_text_decodes_body_and_parts() {
        let message = EmailMessage {
            id: "m1".to_string(),
            payload: Some(EmailPayload {
                headers: vec![EmailHeader {
                    name: "Subject".to_string(),
                    value: "Lab RESULTS".to_string(),
                }],
                body: Some(EmailBody {
                    // "Hello?>" in the url-safe alphabet
                    data: Some("SGVsbG8_Pg".to_string()),
                }),
                parts: vec![
                    EmailPart {
                        mime_type: Some("text/plain".to_string()),
                        body: Some(EmailBody {
                            data: Some(STANDARD.encode("Second PART")),
                        }),
                    },
                    EmailPart {
                        mime_type: None,
                        body: Some(EmailBody {
                            data: Some("!!!".to_string()),
                        }),
                    },
                ],
            }),
            ..EmailMessage::default()
        };

        assert_eq!(extract_email_text(&message), "lab results hello?> second part ");
    }

    #[test]
    fn test_message_without_payload_has_no_text() {
        let message = EmailMessage::default();
        assert_eq!(extract_email_text(&message), "");
        assert_eq!(message.header("Subject"), "");
    }

    #[test]
    fn test_mentions_follow_category_order() {
        let mut rng = ScriptedRandom::constant(0.5);
        let analysis = analyze_email_text("lung scan shows melanoma near the chest", &mut rng);
        assert_eq!(analysis.detected_disease, "Melanoma");
        assert_eq!(analysis.category, CategoryLabel::Skin);
        assert!((analysis.confidence - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_category_hint_and_no_signal() {
        let mut rng = ScriptedRandom::constant(0.5);
        let hinted = analyze_email_text("follow-up on the oral exam", &mut rng);
        assert_eq!(hinted.detected_disease, "normal");
        assert_eq!(hinted.category, CategoryLabel::Dental);
        assert_eq!(hinted.confidence, 0.6);
        assert!(!hinted.is_finding());

        let nothing = analyze_email_text("quarterly newsletter", &mut rng);
        assert_eq!(nothing.category, CategoryLabel::Skin);
        assert_eq!(nothing.confidence, 0.5);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_most_common_prefers_later_on_ties() {
        let summary = summarize(&[
            detection("Melanoma", CategoryLabel::Skin),
            detection("Pneumonia", CategoryLabel::Chest),
        ]);
        assert_eq!(summary.most_common.as_deref(), Some("Pneumonia"));

        let summary = summarize(&[
            detection("Melanoma", CategoryLabel::Skin),
            detection("Pneumonia", CategoryLabel::Chest),
            detection("Melanoma", CategoryLabel::Skin),
        ]);
        assert_eq!(summary.most_common.as_deref(), Some("Melanoma"));
        assert_eq!(summary.categories[&CategoryLabel::Skin].len(), 2);
        assert_eq!(summary.total_emails, 3);

        assert_eq!(summarize(&[]).most_common, None);
    }

    #[test]
    fn test_demo_inbox() {
        let mut rng = ScriptedRandom::constant(0.0);
        let report = analyze_emails(&demo_emails(10), &mut rng);
        assert_eq!(report.emails.len(), 3);

        let found: Vec<_> = report
            .diseases
            .iter()
            .map(|d| (d.disease.as_str(), d.category))
            .collect();
        assert_eq!(
            found,
            vec![
                ("Actinic keratosis", CategoryLabel::Skin),
                ("Gum swelling", CategoryLabel::Dental),
                ("Pneumonia", CategoryLabel::Chest),
            ]
        );
        assert_eq!(report.emails[1].from, "dentist@clinic.com");
        assert_eq!(report.summary.most_common.as_deref(), Some("Pneumonia"));
        assert_eq!(demo_emails(2).len(), 2);
    }

    #[test]
    fn test_mail_session() {
        let token = MailSession::Token("secret".to_string());
        assert_eq!(token.authorization_header().as_deref(), Some("Bearer secret"));
        assert!(token.offline_messages(3).is_none());
        assert!(!format!("{:?}", token).contains("secret"));

        assert_eq!(MailSession::Demo.authorization_header(), None);
        assert_eq!(MailSession::Demo.offline_messages(1).map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_gmail_json_shape() {
        let json = r#"{
            "id": "18c",
            "snippet": "x",
            "payload": {
                "headers": [{"name": "From", "value": "lab@example.org"}],
                "parts": [{"mimeType": "text/plain", "body": {"data": "Y2hlc3Q"}}]
            }
        }"#;
        let message: EmailMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.header("From"), "lab@example.org");
        assert_eq!(extract_email_text(&message), " chest ");
    }
}
