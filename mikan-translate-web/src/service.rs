//! The batch translation endpoint

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use mikan_translate::wire::{BatchRequest, Envelope, RELAY_ACTION, TranslatedText};
use mikan_translate::{GoogleTranslateProvider, MachineTranslator, TranslateError, validate_locale};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use subtle::ConstantTimeEq;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared state for the relay handlers
#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<GoogleTranslateProvider>,
    pub shared_token: String,
    pub source_locale: String,
}

/// Build the relay router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/translate", post(translate_batch))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type Failure = (StatusCode, Json<Envelope>);

fn failure(status: StatusCode, message: &str) -> Failure {
    (status, Json(Envelope::error(message)))
}

/// Constant-time token comparison to prevent timing attacks
fn token_matches(provided: &str, expected: &str) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn markup_pattern() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"))
}

/// Strip markup and collapse whitespace before forwarding text upstream
fn sanitize_text(input: &str) -> String {
    let stripped = markup_pattern().replace_all(input, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accept one batch, forward it upstream, normalize the reply
async fn translate_batch(
    State(state): State<AppState>,
    Form(request): Form<BatchRequest>,
) -> Result<Json<Envelope>, Failure> {
    let token = request.token.as_deref().unwrap_or("");
    if !token_matches(token, &state.shared_token) {
        warn!("rejected request with missing or invalid token");
        return Err(failure(
            StatusCode::FORBIDDEN,
            "invalid or missing authenticity token",
        ));
    }

    if request.action.as_deref() != Some(RELAY_ACTION) {
        return Err(failure(StatusCode::BAD_REQUEST, "unknown action"));
    }
    let Some(texts_json) = request.texts else {
        return Err(failure(StatusCode::BAD_REQUEST, "missing texts parameter"));
    };
    let Some(target_lang) = request.target_lang else {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "missing targetLang parameter",
        ));
    };

    let texts: Vec<String> = match serde_json::from_str(&texts_json) {
        Ok(texts) => texts,
        Err(_) => {
            return Err(failure(
                StatusCode::BAD_REQUEST,
                "texts parameter did not decode to a list",
            ));
        }
    };

    let texts: Vec<String> = texts.iter().map(|t| sanitize_text(t)).collect();
    let target_lang = sanitize_text(&target_lang);
    if let Err(e) = validate_locale(&target_lang) {
        return Err(failure(StatusCode::BAD_REQUEST, &e.to_string()));
    }

    info!(count = texts.len(), target = %target_lang, "forwarding batch upstream");

    match state
        .translator
        .translate_batch(&texts, &state.source_locale, &target_lang)
        .await
    {
        Ok(translated) => Ok(Json(Envelope::ok(
            translated
                .into_iter()
                .map(|t| TranslatedText { translated_text: t })
                .collect(),
        ))),
        Err(TranslateError::UpstreamError { status, message }) => {
            warn!(status, %message, "upstream reported an error");
            Err(failure(
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                &message,
            ))
        }
        Err(e) => {
            warn!(error = %e, "failed to reach the translation API");
            Err(failure(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_matches_requires_exact_value() {
        assert!(token_matches("secret123", "secret123"));
        assert!(!token_matches("secret124", "secret123"));
        assert!(!token_matches("secret12", "secret123"));
        assert!(!token_matches("", "secret123"));
    }

    #[test]
    fn test_sanitize_strips_markup() {
        assert_eq!(
            sanitize_text("<script>alert(1)</script>続きを読む"),
            "alert(1)続きを読む"
        );
        assert_eq!(sanitize_text("<b>太字</b>のテキスト"), "太字のテキスト");
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_text("  a \n\t b  "), "a b");
    }

    #[test]
    fn test_sanitize_keeps_plain_text() {
        assert_eq!(sanitize_text("ようこそ"), "ようこそ");
    }
}
