//! Error handling for the greenhouse API client
//!
//! Every error carries a stable code plus English and Spanish messages so the
//! dashboard can surface it as a toast in the user's language.

use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    // Session errors
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Session expired")]
    SessionExpired,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::NotAuthenticated => "NOT_AUTHENTICATED",
            ClientError::SessionExpired => "SESSION_EXPIRED",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Validation { .. } => "VALIDATION_ERROR",
            ClientError::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            ClientError::NotFound(_) => "NOT_FOUND",
            ClientError::Http(_) => "HTTP_ERROR",
            ClientError::Status { .. } => "API_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    pub fn message_en(&self) -> String {
        match self {
            ClientError::NotAuthenticated => "Please sign in to continue".to_string(),
            ClientError::SessionExpired => "Your session has expired, please sign in again".to_string(),
            ClientError::Unauthorized(_) => "You are not allowed to perform this action".to_string(),
            ClientError::Validation { field, message } => format!("{}: {}", field, message),
            ClientError::InvalidStateTransition(msg) => msg.clone(),
            ClientError::NotFound(resource) => format!("{} not found", resource),
            ClientError::Http(_) => "Could not reach the greenhouse server".to_string(),
            ClientError::Status { status, .. } => format!("The server responded with an error ({})", status),
            ClientError::Decode(_) => "The server sent an unexpected response".to_string(),
            ClientError::Configuration(msg) => format!("Configuration error: {}", msg),
        }
    }

    pub fn message_es(&self) -> String {
        match self {
            ClientError::NotAuthenticated => "Inicie sesión para continuar".to_string(),
            ClientError::SessionExpired => "Su sesión ha expirado, inicie sesión nuevamente".to_string(),
            ClientError::Unauthorized(_) => "No tiene permiso para realizar esta acción".to_string(),
            ClientError::Validation { field, message } => format!("Dato inválido en {}: {}", field, message),
            ClientError::InvalidStateTransition(msg) => format!("No se puede cambiar el estado: {}", msg),
            ClientError::NotFound(resource) => format!("No se encontró {}", resource),
            ClientError::Http(_) => "No se pudo conectar con el servidor del invernadero".to_string(),
            ClientError::Status { status, .. } => format!("El servidor respondió con un error ({})", status),
            ClientError::Decode(_) => "El servidor envió una respuesta inesperada".to_string(),
            ClientError::Configuration(msg) => format!("Error de configuración: {}", msg),
        }
    }

    /// Message in the requested language
    pub fn localized(&self, language: shared::Language) -> String {
        match language {
            shared::Language::Spanish => self.message_es(),
            shared::Language::English => self.message_en(),
        }
    }

    /// Whether signing in again could fix the error
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ClientError::NotAuthenticated | ClientError::SessionExpired | ClientError::Unauthorized(_)
        )
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (field, message) = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is invalid".to_string());
                (field.to_string(), message)
            })
            .unwrap_or_else(|| ("input".to_string(), "is invalid".to_string()));

        ClientError::Validation { field, message }
    }
}

impl From<shared::DecodeError> for ClientError {
    fn from(error: shared::DecodeError) -> Self {
        ClientError::Decode(error.to_string())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
