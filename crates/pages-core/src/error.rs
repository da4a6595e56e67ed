//! Error Types

use thiserror::Error;

/// Result type alias for page operations
pub type Result<T> = std::result::Result<T, PageError>;

/// Field-level problems caught before anything is uploaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("video URL is not a YouTube or Vimeo link: {0}")]
    InvalidVideoUrl(String),

    #[error("booking link must be an http(s) URL: {0}")]
    InvalidCalendlyLink(String),

    #[error("video must be video/mp4, got {0}")]
    UnsupportedVideoType(String),

    #[error("video is {size} bytes, limit is {limit}")]
    VideoTooLarge { size: u64, limit: u64 },

    #[error("contact field is required: {0}")]
    MissingContactField(&'static str),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("description is empty")]
    EmptyDescription,
}

impl ValidationError {
    /// Notification text shown next to the offending field
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::MissingTitle => "O título da página é obrigatório.".into(),
            ValidationError::InvalidVideoUrl(_) => {
                "URL do vídeo inválido. Por favor, insira um link do YouTube ou Vimeo válido.".into()
            }
            ValidationError::InvalidCalendlyLink(_) => {
                "Link de agendamento inválido. Use um endereço http:// ou https://.".into()
            }
            ValidationError::UnsupportedVideoType(_) => {
                "Formato de vídeo inválido. Apenas ficheiros .mp4 são permitidos.".into()
            }
            ValidationError::VideoTooLarge { .. } => {
                "O ficheiro de vídeo excede o tamanho máximo de 50MB.".into()
            }
            ValidationError::MissingContactField(_) => {
                "Por favor, preencha todos os campos obrigatórios: Nome, Email e Mensagem.".into()
            }
            ValidationError::InvalidEmail(_) => {
                "Por favor, insira um endereço de e-mail válido.".into()
            }
            ValidationError::EmptyDescription => {
                "Escreva uma descrição antes de a melhorar.".into()
            }
        }
    }
}

/// Authoring and view-time error taxonomy
#[derive(Error, Debug)]
pub enum PageError {
    /// Bad field; submission was not attempted
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// One asset failed to upload; the whole submission was aborted
    #[error("Upload of {file} failed: {reason}")]
    Upload { file: String, reason: String },

    /// Record insert failed after the uploads succeeded
    #[error("Persist error: {0}")]
    Persist(String),

    /// Slug lookup found nothing public (or the backend failed)
    #[error("Page not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PageError {
    /// Every authoring error can be fixed by retrying from the in-memory form.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PageError::Upload { .. } | PageError::Persist(_))
    }

    /// Convert to a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            PageError::Validation(e) => e.user_message(),
            PageError::Upload { file, reason } => format!("Falha ao carregar {}: {}", file, reason),
            PageError::Persist(msg) => format!("Erro ao guardar a landing page: {}", msg),
            PageError::NotFound(_) => "Página não encontrada.".into(),
            PageError::Config(_) => "Erro de configuração do serviço.".into(),
        }
    }
}
