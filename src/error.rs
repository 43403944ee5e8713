use thiserror::Error;

/// Errors surfaced by rate retrieval and series synthesis.
///
/// Nothing in the crate retries or recovers from these; they are handed
/// straight back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// The upstream rate source could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
    /// The upstream answered, but with a failure envelope or a malformed payload.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The caller passed arguments the synthesizer cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl RateError {
    /// Localized (pt-BR) message for display in the dashboard.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Transport(_) => {
                "Erro de rede: Não foi possível conectar ao serviço de câmbio"
            }
            Self::InvalidResponse(_) => "Falha ao obter taxa de câmbio",
            Self::InvalidInput(_) => "Parâmetros inválidos para a consulta de câmbio",
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
