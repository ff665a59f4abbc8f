use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("solver failed to initialize after {attempts} attempts: {message}")]
    EngineInit { attempts: u32, message: String },

    #[error("failed to read {quantity} for entity '{entity}': {message}")]
    EntityRead {
        entity: String,
        quantity: String,
        message: String,
    },

    #[error("no tracking slot for entity '{entity}' / quantity '{quantity}'")]
    TrackingKey { entity: String, quantity: String },

    #[error("model patch failed: {0}")]
    ModelPatch(String),

    #[error("solver error: {0}")]
    Solver(String),

    #[error("run cancelled")]
    Cancelled,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
