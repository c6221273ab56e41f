use crate::models::{PaymentPlan, Region};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("config error: no retention rate for region {region}, plan {plan}, {days}-day retention")]
    MissingRate {
        region: Region,
        plan: PaymentPlan,
        days: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}
