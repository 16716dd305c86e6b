use thiserror::Error;

pub type Result<T = ()> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed seed {0:?}: expected 64 lowercase hex characters")]
    MalformedSeed(String),
    #[error("seed decodes to {0} bytes, expected exactly 32")]
    InvalidSeedLength(usize),
    #[error("invalid base58 address encoding: {0}")]
    InvalidAddressEncoding(String),
    #[error("invalid coefficient {0:?}: expected a positive hex-encoded integer")]
    InvalidCoefficient(String),
    #[error("player list is empty")]
    EmptyPlayerList,
    #[error("duplicate player address: {0}")]
    DuplicatePlayerAddress(String),
    #[error("no persisted allocation state for round {0}")]
    MissingPriorRoundState(u64),
    #[error("cannot award {requested} tickets from a pool of {available}")]
    InsufficientPool { requested: usize, available: usize },
    #[error("state io error: {0}")]
    StateIo(#[from] std::io::Error),
    #[error("state serialization error: {0}")]
    StateSer(#[from] serde_json::Error),
}
