use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the engine's boundary operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Stored coordinates that do not split into exactly two floats.
    #[error("Coordinates {raw:?} are not a \"lon,lat\" pair")]
    InvalidCoordinates { raw: String },

    #[error("Minimum age {min} exceeds maximum age {max}")]
    InvalidAgeBounds { min: u32, max: u32 },

    #[error("Minimum distance {min} km exceeds maximum distance {max} km")]
    InvalidDistanceBounds { min: f64, max: f64 },

    #[error("Importance {value} for question {question_id} is outside 1..=5")]
    InvalidImportance { question_id: i64, value: i64 },

    #[error("Question id {0} is not a valid question")]
    InvalidQuestionId(i64),

    #[error("Cannot smash or pass your own profile")]
    SelfAction,

    #[error("Profile {0} not found")]
    ProfileNotFound(String),

    /// The user exists but has not submitted any questionnaire answers.
    #[error("User {0} has no questionnaire answers yet")]
    AnswersNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Broad classification for the API layer to map onto response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Dependency,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidCoordinates { .. }
            | Error::InvalidAgeBounds { .. }
            | Error::InvalidDistanceBounds { .. }
            | Error::InvalidImportance { .. }
            | Error::InvalidQuestionId(_)
            | Error::SelfAction => ErrorKind::Validation,
            Error::ProfileNotFound(_) | Error::AnswersNotFound(_) => ErrorKind::NotFound,
            Error::Store(_) | Error::Migrate(_) => ErrorKind::Dependency,
        }
    }
}
