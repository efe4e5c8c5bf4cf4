use thiserror::Error;

/// Result type alias using the canonical `ExError`
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure a caller can observe maps to exactly one kind. Each kind has
/// a stable numeric code (used to pick a user-facing message) and a stable
/// `ERR_*` name (used in logs and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Owner validation
    InvalidOwnerName,
    InvalidOwnerSurname,
    InvalidPhone,
    InvalidEmail,

    // Bike validation
    InvalidBikeBrand,
    InvalidBikeModel,
    InvalidYear,
    InvalidWeight,

    // Revision validation
    InvalidRevisionDate,
    InvalidRevisionDescription,
    InvalidRevisionPrice,

    // Form input
    /// A required field or parent reference was not supplied
    MissingField,
    /// A value outside a fixed enumeration (bike type, carbon flag)
    InvalidChoice,

    // Store
    Connection,
    DuplicateKey,
    NotFound,
    /// A referenced parent row does not exist
    ParentNotFound,
    /// A delete was blocked because child rows still reference the target
    ReferentialConflict,
    Persistence,
    /// An applied migration no longer matches its recorded checksum
    ChecksumMismatch,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Numeric code for this kind
    ///
    /// Validation codes are grouped by entity (1x owner, 2x bike, 3x
    /// revision). Store codes keep the numbers the desktop client showed
    /// for the same conditions.
    pub fn code(&self) -> u32 {
        match self {
            ExErrorKind::InvalidOwnerName => 11,
            ExErrorKind::InvalidOwnerSurname => 12,
            ExErrorKind::InvalidPhone => 13,
            ExErrorKind::InvalidEmail => 14,
            ExErrorKind::InvalidBikeBrand => 21,
            ExErrorKind::InvalidBikeModel => 22,
            ExErrorKind::InvalidYear => 23,
            ExErrorKind::InvalidWeight => 24,
            ExErrorKind::InvalidRevisionDate => 31,
            ExErrorKind::InvalidRevisionDescription => 32,
            ExErrorKind::InvalidRevisionPrice => 33,
            ExErrorKind::Connection => 0,
            ExErrorKind::DuplicateKey => 1,
            ExErrorKind::Persistence => 942,
            ExErrorKind::MissingField => 1400,
            ExErrorKind::NotFound => 1403,
            ExErrorKind::ParentNotFound => 2291,
            ExErrorKind::ReferentialConflict => 2292,
            ExErrorKind::ChecksumMismatch => 4091,
            ExErrorKind::InvalidChoice => 6502,
            ExErrorKind::Config => 12154,
            ExErrorKind::Internal => 9999,
        }
    }

    /// Stable symbolic name for this kind
    pub fn name(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidOwnerName => "ERR_INVALID_OWNER_NAME",
            ExErrorKind::InvalidOwnerSurname => "ERR_INVALID_OWNER_SURNAME",
            ExErrorKind::InvalidPhone => "ERR_INVALID_PHONE",
            ExErrorKind::InvalidEmail => "ERR_INVALID_EMAIL",
            ExErrorKind::InvalidBikeBrand => "ERR_INVALID_BIKE_BRAND",
            ExErrorKind::InvalidBikeModel => "ERR_INVALID_BIKE_MODEL",
            ExErrorKind::InvalidYear => "ERR_INVALID_YEAR",
            ExErrorKind::InvalidWeight => "ERR_INVALID_WEIGHT",
            ExErrorKind::InvalidRevisionDate => "ERR_INVALID_REVISION_DATE",
            ExErrorKind::InvalidRevisionDescription => "ERR_INVALID_REVISION_DESCRIPTION",
            ExErrorKind::InvalidRevisionPrice => "ERR_INVALID_REVISION_PRICE",
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::InvalidChoice => "ERR_INVALID_CHOICE",
            ExErrorKind::Connection => "ERR_CONNECTION",
            ExErrorKind::DuplicateKey => "ERR_DUPLICATE_KEY",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ParentNotFound => "ERR_PARENT_NOT_FOUND",
            ExErrorKind::ReferentialConflict => "ERR_REFERENTIAL_CONFLICT",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ChecksumMismatch => "ERR_CHECKSUM_MISMATCH",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Default user-facing message for this kind
    pub fn default_message(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidOwnerName => "Invalid name: it must start with an uppercase letter followed by lowercase letters, without digits or special characters",
            ExErrorKind::InvalidOwnerSurname => "Invalid surname: it must start with an uppercase letter followed by lowercase letters, without digits or special characters",
            ExErrorKind::InvalidPhone => "Invalid phone: it must be exactly 9 digits",
            ExErrorKind::InvalidEmail => "Invalid email: expected a format like owner@example.com",
            ExErrorKind::InvalidBikeBrand => "Invalid bike brand: it must start with an uppercase letter followed by lowercase letters, without digits or special characters",
            ExErrorKind::InvalidBikeModel => "Invalid bike model: it must start with an uppercase letter followed by lowercase letters, without digits or special characters",
            ExErrorKind::InvalidYear => "Invalid manufacture year: it must be between 1990 and the current year",
            ExErrorKind::InvalidWeight => "Invalid bike weight: it must be a positive number",
            ExErrorKind::InvalidRevisionDate => "Invalid revision date: the expected format is yyyy-MM-dd",
            ExErrorKind::InvalidRevisionDescription => "Invalid revision description: it must start with an uppercase letter followed by lowercase letters",
            ExErrorKind::InvalidRevisionPrice => "Invalid revision price: it must be a positive number",
            ExErrorKind::MissingField => "A required field is missing",
            ExErrorKind::InvalidChoice => "Value is not one of the allowed options",
            ExErrorKind::Connection => "Could not connect to the database",
            ExErrorKind::DuplicateKey => "Integrity constraint violated: duplicate primary key",
            ExErrorKind::NotFound => "No data found",
            ExErrorKind::ParentNotFound => "Integrity constraint violated: parent key not found",
            ExErrorKind::ReferentialConflict => "Integrity constraint violated: child record found",
            ExErrorKind::Persistence => "Database operation failed",
            ExErrorKind::ChecksumMismatch => "Applied migration was modified",
            ExErrorKind::Config => "Could not resolve the store configuration",
            ExErrorKind::Internal => "Internal error",
        }
    }

    /// True for the field-format failures detected before any store call
    pub fn is_validation(&self) -> bool {
        (11..=33).contains(&self.code())
    }
}

/// Canonical structured error type
///
/// Carries the classification (`kind`) plus optional context: the operation
/// that failed, the entity table and id involved, and a message.
#[derive(Debug, Clone, PartialEq)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<&'static str>,
    entity_id: Option<i64>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the entity kind (`owner`, `bike`, `revision`)
    pub fn with_entity(mut self, entity: &'static str) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn with_entity_id(mut self, id: i64) -> Self {
        self.entity_id = Some(id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Numeric code of the error kind
    pub fn code(&self) -> u32 {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<&'static str> {
        self.entity
    }

    pub fn entity_id(&self) -> Option<i64> {
        self.entity_id
    }

    /// Message for this error, falling back to the kind's default
    pub fn message(&self) -> &str {
        if self.message.is_empty() {
            self.kind.default_message()
        } else {
            &self.message
        }
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.kind.name())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        write!(f, ": {}", self.message())?;
        match (self.entity, self.entity_id) {
            (Some(entity), Some(id)) => write!(f, " ({} {})", entity, id)?,
            (None, Some(id)) => write!(f, " (id {})", id)?,
            _ => {}
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Field-format failures, one variant per validation code
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid owner name '{value}': must be capitalized words without digits or punctuation")]
    OwnerName { value: String },

    #[error("Invalid owner surname '{value}': must be capitalized words without digits or punctuation")]
    OwnerSurname { value: String },

    #[error("Invalid phone '{value}': must be exactly 9 digits")]
    Phone { value: String },

    #[error("Invalid email '{value}': expected local-part@domain")]
    Email { value: String },

    #[error("Invalid bike brand '{value}': must be capitalized words without digits or punctuation")]
    BikeBrand { value: String },

    #[error("Invalid bike model '{value}': must be capitalized words without digits or punctuation")]
    BikeModel { value: String },

    #[error("Invalid manufacture year '{value}': must be between {min} and {max}")]
    Year { value: String, min: i32, max: i32 },

    #[error("Invalid bike weight '{value}': must be a positive number")]
    Weight { value: String },

    #[error("Invalid revision date '{value}': expected yyyy-MM-dd")]
    RevisionDate { value: String },

    #[error("Invalid revision description '{value}': must be capitalized words")]
    RevisionDescription { value: String },

    #[error("Invalid revision price '{value}': must be a positive number")]
    RevisionPrice { value: String },
}

impl ValidationError {
    pub fn kind(&self) -> ExErrorKind {
        match self {
            ValidationError::OwnerName { .. } => ExErrorKind::InvalidOwnerName,
            ValidationError::OwnerSurname { .. } => ExErrorKind::InvalidOwnerSurname,
            ValidationError::Phone { .. } => ExErrorKind::InvalidPhone,
            ValidationError::Email { .. } => ExErrorKind::InvalidEmail,
            ValidationError::BikeBrand { .. } => ExErrorKind::InvalidBikeBrand,
            ValidationError::BikeModel { .. } => ExErrorKind::InvalidBikeModel,
            ValidationError::Year { .. } => ExErrorKind::InvalidYear,
            ValidationError::Weight { .. } => ExErrorKind::InvalidWeight,
            ValidationError::RevisionDate { .. } => ExErrorKind::InvalidRevisionDate,
            ValidationError::RevisionDescription { .. } => {
                ExErrorKind::InvalidRevisionDescription
            }
            ValidationError::RevisionPrice { .. } => ExErrorKind::InvalidRevisionPrice,
        }
    }

    /// Numeric validation code (11..=33)
    pub fn code(&self) -> u32 {
        self.kind().code()
    }
}

impl From<ValidationError> for ExError {
    fn from(err: ValidationError) -> Self {
        ExError::new(err.kind())
            .with_op("validate")
            .with_message(err.to_string())
    }
}

/// Error for a required form field that was not supplied
pub fn missing_field(entity: &'static str, field: &str) -> ExError {
    ExError::new(ExErrorKind::MissingField)
        .with_entity(entity)
        .with_message(format!("Missing required {} field '{}'", entity, field))
}

/// Error for a lookup that matched no row
pub fn not_found(entity: &'static str, id: i64) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_entity(entity)
        .with_entity_id(id)
        .with_message(format!("No {} with id {}", entity, id))
}
