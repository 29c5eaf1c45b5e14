// Card Catalog Core - Effective-dated versioning and rotating-category scheduling
// Pure computation library for the card-catalog admin console; the console's
// API/persistence/UI layers link against this and own all I/O.

pub mod calendar;
pub mod effective_range;
pub mod entities;
pub mod lifecycle;
pub mod period;
pub mod schema;

// Re-export commonly used types
pub use calendar::{
    format_display, ongoing_date, parse_local_date, to_iso_date, today, FormatError, ONGOING_ISO,
};
pub use effective_range::{
    denormalize, is_ongoing, normalize, EffectiveRange, RangeEnd,
};
pub use entities::{Card, CardVersion};
pub use lifecycle::{
    overlap_warnings, plan_activation, plan_deactivation, ActivationPlan, DeactivationPlan,
    LifecycleError, OverlapWarning, VersionState,
};
pub use period::{
    resolve_custom, InvalidPeriodError, PeriodType, RotatingPeriod,
};
pub use schema::{
    extract_valid, parse_import_payload, schema_for, validate_field, EntityType, Extraction,
    FieldCheck, FieldDescriptor, FieldRule, SkippedField,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
