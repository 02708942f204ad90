// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for dateplus.
//!
//! Pure date logic: no I/O, no logging, no global state besides the
//! process-wide default timezone.
//!
//! - **Synchronous**: every operation completes in place
//! - **Value semantics**: `DateValue` is `Clone + PartialEq`, never shared
//! - **Two failure tiers**: free text degrades into an error list, typed
//!   input fails with [`DateError`]
// Public API - what the world sees
pub mod date_value;
pub mod error;
pub mod interval;
pub mod lenient;
pub mod parts;
pub mod pattern;
pub mod settings;
pub mod timezone;

// Private implementation details - not visible outside domain
mod calendar;

// Re-exports for convenience
pub use date_value::DateValue;
pub use error::{DateError, ErrorCategory};
pub use interval::Interval;
pub use lenient::Diagnostics;
pub use parts::{DateParts, PART_KEYS, array_to_iso, check_array, date_pad, prepare_array};
pub use pattern::{PatternError, strip_parse_modifiers};
pub use settings::Settings;
pub use timezone::{TimeZoneInput, clear_default_timezone, default_timezone, set_default_timezone};
