//! XRechnung, the German CIUS of EN 16931.
//!
//! The `BR-DE-*` family runs from [`crate::validate`] when the
//! specification identifier (BT-24) is one of [`XRECHNUNG_URNS`].
//! Independently of that, a seller located in Germany triggers the
//! country gate: an EN 16931 invoice that does not claim XRechnung
//! conformance gets a BR-DE-21 warning.
//!
//! BR-DE-21, BR-DE-26, BR-DE-27 and BR-DE-28 are recommendations and land
//! in the warning list; every other rule is a violation.

mod validate;

pub(crate) use validate::{check, check_germany};

pub use crate::profile::{XRECHNUNG_URN, XRECHNUNG_URNS};

/// XRechnung 3.0 specification identifier (BT-24).
pub const XRECHNUNG_CUSTOMIZATION_ID: &str = XRECHNUNG_URN;

/// Invoice type codes (BT-3) XRechnung accepts.
pub const ALLOWED_TYPE_CODES: [u16; 8] = [326, 380, 384, 389, 381, 875, 876, 877];
