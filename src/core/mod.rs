//! Core invoice model, calculation and validation.
//!
//! This module is independent of any wire syntax: the semantic EN 16931
//! model, builders, decimal and date helpers, the rule catalog, the
//! calculator and the EN 16931 rule families.

mod builder;
pub mod calculate;
pub mod decimal;
mod error;
pub mod rules;
mod types;
pub(crate) mod validation;

pub use builder::*;
pub use calculate::{default_exemption_reasons, derive_tax_breakdown, line_net_amount, update_totals};
pub use decimal::{format_date_cii, format_date_ubl, parse_date_cii, parse_date_ubl, round_half_up};
pub use error::*;
pub use rules::Rule;
pub use types::*;
pub use validation::validate;
