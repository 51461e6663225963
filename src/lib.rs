//! # einvoice
//!
//! EN 16931 electronic invoices: one semantic model, CII and UBL readers
//! and writers, a calculator and a rule-driven validator covering the
//! EN 16931 core, calculation, decimal and VAT category rules plus the
//! Peppol BIS Billing 3.0 and XRechnung families.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use einvoice::*;
//! use rust_decimal_macros::dec;
//!
//! let invoice = InvoiceBuilder::new("RE-2024-001", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .seller(PartyBuilder::new("ACME GmbH", AddressBuilder::new("Berlin", "10115", "DE").build())
//!         .vat_id("DE123456789").build())
//!     .buyer(PartyBuilder::new("Kunde AG", AddressBuilder::new("München", "80331", "DE").build()).build())
//!     .add_line(LineBuilder::new("1", "Beratung", dec!(10), "HUR", dec!(150))
//!         .tax(TaxCategory::StandardRate, dec!(19)).build())
//!     .payment_terms("30 days net")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(invoice.totals.grand_total, dec!(1785.00));
//! assert!(invoice.violations().is_empty());
//!
//! # #[cfg(feature = "xml")] {
//! let xml = einvoice::xml::to_cii_xml(&invoice).unwrap();
//! let parsed = einvoice::xml::parse(xml.as_bytes()).unwrap();
//! assert_eq!(parsed.totals.grand_total, dec!(1785.00));
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `xml` (default) | CII and UBL parsing and writing |
//! | `peppol` (default) | Peppol BIS Billing 3.0 rules (`PEPPOL-EN16931-R*`) |
//! | `xrechnung` (default) | XRechnung rules (`BR-DE-*`) and the German country gate |
//! | `all` | Everything |

pub mod core;
pub mod profile;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "peppol")]
pub mod peppol;

#[cfg(feature = "xrechnung")]
pub mod xrechnung;

// Re-export core types at crate root for convenience
pub use crate::core::*;
