//! Property valuation core
//!
//! Estimates a price interval for a property from its own sale, comparable
//! sales on the same street, its energy class and age, and its ventilation
//! figures. The crate performs no I/O: upstream lookups supply the inputs
//! and callers decide what to do with failures.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use std::num::NonZeroU32;
//! use valuation_core::{estimate, MarketData, PropertyDetails, StreetSale, TechnicalData};
//!
//! let as_of = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
//! let property = PropertyDetails::new(1998, 62.0)?.with_energy_class("D");
//! let market = MarketData::new(
//!     2_450_000.0,
//!     NaiveDate::from_ymd_opt(2023, 9, 1).unwrap(),
//!     vec![
//!         StreetSale::new(
//!             2_600_000.0,
//!             NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
//!             64.0,
//!             NonZeroU32::new(3).unwrap(),
//!         )?,
//!         StreetSale::new(
//!             2_100_000.0,
//!             NaiveDate::from_ymd_opt(2024, 5, 19).unwrap(),
//!             55.0,
//!             NonZeroU32::new(2).unwrap(),
//!         )?,
//!     ],
//! )?;
//!
//! let interval = estimate(&property, &market, &TechnicalData::default(), as_of)?;
//! assert!(interval.min_value <= interval.max_value);
//! # Ok::<(), valuation_core::ValuationError>(())
//! ```

pub mod clock;
pub mod engine;
pub mod error;
pub mod models;
pub mod policy;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{estimate, Adjustment, AdjustmentKind, Valuation, ValuationEngine};
pub use error::{InputSubject, Result, ValuationError};
pub use models::{
    EnergyClass, MarketData, PropertyDetails, StreetSale, TechnicalData, ValuationRequest,
    ValueInterval,
};
pub use policy::{ValuationPolicy, ValuationPolicyBuilder};
