//! Statistical utilities for the auditkit project.
//!
//! This crate provides the numeric building blocks shared by the sampling
//! engine and the descriptive-statistics extraction:
//!
//! - **Measures**: Free functions for mean, population variance, standard deviation,
//!   coefficient of variation, median and mode frequency
//! - **Descriptive statistics**: A one-pass summary of a dataset
//!
//! All functions treat non-finite inputs (`NaN`, infinities) as excluded from the
//! statistic and return `None` instead of panicking when no valid input remains.
//!
//! # Modules
//!
//! - [`measures`]: Individual statistical measures
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ## Computing individual measures
//!
//! ```
//! use auditkit_stats::measures;
//!
//! let values = [10.0, 10.0, 10.0, 10.0];
//! assert_eq!(measures::mean(values), Some(10.0));
//! assert_eq!(measures::coefficient_of_variation(values), Some(0.0));
//! ```
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use auditkit_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.median, 3.0);
//! ```

pub mod descriptive;
pub mod measures;
