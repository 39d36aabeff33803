#![deny(missing_docs)]

//! # ShelterLink
//!
//! Shelter-record validation and DynamoDB persistence for the ShelterLink API.
//!
//! ## Overview
//!
//! This library implements the domain core behind the ShelterLink backend:
//! - Validates shelter input before anything is written: weekly opening hours
//!   (`HH:MM` format, hour/minute ranges, opening-before-closing ordering)
//!   and the `(0, 5]` rating range
//! - Maps records losslessly between the application shape and the nested,
//!   type-tagged wire representation the storage collaborator persists
//! - Orchestrates create/read/update/delete over a swappable storage seam,
//!   assigning decimal-string ids and building partial-update attribute paths
//! - Surfaces discriminated errors so an API layer can tell a client mistake
//!   from an infrastructure failure
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use shelterlink::model::{Address, NewShelter, WeekSchedule, DaySchedule};
//! use shelterlink::service::ShelterService;
//! use shelterlink::store::memory::MemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = ShelterService::new(MemoryStore::new());
//! let record = service
//!     .post_shelter(NewShelter {
//!         name: "Curry Student Center".to_string(),
//!         expanded_name: None,
//!         address: Address {
//!             street: "360 Huntington Ave".to_string(),
//!             city: "Boston".to_string(),
//!             state: "MA".to_string(),
//!             zip_code: "02115".to_string(),
//!             country: "USA".to_string(),
//!         },
//!         latitude: 42.338,
//!         longitude: -71.088,
//!         description: "Open during the semester".to_string(),
//!         rating: Some(4.6),
//!         phone_number: "617-555-0100".to_string(),
//!         email_address: "shelter@example.org".to_string(),
//!         website: None,
//!         hours: WeekSchedule {
//!             monday: Some(DaySchedule::new("07:00", "23:00")),
//!             ..Default::default()
//!         },
//!         picture: Vec::new(),
//!         tags: Default::default(),
//!     })
//!     .await?;
//! assert_eq!("1", record.id);
//! # Ok(())
//! # }
//! ```
//!
//! Swap [`store::memory::MemoryStore`] for [`store::dynamodb::DynamoStore`]
//! to run against a real table; the service code does not change.
//!
//! ## Modules
//!
//! - [`mod@model`] - Application-facing record, schedule, and patch types
//! - [`mod@codec`] - Tagged wire encoding and decoding
//! - [`mod@validate`] - Hours and rating validation
//! - [`mod@store`] - The storage collaborator seam and its implementations
//! - [`mod@service`] - The shelter domain service
//! - [`mod@error`] - The service error taxonomy

/// Tagged wire encoding and decoding for shelter records.
pub mod codec;

/// The discriminated error type surfaced by the domain service.
pub mod error;

/// Application-facing record, schedule, and patch types.
pub mod model;

/// The shelter domain service: validation, id assignment, and storage
/// orchestration.
pub mod service;

/// The storage collaborator seam, with DynamoDB and in-memory
/// implementations.
pub mod store;

/// Validation of weekly opening hours and ratings.
pub mod validate;
