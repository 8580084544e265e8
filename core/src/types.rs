//! Shared primitive types used across the reporting crate.

/// Stable identifier of a membership record.
pub type MembershipId = String;

/// Stable identifier of a staff (coach) record.
pub type StaffId = String;

pub type MembershipTypeId = String;

/// Identifier of a new-sale or renewal metadata record.
pub type MetadataId = String;

/// A gym label as stored on the membership (exact-match key).
pub type GymLabel = String;
