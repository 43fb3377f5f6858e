//! Field names of the positional metadata schema.
//!
//! The instrument writes its metadata block as a fixed sequence of unlabeled
//! number pairs. The Nth pair of a collection always carries the same two
//! fields, so the schema is just an ordered table of slots.

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const ALTITUDE: &str = "altitude";
pub const MONTH: &str = "month";
pub const DAY: &str = "day";
pub const YEAR: &str = "year";
pub const HOUR: &str = "hour";
pub const MINUTE: &str = "minute";
pub const SECOND: &str = "second";
pub const N_SATELLITES: &str = "n_satellites";
pub const HDOP_ERROR: &str = "hdop_error";
pub const ADCP_INTERNAL_TEMP_F: &str = "adcp_internal_temp_f";
pub const ABORT_STATUS: &str = "abort_status";
pub const UNIT_NUMBER: &str = "unit_number";
pub const ACTUATOR_ABSOLUTE_POSITION_ERROR: &str = "actuator_absolute_position_error";
pub const POSITION_CORRECTION_COUNT: &str = "position_correction_count";

/// Volumetric water content, the only single-value metadata line.
pub const VWC: &str = "vwc";

/// One two-value metadata line: the field receiving the first token and the
/// field receiving the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataSlot {
    pub first: &'static str,
    pub second: &'static str,
}

impl MetadataSlot {
    const fn new(first: &'static str, second: &'static str) -> Self {
        Self { first, second }
    }
}

/// Slots in the order the instrument emits them.
pub const METADATA_SLOTS: [MetadataSlot; 8] = [
    MetadataSlot::new(LATITUDE, LONGITUDE),
    MetadataSlot::new(ALTITUDE, MONTH),
    MetadataSlot::new(DAY, YEAR),
    MetadataSlot::new(HOUR, MINUTE),
    MetadataSlot::new(SECOND, N_SATELLITES),
    MetadataSlot::new(HDOP_ERROR, ADCP_INTERNAL_TEMP_F),
    MetadataSlot::new(ABORT_STATUS, UNIT_NUMBER),
    MetadataSlot::new(ACTUATOR_ABSOLUTE_POSITION_ERROR, POSITION_CORRECTION_COUNT),
];

/// Abort status codes the instrument is known to report.
pub const KNOWN_STATUS_CODES: [u8; 3] = [0, 1, 2];

/// Every field the raw dump can produce, in slot order followed by `vwc`.
pub fn field_names() -> impl Iterator<Item = &'static str> {
    METADATA_SLOTS
        .iter()
        .flat_map(|slot| [slot.first, slot.second])
        .chain(std::iter::once(VWC))
}

/// Position of `name` in [`field_names`], if it belongs to the schema.
pub fn field_rank(name: &str) -> Option<usize> {
    field_names().position(|field| field == name)
}
