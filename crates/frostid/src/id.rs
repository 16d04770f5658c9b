use core::fmt;

/// A 64-bit Snowflake ID with split data center and worker fields
///
/// - 1 bit reserved (the sign bit, always 0)
/// - 41 bits timestamp (ms since the time source's epoch)
/// - 5 bits data center ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21              17 16           12 11             0
///              +--------------+----------------+------------------+---------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | data center (5)  | worker (5)    | sequence (12) |
///              +--------------+----------------+------------------+---------------+---------------+
///              |<------------------ MSB ------------- 64 bits ------------- LSB ----------------->|
/// ```
///
/// The 41-bit timestamp field holds roughly 69 years of millisecond offsets
/// past the configured epoch. Offsets beyond that wrap silently; this is a
/// documented limit, not an actively checked condition.
///
/// IDs compare and sort by their raw value, so ordering follows the timestamp
/// first and the sequence within a single millisecond.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Width of the timestamp field in bits.
    pub const TIMESTAMP_BITS: u64 = 41;

    /// Width of the data center ID field in bits.
    pub const DATA_CENTER_ID_BITS: u64 = 5;

    /// Width of the worker ID field in bits.
    pub const WORKER_ID_BITS: u64 = 5;

    /// Width of the sequence field in bits.
    pub const SEQUENCE_BITS: u64 = 12;

    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for extracting the 5-bit data center ID field. Occupies bits
    /// 17 through 21.
    pub const DATA_CENTER_ID_MASK: u64 = (1 << Self::DATA_CENTER_ID_BITS) - 1;

    /// Bitmask for extracting the 5-bit worker ID field. Occupies bits 12
    /// through 16.
    pub const WORKER_ID_MASK: u64 = (1 << Self::WORKER_ID_BITS) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 =
        Self::SEQUENCE_BITS + Self::WORKER_ID_BITS + Self::DATA_CENTER_ID_BITS;

    /// Number of bits to shift the data center ID to its correct position
    /// (bit 17).
    pub const DATA_CENTER_ID_SHIFT: u64 = Self::SEQUENCE_BITS + Self::WORKER_ID_BITS;

    /// Number of bits to shift the worker ID to its correct position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = Self::SEQUENCE_BITS;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the components into an ID, truncating each to its field width.
    pub const fn from(timestamp: u64, data_center_id: u64, worker_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let data_center_id =
            (data_center_id & Self::DATA_CENTER_ID_MASK) << Self::DATA_CENTER_ID_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | data_center_id | worker_id | sequence,
        }
    }

    /// Constructs a new ID from components that must already be in range.
    pub fn from_components(
        timestamp: u64,
        data_center_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(
            data_center_id <= Self::DATA_CENTER_ID_MASK,
            "data_center_id overflow"
        );
        debug_assert!(worker_id <= Self::WORKER_ID_MASK, "worker_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from(timestamp, data_center_id, worker_id, sequence)
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the data center ID from the packed ID.
    pub const fn data_center_id(&self) -> u64 {
        (self.id >> Self::DATA_CENTER_ID_SHIFT) & Self::DATA_CENTER_ID_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Converts this ID into its raw `u64` representation. Lossless.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw `u64` into an ID.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns true if the current sequence value can be incremented without
    /// leaving the field width.
    pub(crate) const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::SEQUENCE_MASK
    }

    /// Returns a new ID with the sequence incremented.
    pub(crate) fn increment_sequence(&self) -> Self {
        Self::from_components(
            self.timestamp(),
            self.data_center_id(),
            self.worker_id(),
            self.sequence() + 1,
        )
    }

    /// Returns a new ID for a newer timestamp with sequence reset to zero.
    pub(crate) fn rollover_to_timestamp(&self, ts: u64) -> Self {
        Self::from_components(ts, self.data_center_id(), self.worker_id(), 0)
    }

    /// Returns the ID as a zero-padded 20-digit decimal string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bit_layout_debug(f, self)
    }
}

struct FieldLayout {
    name: &'static str,
    bits: u64,
    value: u64,
}

fn fields(id: &SnowflakeId) -> [FieldLayout; 5] {
    [
        FieldLayout {
            name: "reserved",
            bits: 1,
            value: 0,
        },
        FieldLayout {
            name: "timestamp",
            bits: SnowflakeId::TIMESTAMP_BITS,
            value: id.timestamp(),
        },
        FieldLayout {
            name: "data_center_id",
            bits: SnowflakeId::DATA_CENTER_ID_BITS,
            value: id.data_center_id(),
        },
        FieldLayout {
            name: "worker_id",
            bits: SnowflakeId::WORKER_ID_BITS,
            value: id.worker_id(),
        },
        FieldLayout {
            name: "sequence",
            bits: SnowflakeId::SEQUENCE_BITS,
            value: id.sequence(),
        },
    ]
}

fn write_bit_layout_debug(f: &mut fmt::Formatter<'_>, id: &SnowflakeId) -> fmt::Result {
    let fields = fields(id);

    // Compute max width per column: label, dec, hex
    let columns: Vec<usize> = fields
        .iter()
        .map(|field| {
            let label_len = format!("{} ({})", field.name, field.bits).len();
            let dec_len = field.value.to_string().len();
            let hex_len = format!("0x{:x}", field.value).len();
            *[label_len, dec_len, hex_len].iter().max().unwrap() + 2 // +2 for padding
        })
        .collect();

    fn center(s: impl ToString, width: usize) -> String {
        let s = s.to_string();
        let len = s.len();
        if len >= width {
            return s;
        }
        let pad = width - len;
        let left = pad / 2;
        let right = pad - left;
        format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
    }

    fn border(f: &mut fmt::Formatter<'_>, columns: &[usize]) -> fmt::Result {
        write!(f, "        +")?;
        for &w in columns {
            write!(f, "{}+", "-".repeat(w))?;
        }
        writeln!(f)
    }

    writeln!(f, "SnowflakeId {{")?;
    writeln!(f, "    raw id     : 0x{:016x} ({})", id.to_raw(), id.to_raw())?;
    writeln!(f, "    padded     : {}", id.to_padded_string())?;
    writeln!(f, "    layout     :")?;

    border(f, &columns)?;

    // Field labels
    write!(f, "        |")?;
    for (field, &w) in fields.iter().zip(&columns) {
        let label = format!("{} ({})", field.name, field.bits);
        write!(f, "{}|", center(label, w))?;
    }
    writeln!(f)?;

    border(f, &columns)?;

    // Decimal values
    write!(f, "        |")?;
    for (field, &w) in fields.iter().zip(&columns) {
        write!(f, "{}|", center(field.value, w))?;
    }
    writeln!(f)?;

    // Hex values
    write!(f, "        |")?;
    for (field, &w) in fields.iter().zip(&columns) {
        write!(f, "{}|", center(format!("0x{:x}", field.value), w))?;
    }
    writeln!(f)?;

    border(f, &columns)?;

    write!(f, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_id_fields_and_bounds() {
        let ts = SnowflakeId::TIMESTAMP_MASK;
        let dc = SnowflakeId::DATA_CENTER_ID_MASK;
        let wid = SnowflakeId::WORKER_ID_MASK;
        let seq = SnowflakeId::SEQUENCE_MASK;

        let id = SnowflakeId::from(ts, dc, wid, seq);
        println!("ID: {:?}", id);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.data_center_id(), dc);
        assert_eq!(id.worker_id(), wid);
        assert_eq!(id.sequence(), seq);
        assert_eq!(SnowflakeId::from_components(ts, dc, wid, seq), id);
    }

    #[test]
    fn test_snowflake_id_reserved_bit_is_clear() {
        let id = SnowflakeId::from(
            SnowflakeId::TIMESTAMP_MASK,
            SnowflakeId::DATA_CENTER_ID_MASK,
            SnowflakeId::WORKER_ID_MASK,
            SnowflakeId::SEQUENCE_MASK,
        );
        assert_eq!(id.to_raw() >> 63, 0);
    }

    #[test]
    fn test_snowflake_id_shift_positions() {
        // dataCenterId=1, workerId=1, sequence=0 packs the low 22 bits to
        // 135168 (1 << 17 | 1 << 12)
        let id = SnowflakeId::from(0, 1, 1, 0);
        assert_eq!(id.to_raw(), 135_168);

        let id = SnowflakeId::from(1, 0, 0, 0);
        assert_eq!(id.to_raw(), 1 << 22);
    }

    #[test]
    fn test_snowflake_id_raw_round_trip() {
        let id = SnowflakeId::from(12_345_678, 3, 17, 4000);
        let restored = SnowflakeId::from_raw(id.to_raw());
        assert_eq!(restored, id);
        assert_eq!(restored.timestamp(), 12_345_678);
        assert_eq!(restored.data_center_id(), 3);
        assert_eq!(restored.worker_id(), 17);
        assert_eq!(restored.sequence(), 4000);
    }

    #[test]
    fn test_snowflake_id_ordering_follows_timestamp_then_sequence() {
        let a = SnowflakeId::from(100, 31, 31, 4095);
        let b = SnowflakeId::from(101, 0, 0, 0);
        let c = SnowflakeId::from(101, 0, 0, 1);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_snowflake_id_display_and_padding() {
        let id = SnowflakeId::from(1, 1, 1, 0);
        let raw = (1u64 << 22) | 135_168;
        assert_eq!(id.to_string(), raw.to_string());
        let padded = id.to_padded_string();
        assert_eq!(padded.len(), 20);
        assert_eq!(padded.trim_start_matches('0'), raw.to_string());
    }

    #[test]
    #[should_panic(expected = "timestamp overflow")]
    fn timestamp_overflow_panics() {
        let ts = SnowflakeId::TIMESTAMP_MASK + 1;
        SnowflakeId::from_components(ts, 0, 0, 0);
    }

    #[test]
    #[should_panic(expected = "data_center_id overflow")]
    fn data_center_id_overflow_panics() {
        let dc = SnowflakeId::DATA_CENTER_ID_MASK + 1;
        SnowflakeId::from_components(0, dc, 0, 0);
    }

    #[test]
    #[should_panic(expected = "worker_id overflow")]
    fn worker_id_overflow_panics() {
        let wid = SnowflakeId::WORKER_ID_MASK + 1;
        SnowflakeId::from_components(0, 0, wid, 0);
    }

    #[test]
    #[should_panic(expected = "sequence overflow")]
    fn sequence_overflow_panics() {
        let seq = SnowflakeId::SEQUENCE_MASK + 1;
        SnowflakeId::from_components(0, 0, 0, seq);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_snowflake_id_serde_round_trip() {
        let id = SnowflakeId::from(424_242, 7, 21, 99);
        let json = serde_json::to_string(&id).unwrap();
        let back: SnowflakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
