//! The versioned binary wire format.
//!
//! Every encoded entity is an envelope — the 4-byte magic `TT01` and a
//! little-endian `u16` format version — followed by the payload of exactly
//! one entity. All multi-byte values are little-endian regardless of
//! host; strings are length-prefixed UTF-8; timestamps travel as 64-bit
//! microsecond counts from the Unix epoch; property values carry a
//! one-byte discriminant. UUIDs are preserved exactly across a round
//! trip, never regenerated.
//!
//! A version-`v` decoder reads any stream of version `v' <= v`.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;
use tracktable_types::{
    timestamp, Domain, Point, PropertyMap, PropertyValue, Trajectory, TrajectoryPoint, Uuid,
};

/// Leading bytes of every encoded entity.
pub const MAGIC: [u8; 4] = *b"TT01";

/// The format version this build writes.
pub const VERSION: u16 = 1;

const TAG_NULL: u8 = 0;
const TAG_INTEGER: u8 = 1;
const TAG_REAL: u8 = 2;
const TAG_STRING: u8 = 3;
const TAG_TIMESTAMP: u8 = 4;

/// Decoding failures. Encoding is infallible.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The input does not start with the `TT01` magic.
    #[error("bad magic: not a tracktable binary entity")]
    BadMagic,

    /// The input ended before the payload was complete.
    #[error("truncated input")]
    Truncated,

    /// The input was written by a newer format revision.
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u16),

    /// An unknown property-value discriminant.
    #[error("unknown property value tag {0}")]
    TagUnknown(u8),

    /// A string payload that is not valid UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,
}

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn with_envelope() -> Self {
        let mut writer = Writer {
            buf: Vec::with_capacity(64),
        };
        writer.buf.extend_from_slice(&MAGIC);
        writer.put_u16(VERSION);
        writer
    }

    fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    fn put_u16(&mut self, value: u16) {
        let mut raw = [0u8; 2];
        LittleEndian::write_u16(&mut raw, value);
        self.buf.extend_from_slice(&raw);
    }

    fn put_u32(&mut self, value: u32) {
        let mut raw = [0u8; 4];
        LittleEndian::write_u32(&mut raw, value);
        self.buf.extend_from_slice(&raw);
    }

    fn put_u64(&mut self, value: u64) {
        let mut raw = [0u8; 8];
        LittleEndian::write_u64(&mut raw, value);
        self.buf.extend_from_slice(&raw);
    }

    fn put_i64(&mut self, value: i64) {
        let mut raw = [0u8; 8];
        LittleEndian::write_i64(&mut raw, value);
        self.buf.extend_from_slice(&raw);
    }

    fn put_f64(&mut self, value: f64) {
        let mut raw = [0u8; 8];
        LittleEndian::write_f64(&mut raw, value);
        self.buf.extend_from_slice(&raw);
    }

    fn put_str(&mut self, value: &str) {
        self.put_u32(value.len() as u32);
        self.buf.extend_from_slice(value.as_bytes());
    }

    fn put_value(&mut self, value: &PropertyValue) {
        match value {
            PropertyValue::Null => self.put_u8(TAG_NULL),
            PropertyValue::Integer(payload) => {
                self.put_u8(TAG_INTEGER);
                self.put_i64(*payload);
            }
            PropertyValue::Real(payload) => {
                self.put_u8(TAG_REAL);
                self.put_f64(*payload);
            }
            PropertyValue::String(payload) => {
                self.put_u8(TAG_STRING);
                self.put_str(payload);
            }
            PropertyValue::Timestamp(payload) => {
                self.put_u8(TAG_TIMESTAMP);
                self.put_u64(timestamp::to_unix_microseconds(*payload) as u64);
            }
        }
    }

    fn put_map(&mut self, map: &PropertyMap) {
        self.put_u32(map.len() as u32);
        for (name, value) in map.iter() {
            self.put_str(name);
            self.put_value(value);
        }
    }

    fn put_point<D: Domain>(&mut self, point: &Point<D>) {
        for &ordinate in point.as_slice() {
            self.put_f64(ordinate);
        }
    }

    fn put_trajectory_point<D: Domain>(&mut self, point: &TrajectoryPoint<D>) {
        self.put_point(point.position());
        self.put_str(point.object_id());
        self.put_u64(timestamp::to_unix_microseconds(point.timestamp()) as u64);
        self.put_f64(point.current_length());
        self.put_map(point.properties());
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Checks the envelope and positions the cursor at the payload.
    fn over_payload(bytes: &'a [u8]) -> Result<Self, CodecError> {
        let mut reader = Reader { bytes, pos: 0 };
        let magic = reader.take(4)?;
        if magic != MAGIC {
            return Err(CodecError::BadMagic);
        }
        let version = reader.get_u16()?;
        if version == 0 || version > VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        Ok(reader)
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], CodecError> {
        if self.pos + count > self.bytes.len() {
            return Err(CodecError::Truncated);
        }
        let slice = &self.bytes[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    fn get_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn get_u16(&mut self) -> Result<u16, CodecError> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    fn get_u32(&mut self) -> Result<u32, CodecError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    fn get_u64(&mut self) -> Result<u64, CodecError> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    fn get_i64(&mut self) -> Result<i64, CodecError> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    fn get_f64(&mut self) -> Result<f64, CodecError> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    fn get_str(&mut self) -> Result<String, CodecError> {
        let length = self.get_u32()? as usize;
        let raw = self.take(length)?;
        String::from_utf8(raw.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }

    fn get_value(&mut self) -> Result<PropertyValue, CodecError> {
        match self.get_u8()? {
            TAG_NULL => Ok(PropertyValue::Null),
            TAG_INTEGER => Ok(PropertyValue::Integer(self.get_i64()?)),
            TAG_REAL => Ok(PropertyValue::Real(self.get_f64()?)),
            TAG_STRING => Ok(PropertyValue::String(self.get_str()?)),
            TAG_TIMESTAMP => Ok(PropertyValue::Timestamp(timestamp::from_unix_microseconds(
                self.get_u64()? as i64,
            ))),
            tag => Err(CodecError::TagUnknown(tag)),
        }
    }

    fn get_map(&mut self) -> Result<PropertyMap, CodecError> {
        let count = self.get_u32()?;
        let mut map = PropertyMap::new();
        for _ in 0..count {
            let name = self.get_str()?;
            let value = self.get_value()?;
            map.insert(name, value);
        }
        Ok(map)
    }

    fn get_point<D: Domain>(&mut self) -> Result<Point<D>, CodecError> {
        let mut point = Point::origin();
        for i in 0..D::DIMENSION {
            point.set(i, self.get_f64()?);
        }
        Ok(point)
    }

    fn get_trajectory_point<D: Domain>(&mut self) -> Result<TrajectoryPoint<D>, CodecError> {
        let position = self.get_point::<D>()?;
        let object_id = self.get_str()?;
        let instant = timestamp::from_unix_microseconds(self.get_u64()? as i64);
        let current_length = self.get_f64()?;
        let properties = self.get_map()?;
        let mut point = TrajectoryPoint::with_id_and_time(position, object_id, instant);
        point.set_current_length(current_length);
        *point.properties_mut() = properties;
        Ok(point)
    }
}

/// Encodes one property value.
pub fn encode_property_value(value: &PropertyValue) -> Vec<u8> {
    let mut writer = Writer::with_envelope();
    writer.put_value(value);
    writer.finish()
}

/// Decodes one property value. Bytes past the payload are ignored.
pub fn decode_property_value(bytes: &[u8]) -> Result<PropertyValue, CodecError> {
    Reader::over_payload(bytes)?.get_value()
}

/// Encodes one property map.
pub fn encode_property_map(map: &PropertyMap) -> Vec<u8> {
    let mut writer = Writer::with_envelope();
    writer.put_map(map);
    writer.finish()
}

/// Decodes one property map.
pub fn decode_property_map(bytes: &[u8]) -> Result<PropertyMap, CodecError> {
    Reader::over_payload(bytes)?.get_map()
}

/// Encodes one bare point.
pub fn encode_point<D: Domain>(point: &Point<D>) -> Vec<u8> {
    let mut writer = Writer::with_envelope();
    writer.put_point(point);
    writer.finish()
}

/// Decodes one bare point of the domain the caller names.
pub fn decode_point<D: Domain>(bytes: &[u8]) -> Result<Point<D>, CodecError> {
    Reader::over_payload(bytes)?.get_point::<D>()
}

/// Encodes one trajectory point.
pub fn encode_trajectory_point<D: Domain>(point: &TrajectoryPoint<D>) -> Vec<u8> {
    let mut writer = Writer::with_envelope();
    writer.put_trajectory_point(point);
    writer.finish()
}

/// Decodes one trajectory point.
pub fn decode_trajectory_point<D: Domain>(
    bytes: &[u8],
) -> Result<TrajectoryPoint<D>, CodecError> {
    Reader::over_payload(bytes)?.get_trajectory_point::<D>()
}

/// Encodes a whole trajectory: property map, UUID, then its points.
pub fn encode_trajectory<D: Domain>(trajectory: &Trajectory<D>) -> Vec<u8> {
    let mut writer = Writer::with_envelope();
    writer.put_map(trajectory.properties());
    writer.buf.extend_from_slice(trajectory.uuid().as_bytes());
    writer.put_u32(trajectory.len() as u32);
    for point in trajectory.iter() {
        writer.put_trajectory_point(point);
    }
    writer.finish()
}

/// Decodes a whole trajectory. The encoded UUID is restored verbatim.
pub fn decode_trajectory<D: Domain>(bytes: &[u8]) -> Result<Trajectory<D>, CodecError> {
    let mut reader = Reader::over_payload(bytes)?;
    let properties = reader.get_map()?;
    let mut uuid_raw = [0u8; 16];
    uuid_raw.copy_from_slice(reader.take(16)?);
    let count = reader.get_u32()?;
    let mut trajectory = Trajectory::without_uuid();
    trajectory.set_uuid(Uuid::from_bytes(uuid_raw));
    *trajectory.properties_mut() = properties;
    for _ in 0..count {
        trajectory.push(reader.get_trajectory_point::<D>()?);
    }
    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracktable_types::{Cartesian3d, Epoch, Spherical};

    fn sample_map() -> PropertyMap {
        let mut map = PropertyMap::new();
        map.insert("altitude", 10500.0);
        map.insert("hops", 3i64);
        map.insert("callsign", "N123");
        map.insert(
            "departed",
            PropertyValue::Timestamp(Epoch::from_gregorian_utc(2014, 3, 5, 13, 44, 6, 0)),
        );
        map
    }

    #[test]
    fn property_value_round_trips() {
        for value in [
            PropertyValue::Integer(-42),
            PropertyValue::Real(2.25),
            PropertyValue::String("über".into()),
            PropertyValue::Timestamp(Epoch::from_gregorian_utc(1999, 12, 31, 23, 59, 59, 0)),
        ] {
            let decoded = decode_property_value(&encode_property_value(&value))
                .expect("well-formed input");
            assert_eq!(decoded, value);
        }
        // Null round-trips by tag even though it never compares equal.
        let decoded = decode_property_value(&encode_property_value(&PropertyValue::Null))
            .expect("well-formed input");
        assert!(decoded.is_null());
    }

    #[test]
    fn property_map_round_trips_in_order() {
        let map = sample_map();
        let decoded = decode_property_map(&encode_property_map(&map)).expect("well-formed input");
        assert_eq!(decoded, map);
        let keys: Vec<&str> = decoded.iter().map(|(name, _)| name).collect();
        assert_eq!(keys, ["altitude", "hops", "callsign", "departed"]);
    }

    #[test]
    fn points_round_trip_in_both_dimensions() {
        let spherical = Point::lon_lat(-106.6504, 35.0844);
        assert_eq!(
            decode_point::<Spherical>(&encode_point(&spherical)).expect("well-formed input"),
            spherical
        );
        let flat = Point::xyz(1.0, -2.5, 1e300);
        assert_eq!(
            decode_point::<Cartesian3d>(&encode_point(&flat)).expect("well-formed input"),
            flat
        );
    }

    #[test]
    fn trajectory_point_round_trips() {
        let mut point: TrajectoryPoint<Spherical> = TrajectoryPoint::with_id_and_time(
            Point::lon_lat(10.0, 20.0),
            "GREEN",
            Epoch::from_gregorian_utc(2014, 3, 5, 13, 44, 6, 250_000),
        );
        *point.properties_mut() = sample_map();
        point.set_current_length(123.25);
        let decoded = decode_trajectory_point::<Spherical>(&encode_trajectory_point(&point))
            .expect("well-formed input");
        assert_eq!(decoded, point);
    }

    #[test]
    fn trajectory_round_trips_with_uuid() {
        let start = Epoch::from_gregorian_utc(2014, 3, 5, 13, 0, 0, 0);
        let mut trajectory: Trajectory<Spherical> = Trajectory::new();
        trajectory.properties_mut().insert("callsign", "GREEN4");
        for (k, (lon, lat)) in [(10.0, 20.0), (10.5, 20.2), (11.0, 20.4)].iter().enumerate() {
            trajectory.push(TrajectoryPoint::with_id_and_time(
                Point::lon_lat(*lon, *lat),
                "GREEN4",
                start + hifitime_minutes(k as i64),
            ));
        }
        let decoded =
            decode_trajectory::<Spherical>(&encode_trajectory(&trajectory)).expect("well-formed");
        assert_eq!(decoded, trajectory);
        assert_eq!(decoded.uuid(), trajectory.uuid());
    }

    fn hifitime_minutes(count: i64) -> tracktable_types::Duration {
        tracktable_types::Duration::from_seconds(count as f64 * 60.0)
    }

    #[test]
    fn rejects_foreign_and_damaged_input() {
        assert_eq!(
            decode_property_value(b"nope??"),
            Err(CodecError::BadMagic)
        );
        assert_eq!(decode_property_value(b"TT0"), Err(CodecError::Truncated));

        let mut future = encode_property_value(&PropertyValue::Integer(1));
        future[4] = 0xff;
        future[5] = 0xff;
        assert_eq!(
            decode_property_value(&future),
            Err(CodecError::UnsupportedVersion(0xffff))
        );

        let mut unknown_tag = encode_property_value(&PropertyValue::Integer(1));
        unknown_tag[6] = 9;
        assert_eq!(
            decode_property_value(&unknown_tag),
            Err(CodecError::TagUnknown(9))
        );

        let whole = encode_trajectory_point::<Spherical>(&TrajectoryPoint::new(
            Point::lon_lat(0.0, 0.0),
        ));
        assert_eq!(
            decode_trajectory_point::<Spherical>(&whole[..whole.len() - 3]),
            Err(CodecError::Truncated)
        );
    }

    #[test]
    fn empty_trajectory_round_trips() {
        let trajectory: Trajectory<Cartesian3d> = Trajectory::new();
        let decoded = decode_trajectory::<Cartesian3d>(&encode_trajectory(&trajectory))
            .expect("well-formed input");
        assert_eq!(decoded, trajectory);
        assert_eq!(decoded.uuid(), trajectory.uuid());
    }
}
