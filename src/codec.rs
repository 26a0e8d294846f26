//! Binary transport of bucket lists between shards and the coordinator.
//!
//! Layout, all integers big-endian where fixed width:
//!
//! ```text
//! required_size   varint (0 = unbounded)
//! bucket_count    varint
//! bucket_count × {
//!     tile_id     i64
//!     doc_count   varint
//!     payload     sub-aggregation codec
//! }
//! ```
//!
//! Varints use 7 data bits per byte, least significant group first, with the
//! high bit set on every byte but the last.
//!
//! The level is not on the wire; both ends must agree on it, and the decoder
//! rejects tile ids that cannot exist at its level.

use crate::aggregation::{Bucket, NoSubAggregations, Stats, StatsMerger, TileGrid};
use crate::error::{CodecError, Result, TileGridError};
use crate::tile::TileKey;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tilegrid_types::Level;

const MAX_VARINT_LEN: usize = 10;
const TILE_ID_LEN: usize = 8;
/// Smallest possible encoded bucket: tile id plus a one-byte count.
const MIN_BUCKET_LEN: usize = TILE_ID_LEN + 1;

/// Writes and reads one kind of sub-aggregation payload.
pub trait PayloadCodec<A> {
    fn encode(&self, payload: &A, buf: &mut BytesMut);
    fn decode(&self, buf: &mut Bytes) -> std::result::Result<A, CodecError>;
}

impl PayloadCodec<()> for NoSubAggregations {
    fn encode(&self, _payload: &(), _buf: &mut BytesMut) {}

    fn decode(&self, _buf: &mut Bytes) -> std::result::Result<(), CodecError> {
        Ok(())
    }
}

impl PayloadCodec<Stats> for StatsMerger {
    fn encode(&self, payload: &Stats, buf: &mut BytesMut) {
        write_vu64(buf, payload.count);
        buf.put_f64(payload.sum);
        buf.put_f64(payload.min);
        buf.put_f64(payload.max);
    }

    fn decode(&self, buf: &mut Bytes) -> std::result::Result<Stats, CodecError> {
        let count = read_vu64(buf)?;
        ensure(buf, 24)?;
        Ok(Stats {
            count,
            sum: buf.get_f64(),
            min: buf.get_f64(),
            max: buf.get_f64(),
        })
    }
}

/// Append `value` as a varint.
pub fn write_vu64(buf: &mut BytesMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Read a varint, rejecting encodings longer than 64 bits.
pub fn read_vu64(buf: &mut Bytes) -> std::result::Result<u64, CodecError> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
        ensure(buf, 1)?;
        let byte = buf.get_u8();
        // The tenth byte carries only the top bit of a u64.
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(CodecError::VarintOverflow);
        }
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(CodecError::VarintOverflow)
}

fn ensure(buf: &Bytes, needed: usize) -> std::result::Result<(), CodecError> {
    if buf.remaining() < needed {
        return Err(CodecError::Truncated {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

fn size_to_wire(size: usize) -> u64 {
    if size == usize::MAX { 0 } else { size as u64 }
}

fn size_from_wire(size: u64) -> usize {
    if size == 0 {
        usize::MAX
    } else {
        usize::try_from(size).unwrap_or(usize::MAX)
    }
}

/// Bucket list codec for one level of detail.
///
/// # Examples
///
/// ```rust
/// use tilegrid::{Bucket, NoSubAggregations, TileGrid, TileKey, WireCodec};
/// use tilegrid::types::Level;
///
/// let level = Level::new(4).unwrap();
/// let key: TileKey = "1321".parse()?;
/// let grid = TileGrid::new(level, 10, vec![Bucket::count_only(key, 42)])?;
///
/// let codec = WireCodec::new(level, NoSubAggregations);
/// let bytes = codec.encode(&grid)?;
/// assert_eq!(codec.decode(bytes)?, grid);
/// # Ok::<(), tilegrid::TileGridError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WireCodec<C> {
    level: Level,
    payload: C,
}

impl<C> WireCodec<C> {
    pub fn new(level: Level, payload: C) -> Self {
        Self { level, payload }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Serialize a grid of this codec's level.
    pub fn encode<A>(&self, grid: &TileGrid<A>) -> Result<Bytes>
    where
        C: PayloadCodec<A>,
    {
        let mut buf = BytesMut::with_capacity(2 * MAX_VARINT_LEN + grid.len() * MIN_BUCKET_LEN);
        self.encode_into(grid, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Append a serialized grid to `buf`.
    pub fn encode_into<A>(&self, grid: &TileGrid<A>, buf: &mut BytesMut) -> Result<()>
    where
        C: PayloadCodec<A>,
    {
        if grid.level() != self.level {
            return Err(TileGridError::InvalidInput(format!(
                "grid level {} does not match codec level {}",
                grid.level(),
                self.level
            )));
        }
        self.encode_buckets(grid.required_size(), grid.buckets(), buf);
        Ok(())
    }

    /// Append a bucket list in the given order. Keys are expected to be at
    /// this codec's level.
    pub fn encode_buckets<A>(
        &self,
        required_size: usize,
        buckets: &[Bucket<A>],
        buf: &mut BytesMut,
    ) where
        C: PayloadCodec<A>,
    {
        write_vu64(buf, size_to_wire(required_size));
        write_vu64(buf, buckets.len() as u64);
        for bucket in buckets {
            buf.put_i64(bucket.key.to_integer());
            write_vu64(buf, bucket.doc_count);
            self.payload.encode(&bucket.aggregations, buf);
        }
        log::trace!(
            "encoded {} buckets at level {} ({} bytes)",
            buckets.len(),
            self.level,
            buf.len()
        );
    }

    /// Decode a whole buffer holding exactly one grid.
    pub fn decode<A>(&self, mut bytes: Bytes) -> std::result::Result<TileGrid<A>, CodecError>
    where
        C: PayloadCodec<A>,
    {
        let grid = self.decode_from(&mut bytes)?;
        if bytes.has_remaining() {
            return Err(CodecError::TrailingBytes(bytes.remaining()));
        }
        Ok(grid)
    }

    /// Decode one grid from the front of `buf`, leaving the rest in place.
    pub fn decode_from<A>(&self, buf: &mut Bytes) -> std::result::Result<TileGrid<A>, CodecError>
    where
        C: PayloadCodec<A>,
    {
        let (required_size, buckets) = self.decode_buckets(buf)?;
        Ok(TileGrid::from_parts(self.level, required_size, buckets))
    }

    /// Decode `(required_size, buckets)`, preserving wire order.
    pub fn decode_buckets<A>(
        &self,
        buf: &mut Bytes,
    ) -> std::result::Result<(usize, Vec<Bucket<A>>), CodecError>
    where
        C: PayloadCodec<A>,
    {
        let required_size = size_from_wire(read_vu64(buf)?);
        let count = read_vu64(buf)?;

        // A hostile count must not drive the allocation.
        let plausible = buf.remaining() / MIN_BUCKET_LEN;
        let capacity = usize::try_from(count).map_or(plausible, |c| c.min(plausible));
        let mut buckets = Vec::with_capacity(capacity);

        for _ in 0..count {
            ensure(buf, TILE_ID_LEN)?;
            let tile_id = buf.get_i64();
            let key = TileKey::from_integer(tile_id, self.level).map_err(|_| {
                CodecError::TileIdOutOfRange {
                    tile_id,
                    level: self.level.get(),
                }
            })?;
            let doc_count = read_vu64(buf)?;
            let aggregations = self.payload.decode(buf)?;
            buckets.push(Bucket::new(key, doc_count, aggregations));
        }

        log::trace!("decoded {} buckets at level {}", buckets.len(), self.level);
        Ok((required_size, buckets))
    }
}
