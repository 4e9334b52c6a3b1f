//! Fixed-width block codec
//!
//! Every entity is stored as one block: its fields in a fixed order, each
//! string truncated to its declared width and right-padded with `0x00`, each
//! integer a little-endian `i32`.
//!
//! ```text
//! packed:   | i32 | str[w1] | str[w2] | i32 | ...
//! aligned:  | i32 | str[w1] | str[w2] | pad | i32 | ...
//! ```
//!
//! The `aligned` layout inserts zero bytes before any `i32` that would not
//! start on a 4-byte boundary. It matches files written with native C struct
//! alignment and exists for reading those files.

use std::io;

use serde::{Deserialize, Serialize};

/// Width of every integer field in bytes
pub const INT_WIDTH: usize = 4;

/// Byte layout of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Fields back to back, no padding
    #[default]
    Packed,
    /// Integer fields aligned to 4 bytes
    Aligned,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Packed => "packed",
            Layout::Aligned => "aligned",
        }
    }

    /// Padding needed before an integer field starting at `offset`.
    fn int_padding(self, offset: usize) -> usize {
        match self {
            Layout::Packed => 0,
            Layout::Aligned => (INT_WIDTH - offset % INT_WIDTH) % INT_WIDTH,
        }
    }

    /// Total block size for a field table under this layout.
    pub fn block_size(self, fields: &[Field]) -> usize {
        fields.iter().fold(0, |offset, field| match field {
            Field::Int => offset + self.int_padding(offset) + INT_WIDTH,
            Field::Str(width) => offset + width,
        })
    }
}

/// One column of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Little-endian `i32`
    Int,
    /// Zero-padded string of the given byte width
    Str(usize),
}

/// An entity with a fixed-width binary encoding.
pub trait RecordCodec: Sized {
    /// Entity name used in logs and error messages
    const KIND: &'static str;

    /// Field table, in on-disk order
    const FIELDS: &'static [Field];

    /// Writes the entity's fields in `FIELDS` order.
    fn encode_fields(&self, writer: &mut BlockWriter);

    /// Reads the entity's fields in `FIELDS` order.
    ///
    /// Fails only when a field holds a value the entity cannot represent,
    /// such as an unknown status tag.
    fn decode_fields(reader: &mut BlockReader<'_>) -> io::Result<Self>;

    /// Size in bytes of one encoded block.
    fn block_size(layout: Layout) -> usize {
        layout.block_size(Self::FIELDS)
    }

    /// Encodes the entity into exactly `block_size(layout)` bytes.
    fn encode(&self, layout: Layout) -> Vec<u8> {
        let mut writer = BlockWriter::new(layout, Self::block_size(layout));
        self.encode_fields(&mut writer);
        writer.finish()
    }

    /// The entity as it reads back after being written: every string cut
    /// to its field width, a dangling multi-byte fragment dropped.
    fn stored(self, layout: Layout) -> Self {
        match Self::decode(&self.encode(layout), layout) {
            Ok(Some(stored)) => stored,
            _ => self,
        }
    }

    /// Decodes one block.
    ///
    /// Returns `Ok(None)` when `block` is shorter than a full block.
    fn decode(block: &[u8], layout: Layout) -> io::Result<Option<Self>> {
        let size = Self::block_size(layout);
        if block.len() < size {
            return Ok(None);
        }
        let mut reader = BlockReader::new(layout, &block[..size]);
        Self::decode_fields(&mut reader).map(Some)
    }
}

/// Sequential writer for one block.
#[derive(Debug)]
pub struct BlockWriter {
    layout: Layout,
    buf: Vec<u8>,
}

impl BlockWriter {
    fn new(layout: Layout, capacity: usize) -> Self {
        Self {
            layout,
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Appends a little-endian `i32`, preceded by alignment padding if the
    /// layout requires it.
    pub fn put_i32(&mut self, value: i32) {
        let pad = self.layout.int_padding(self.buf.len());
        self.buf.resize(self.buf.len() + pad, 0);
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Appends `value` truncated to `width` bytes and zero-padded.
    ///
    /// Truncation is on bytes, so a multi-byte character may be cut; the
    /// reader drops the dangling fragment.
    pub fn put_str(&mut self, value: &str, width: usize) {
        let bytes = value.as_bytes();
        let take = bytes.len().min(width);
        self.buf.extend_from_slice(&bytes[..take]);
        self.buf.resize(self.buf.len() + (width - take), 0);
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Sequential reader over one full block.
#[derive(Debug)]
pub struct BlockReader<'a> {
    layout: Layout,
    block: &'a [u8],
    offset: usize,
}

impl<'a> BlockReader<'a> {
    fn new(layout: Layout, block: &'a [u8]) -> Self {
        Self {
            layout,
            block,
            offset: 0,
        }
    }

    fn take(&mut self, len: usize) -> io::Result<&'a [u8]> {
        let end = self.offset + len;
        let slice = self.block.get(self.offset..end).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Field at byte {} overruns block of {} bytes", self.offset, self.block.len()),
            )
        })?;
        self.offset = end;
        Ok(slice)
    }

    /// Reads a little-endian `i32`, skipping alignment padding.
    pub fn get_i32(&mut self) -> io::Result<i32> {
        let pad = self.layout.int_padding(self.offset);
        self.take(pad)?;
        let bytes = self.take(INT_WIDTH)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a `width`-byte string field.
    ///
    /// Trailing zero bytes are stripped and invalid UTF-8 is dropped, so this
    /// never fails on content; the worst case is an empty string.
    pub fn get_str(&mut self, width: usize) -> io::Result<String> {
        let raw = self.take(width)?;
        let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        Ok(decode_skipping_invalid(&raw[..end]))
    }
}

/// Decodes UTF-8, skipping invalid sequences instead of replacing them.
fn decode_skipping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out.trim_end_matches('\0').to_string()
}
