//! In-memory model of the TIFF-structured EXIF block carried by a JPEG APP1 segment.
//!
//! A block is parsed into per-section tag maps, edited in place, and encoded
//! back into a fresh TIFF stream. IFD pointer tags and the thumbnail offset are
//! structural: they are stripped on parse and regenerated on encode, so the
//! encoder is free to lay the sections out again.

use std::collections::BTreeMap;
use std::fmt;

use super::tags::{self, type_size};
use crate::error::{EncodeError, ParseError};

const TIFF_MAGIC: u16 = 42;
const TIFF_HEADER_LEN: usize = 8;
const IFD_ENTRY_LEN: usize = 12;

/// Tag map of one IFD, ordered by tag id as TIFF requires.
pub type Ifd = BTreeMap<u16, TagValue>;

/// Byte order of a TIFF stream (`II` or `MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl ByteOrder {
    fn marker(self) -> &'static [u8; 2] {
        match self {
            Self::Little => b"II",
            Self::Big => b"MM",
        }
    }

    fn u16(self, b: [u8; 2]) -> u16 {
        match self {
            Self::Little => u16::from_le_bytes(b),
            Self::Big => u16::from_be_bytes(b),
        }
    }

    fn u32(self, b: [u8; 4]) -> u32 {
        match self {
            Self::Little => u32::from_le_bytes(b),
            Self::Big => u32::from_be_bytes(b),
        }
    }

    fn u64(self, b: [u8; 8]) -> u64 {
        match self {
            Self::Little => u64::from_le_bytes(b),
            Self::Big => u64::from_be_bytes(b),
        }
    }

    fn put_u16(self, out: &mut Vec<u8>, val: u16) {
        match self {
            Self::Little => out.extend_from_slice(&val.to_le_bytes()),
            Self::Big => out.extend_from_slice(&val.to_be_bytes()),
        }
    }

    fn put_u32(self, out: &mut Vec<u8>, val: u32) {
        match self {
            Self::Little => out.extend_from_slice(&val.to_le_bytes()),
            Self::Big => out.extend_from_slice(&val.to_be_bytes()),
        }
    }

    fn put_u64(self, out: &mut Vec<u8>, val: u64) {
        match self {
            Self::Little => out.extend_from_slice(&val.to_le_bytes()),
            Self::Big => out.extend_from_slice(&val.to_be_bytes()),
        }
    }
}

/// Unsigned numerator/denominator pair (TIFF `RATIONAL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: u32,
    pub den: u32,
}

impl Rational {
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Decimal value; a zero denominator yields `0.0`.
    pub fn to_f64(self) -> f64 {
        if self.den == 0 {
            0.0
        } else {
            f64::from(self.num) / f64::from(self.den)
        }
    }
}

/// Signed numerator/denominator pair (TIFF `SRATIONAL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SRational {
    pub num: i32,
    pub den: i32,
}

/// A typed TIFF field value.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Byte(Vec<u8>),
    /// Raw ASCII bytes, including the NUL terminator when present.
    Ascii(Vec<u8>),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    SByte(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<SRational>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl TagValue {
    /// NUL-terminated ASCII value.
    pub fn ascii(text: &str) -> Self {
        let mut bytes = Vec::with_capacity(text.len() + 1);
        bytes.extend_from_slice(text.as_bytes());
        bytes.push(0);
        Self::Ascii(bytes)
    }

    pub fn type_id(&self) -> u16 {
        match self {
            Self::Byte(_) => tags::TYPE_BYTE,
            Self::Ascii(_) => tags::TYPE_ASCII,
            Self::Short(_) => tags::TYPE_SHORT,
            Self::Long(_) => tags::TYPE_LONG,
            Self::Rational(_) => tags::TYPE_RATIONAL,
            Self::SByte(_) => tags::TYPE_SBYTE,
            Self::Undefined(_) => tags::TYPE_UNDEFINED,
            Self::SShort(_) => tags::TYPE_SSHORT,
            Self::SLong(_) => tags::TYPE_SLONG,
            Self::SRational(_) => tags::TYPE_SRATIONAL,
            Self::Float(_) => tags::TYPE_FLOAT,
            Self::Double(_) => tags::TYPE_DOUBLE,
        }
    }

    /// Number of elements (the TIFF `count` field).
    pub fn count(&self) -> usize {
        match self {
            Self::Byte(v) | Self::Ascii(v) | Self::Undefined(v) => v.len(),
            Self::Short(v) => v.len(),
            Self::Long(v) => v.len(),
            Self::Rational(v) => v.len(),
            Self::SByte(v) => v.len(),
            Self::SShort(v) => v.len(),
            Self::SLong(v) => v.len(),
            Self::SRational(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
        }
    }

    fn byte_len(&self) -> usize {
        self.count() * type_size(self.type_id()).unwrap_or(1)
    }

    /// Text of an ASCII value, up to the first NUL.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Ascii(bytes) => {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
            }
            _ => None,
        }
    }

    pub fn as_rationals(&self) -> Option<&[Rational]> {
        match self {
            Self::Rational(v) => Some(v),
            _ => None,
        }
    }

    /// Raw payload of a BYTE or UNDEFINED value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Byte(v) | Self::Undefined(v) => Some(v),
            _ => None,
        }
    }

    fn as_offset(&self) -> Option<u32> {
        match self {
            Self::Long(v) if v.len() == 1 => Some(v[0]),
            Self::Short(v) if v.len() == 1 => Some(u32::from(v[0])),
            _ => None,
        }
    }

    fn decode(type_id: u16, raw: &[u8], order: ByteOrder) -> Option<Self> {
        let value = match type_id {
            tags::TYPE_BYTE => Self::Byte(raw.to_vec()),
            tags::TYPE_ASCII => Self::Ascii(raw.to_vec()),
            tags::TYPE_UNDEFINED => Self::Undefined(raw.to_vec()),
            tags::TYPE_SBYTE => Self::SByte(raw.iter().map(|&b| b as i8).collect()),
            tags::TYPE_SHORT => Self::Short(raw.chunks_exact(2).map(|c| order.u16(half(c))).collect()),
            tags::TYPE_SSHORT => {
                Self::SShort(raw.chunks_exact(2).map(|c| order.u16(half(c)) as i16).collect())
            }
            tags::TYPE_LONG | tags::TYPE_IFD => {
                Self::Long(raw.chunks_exact(4).map(|c| order.u32(word(c))).collect())
            }
            tags::TYPE_SLONG => {
                Self::SLong(raw.chunks_exact(4).map(|c| order.u32(word(c)) as i32).collect())
            }
            tags::TYPE_FLOAT => Self::Float(
                raw.chunks_exact(4)
                    .map(|c| f32::from_bits(order.u32(word(c))))
                    .collect(),
            ),
            tags::TYPE_RATIONAL => Self::Rational(
                raw.chunks_exact(8)
                    .map(|c| Rational::new(order.u32(word(&c[..4])), order.u32(word(&c[4..]))))
                    .collect(),
            ),
            tags::TYPE_SRATIONAL => Self::SRational(
                raw.chunks_exact(8)
                    .map(|c| SRational {
                        num: order.u32(word(&c[..4])) as i32,
                        den: order.u32(word(&c[4..])) as i32,
                    })
                    .collect(),
            ),
            tags::TYPE_DOUBLE => Self::Double(
                raw.chunks_exact(8)
                    .map(|c| f64::from_bits(order.u64(dword(c))))
                    .collect(),
            ),
            _ => return None,
        };
        Some(value)
    }

    fn encode(&self, order: ByteOrder, out: &mut Vec<u8>) {
        match self {
            Self::Byte(v) | Self::Ascii(v) | Self::Undefined(v) => out.extend_from_slice(v),
            Self::SByte(v) => out.extend(v.iter().map(|&b| b as u8)),
            Self::Short(v) => {
                for &x in v {
                    order.put_u16(out, x);
                }
            }
            Self::SShort(v) => {
                for &x in v {
                    order.put_u16(out, x as u16);
                }
            }
            Self::Long(v) => {
                for &x in v {
                    order.put_u32(out, x);
                }
            }
            Self::SLong(v) => {
                for &x in v {
                    order.put_u32(out, x as u32);
                }
            }
            Self::Float(v) => {
                for &x in v {
                    order.put_u32(out, x.to_bits());
                }
            }
            Self::Rational(v) => {
                for r in v {
                    order.put_u32(out, r.num);
                    order.put_u32(out, r.den);
                }
            }
            Self::SRational(v) => {
                for r in v {
                    order.put_u32(out, r.num as u32);
                    order.put_u32(out, r.den as u32);
                }
            }
            Self::Double(v) => {
                for &x in v {
                    order.put_u64(out, x.to_bits());
                }
            }
        }
    }
}

fn half(c: &[u8]) -> [u8; 2] {
    [c[0], c[1]]
}

fn word(c: &[u8]) -> [u8; 4] {
    [c[0], c[1], c[2], c[3]]
}

fn dword(c: &[u8]) -> [u8; 8] {
    [c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]
}

/// The IFDs an EXIF block is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    /// IFD0, the main image.
    Primary,
    /// Exif sub-IFD, linked from IFD0.
    Exif,
    /// GPS sub-IFD, linked from IFD0.
    Gps,
    /// Interoperability sub-IFD, linked from the Exif IFD.
    Interop,
    /// IFD1, the thumbnail image.
    Thumbnail,
}

impl Section {
    pub fn name(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Exif => "exif",
            Self::Gps => "gps",
            Self::Interop => "interop",
            Self::Thumbnail => "thumbnail",
        }
    }

    /// Offset tags this model owns and rewrites on encode.
    ///
    /// Nothing else is relocated: MakerNote-internal offsets measured from the
    /// TIFF start and IFD1 `StripOffsets` keep their old values, so they point
    /// at the wrong bytes once the layout changes.
    fn structural_tags(self) -> &'static [u16] {
        match self {
            Self::Primary => &[tags::EXIF_IFD_POINTER, tags::GPS_IFD_POINTER],
            Self::Exif => &[tags::INTEROP_IFD_POINTER],
            Self::Thumbnail => &[
                tags::JPEG_INTERCHANGE_FORMAT,
                tags::JPEG_INTERCHANGE_FORMAT_LENGTH,
            ],
            Self::Gps | Self::Interop => &[],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed EXIF block: tag maps per section plus the linked thumbnail.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbeddedBlock {
    byte_order: ByteOrder,
    sections: BTreeMap<Section, Ifd>,
    thumbnail: Option<Vec<u8>>,
}

impl EmbeddedBlock {
    /// Empty skeleton (little-endian, no tags).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TIFF stream (the APP1 payload after `Exif\0\0`).
    pub fn parse(tiff: &[u8]) -> Result<Self, ParseError> {
        if tiff.len() < TIFF_HEADER_LEN {
            return Err(ParseError::TooShort);
        }
        let order = match &tiff[0..2] {
            b"II" => ByteOrder::Little,
            b"MM" => ByteOrder::Big,
            _ => return Err(ParseError::InvalidByteOrder),
        };
        let magic = read_u16(tiff, 2, order)?;
        if magic != TIFF_MAGIC {
            return Err(ParseError::InvalidMagic(magic));
        }
        let ifd0_offset = read_u32(tiff, 4, order)? as usize;

        let mut block = Self {
            byte_order: order,
            ..Self::default()
        };

        let (mut primary, next) = read_ifd(tiff, ifd0_offset, order)?;

        if let Some(offset) = take_pointer(&mut primary, tags::EXIF_IFD_POINTER)? {
            let (mut exif, _) = read_ifd(tiff, offset, order)?;
            if let Some(offset) = take_pointer(&mut exif, tags::INTEROP_IFD_POINTER)? {
                let (interop, _) = read_ifd(tiff, offset, order)?;
                block.insert_section(Section::Interop, interop);
            }
            block.insert_section(Section::Exif, exif);
        }

        if let Some(offset) = take_pointer(&mut primary, tags::GPS_IFD_POINTER)? {
            let (gps, _) = read_ifd(tiff, offset, order)?;
            block.insert_section(Section::Gps, gps);
        }

        block.insert_section(Section::Primary, primary);

        if next != 0 {
            let (mut ifd1, _) = read_ifd(tiff, next as usize, order)?;
            let offset = ifd1
                .remove(&tags::JPEG_INTERCHANGE_FORMAT)
                .and_then(|v| v.as_offset());
            let length = ifd1
                .remove(&tags::JPEG_INTERCHANGE_FORMAT_LENGTH)
                .and_then(|v| v.as_offset());
            // A dangling thumbnail reference is dropped; the rest of IFD1 is kept.
            if let (Some(offset), Some(length)) = (offset, length) {
                block.thumbnail = slice(tiff, offset as usize, length as usize)
                    .ok()
                    .map(<[u8]>::to_vec);
            }
            block.insert_section(Section::Thumbnail, ifd1);
        }

        Ok(block)
    }

    /// Parse `tiff` if present, falling back to an empty skeleton on any error.
    ///
    /// Both the reader and the writer go through this, so corrupt input is
    /// treated the same way on either path.
    pub fn parse_or_empty(tiff: Option<&[u8]>) -> Self {
        tiff.and_then(|data| Self::parse(data).ok())
            .unwrap_or_default()
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn section(&self, section: Section) -> Option<&Ifd> {
        self.sections.get(&section)
    }

    pub fn get(&self, section: Section, tag: u16) -> Option<&TagValue> {
        self.sections.get(&section)?.get(&tag)
    }

    /// Insert or overwrite a tag. Structural pointer tags are ignored on encode.
    pub fn set(&mut self, section: Section, tag: u16, value: TagValue) {
        self.sections.entry(section).or_default().insert(tag, value);
    }

    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.thumbnail.as_deref()
    }

    pub fn set_thumbnail(&mut self, thumbnail: Option<Vec<u8>>) {
        self.thumbnail = thumbnail;
    }

    pub fn is_empty(&self) -> bool {
        self.thumbnail.is_none() && self.sections.values().all(Ifd::is_empty)
    }

    fn insert_section(&mut self, section: Section, ifd: Ifd) {
        if !ifd.is_empty() {
            self.sections.insert(section, ifd);
        }
    }

    fn has_tags(&self, section: Section) -> bool {
        self.sections.get(&section).is_some_and(|ifd| {
            ifd.keys()
                .any(|tag| !section.structural_tags().contains(tag))
        })
    }

    /// Encode the block as a TIFF stream in its original byte order.
    ///
    /// Layout: header, IFD0, Exif, GPS, Interop, IFD1, thumbnail. Values longer
    /// than four bytes follow their IFD, padded to even offsets.
    pub fn to_tiff(&self) -> Result<Vec<u8>, EncodeError> {
        let plan = self.plan()?;

        let mut offsets: BTreeMap<Section, u32> = BTreeMap::new();
        let mut cursor = TIFF_HEADER_LEN;
        for ifd in &plan {
            offsets.insert(ifd.section, to_u32(cursor)?);
            cursor += ifd.encoded_len();
        }
        let thumbnail_offset = to_u32(cursor)?;
        let thumbnail = if offsets.contains_key(&Section::Thumbnail) {
            self.thumbnail.as_deref()
        } else {
            None
        };
        let total = cursor + thumbnail.map_or(0, <[u8]>::len);
        to_u32(total)?;

        let order = self.byte_order;
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(order.marker());
        order.put_u16(&mut out, TIFF_MAGIC);
        order.put_u32(&mut out, TIFF_HEADER_LEN as u32);

        for ifd in &plan {
            let next = match ifd.section {
                Section::Primary => offsets.get(&Section::Thumbnail).copied().unwrap_or(0),
                _ => 0,
            };
            ifd.write(&mut out, order, &offsets, thumbnail_offset, next);
        }

        if let Some(bytes) = thumbnail {
            out.extend_from_slice(bytes);
        }

        Ok(out)
    }

    fn plan(&self) -> Result<Vec<PlannedIfd<'_>>, EncodeError> {
        let emit_interop = self.has_tags(Section::Interop);
        let emit_exif = emit_interop || self.has_tags(Section::Exif);
        let emit_gps = self.has_tags(Section::Gps);
        let emit_thumbnail = self.thumbnail.is_some() || self.has_tags(Section::Thumbnail);

        let mut plan = Vec::new();

        let mut primary = self.planned(Section::Primary);
        if emit_exif {
            primary.push(tags::EXIF_IFD_POINTER, Slot::Pointer(Section::Exif));
        }
        if emit_gps {
            primary.push(tags::GPS_IFD_POINTER, Slot::Pointer(Section::Gps));
        }
        plan.push(primary.finish()?);

        if emit_exif {
            let mut exif = self.planned(Section::Exif);
            if emit_interop {
                exif.push(tags::INTEROP_IFD_POINTER, Slot::Pointer(Section::Interop));
            }
            plan.push(exif.finish()?);
        }
        if emit_gps {
            plan.push(self.planned(Section::Gps).finish()?);
        }
        if emit_interop {
            plan.push(self.planned(Section::Interop).finish()?);
        }
        if emit_thumbnail {
            let mut ifd1 = self.planned(Section::Thumbnail);
            if let Some(bytes) = &self.thumbnail {
                let len = u32::try_from(bytes.len()).map_err(|_| EncodeError::BlockTooLarge {
                    len: bytes.len(),
                })?;
                ifd1.push(tags::JPEG_INTERCHANGE_FORMAT, Slot::ThumbnailOffset);
                ifd1.push(tags::JPEG_INTERCHANGE_FORMAT_LENGTH, Slot::Long(len));
            }
            plan.push(ifd1.finish()?);
        }

        Ok(plan)
    }

    fn planned(&self, section: Section) -> PlannedIfd<'_> {
        let entries = self
            .sections
            .get(&section)
            .into_iter()
            .flatten()
            .filter(|(tag, _)| !section.structural_tags().contains(*tag))
            .map(|(&tag, value)| (tag, Slot::Value(value)))
            .collect();
        PlannedIfd { section, entries }
    }
}

/// One entry of an IFD about to be written.
enum Slot<'a> {
    Value(&'a TagValue),
    Pointer(Section),
    ThumbnailOffset,
    Long(u32),
}

impl Slot<'_> {
    fn type_id(&self) -> u16 {
        match self {
            Slot::Value(value) => value.type_id(),
            _ => tags::TYPE_LONG,
        }
    }

    fn count(&self) -> usize {
        match self {
            Slot::Value(value) => value.count(),
            _ => 1,
        }
    }

    fn byte_len(&self) -> usize {
        match self {
            Slot::Value(value) => value.byte_len(),
            _ => 4,
        }
    }

    fn encode(
        &self,
        order: ByteOrder,
        offsets: &BTreeMap<Section, u32>,
        thumbnail_offset: u32,
        out: &mut Vec<u8>,
    ) {
        match self {
            Slot::Value(value) => value.encode(order, out),
            Slot::Pointer(section) => {
                order.put_u32(out, offsets.get(section).copied().unwrap_or(0))
            }
            Slot::ThumbnailOffset => order.put_u32(out, thumbnail_offset),
            Slot::Long(val) => order.put_u32(out, *val),
        }
    }
}

struct PlannedIfd<'a> {
    section: Section,
    entries: Vec<(u16, Slot<'a>)>,
}

impl<'a> PlannedIfd<'a> {
    fn push(&mut self, tag: u16, slot: Slot<'a>) {
        self.entries.push((tag, slot));
    }

    fn finish(mut self) -> Result<Self, EncodeError> {
        if self.entries.len() > usize::from(u16::MAX) {
            return Err(EncodeError::TooManyEntries {
                section: self.section,
                count: self.entries.len(),
            });
        }
        if let Some((tag, _)) = self
            .entries
            .iter()
            .find(|(_, slot)| u32::try_from(slot.count()).is_err())
        {
            return Err(EncodeError::ValueTooLong { tag: *tag });
        }
        self.entries.sort_by_key(|(tag, _)| *tag);
        Ok(self)
    }

    fn encoded_len(&self) -> usize {
        let data: usize = self
            .entries
            .iter()
            .map(|(_, slot)| slot.byte_len())
            .filter(|&len| len > 4)
            .map(|len| len + len % 2)
            .sum();
        2 + self.entries.len() * IFD_ENTRY_LEN + 4 + data
    }

    fn write(
        &self,
        out: &mut Vec<u8>,
        order: ByteOrder,
        offsets: &BTreeMap<Section, u32>,
        thumbnail_offset: u32,
        next: u32,
    ) {
        let start = out.len();
        let mut data_offset = start + 2 + self.entries.len() * IFD_ENTRY_LEN + 4;
        let mut data = Vec::new();

        order.put_u16(out, self.entries.len() as u16);
        for (tag, slot) in &self.entries {
            order.put_u16(out, *tag);
            order.put_u16(out, slot.type_id());
            order.put_u32(out, slot.count() as u32);

            let mut bytes = Vec::with_capacity(slot.byte_len());
            slot.encode(order, offsets, thumbnail_offset, &mut bytes);
            if bytes.len() <= 4 {
                bytes.resize(4, 0);
                out.extend_from_slice(&bytes);
            } else {
                order.put_u32(out, data_offset as u32);
                data_offset += bytes.len() + bytes.len() % 2;
                data.extend_from_slice(&bytes);
                if bytes.len() % 2 == 1 {
                    data.push(0);
                }
            }
        }
        order.put_u32(out, next);
        out.extend_from_slice(&data);
    }
}

fn to_u32(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::BlockTooLarge { len })
}

fn slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8], ParseError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(ParseError::OutOfBounds { offset, len })
}

fn read_u16(data: &[u8], offset: usize, order: ByteOrder) -> Result<u16, ParseError> {
    slice(data, offset, 2).map(|b| order.u16(half(b)))
}

fn read_u32(data: &[u8], offset: usize, order: ByteOrder) -> Result<u32, ParseError> {
    slice(data, offset, 4).map(|b| order.u32(word(b)))
}

fn take_pointer(ifd: &mut Ifd, tag: u16) -> Result<Option<usize>, ParseError> {
    match ifd.remove(&tag) {
        None => Ok(None),
        Some(value) => value
            .as_offset()
            .map(|offset| Some(offset as usize))
            .ok_or(ParseError::InvalidPointer { tag }),
    }
}

/// Read one IFD and return its tags with the next-IFD offset.
///
/// Entries of unknown field types are skipped.
fn read_ifd(tiff: &[u8], offset: usize, order: ByteOrder) -> Result<(Ifd, u32), ParseError> {
    let count = usize::from(read_u16(tiff, offset, order)?);
    let entries_start = offset.saturating_add(2);
    let entries = slice(tiff, entries_start, count * IFD_ENTRY_LEN)?;
    // Some writers omit the next-IFD pointer of the last IFD.
    let next = read_u32(tiff, entries_start + count * IFD_ENTRY_LEN, order).unwrap_or(0);

    let mut ifd = Ifd::new();
    for entry in entries.chunks_exact(IFD_ENTRY_LEN) {
        let tag = order.u16(half(&entry[0..2]));
        let type_id = order.u16(half(&entry[2..4]));
        let count = order.u32(word(&entry[4..8])) as usize;

        let Some(size) = type_size(type_id) else {
            continue;
        };
        let len = count
            .checked_mul(size)
            .ok_or(ParseError::OutOfBounds { offset, len: count })?;
        let raw = if len <= 4 {
            &entry[8..8 + len]
        } else {
            slice(tiff, order.u32(word(&entry[8..12])) as usize, len)?
        };

        if let Some(value) = TagValue::decode(type_id, raw, order) {
            ifd.insert(tag, value);
        }
    }

    Ok((ifd, next))
}
