//! EXIF rewriting for exported images.
//!
//! Decoding bakes the source orientation into the pixels, so the exported
//! block must say "upright" and describe the new pixel dimensions. Offsets
//! into the source file (thumbnails, strips, sub-IFD pointers) are dropped;
//! the writer regenerates the pointers it needs.

use std::io::Cursor;

use exif::experimental::Writer;
use exif::{Field, In, Reader, Tag, Value};
use tracing::debug;

const DROPPED_TAGS: &[Tag] = &[
    Tag::ExifIFDPointer,
    Tag::GPSInfoIFDPointer,
    Tag::InteropIFDPointer,
    Tag::JPEGInterchangeFormat,
    Tag::JPEGInterchangeFormatLength,
    Tag::StripOffsets,
    Tag::StripByteCounts,
    Tag::TileOffsets,
    Tag::TileByteCounts,
    Tag::Orientation,
    Tag::PixelXDimension,
    Tag::PixelYDimension,
];

/// Rewrite a raw EXIF block for an exported image of `width` x `height`.
///
/// Returns `None` when the block cannot be parsed or re-serialized; the
/// export then proceeds without metadata.
pub fn normalize_exif(raw: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    let exif = match Reader::new().read_raw(raw.to_vec()) {
        Ok(exif) => exif,
        Err(err) => {
            debug!(%err, "exif.parse_failed");
            return None;
        }
    };

    let replacements = [
        Field {
            tag: Tag::Orientation,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![1]),
        },
        Field {
            tag: Tag::PixelXDimension,
            ifd_num: In::PRIMARY,
            value: Value::Long(vec![width]),
        },
        Field {
            tag: Tag::PixelYDimension,
            ifd_num: In::PRIMARY,
            value: Value::Long(vec![height]),
        },
    ];

    let mut writer = Writer::new();
    for field in exif.fields().filter(|field| is_carried(field)) {
        writer.push_field(field);
    }
    for field in &replacements {
        writer.push_field(field);
    }

    let mut out = Cursor::new(Vec::new());
    if let Err(err) = writer.write(&mut out, exif.little_endian()) {
        debug!(%err, "exif.write_failed");
        return None;
    }
    Some(out.into_inner())
}

fn is_carried(field: &Field) -> bool {
    field.ifd_num == In::PRIMARY
        && !DROPPED_TAGS.contains(&field.tag)
        && !matches!(field.value, Value::Unknown(..))
}

/// A minimal little-endian TIFF block holding a single Orientation entry.
#[cfg(test)]
pub(crate) fn sample_exif(orientation: u16) -> Vec<u8> {
    let [lo, hi] = orientation.to_le_bytes();
    vec![
        0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, // header, IFD0 at 8
        0x01, 0x00, // one entry
        0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, lo, hi, 0x00, 0x00, // Orientation
        0x00, 0x00, 0x00, 0x00, // no next IFD
    ]
}
