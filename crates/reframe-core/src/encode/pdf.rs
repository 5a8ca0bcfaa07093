//! Single-page PDF export.
//!
//! Builds a minimal spec-conformant PDF around one image XObject: catalog,
//! page tree with a single page, one content stream placing the image, the
//! image stream itself, and a full cross-reference table. No fonts, no
//! text, no object streams, no `/Info` dictionary (so the output carries no
//! timestamps and is byte-deterministic).
//!
//! # Page sizing
//!
//! The page is sized 1 source pixel = 1 user-space point, i.e. a 600x800
//! export produces a 600x800 pt MediaBox.
//!
//! # Image payload
//!
//! - Opaque surfaces embed a JPEG stream (`/DCTDecode`) encoded with the
//!   pipeline's usual quality mapping.
//! - Surfaces with alpha embed Flate-compressed raw RGB scanlines plus a
//!   DeviceGray `/SMask` carrying the alpha plane. PDF has no native PNG
//!   container, so this is the lossless equivalent.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::jpeg::encode_jpeg;
use super::EncodeError;
use crate::decode::Surface;

const PAGES_ID: u32 = 2;
const CONTENTS_ID: u32 = 4;
const IMAGE_ID: u32 = 5;
const SMASK_ID: u32 = 6;

/// Encode a surface as a single-page PDF.
///
/// `quality` applies to the embedded JPEG stream when the surface is
/// opaque; surfaces with alpha are embedded losslessly.
pub fn encode_pdf(surface: &Surface, quality: f32) -> Result<Vec<u8>, EncodeError> {
    let (w, h) = (surface.width, surface.height);
    let mut doc = DocWriter::new();

    // 1: catalog, 2: page tree, 3: page
    doc.object(&format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>"));
    doc.object("<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    doc.object(&format!(
        "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {w} {h}] \
         /Resources << /XObject << /Im0 {IMAGE_ID} 0 R >> >> \
         /Contents {CONTENTS_ID} 0 R >>"
    ));

    // 4: content stream scaling the unit-square image to the full page
    let contents = format!("q\n{w} 0 0 {h} 0 0 cm\n/Im0 Do\nQ\n");
    doc.stream_object("", contents.as_bytes());

    // 5 (+6): the image XObject and, for non-opaque surfaces, its soft mask
    if surface.has_alpha() {
        let (rgb, alpha) = split_planes(surface);
        let rgb_dict = format!(
            "/Type /XObject /Subtype /Image /Width {w} /Height {h} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode \
             /SMask {SMASK_ID} 0 R"
        );
        doc.stream_object(&rgb_dict, &deflate(&rgb)?);

        let mask_dict = format!(
            "/Type /XObject /Subtype /Image /Width {w} /Height {h} \
             /ColorSpace /DeviceGray /BitsPerComponent 8 /Filter /FlateDecode"
        );
        doc.stream_object(&mask_dict, &deflate(&alpha)?);
    } else {
        let jpeg = encode_jpeg(surface, quality)?;
        let dict = format!(
            "/Type /XObject /Subtype /Image /Width {w} /Height {h} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode"
        );
        doc.stream_object(&dict, &jpeg);
    }

    Ok(doc.finish())
}

/// Separate a surface into its RGB scanlines and alpha plane.
fn split_planes(surface: &Surface) -> (Vec<u8>, Vec<u8>) {
    let count = surface.pixel_count() as usize;
    let mut rgb = Vec::with_capacity(count * 3);
    let mut alpha = Vec::with_capacity(count);
    for px in surface.pixels.chunks_exact(4) {
        rgb.extend_from_slice(&px[0..3]);
        alpha.push(px[3]);
    }
    (rgb, alpha)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| EncodeError::EncoderFailure(e.to_string()))
}

/// Sequential PDF object writer tracking byte offsets for the xref table.
struct DocWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl DocWriter {
    fn new() -> Self {
        let mut buf = b"%PDF-1.4\n".to_vec();
        // Binary-marker comment so transports treat the file as binary.
        buf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, body: &str) -> u32 {
        let id = self.begin();
        self.buf.extend_from_slice(body.as_bytes());
        self.buf.extend_from_slice(b"\nendobj\n");
        id
    }

    fn stream_object(&mut self, dict_entries: &str, data: &[u8]) -> u32 {
        let id = self.begin();
        let dict = if dict_entries.is_empty() {
            format!("<< /Length {} >>\nstream\n", data.len())
        } else {
            format!("<< {dict_entries} /Length {} >>\nstream\n", data.len())
        };
        self.buf.extend_from_slice(dict.as_bytes());
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
        id
    }

    fn begin(&mut self) -> u32 {
        let id = self.offsets.len() as u32 + 1;
        self.offsets.push(self.buf.len());
        self.buf
            .extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        id
    }

    /// Append the xref table and trailer; object 1 is the document root.
    fn finish(mut self) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let count = self.offsets.len() + 1;

        self.buf
            .extend_from_slice(format!("xref\n0 {count}\n").as_bytes());
        // 20-byte entries, space-padded EOL
        self.buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets {
            self.buf
                .extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        self.buf.extend_from_slice(
            format!("trailer\n<< /Size {count} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n")
                .as_bytes(),
        );
        self.buf
    }
}
