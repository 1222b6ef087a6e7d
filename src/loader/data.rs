//! Layer data decoding: base64 / CSV text, optionally zlib, gzip or zstd
//! compressed, into little-endian 32-bit GIDs.

use crate::error::{MapError, Result};
use crate::map::{Compression, Data, Encoding, LayerTile};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::{Decompress, DecompressError, FlushDecompress, Status};
use std::io::{self, Read};

/// The codec chain selected by a `<data>` element's `encoding` and
/// `compression` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileEncoding {
    /// `<tile>` children, nothing to decode.
    Inline,
    /// Uncompressed base64.
    Base64,
    /// Comma-separated text.
    Csv,
    /// zlib inside base64.
    Zlib,
    /// gzip inside base64.
    Gzip,
    /// zstd inside base64.
    Zstd,
}

impl TileEncoding {
    /// Compression wins over encoding: every compressed payload is base64.
    pub fn of(encoding: Encoding, compression: Compression) -> Self {
        match (compression, encoding) {
            (Compression::Zlib, _) => TileEncoding::Zlib,
            (Compression::Gzip, _) => TileEncoding::Gzip,
            (Compression::Zstd, _) => TileEncoding::Zstd,
            (Compression::None, Encoding::Base64) => TileEncoding::Base64,
            (Compression::None, Encoding::Csv) => TileEncoding::Csv,
            (Compression::None, Encoding::Xml) => TileEncoding::Inline,
        }
    }
}

/// Decodes the text payload of `data` into layer tiles.
///
/// `expected` is the layer's `width * height`; `0` skips decoding entirely.
/// Compressed payloads yield exactly `expected` tiles, uncompressed base64
/// and CSV yield as many tiles as the payload holds.
pub fn decode(data: &Data, expected: usize) -> Result<Vec<LayerTile>> {
    decode_text(
        &data.encoded,
        TileEncoding::of(data.encoding, data.compression),
        expected,
    )
}

pub(crate) fn decode_text(
    text: &str,
    encoding: TileEncoding,
    expected: usize,
) -> Result<Vec<LayerTile>> {
    if expected == 0 {
        return Ok(Vec::new());
    }

    let gids = match encoding {
        TileEncoding::Inline => return Ok(Vec::new()),
        TileEncoding::Base64 => le_gids(&base64_bytes(text)?),
        TileEncoding::Csv => csv_gids(text)?,
        TileEncoding::Zlib => {
            let bytes = inflate_zlib(&base64_bytes(text)?, expected)?;
            exact_gids("zlib", &bytes, expected)?
        }
        TileEncoding::Gzip => {
            let bytes = inflate_gzip(&base64_bytes(text)?)?;
            exact_gids("gzip", &bytes, expected)?
        }
        TileEncoding::Zstd => {
            let bytes = zstd::decode_all(&base64_bytes(text)?[..])
                .map_err(|e| MapError::decode("zstd", e.to_string()))?;
            exact_gids("zstd", &bytes, expected)?
        }
    };

    if gids.len() != expected {
        log::warn!(
            "{encoding:?} layer data holds {} tiles, dimensions declare {expected}",
            gids.len()
        );
    }
    log::trace!("decoded {} tiles from {encoding:?} data", gids.len());

    Ok(gids.into_iter().map(LayerTile::from_gid).collect())
}

/// Base64 payloads are usually wrapped over several indented lines.
fn base64_bytes(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

/// Groups bytes four at a time, little-endian. A trailing partial group is
/// dropped.
fn le_gids(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

fn exact_gids(codec: &'static str, bytes: &[u8], expected: usize) -> Result<Vec<u32>> {
    let needed = expected.saturating_mul(4);
    if bytes.len() < needed {
        return Err(MapError::decode(
            codec,
            format!(
                "inflated {} bytes, {expected} tiles need {needed}",
                bytes.len()
            ),
        ));
    }
    Ok(le_gids(&bytes[..needed]))
}

fn csv_gids(text: &str) -> Result<Vec<u32>> {
    text.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value
                .parse::<u32>()
                .map_err(|e| MapError::decode("csv", format!("{value:?}: {e}")))
        })
        .collect()
}

/// Upper bound on the initial zlib buffer relative to the compressed input.
const ZLIB_SEED_RATIO: usize = 64;

/// Inflates a zlib stream into a buffer seeded at `expected * 4` bytes (capped
/// by the input size) that doubles whenever it fills up before the end of the
/// stream.
fn inflate_zlib(input: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut stream = Decompress::new(true);
    let seed = expected
        .saturating_mul(4)
        .min(input.len().saturating_mul(ZLIB_SEED_RATIO))
        .max(1);
    let mut out = Vec::new();
    grow(&mut out, seed)?;

    loop {
        let before = (stream.total_in(), stream.total_out());
        let consumed = before.0 as usize;
        let status = stream
            .decompress_vec(&input[consumed..], &mut out, FlushDecompress::Sync)
            .map_err(|e| zlib_fault(&e))?;
        if status == Status::StreamEnd {
            break;
        }

        let progressed = before != (stream.total_in(), stream.total_out());
        if out.len() == out.capacity() {
            let doubled = out.capacity();
            grow(&mut out, doubled)?;
        } else if !progressed {
            return Err(MapError::decode(
                "zlib",
                "input ended before the end of the stream",
            ));
        }
    }

    let consumed = stream.total_in() as usize;
    if consumed != input.len() {
        return Err(MapError::decode(
            "zlib",
            format!("{} bytes left over after the end of the stream", input.len() - consumed),
        ));
    }
    Ok(out)
}

fn grow(out: &mut Vec<u8>, additional: usize) -> Result<()> {
    out.try_reserve_exact(additional)
        .map_err(|e| MapError::decode("zlib", format!("cannot grow output buffer: {e}")))
}

fn zlib_fault(err: &DecompressError) -> MapError {
    let code = if err.needs_dictionary().is_some() {
        "Z_NEED_DICT"
    } else {
        "Z_DATA_ERROR"
    };
    MapError::decode("zlib", format!("{code}: {err}"))
}

/// Inflates a gzip member into a buffer seeded at the input length that grows
/// by half the input length whenever it fills up.
fn inflate_gzip(input: &[u8]) -> Result<Vec<u8>> {
    let step = (input.len() / 2).max(1);
    let mut out = vec![0u8; input.len().max(1)];
    let mut produced = 0;
    let mut decoder = GzDecoder::new(input);

    loop {
        if produced == out.len() {
            out.resize(out.len() + step, 0);
        }
        match decoder.read(&mut out[produced..]) {
            Ok(0) => break,
            Ok(n) => produced += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(MapError::decode("gzip", e.to_string())),
        }
    }

    out.truncate(produced);
    Ok(out)
}
