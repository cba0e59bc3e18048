//! Quality mapper: per-codec tables from quality index to encoder arguments.

use serde::Serialize;

use super::error::CodecError;

/// Encoder parameters selected by one quality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityParams {
    /// A bitrate flag and its value, e.g. `-b 128000`.
    Bitrate {
        flag: &'static str,
        bits_per_second: u32,
    },
    /// A named preset behind a flag, e.g. `--preset cbr 128`.
    ///
    /// `name` may hold several whitespace separated words; each becomes its
    /// own argument.
    Preset {
        flag: &'static str,
        name: &'static str,
    },
}

impl QualityParams {
    /// Renders the argument fragment passed to the encoder.
    pub fn to_args(&self) -> Vec<String> {
        match self {
            Self::Bitrate {
                flag,
                bits_per_second,
            } => vec![flag.to_string(), bits_per_second.to_string()],
            Self::Preset { flag, name } => std::iter::once(flag.to_string())
                .chain(name.split_whitespace().map(str::to_string))
                .collect(),
        }
    }
}

/// Ordered quality levels for one codec.
///
/// Indices map directly onto entries. Adjacent levels are allowed to share the
/// same parameters.
#[derive(Debug, PartialEq, Eq)]
pub struct QualityTable {
    codec: &'static str,
    levels: &'static [QualityParams],
}

impl QualityTable {
    pub const fn new(codec: &'static str, levels: &'static [QualityParams]) -> Self {
        Self { codec, levels }
    }

    /// Number of quality levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Highest valid quality index.
    pub fn max_quality(&self) -> u8 {
        self.levels.len().saturating_sub(1) as u8
    }

    /// All levels in order.
    pub fn levels(&self) -> &'static [QualityParams] {
        self.levels
    }

    /// Looks up `quality`; out-of-range indices are rejected, never clamped.
    pub fn resolve(&self, quality: u8) -> Result<&'static QualityParams, CodecError> {
        self.levels
            .get(quality as usize)
            .ok_or_else(|| CodecError::InvalidQuality {
                codec: self.codec.to_string(),
                quality,
                max: self.max_quality(),
            })
    }
}

const fn lame(name: &'static str) -> QualityParams {
    QualityParams::Preset {
        flag: "--preset",
        name,
    }
}

const fn afconvert(bits_per_second: u32) -> QualityParams {
    QualityParams::Bitrate {
        flag: "-b",
        bits_per_second,
    }
}

/// LAME constant bitrate presets. The two lowest levels share `cbr 64`, and
/// levels 7 through 10 all use `insane`.
pub static MP3_CBR_QUALITY: QualityTable = QualityTable::new(
    "mp3",
    &[
        lame("cbr 64"),
        lame("cbr 64"),
        lame("cbr 128"),
        lame("cbr 128"),
        lame("cbr 160"),
        lame("cbr 192"),
        lame("cbr 256"),
        lame("insane"),
        lame("insane"),
        lame("insane"),
        lame("insane"),
    ],
);

/// afconvert AAC bitrates.
pub static AAC_QUALITY: QualityTable = QualityTable::new(
    "aac",
    &[
        afconvert(64_000),
        afconvert(96_000),
        afconvert(128_000),
        afconvert(160_000),
        afconvert(192_000),
        afconvert(192_000),
        afconvert(224_000),
        afconvert(256_000),
        afconvert(256_000),
        afconvert(256_000),
        afconvert(320_000),
    ],
);
