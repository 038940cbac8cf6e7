//! # Output Compression
//!
//! Maps a single codec choice onto the compression switches of every output
//! format the filesystem client writes. Each format treats "off" differently:
//! ORC and Parquet need an explicit sentinel kind, the Hadoop output formats
//! need a boolean plus an optional codec class.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::ConfigurationError;
use crate::keys;
use crate::sink::Configuration;

/// Compression codec applied to written files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CompressionCodec {
    None,
    Snappy,
    Lz4,
    Zstd,
    #[default]
    Gzip,
}

impl CompressionCodec {
    pub const ALL: [CompressionCodec; 5] = [
        CompressionCodec::None,
        CompressionCodec::Snappy,
        CompressionCodec::Lz4,
        CompressionCodec::Zstd,
        CompressionCodec::Gzip,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Snappy => "SNAPPY",
            Self::Lz4 => "LZ4",
            Self::Zstd => "ZSTD",
            Self::Gzip => "GZIP",
        }
    }

    /// Hadoop codec class used by the text, RCFile and SequenceFile writers
    pub const fn codec_class(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Snappy => Some("org.apache.hadoop.io.compress.SnappyCodec"),
            Self::Lz4 => Some("org.apache.hadoop.io.compress.Lz4Codec"),
            Self::Zstd => Some("org.apache.hadoop.io.compress.ZStandardCodec"),
            Self::Gzip => Some("org.apache.hadoop.io.compress.GzipCodec"),
        }
    }

    /// ORC `CompressionKind` name
    pub const fn orc_compression_kind(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Snappy => "SNAPPY",
            Self::Lz4 => "LZ4",
            Self::Zstd => "ZSTD",
            Self::Gzip => "ZLIB",
        }
    }

    /// Parquet `CompressionCodecName`
    pub const fn parquet_compression_codec(self) -> &'static str {
        match self {
            Self::None => "UNCOMPRESSED",
            Self::Snappy => "SNAPPY",
            Self::Lz4 => "LZ4",
            Self::Zstd => "ZSTD",
            Self::Gzip => "GZIP",
        }
    }

    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionCodec {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|codec| codec.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ConfigurationError::invalid_value(
                    "compression_codec",
                    s,
                    "Unknown codec. Valid codecs are: NONE, SNAPPY, LZ4, ZSTD, GZIP",
                )
            })
    }
}

impl TryFrom<String> for CompressionCodec {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CompressionCodec> for String {
    fn from(codec: CompressionCodec) -> Self {
        codec.as_str().to_string()
    }
}

/// Write the compression keys for `codec` into `config`
pub fn configure_compression(config: &mut Configuration, codec: CompressionCodec) {
    let compression = codec.is_enabled();
    config.set_bool(keys::HIVE_COMPRESS_RESULT, compression);
    config.set_bool(keys::MAPRED_OUTPUT_COMPRESS, compression);
    config.set_bool(keys::OUTPUT_FORMAT_COMPRESS, compression);

    // ORC
    config.set(keys::ORC_COMPRESS, codec.orc_compression_kind());

    // RCFile and text
    match codec.codec_class() {
        Some(class) => {
            config.set(keys::MAPRED_OUTPUT_COMPRESSION_CODEC, class);
            config.set(keys::OUTPUT_FORMAT_COMPRESS_CODEC, class);
        }
        None => {
            config.unset(keys::MAPRED_OUTPUT_COMPRESSION_CODEC);
            config.unset(keys::OUTPUT_FORMAT_COMPRESS_CODEC);
        }
    }

    // Parquet
    config.set(keys::PARQUET_COMPRESSION, codec.parquet_compression_codec());

    // SequenceFile
    config.set(keys::OUTPUT_FORMAT_COMPRESS_TYPE, keys::SEQUENCE_FILE_BLOCK);

    debug!(codec = %codec, "Applied output compression settings");
}
