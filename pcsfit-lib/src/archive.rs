use std::collections::HashMap;

use pcsfit_data::{ShotArchive, SignalRecord};

use crate::error::{FitError, Result};

/// Anything that can hand out archived signals for a single shot.
pub trait SignalSource {
    fn shot(&self) -> u32;

    fn signal(&self, name: &str) -> Result<&SignalRecord>;

    fn has_signal(&self, name: &str) -> bool {
        self.signal(name).is_ok()
    }
}

/// An in-memory shot archive with a name index.
pub struct Snapshot {
    archive: ShotArchive,
    by_name: HashMap<String, usize>,
}

impl Snapshot {
    pub fn from_archive(archive: ShotArchive) -> Self {
        let by_name = archive
            .signals
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
        Snapshot { archive, by_name }
    }

    /// Decodes a zstd-compressed, postcard-encoded [`ShotArchive`].
    pub fn from_compressed(bytes: &[u8]) -> Result<Self> {
        let mut decoder = ruzstd::decoding::StreamingDecoder::new(bytes)
            .map_err(|e| FitError::DataError(format!("zstd header: {e}")))?;
        let mut decompressed = Vec::new();
        std::io::Read::read_to_end(&mut decoder, &mut decompressed)
            .map_err(|e| FitError::DataError(format!("zstd stream: {e}")))?;

        let archive: ShotArchive = postcard::from_bytes(&decompressed)
            .map_err(|e| FitError::DataError(format!("postcard: {e}")))?;
        Ok(Self::from_archive(archive))
    }

    pub fn archive(&self) -> &ShotArchive {
        &self.archive
    }

    pub fn signal_names(&self) -> impl Iterator<Item = &str> {
        self.archive.signals.iter().map(|s| s.name.as_str())
    }
}

impl SignalSource for Snapshot {
    fn shot(&self) -> u32 {
        self.archive.shot
    }

    fn signal(&self, name: &str) -> Result<&SignalRecord> {
        self.by_name
            .get(name)
            .map(|&i| &self.archive.signals[i])
            .ok_or_else(|| FitError::UnknownSignal(name.to_string()))
    }
}
