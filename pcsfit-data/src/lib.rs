#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// All archived diagnostic signals for one shot, deserialized from a
/// compressed snapshot blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotArchive {
    pub shot: u32,
    pub signals: Vec<SignalRecord>,
}

/// A single named time series as returned by the facility archive.
///
/// `data` may hold several values per timestamp (e.g. a flattened profile
/// of 121 points per slice), in which case `data.len()` is a multiple of
/// `times.len()` or the trailing rows are incomplete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub name: String,
    pub times: Vec<f64>,
    pub data: Vec<f64>,
}

impl ShotArchive {
    pub fn new(shot: u32) -> Self {
        ShotArchive {
            shot,
            signals: Vec::new(),
        }
    }

    /// Looks up a signal by exact name.
    pub fn signal(&self, name: &str) -> Option<&SignalRecord> {
        self.signals.iter().find(|s| s.name == name)
    }

    /// Inserts a signal, replacing any earlier signal of the same name.
    pub fn insert(&mut self, record: SignalRecord) {
        match self.signals.iter_mut().find(|s| s.name == record.name) {
            Some(existing) => *existing = record,
            None => self.signals.push(record),
        }
    }
}

impl SignalRecord {
    pub fn new(name: impl Into<String>, times: Vec<f64>, data: Vec<f64>) -> Self {
        SignalRecord {
            name: name.into(),
            times,
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_insert_replaces_same_name() {
        let mut archive = ShotArchive::new(187076);
        archive.insert(SignalRecord::new("ftssn", vec![0.0], vec![3.0]));
        archive.insert(SignalRecord::new("ftssn", vec![0.0, 1.0], vec![3.0, 4.0]));
        archive.insert(SignalRecord::new("ftsspsin1", vec![0.0], vec![0.1]));

        assert_eq!(archive.signals.len(), 2);
        assert_eq!(archive.signal("ftssn").unwrap().len(), 2);
        assert!(archive.signal("ftssmhat1").is_none());
    }
}
