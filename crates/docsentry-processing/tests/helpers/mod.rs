//! Test helpers shared by the processing integration tests.
//!
//! Run from workspace root: `cargo test -p docsentry-processing`.

pub mod fixtures;

use std::sync::{Arc, Mutex};

use docsentry_processing::{Stage, StageObserver};

/// Records every stage the pipeline enters, per file.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(String, Stage)>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn stages_for(&self, filename: &str) -> Vec<Stage> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == filename)
            .map(|(_, stage)| *stage)
            .collect()
    }
}

impl StageObserver for RecordingObserver {
    fn stage_started(&self, filename: &str, stage: Stage) {
        self.events
            .lock()
            .unwrap()
            .push((filename.to_string(), stage));
    }
}
