//! CBOR persistence for the tracker, so all-time discovery survives restarts.

use crate::error::{Error, Result};
use crate::tracker::Tracker;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

impl Tracker {
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        ciborium::into_writer(self, writer).map_err(|e| Error::Checkpoint(e.to_string()))
    }

    pub fn load<R: Read>(reader: R) -> Result<Tracker> {
        let tracker: Tracker =
            ciborium::de::from_reader(reader).map_err(|e| Error::Checkpoint(e.to_string()))?;
        tracker.config().validate()?;
        Ok(tracker)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Tracker> {
        let file = File::open(path)?;
        Tracker::load(BufReader::new(file))
    }
}
