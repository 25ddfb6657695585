use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::io::IoError;

pub fn read_json<T: DeserializeOwned, R: Read>(reader: R) -> Result<T, IoError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Writes one pretty-printed document followed by a trailing newline.
pub fn write_json_pretty<W: Write, T: Serialize>(mut writer: W, value: &T) -> Result<(), IoError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
