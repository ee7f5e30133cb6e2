//! Loading and saving buffer content as plain files.

use std::{
    fs::{File, OpenOptions},
    io::{Read, Write},
    path::Path,
};

use log::debug;
use sectorbuf_common::{Result, error::Error};

use crate::{Buffer, dump::ByteGrouping};

impl Buffer {
    /// Reads file content into the buffer at `starting_offset`.
    ///
    /// With a `length` of 0 the read stops at the end of the buffer or at the end of
    /// the file, whichever comes first. An explicit `length` must be available in the
    /// file.
    pub fn load_from_file_binary(
        &mut self,
        path: impl AsRef<Path>,
        starting_offset: usize,
        length: usize,
    ) -> Result<&mut Self> {
        let path = path.as_ref();
        let range = self.byte_range(starting_offset, length)?;
        let mut file = File::open(path).map_err(|e| io_error(path, e))?;

        let len = if length == 0 {
            let file_len = file.metadata().map_err(|e| io_error(path, e))?.len();
            usize::try_from(file_len).map_or(range.len(), |file_len| file_len.min(range.len()))
        } else {
            range.len()
        };

        file.read_exact(&mut self.as_mut_slice()[range.start..range.start + len])
            .map_err(|e| io_error(path, e))?;
        debug!("loaded {len} bytes from {} at offset {starting_offset:#X}", path.display());
        Ok(self)
    }

    /// Writes the selected sectors to `path`, replacing any existing file.
    pub fn save_to_file_binary(
        &self,
        path: impl AsRef<Path>,
        start_sector: usize,
        sector_count: usize,
    ) -> Result<()> {
        let path = path.as_ref();
        let range = self.sector_byte_range(start_sector, sector_count)?;
        let mut file = File::create(path).map_err(|e| io_error(path, e))?;
        file.write_all(&self.as_slice()[range.clone()])
            .map_err(|e| io_error(path, e))?;
        debug!("saved {} bytes to {}", range.len(), path.display());
        Ok(())
    }

    /// Appends the selected sectors to `path`, creating the file if needed.
    pub fn append_to_file_binary(
        &self,
        path: impl AsRef<Path>,
        start_sector: usize,
        sector_count: usize,
    ) -> Result<()> {
        let path = path.as_ref();
        let range = self.sector_byte_range(start_sector, sector_count)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| io_error(path, e))?;
        file.write_all(&self.as_slice()[range.clone()])
            .map_err(|e| io_error(path, e))?;
        debug!("appended {} bytes to {}", range.len(), path.display());
        Ok(())
    }

    /// Writes the hex dump of the selected sectors to `path`.
    pub fn save_to_file_ascii(
        &self,
        path: impl AsRef<Path>,
        start_sector: usize,
        sector_count: usize,
    ) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_hex_string(start_sector, sector_count, ByteGrouping::Byte)?;
        std::fs::write(path, text).map_err(|e| io_error(path, e))?;
        debug!("saved hex dump to {}", path.display());
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::io(path.display().to_string(), source)
}
