use sectorbuf_common::{Result, verify_range};

use crate::Buffer;

impl Buffer {
    /// Copies the sectors starting at `start_sector` into `destination`, starting at
    /// sector `dest_start_sector` of the destination.
    ///
    /// The destination offset is `dest_start_sector * destination.bytes_per_sector()`.
    /// The whole destination span is checked before any byte moves.
    pub fn copy_to<'a>(
        &self,
        destination: &'a mut Buffer,
        start_sector: usize,
        dest_start_sector: usize,
        sector_count: usize,
    ) -> Result<&'a mut Buffer> {
        let source = self.sector_byte_range(start_sector, sector_count)?;
        let target = destination.destination_range(dest_start_sector, source.len())?;
        destination.as_mut_slice()[target].copy_from_slice(&self.as_slice()[source]);
        Ok(destination)
    }

    /// Copies the sectors of `source` starting at `src_start_sector` into this buffer,
    /// starting at sector `start_sector`.
    pub fn copy_from(
        &mut self,
        source: &Buffer,
        start_sector: usize,
        src_start_sector: usize,
        sector_count: usize,
    ) -> Result<&mut Self> {
        source.copy_to(self, src_start_sector, start_sector, sector_count)
    }

    fn destination_range(
        &self,
        start_sector: usize,
        len: usize,
    ) -> Result<std::ops::Range<usize>> {
        let total_bytes = self.total_bytes();
        let start = start_sector.checked_mul(self.bytes_per_sector());
        let end = start.and_then(|start| start.checked_add(len));
        verify_range!(
            end.is_some_and(|end| end <= total_bytes),
            "destination sector ({start_sector:#X}) plus {len:#X} bytes exceeds the total number of bytes in the destination ({total_bytes:#X})"
        );
        let start = start_sector * self.bytes_per_sector();
        Ok(start..start + len)
    }
}
