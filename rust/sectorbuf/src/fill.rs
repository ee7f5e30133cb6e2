//! Fill-pattern generators.
//!
//! Every fill takes a sector range `(start_sector, sector_count)` where a count of 0
//! selects all sectors to the end of the buffer. The range is validated before any
//! byte is written.

use byteorder::{ByteOrder, LittleEndian};
use log::trace;
use rayon::prelude::*;
use sectorbuf_common::{Result, verify_arg};
use sectorbuf_random::{Random32, SeededRandomSource};

use crate::Buffer;

/// Largest span copied in one step when replicating a pattern.
const MAX_REPLICATION_SPAN: usize = 4096;

impl Buffer {
    /// Sets every byte of the range to `value`.
    pub fn fill(&mut self, value: u8, start_sector: usize, sector_count: usize) -> Result<&mut Self> {
        let range = self.sector_byte_range(start_sector, sector_count)?;
        self.as_mut_slice()[range].fill(value);
        Ok(self)
    }

    pub fn fill_ones(&mut self, start_sector: usize, sector_count: usize) -> Result<&mut Self> {
        self.fill(0xFF, start_sector, sector_count)
    }

    pub fn fill_zeros(&mut self, start_sector: usize, sector_count: usize) -> Result<&mut Self> {
        self.fill(0, start_sector, sector_count)
    }

    /// Writes `start_value + i` (mod 256) to byte `i` of the first sector of the range
    /// and repeats that sector over the rest of the range.
    pub fn fill_incrementing(
        &mut self,
        start_value: u8,
        start_sector: usize,
        sector_count: usize,
    ) -> Result<&mut Self> {
        self.fill_sector_pattern(start_sector, sector_count, |i| {
            start_value.wrapping_add(i as u8)
        })
    }

    /// Writes `start_value - i` (mod 256) to byte `i` of the first sector of the range
    /// and repeats that sector over the rest of the range.
    pub fn fill_decrementing(
        &mut self,
        start_value: u8,
        start_sector: usize,
        sector_count: usize,
    ) -> Result<&mut Self> {
        self.fill_sector_pattern(start_sector, sector_count, |i| {
            start_value.wrapping_sub(i as u8)
        })
    }

    /// Repeats `pattern` over the range. An empty pattern leaves the buffer unchanged.
    pub fn fill_bytes(
        &mut self,
        pattern: &[u8],
        start_sector: usize,
        sector_count: usize,
    ) -> Result<&mut Self> {
        if pattern.is_empty() {
            return Ok(self);
        }
        let range = self.sector_byte_range(start_sector, sector_count)?;
        let data = &mut self.as_mut_slice()[range];
        let head = pattern.len().min(data.len());
        data[..head].copy_from_slice(&pattern[..head]);
        replicate_pattern(data, pattern.len());
        Ok(self)
    }

    /// Writes the 64-bit little-endian value `start_value + k` into the first and the
    /// last eight bytes of the k-th sector of the range.
    ///
    /// Requires `bytes_per_sector` to be a multiple of 8.
    pub fn fill_address_overlay(
        &mut self,
        start_value: u64,
        start_sector: usize,
        sector_count: usize,
    ) -> Result<&mut Self> {
        let bytes_per_sector = self.bytes_per_sector();
        verify_arg!(
            bytes_per_sector,
            bytes_per_sector % 8 == 0,
            "address overlay requires a sector size that is a multiple of 8, got {bytes_per_sector}"
        );
        let sector_count = self.resolve_sector_count(start_sector, sector_count)?;
        Self::verify_counter_max(start_sector + sector_count)?;

        let parallel = sector_count >= self.parallel_min_sectors();
        let range = self.sector_byte_range(start_sector, sector_count)?;
        let data = &mut self.as_mut_slice()[range];

        let overlay = |(k, sector): (usize, &mut [u8])| {
            let value = start_value.wrapping_add(k as u64);
            let last = sector.len() - 8;
            LittleEndian::write_u64(&mut sector[..8], value);
            LittleEndian::write_u64(&mut sector[last..], value);
        };

        if parallel {
            trace!("address overlay over {sector_count} sectors in parallel");
            data.par_chunks_exact_mut(bytes_per_sector)
                .enumerate()
                .for_each(overlay);
        } else {
            data.chunks_exact_mut(bytes_per_sector)
                .enumerate()
                .for_each(overlay);
        }
        Ok(self)
    }

    /// Fills the range with 32-bit words from an unseeded random source.
    ///
    /// Requires `bytes_per_sector` to be a multiple of 4.
    pub fn fill_random(&mut self, start_sector: usize, sector_count: usize) -> Result<&mut Self> {
        self.fill_random_impl(None, start_sector, sector_count)
    }

    /// Fills the range with 32-bit words from the buffer's random source re-seeded with
    /// `seed`. The same seed over the same range always yields the same bytes.
    ///
    /// Requires `bytes_per_sector` to be a multiple of 4.
    pub fn fill_random_seeded(
        &mut self,
        seed: u32,
        start_sector: usize,
        sector_count: usize,
    ) -> Result<&mut Self> {
        self.fill_random_impl(Some(seed), start_sector, sector_count)
    }

    /// Fills each sector `k` of the range from its own generator seeded with
    /// `seed + k`, so the content of a sector does not depend on its neighbours or on
    /// how many sectors are filled together.
    ///
    /// Requires `bytes_per_sector` to be a multiple of 4.
    pub fn fill_random_seeded_by_sector(
        &mut self,
        seed: u32,
        start_sector: usize,
        sector_count: usize,
    ) -> Result<&mut Self> {
        self.verify_random_sector_size()?;
        let sector_count = self.resolve_sector_count(start_sector, sector_count)?;
        Self::verify_counter_max(start_sector + sector_count)?;

        let template = prepare_random(&mut self.random, Some(seed)).clone();
        let bytes_per_sector = self.bytes_per_sector();
        let parallel = sector_count >= self.parallel_min_sectors();
        let range = self.sector_byte_range(start_sector, sector_count)?;
        let data = &mut self.as_mut_slice()[range];

        let fill_sector = |(k, sector): (usize, &mut [u8])| {
            let mut random = template.clone();
            random.seed(seed.wrapping_add(k as u32));
            fill_random_words(&mut random, sector);
        };

        if parallel {
            trace!("per-sector random fill over {sector_count} sectors in parallel");
            data.par_chunks_exact_mut(bytes_per_sector)
                .enumerate()
                .for_each(fill_sector);
        } else {
            data.chunks_exact_mut(bytes_per_sector)
                .enumerate()
                .for_each(fill_sector);
        }
        Ok(self)
    }

    fn fill_random_impl(
        &mut self,
        seed: Option<u32>,
        start_sector: usize,
        sector_count: usize,
    ) -> Result<&mut Self> {
        self.verify_random_sector_size()?;
        let range = self.sector_byte_range(start_sector, sector_count)?;

        // Detach the source so the data can be borrowed mutably alongside it.
        let mut random = self.random.take();
        fill_random_words(
            prepare_random(&mut random, seed),
            &mut self.as_mut_slice()[range],
        );
        self.random = random;
        Ok(self)
    }

    fn verify_random_sector_size(&self) -> Result<()> {
        let bytes_per_sector = self.bytes_per_sector();
        verify_arg!(
            bytes_per_sector,
            bytes_per_sector % 4 == 0,
            "random fill requires a sector size that is a multiple of 4, got {bytes_per_sector}"
        );
        Ok(())
    }

    /// Computes the first sector of the range byte by byte and replicates it.
    fn fill_sector_pattern(
        &mut self,
        start_sector: usize,
        sector_count: usize,
        byte_at: impl Fn(usize) -> u8,
    ) -> Result<&mut Self> {
        let range = self.sector_byte_range(start_sector, sector_count)?;
        let bytes_per_sector = self.bytes_per_sector();
        let data = &mut self.as_mut_slice()[range];
        data[..bytes_per_sector]
            .iter_mut()
            .enumerate()
            .for_each(|(i, b)| *b = byte_at(i));
        replicate_pattern(data, bytes_per_sector);
        Ok(self)
    }
}

/// Whole-buffer conveniences.
impl Buffer {
    pub fn fill_all(&mut self, value: u8) -> Result<&mut Self> {
        self.fill(value, 0, 0)
    }

    pub fn fill_ones_all(&mut self) -> Result<&mut Self> {
        self.fill_ones(0, 0)
    }

    pub fn fill_zeros_all(&mut self) -> Result<&mut Self> {
        self.fill_zeros(0, 0)
    }

    pub fn fill_incrementing_all(&mut self, start_value: u8) -> Result<&mut Self> {
        self.fill_incrementing(start_value, 0, 0)
    }

    /// Decrementing fill over the whole buffer, starting at 255.
    pub fn fill_decrementing_all(&mut self) -> Result<&mut Self> {
        self.fill_decrementing(0xFF, 0, 0)
    }

    pub fn fill_bytes_all(&mut self, pattern: &[u8]) -> Result<&mut Self> {
        self.fill_bytes(pattern, 0, 0)
    }

    pub fn fill_address_overlay_all(&mut self, start_value: u64) -> Result<&mut Self> {
        self.fill_address_overlay(start_value, 0, 0)
    }

    pub fn fill_random_all(&mut self) -> Result<&mut Self> {
        self.fill_random(0, 0)
    }

    pub fn fill_random_seeded_all(&mut self, seed: u32) -> Result<&mut Self> {
        self.fill_random_seeded(seed, 0, 0)
    }

    pub fn fill_random_seeded_by_sector_all(&mut self, seed: u32) -> Result<&mut Self> {
        self.fill_random_seeded_by_sector(seed, 0, 0)
    }
}

/// Repeats `data[..pattern_len]` over the rest of `data`.
///
/// The copied span doubles after each step until it reaches
/// [`MAX_REPLICATION_SPAN`], so it always stays a multiple of `pattern_len`.
fn replicate_pattern(data: &mut [u8], pattern_len: usize) {
    let mut span = pattern_len;
    let mut pos = pattern_len;
    while pos < data.len() {
        let len = span.min(data.len() - pos);
        data.copy_within(..len, pos);
        pos += len;
        if span < MAX_REPLICATION_SPAN {
            span *= 2;
        }
    }
}

/// Returns the buffer's random source, creating it on first use.
///
/// A seeded request re-seeds the existing source. An unseeded request after a seeded
/// one resets the source to a fresh unseeded state.
fn prepare_random(random: &mut Option<Random32>, seed: Option<u32>) -> &mut Random32 {
    let source = random.get_or_insert_with(Random32::new);
    match seed {
        Some(seed) => source.seed(seed),
        None if source.is_seeded() => source.reset(),
        None => {}
    }
    source
}

/// Writes successive 32-bit little-endian words; `data.len()` must be a multiple of 4.
fn fill_random_words(random: &mut impl SeededRandomSource, data: &mut [u8]) {
    for word in data.chunks_exact_mut(4) {
        LittleEndian::write_u32(word, random.next32());
    }
}
