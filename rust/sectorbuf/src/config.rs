use sectorbuf_common::{Result, error::Error, verify_arg};

/// Default sector size, in bytes.
pub const DEFAULT_BYTES_PER_SECTOR: usize = 512;

/// Default number of sectors: 0x10000 is the sector count a 48-bit ATA command
/// transfers when it is issued with a count of zero.
pub const DEFAULT_SECTOR_COUNT: usize = 0x10000;

/// Number of sectors at which per-sector fills are spread across the rayon pool.
pub const DEFAULT_PARALLEL_MIN_SECTORS: usize = 1000;

/// Construction parameters for a [`Buffer`](crate::Buffer).
#[derive(Debug, Clone)]
pub struct BufferConfig {
    /// Number of sectors, at least 1.
    pub sector_count: usize,

    /// Size of one sector in bytes, at least 1.
    pub bytes_per_sector: usize,

    /// Fills that work sector by sector (address overlay, per-sector random) run in
    /// parallel once the selected range holds at least this many sectors.
    pub parallel_min_sectors: usize,

    /// Free-form label.
    pub name: String,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SECTOR_COUNT, DEFAULT_BYTES_PER_SECTOR)
    }
}

impl BufferConfig {
    /// Creates a configuration with the given geometry and default settings otherwise.
    pub fn new(sector_count: usize, bytes_per_sector: usize) -> BufferConfig {
        BufferConfig {
            sector_count,
            bytes_per_sector,
            parallel_min_sectors: DEFAULT_PARALLEL_MIN_SECTORS,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_parallel_min_sectors(mut self, sectors: usize) -> Self {
        self.parallel_min_sectors = sectors;
        self
    }

    /// Validates the geometry.
    pub fn validate(&self) -> Result<()> {
        validate_geometry(self.sector_count, self.bytes_per_sector)
    }

    /// Total number of addressable bytes, or an out-of-range error if it cannot be
    /// represented.
    pub fn total_bytes(&self) -> Result<usize> {
        self.validate()?;
        self.sector_count
            .checked_mul(self.bytes_per_sector)
            .ok_or_else(|| {
                Error::out_of_range(format!(
                    "sectorCount ({:#X}) times bytesPerSector ({:#X}) overflows",
                    self.sector_count, self.bytes_per_sector
                ))
            })
    }
}

pub(crate) fn validate_geometry(sector_count: usize, bytes_per_sector: usize) -> Result<()> {
    verify_arg!(sector_count, sector_count > 0, "sectorCount must be greater than zero");
    verify_arg!(
        bytes_per_sector,
        bytes_per_sector > 0,
        "bytesPerSector must be greater than zero"
    );
    Ok(())
}
