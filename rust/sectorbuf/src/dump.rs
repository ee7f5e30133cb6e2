//! Hex dump rendering.

use std::fmt::{self, Write};

use sectorbuf_common::{Result, error::Error};

use crate::Buffer;

const BYTES_PER_LINE: usize = 16;

/// Number of sectors shown by the `Display` implementation of [`Buffer`].
const DISPLAY_SECTORS: usize = 2;

/// How hex digits are grouped in a dump line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteGrouping {
    /// `00 01 02 03`
    #[default]
    Byte,
    /// `0001 0203`
    Word,
    /// `00010203`
    DWord,
}

impl ByteGrouping {
    /// Hex digits per group.
    fn digits(self) -> usize {
        match self {
            ByteGrouping::Byte => 2,
            ByteGrouping::Word => 4,
            ByteGrouping::DWord => 8,
        }
    }
}

impl Buffer {
    /// Renders the selected sectors as a hex dump.
    ///
    /// Each sector starts with a `Block N` header (N in hex), followed by lines of up
    /// to 16 bytes: a six-digit hex offset, the bytes in hex grouped according to
    /// `grouping`, and the printable ASCII characters with everything else shown as
    /// `.`.
    pub fn to_hex_string(
        &self,
        start_sector: usize,
        sector_count: usize,
        grouping: ByteGrouping,
    ) -> Result<String> {
        let range = self.sector_byte_range(start_sector, sector_count)?;
        let mut out = String::new();
        write_hex_dump(
            &mut out,
            self.as_slice(),
            range.start,
            range.end,
            self.bytes_per_sector(),
            grouping,
        )
        .map_err(|_| Error::runtime("failed to format hex dump"))?;
        Ok(out)
    }
}

impl fmt::Display for Buffer {
    /// Shows the first two sectors, followed by a vertical ellipsis if there are more.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.sector_count().min(DISPLAY_SECTORS);
        write_hex_dump(
            f,
            self.as_slice(),
            0,
            shown * self.bytes_per_sector(),
            self.bytes_per_sector(),
            ByteGrouping::Byte,
        )?;
        if self.sector_count() > DISPLAY_SECTORS {
            f.write_str(".\n.\n.")?;
        }
        Ok(())
    }
}

pub(crate) fn write_hex_dump(
    out: &mut impl Write,
    bytes: &[u8],
    start: usize,
    end: usize,
    sector_size: usize,
    grouping: ByteGrouping,
) -> fmt::Result {
    let group = grouping.digits();
    for i in start..end {
        if sector_size > 0 && i % sector_size == 0 {
            if i > 0 {
                out.write_char('\n')?;
            }
            write!(out, "Block {:X}", i / sector_size)?;
        }

        let offset = if sector_size > 0 { i % sector_size } else { i };
        if offset % BYTES_PER_LINE == 0 {
            write!(out, "\n{i:06X}    ")?;
        }

        write!(out, "{:02X}", bytes[i])?;
        if ((offset + 1) * 2) % group == 0 {
            out.write_char(' ')?;
        }

        if (offset + 1) % BYTES_PER_LINE == 0 || offset + 1 == sector_size {
            // Pad a short line so the ASCII column stays aligned.
            let mut pos = offset + 1;
            while pos % BYTES_PER_LINE != 0 {
                out.write_str("  ")?;
                if (pos * 2) % group == 0 {
                    out.write_char(' ')?;
                }
                pos += 1;
            }
            out.write_str("   ")?;

            let chars = match (offset + 1) % BYTES_PER_LINE {
                0 => BYTES_PER_LINE,
                n => n,
            };
            for &b in &bytes[i + 1 - chars..=i] {
                out.write_char(if (32..=126).contains(&b) { char::from(b) } else { '.' })?;
            }
        }
    }
    out.write_char('\n')
}
