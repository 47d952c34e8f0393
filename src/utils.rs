use crate::entities::{
    Additional, CopyMoveStatus, DeleteStatus, DirSizeStatus, ExtractStatus, File, FileTime,
    VolumeStatus,
};
use byte_unit::{Byte, UnitType};
use chrono::{DateTime, Utc};

/// Formats a byte count with a decimal unit, e.g. `1.23 GB`
#[must_use]
pub fn human_size(bytes: u64) -> String {
    let size = Byte::from(bytes);
    format!("{:#.2}", size.get_appropriate_unit(UnitType::Decimal))
}

/// Converts a UNIX timestamp in seconds to a UTC date
#[must_use]
pub fn timestamp_to_date(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl File {
    /// File name, or the last path segment when the server sent none
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| {
            self.path
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .filter(|segment| !segment.is_empty())
                .unwrap_or(&self.path)
        })
    }

    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.additional.as_ref().and_then(|additional| additional.size)
    }
}

impl Additional {
    #[must_use]
    pub fn human_size(&self) -> String {
        self.size.map(human_size).unwrap_or_default()
    }
}

impl FileTime {
    #[must_use]
    pub fn accessed(&self) -> Option<DateTime<Utc>> {
        self.atime.and_then(timestamp_to_date)
    }

    #[must_use]
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.mtime.and_then(timestamp_to_date)
    }

    #[must_use]
    pub fn changed(&self) -> Option<DateTime<Utc>> {
        self.ctime.and_then(timestamp_to_date)
    }

    #[must_use]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.crtime.and_then(timestamp_to_date)
    }
}

impl VolumeStatus {
    #[must_use]
    pub fn human_free(&self) -> String {
        human_size(self.freespace)
    }

    #[must_use]
    pub fn human_total(&self) -> String {
        human_size(self.totalspace)
    }

    /// Share of the volume in use, within 0~1
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn used_fraction(&self) -> f64 {
        if self.totalspace == 0 {
            return 0.0;
        }
        let used = self.totalspace.saturating_sub(self.freespace);
        clamp_fraction(used as f64 / self.totalspace as f64)
    }
}

impl DirSizeStatus {
    #[must_use]
    pub fn human_size(&self) -> String {
        human_size(self.total_size)
    }
}

impl CopyMoveStatus {
    /// Progress within 0~1; a finished task is always 1
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.finished {
            1.0
        } else {
            clamp_fraction(self.progress)
        }
    }

    /// Bytes still to be processed, `None` while the total is being calculated
    #[must_use]
    pub fn remaining(&self) -> Option<u64> {
        u64::try_from(self.total)
            .ok()
            .map(|total| total.saturating_sub(u64::try_from(self.processed_size).unwrap_or(0)))
    }
}

impl DeleteStatus {
    /// Progress within 0~1; a finished task is always 1
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.finished {
            1.0
        } else {
            clamp_fraction(self.progress)
        }
    }
}

impl ExtractStatus {
    /// Progress within 0~1; a finished task is always 1
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.finished {
            1.0
        } else {
            clamp_fraction(self.progress)
        }
    }
}
