use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::{debug, trace};

/// Determine the calendar date to stamp onto an image.
///
/// EXIF capture dates win over the file modification time; the mtime
/// fallback is only consulted when enabled and no usable EXIF date exists.
/// Returns `None` when neither source yields a date - the caller decides
/// between skipping the file and a placeholder text.
pub fn resolve_date(path: &Path, use_mtime_fallback: bool) -> Option<NaiveDate> {
    if let Some(date) = extract_exif_date(path) {
        return Some(date);
    }

    if use_mtime_fallback
        && let Some(date) = modified_date(path)
    {
        debug!("using mtime date {} for {}", date, path.display());
        return Some(date);
    }

    None
}

fn extract_exif_date(path: &Path) -> Option<NaiveDate> {
    let exif_data = match rexif::parse_file(path) {
        Ok(exif_data) => exif_data,
        Err(e) => {
            trace!("No EXIF data for {}: {}", path.display(), e);
            return None;
        }
    };

    // DateTimeOriginal ("date taken") is preferred over the generic DateTime
    let date_fields = [rexif::ExifTag::DateTimeOriginal, rexif::ExifTag::DateTime];

    for field in &date_fields {
        if let Some(entry) = exif_data.entries.iter().find(|e| e.tag == *field)
            && let Some(date) = parse_exif_datetime(&entry.value_more_readable)
        {
            debug!("Found capture date in {:?}: {}", field, date);
            return Some(date);
        }
    }

    None
}

/// Parse the fixed EXIF datetime pattern, e.g. "2005:07:30 07:22:46".
/// Anything that does not match is treated as no date at all.
pub(crate) fn parse_exif_datetime(datetime_str: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(datetime_str.trim(), "%Y:%m:%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

fn modified_date(path: &Path) -> Option<NaiveDate> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(modified).date_naive())
}
