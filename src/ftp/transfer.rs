//! Listing queries and downloads
//!
//! All list queries return entries sorted by file name, with every returned
//! list in the same order. Downloads write `local_dir/<file name>`, set its
//! access and modification time to the remote listing time, and return
//! that path.

use super::listing::{parse_listing, ListingEntry};
use super::{RemoteDirectory, TransferMode};
use crate::errors::{HydroError, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use std::fs::{self, File, FileTimes};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Regular files of `path` as of `today`, sorted by name.
///
/// # Errors
///
/// Returns an error if listing fails or a line cannot be parsed.
pub fn list_entries_at<R: RemoteDirectory + ?Sized>(
    remote: &mut R,
    path: Option<&str>,
    today: NaiveDate,
) -> Result<Vec<ListingEntry>> {
    let lines = remote.list(path)?;
    let mut entries = parse_listing(&lines, today)?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("Listed {} files of {}", entries.len(), path.unwrap_or("."));
    Ok(entries)
}

/// Regular files of `path`, sorted by name, with recent dates resolved
/// against the local date.
///
/// # Errors
///
/// Returns an error if listing fails or a line cannot be parsed.
pub fn list_entries<R: RemoteDirectory + ?Sized>(
    remote: &mut R,
    path: Option<&str>,
) -> Result<Vec<ListingEntry>> {
    list_entries_at(remote, path, Local::now().date_naive())
}

pub fn get_names<R: RemoteDirectory + ?Sized>(remote: &mut R, path: Option<&str>) -> Result<Vec<String>> {
    Ok(list_entries(remote, path)?.into_iter().map(|e| e.name).collect())
}

pub fn get_names_sizes<R: RemoteDirectory + ?Sized>(
    remote: &mut R,
    path: Option<&str>,
) -> Result<(Vec<String>, Vec<u64>)> {
    Ok(list_entries(remote, path)?
        .into_iter()
        .map(|e| (e.name, e.size))
        .unzip())
}

/// File names and modification dates.
pub fn get_names_dates<R: RemoteDirectory + ?Sized>(
    remote: &mut R,
    path: Option<&str>,
) -> Result<(Vec<String>, Vec<NaiveDate>)> {
    Ok(list_entries(remote, path)?
        .into_iter()
        .map(|e| (e.name, e.modified.date()))
        .unzip())
}

pub fn get_names_dates_sizes<R: RemoteDirectory + ?Sized>(
    remote: &mut R,
    path: Option<&str>,
) -> Result<(Vec<String>, Vec<NaiveDate>, Vec<u64>)> {
    let entries = list_entries(remote, path)?;
    let mut names = Vec::with_capacity(entries.len());
    let mut dates = Vec::with_capacity(entries.len());
    let mut sizes = Vec::with_capacity(entries.len());
    for entry in entries {
        names.push(entry.name);
        dates.push(entry.modified.date());
        sizes.push(entry.size);
    }
    Ok((names, dates, sizes))
}

/// Like [`get_names_dates`], keeping the time of day.
pub fn get_names_times<R: RemoteDirectory + ?Sized>(
    remote: &mut R,
    path: Option<&str>,
) -> Result<(Vec<String>, Vec<NaiveDateTime>)> {
    Ok(list_entries(remote, path)?
        .into_iter()
        .map(|e| (e.name, e.modified))
        .unzip())
}

/// Like [`get_names_dates_sizes`], keeping the time of day.
pub fn get_names_times_sizes<R: RemoteDirectory + ?Sized>(
    remote: &mut R,
    path: Option<&str>,
) -> Result<(Vec<String>, Vec<NaiveDateTime>, Vec<u64>)> {
    let entries = list_entries(remote, path)?;
    let mut names = Vec::with_capacity(entries.len());
    let mut times = Vec::with_capacity(entries.len());
    let mut sizes = Vec::with_capacity(entries.len());
    for entry in entries {
        names.push(entry.name);
        times.push(entry.modified);
        sizes.push(entry.size);
    }
    Ok((names, times, sizes))
}

/// File sizes in ascending order.
pub fn get_sizes<R: RemoteDirectory + ?Sized>(remote: &mut R, path: Option<&str>) -> Result<Vec<u64>> {
    let mut sizes: Vec<u64> = list_entries(remote, path)?.into_iter().map(|e| e.size).collect();
    sizes.sort_unstable();
    Ok(sizes)
}

fn single_entry<R: RemoteDirectory + ?Sized>(remote: &mut R, name: &str) -> Result<ListingEntry> {
    list_entries(remote, Some(name))?
        .into_iter()
        .next()
        .ok_or_else(|| HydroError::FtpError(format!("'{name}' is not a remote file")))
}

/// Size of one remote file as shown in its listing.
///
/// # Errors
///
/// Returns [`HydroError::FtpError`] if `name` is not listed as a file.
pub fn get_size<R: RemoteDirectory + ?Sized>(remote: &mut R, name: &str) -> Result<u64> {
    Ok(single_entry(remote, name)?.size)
}

fn local_path(name: &str, local_dir: &Path) -> Result<PathBuf> {
    Path::new(name)
        .file_name()
        .map(|file_name| local_dir.join(file_name))
        .ok_or_else(|| HydroError::Generic(format!("No file name in '{name}'")))
}

/// Downloads `name` unchanged, with the remote modification time.
///
/// # Errors
///
/// Returns an error if the retrieval or the local write fails.
pub fn get_binary<R: RemoteDirectory + ?Sized, P: AsRef<Path>>(
    remote: &mut R,
    name: &str,
    local_dir: P,
) -> Result<PathBuf> {
    let path = local_path(name, local_dir.as_ref())?;
    let data = remote.retrieve(name, TransferMode::Binary)?;
    fs::write(&path, &data)?;
    info!("Downloaded {name} ({} bytes) to {}", data.len(), path.display());
    sync_mtime(remote, name, &path)?;
    Ok(path)
}

fn get_ascii<R: RemoteDirectory + ?Sized>(
    remote: &mut R,
    name: &str,
    local_dir: &Path,
    eol: &str,
) -> Result<PathBuf> {
    let path = local_path(name, local_dir)?;
    let data = remote.retrieve(name, TransferMode::Ascii)?;
    let text = String::from_utf8_lossy(&data);

    let mut writer = BufWriter::new(File::create(&path)?);
    for line in text.lines() {
        writer.write_all(line.as_bytes())?;
        writer.write_all(eol.as_bytes())?;
    }
    writer.flush()?;
    info!("Downloaded {name} as text to {}", path.display());
    sync_mtime(remote, name, &path)?;
    Ok(path)
}

/// Downloads a text file with `\n` line endings, with the remote
/// modification time.
///
/// # Errors
///
/// Returns an error if the retrieval or the local write fails.
pub fn get_unix_ascii<R: RemoteDirectory + ?Sized, P: AsRef<Path>>(
    remote: &mut R,
    name: &str,
    local_dir: P,
) -> Result<PathBuf> {
    get_ascii(remote, name, local_dir.as_ref(), "\n")
}

/// Downloads a text file with `\r\n` line endings, with the remote
/// modification time.
///
/// # Errors
///
/// Returns an error if the retrieval or the local write fails.
pub fn get_windows_ascii<R: RemoteDirectory + ?Sized, P: AsRef<Path>>(
    remote: &mut R,
    name: &str,
    local_dir: P,
) -> Result<PathBuf> {
    get_ascii(remote, name, local_dir.as_ref(), "\r\n")
}

fn sizes_match(name: &str, path: &Path, remote_size: u64) -> Result<bool> {
    let local_size = fs::metadata(path)?.len();
    if local_size != remote_size {
        warn!("Size of {name} differs: remote {remote_size}, local {local_size}");
    }
    Ok(local_size == remote_size)
}

/// [`get_binary`], then `true` if the local size equals the listed size.
pub fn get_check_binary<R: RemoteDirectory + ?Sized, P: AsRef<Path>>(
    remote: &mut R,
    name: &str,
    local_dir: P,
) -> Result<bool> {
    let remote_size = get_size(remote, name)?;
    let path = get_binary(remote, name, local_dir)?;
    sizes_match(name, &path, remote_size)
}

/// [`get_unix_ascii`], then `true` if the local size equals the listed size.
pub fn get_check_unix_ascii<R: RemoteDirectory + ?Sized, P: AsRef<Path>>(
    remote: &mut R,
    name: &str,
    local_dir: P,
) -> Result<bool> {
    let remote_size = get_size(remote, name)?;
    let path = get_unix_ascii(remote, name, local_dir)?;
    sizes_match(name, &path, remote_size)
}

/// [`get_windows_ascii`], then `true` if the local size equals the listed size.
pub fn get_check_windows_ascii<R: RemoteDirectory + ?Sized, P: AsRef<Path>>(
    remote: &mut R,
    name: &str,
    local_dir: P,
) -> Result<bool> {
    let remote_size = get_size(remote, name)?;
    let path = get_windows_ascii(remote, name, local_dir)?;
    sizes_match(name, &path, remote_size)
}

/// Sets access and modification time of the downloaded copy of `name` to
/// the remote listing time, read as local time.
///
/// # Errors
///
/// Returns an error if the local file is missing, the listing time does
/// not exist in the local time zone, or the times cannot be set.
pub fn set_mtime<R: RemoteDirectory + ?Sized, P: AsRef<Path>>(
    remote: &mut R,
    name: &str,
    local_dir: P,
) -> Result<SystemTime> {
    let path = local_path(name, local_dir.as_ref())?;
    sync_mtime(remote, name, &path)
}

fn sync_mtime<R: RemoteDirectory + ?Sized>(remote: &mut R, name: &str, path: &Path) -> Result<SystemTime> {
    let modified = single_entry(remote, name)?.modified;
    let local = Local
        .from_local_datetime(&modified)
        .earliest()
        .ok_or_else(|| HydroError::Generic(format!("{modified} does not exist in local time")))?;
    let time = SystemTime::from(local);

    let file = File::options().write(true).open(path)?;
    file.set_times(FileTimes::new().set_accessed(time).set_modified(time))?;
    debug!("Set times of {} to {local}", path.display());
    Ok(time)
}
