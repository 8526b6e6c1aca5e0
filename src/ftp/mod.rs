//! Listing and downloading files from FTP servers
//!
//! The helpers work against any [`RemoteDirectory`]. With the `ftp` cargo
//! feature, `suppaftp::FtpStream` implements it directly:
//!
//! ```ignore
//! use hydrokit::ftp::{get_check_binary, get_names};
//!
//! let mut ftp = suppaftp::FtpStream::connect("ftp.example.org:21")?;
//! ftp.login("anonymous", "")?;
//! for name in get_names(&mut ftp, None)? {
//!     get_check_binary(&mut ftp, &name, "downloads")?;
//! }
//! ```

#[cfg(feature = "ftp")]
mod client;
pub mod listing;
pub mod transfer;

use crate::errors::Result;

pub use listing::{parse_listing, ListingEntry};
pub use transfer::{
    get_binary, get_check_binary, get_check_unix_ascii, get_check_windows_ascii, get_names,
    get_names_dates, get_names_dates_sizes, get_names_sizes, get_names_times,
    get_names_times_sizes, get_size, get_sizes, get_unix_ascii, get_windows_ascii, list_entries,
    list_entries_at, set_mtime,
};

/// Transfer type requested from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Binary,
    Ascii,
}

/// A remote directory that can be listed and read from
pub trait RemoteDirectory {
    /// Long-format (`ls -l`) listing lines of `path`, or of the current
    /// directory if `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses the listing.
    fn list(&mut self, path: Option<&str>) -> Result<Vec<String>>;

    /// Contents of the remote file `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be retrieved.
    fn retrieve(&mut self, name: &str, mode: TransferMode) -> Result<Vec<u8>>;
}
