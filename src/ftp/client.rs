use super::{RemoteDirectory, TransferMode};
use crate::errors::{HydroError, Result};
use suppaftp::types::{FileType, FormatControl};
use suppaftp::{FtpError, FtpStream};

impl From<FtpError> for HydroError {
    fn from(err: FtpError) -> Self {
        HydroError::FtpError(err.to_string())
    }
}

impl RemoteDirectory for FtpStream {
    fn list(&mut self, path: Option<&str>) -> Result<Vec<String>> {
        Ok(FtpStream::list(self, path)?)
    }

    fn retrieve(&mut self, name: &str, mode: TransferMode) -> Result<Vec<u8>> {
        let file_type = match mode {
            TransferMode::Binary => FileType::Binary,
            TransferMode::Ascii => FileType::Ascii(FormatControl::Default),
        };
        self.transfer_type(file_type)?;
        Ok(self.retr_as_buffer(name)?.into_inner())
    }
}
