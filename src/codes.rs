//! Descriptions of the numeric error codes returned in failed envelopes.
//!
//! Codes below 400 are shared by every API. Codes from 400 up are
//! API specific: `SYNO.API.Auth` reuses 400..410 with its own meaning,
//! the File Station APIs share 400..421 and 599 and add a block of their own.

use crate::client::Api;

pub const UNKNOWN_ERROR: i32 = 100;

/// Returns the vendor description of `code` in the context of `api`
#[must_use]
pub fn describe(api: Api, code: i32) -> &'static str {
    common(code)
        .or_else(|| match api {
            Api::Auth => auth(code),
            _ => api_specific(api, code).or_else(|| file_station(code)),
        })
        .unwrap_or("Unknown error")
}

fn common(code: i32) -> Option<&'static str> {
    Some(match code {
        100 => "Unknown error",
        101 => "No parameter of API, method or version",
        102 => "The requested API does not exist",
        103 => "The requested method does not exist",
        104 => "The requested version does not support the functionality",
        105 => "The logged in session does not have permission",
        106 => "Session timeout",
        107 => "Session interrupted by duplicate login",
        119 => "SID not found",
        _ => return None,
    })
}

fn auth(code: i32) -> Option<&'static str> {
    Some(match code {
        400 => "No such account or incorrect password",
        401 => "Account disabled",
        402 => "Permission denied",
        403 => "2-step verification code required",
        404 => "Failed to authenticate 2-step verification code",
        406 => "Enforce to authenticate with 2-factor authentication code",
        407 => "Blocked IP source",
        408 => "Expired password cannot change",
        409 => "Expired password",
        410 => "Password must be changed",
        _ => return None,
    })
}

fn file_station(code: i32) -> Option<&'static str> {
    Some(match code {
        400 => "Invalid parameter of file operation",
        401 => "Unknown error of file operation",
        402 => "System is too busy",
        403 => "Invalid user does this file operation",
        404 => "Invalid group does this file operation",
        405 => "Invalid user and group does this file operation",
        406 => "Can't get user/group information from the account server",
        407 => "Operation not permitted",
        408 => "No such file or directory",
        409 => "Non-supported file system",
        410 => "Failed to connect internet-based file system",
        411 => "Read-only file system",
        412 => "Filename too long in the non-encrypted file system",
        413 => "Filename too long in the encrypted file system",
        414 => "File already exists",
        415 => "Disk quota exceeded",
        416 => "No space left on device",
        417 => "Input/output error",
        418 => "Illegal name or path",
        419 => "Illegal file name",
        420 => "Illegal file name on FAT file system",
        421 => "Device or resource busy",
        599 => "No such task of the file operation",
        _ => return None,
    })
}

fn api_specific(api: Api, code: i32) -> Option<&'static str> {
    Some(match (api, code) {
        (Api::Delete, 900) => "Failed to delete file(s)/folder(s)",
        (Api::CopyMove, 1000) => "Failed to copy files/folders",
        (Api::CopyMove, 1001) => "Failed to move files/folders",
        (Api::CopyMove, 1002) => "An error occurred at the destination",
        (Api::CopyMove, 1003) => {
            "Cannot overwrite or skip the existing file because no overwrite parameter is given"
        }
        (Api::CopyMove, 1004) => {
            "File cannot overwrite a folder with the same name, or folder cannot overwrite a file with the same name"
        }
        (Api::CopyMove, 1006) => {
            "Cannot copy/move file/folder with special characters to a FAT32 file system"
        }
        (Api::CopyMove, 1007) => "Cannot copy/move a file bigger than 4G to a FAT32 file system",
        (Api::CreateFolder, 1100) => "Failed to create a folder",
        (Api::CreateFolder, 1101) => "The number of folders exceeds the system limitation",
        (Api::Rename, 1200) => "Failed to rename it",
        (Api::Compress, 1300) => "Failed to compress files/folders",
        (Api::Compress, 1301) => "Cannot create the archive because the given archive name is too long",
        (Api::Extract, 1400) => "Failed to extract files",
        (Api::Extract, 1401) => "Cannot open the file as archive",
        (Api::Extract, 1402) => "Failed to read archive data error",
        (Api::Extract, 1403) => "Wrong password",
        (Api::Extract, 1404) => "Failed to get the file and dir list in an archive",
        (Api::Extract, 1405) => "Failed to find the item ID in an archive",
        (Api::Upload, 1800) => {
            "There is no Content-Length information in the HTTP header or the received size doesn't match"
        }
        (Api::Upload, 1801) => "Wait too long, no data can be received from client",
        (Api::Upload, 1802) => "No filename information in the last part of file content",
        (Api::Upload, 1803) => "Upload connection is cancelled",
        (Api::Upload, 1804) => "Failed to upload too big file to FAT file system",
        (Api::Upload, 1805) => {
            "Can't overwrite or skip the existing file, if no overwrite parameter is given"
        }
        _ => return None,
    })
}
