use crate::client::{Api, SynoError};
use crate::codes;
use serde::Deserialize;

/// Response envelope shared by every Synology API
#[derive(Deserialize, Debug)]
pub struct SynologyResponse<D> {
    pub success: bool,
    pub data: Option<D>,
    pub error: Option<ApiErrorInfo>,
}

impl<D> SynologyResponse<D> {
    /// Turns the envelope into its payload or a typed error.
    ///
    /// `success == false` is always reported as [`SynoError::Api`] carrying the
    /// embedded code, or code 100 when the server left it out.
    ///
    /// # Errors
    ///
    /// Returns [`SynoError::Api`] on a failed envelope and
    /// [`SynoError::InvalidResponse`] when a successful envelope carries no data.
    pub fn into_result(self, api: Api) -> Result<D, SynoError> {
        if !self.success {
            return Err(self.api_error(api));
        }
        self.data
            .ok_or_else(|| SynoError::InvalidResponse(format!("No data received from {api}")))
    }

    /// Same as [`Self::into_result`] for calls whose payload is irrelevant.
    ///
    /// # Errors
    ///
    /// Returns [`SynoError::Api`] on a failed envelope.
    pub fn into_empty(self, api: Api) -> Result<(), SynoError> {
        if self.success {
            Ok(())
        } else {
            Err(self.api_error(api))
        }
    }

    fn api_error(&self, api: Api) -> SynoError {
        let code = self
            .error
            .as_ref()
            .map_or(codes::UNKNOWN_ERROR, |error| error.code);
        SynoError::Api {
            code,
            message: codes::describe(api, code).to_string(),
        }
    }
}

/// Error block of a failed envelope.
///
/// DSM sends either `"error": {"code": 408, "errors": [...]}` or a bare
/// `"error": 408`; both decode into this shape.
#[derive(Deserialize, Debug, PartialEq, Eq)]
#[serde(from = "RawApiError")]
pub struct ApiErrorInfo {
    pub code: i32,
    pub errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawApiError {
    Code(i32),
    Detailed {
        code: i32,
        #[serde(default)]
        errors: Vec<ErrorDetail>,
    },
}

impl From<RawApiError> for ApiErrorInfo {
    fn from(raw: RawApiError) -> Self {
        match raw {
            RawApiError::Code(code) => Self {
                code,
                errors: Vec::new(),
            },
            RawApiError::Detailed { code, errors } => Self { code, errors },
        }
    }
}

/// Per-path failure reported inside an error block
#[derive(Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: i32,
    pub path: Option<String>,
}

/// Payload of calls that return nothing useful
#[derive(Deserialize, Debug, Default)]
pub struct EmptyResponse {}

/// Authentication response data
#[derive(Deserialize, Debug)]
pub struct AuthData {
    /// Session ID, sent as `_sid` with every authenticated request
    pub sid: String,
    #[serde(default)]
    pub synotoken: Option<String>,
    #[serde(default)]
    pub did: Option<String>,
    #[serde(default)]
    pub is_portal_port: Option<bool>,
}

/// File Station information for the logged-in user
#[derive(Deserialize, Debug)]
pub struct FileStationInfo {
    /// DSM host name
    pub hostname: String,
    /// Whether the user is an administrator
    pub is_manager: bool,
    /// Whether the user can share files/folders
    pub support_sharing: bool,
    /// Virtual file systems the user can mount, comma separated (e.g. `cifs,iso`)
    #[serde(default)]
    pub support_virtual_protocol: Option<String>,
    #[serde(default)]
    pub support_file_request: Option<bool>,
}

/// Response of every non-blocking task start
#[derive(Deserialize, Debug)]
pub struct BackgroundTask {
    pub taskid: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SharedFolders {
    pub total: u32,
    pub offset: u32,
    #[serde(default)]
    pub shares: Vec<SharedFolder>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SharedFolder {
    pub isdir: bool,
    /// Path of the shared folder, e.g. `/video`
    pub path: String,
    pub name: Option<String>,
    pub additional: Option<Additional>,
}

impl SharedFolder {
    #[must_use]
    pub fn to_file(&self) -> File {
        File {
            path: self.path.clone(),
            name: self.name.clone(),
            isdir: self.isdir,
            children: None,
            additional: self.additional.clone(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct VirtualFolders {
    pub total: u32,
    pub offset: u32,
    #[serde(default)]
    pub folders: Vec<VirtualFolder>,
}

/// Mount point folder of a virtual file system (CIFS, ISO)
#[derive(Deserialize, Debug, Clone)]
pub struct VirtualFolder {
    pub path: String,
    pub name: Option<String>,
    pub additional: Option<Additional>,
}

/// A page of folder contents
#[derive(Deserialize, Debug, Clone)]
pub struct Files {
    pub total: u32,
    pub offset: u32,
    #[serde(default)]
    pub files: Vec<File>,
}

/// File or folder descriptor
#[derive(Deserialize, Debug, Clone)]
pub struct File {
    /// Path starting with a shared folder
    pub path: String,
    pub name: Option<String>,
    pub isdir: bool,
    /// Folder contents, only returned when `goto_path` was requested
    pub children: Option<Files>,
    pub additional: Option<Additional>,
}

/// Result of `getinfo` and `rename`
#[derive(Deserialize, Debug)]
pub struct FileInfoList {
    #[serde(default)]
    pub files: Vec<File>,
}

/// Result of `CreateFolder`
#[derive(Deserialize, Debug)]
pub struct CreatedFolders {
    #[serde(default)]
    pub folders: Vec<File>,
}

/// Optional metadata requested through the `additional` parameter
#[derive(Deserialize, Debug, Default, Clone)]
pub struct Additional {
    /// Real path in the volume, e.g. `/volume1/video`
    pub real_path: Option<String>,
    /// Size in bytes
    pub size: Option<u64>,
    pub owner: Option<Owner>,
    pub time: Option<FileTime>,
    pub perm: Option<Permission>,
    /// Virtual file system type of a mount point
    pub mount_point_type: Option<String>,
    pub volume_status: Option<VolumeStatus>,
    /// File extension
    #[serde(rename = "type")]
    pub file_type: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Owner {
    pub user: String,
    pub group: String,
    pub uid: u32,
    pub gid: u32,
}

/// UNIX timestamps in seconds; see `utils` for the date accessors
#[derive(Deserialize, Debug, Default, Clone)]
pub struct FileTime {
    pub atime: Option<i64>,
    pub mtime: Option<i64>,
    pub ctime: Option<i64>,
    pub crtime: Option<i64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Permission {
    pub posix: Option<u32>,
    pub is_acl_mode: Option<bool>,
    pub share_right: Option<String>,
    pub acl: Option<Acl>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Acl {
    pub append: bool,
    pub del: bool,
    pub exec: bool,
    pub read: bool,
    pub write: bool,
}

/// Volume holding a shared folder
#[derive(Deserialize, Debug, Clone)]
pub struct VolumeStatus {
    pub freespace: u64,
    pub totalspace: u64,
    pub readonly: bool,
}

#[derive(Deserialize, Debug)]
pub struct DirSizeStatus {
    pub finished: bool,
    pub num_dir: u64,
    pub num_file: u64,
    /// Accumulated byte size of the queried paths
    pub total_size: u64,
}

#[derive(Deserialize, Debug)]
pub struct Md5Status {
    pub finished: bool,
    /// Present once the task is finished
    pub md5: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CopyMoveStatus {
    /// Bytes copied/moved so far
    pub processed_size: i64,
    /// Total bytes, -1 while still being calculated
    pub total: i64,
    pub path: String,
    pub finished: bool,
    /// Server-side `processed_size / total`, nominally 0~1
    pub progress: f64,
    pub dest_folder_path: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct DeleteStatus {
    pub processed_num: i64,
    /// Number of files to delete, -1 while still being calculated
    pub total: i64,
    pub path: String,
    /// Path currently being deleted, possibly inside a subfolder
    pub processing_path: Option<String>,
    pub finished: bool,
    pub progress: f64,
}

#[derive(Deserialize, Debug)]
pub struct ExtractStatus {
    pub finished: bool,
    pub progress: f64,
    pub dest_folder_path: String,
}

#[derive(Deserialize, Debug)]
pub struct CompressStatus {
    pub finished: bool,
    pub dest_file_path: Option<String>,
}

/// Reply of the QuickConnect `get_server_info` command
#[derive(Deserialize, Debug)]
pub struct QuickConnectResponse {
    pub command: String,
    pub version: i32,
    pub errno: i32,
    pub service: Option<QuickConnectService>,
}

#[derive(Deserialize, Debug)]
pub struct QuickConnectService {
    pub relay_ip: Option<String>,
    pub relay_port: Option<u16>,
    pub env: Option<QuickConnectEnv>,
}

#[derive(Deserialize, Debug)]
pub struct QuickConnectEnv {
    pub relay_region: String,
    pub control_host: String,
}
