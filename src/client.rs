use crate::client::SynoError::*;
use crate::entities::{
    AuthData, BackgroundTask, CompressStatus, CopyMoveStatus, CreatedFolders, DeleteStatus,
    DirSizeStatus, EmptyResponse, ExtractStatus, FileInfoList, FileStationInfo, Files,
    Md5Status, QuickConnectResponse, QuickConnectService, SharedFolders, SynologyResponse,
    VirtualFolders,
};
use crate::options::{CompressOptions, CopyMoveOptions, DeleteOptions, ExtractOptions, flag};
use anyhow::{Context, Result};
use futures_util::StreamExt;
use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Part;
use reqwest::{Client, Response, multipart};
use serde::de::DeserializeOwned;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

const API_PATH: &str = "/webapi/entry.cgi";
/// Connect and per-read timeout used when none is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;
const QUICKCONNECT_URL: &str = "https://global.quickconnect.to/Serv.php";
const SHARE_ADDITIONAL: &str =
    r#"["real_path","owner","time","perm","mount_point_type","volume_status"]"#;
const FILE_ADDITIONAL: &str = r#"["real_path","size","owner","time","perm","type"]"#;
const VIRTUAL_ADDITIONAL: &str =
    r#"["real_path","size","owner","time","perm","mount_point_type","volume_status"]"#;

/// Custom error types for the [`SynoFS`] client
#[derive(Error, Debug)]
pub enum SynoError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Synology API error: code={code}, message={message}")]
    Api { code: i32, message: String },

    #[error("Network request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    #[error("JSON deserialization error: {0}")]
    Decode(String),

    #[error("Environment variable error: {0}")]
    Environment(#[from] env::VarError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input parameter: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// APIs reachable through `entry.cgi`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    Auth,
    Info,
    List,
    VirtualFolder,
    CreateFolder,
    Rename,
    DirSize,
    Md5,
    CopyMove,
    Delete,
    Extract,
    Compress,
    Upload,
    Download,
}

impl Api {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Api::Auth => "SYNO.API.Auth",
            Api::Info => "SYNO.FileStation.Info",
            Api::List => "SYNO.FileStation.List",
            Api::VirtualFolder => "SYNO.FileStation.VirtualFolder",
            Api::CreateFolder => "SYNO.FileStation.CreateFolder",
            Api::Rename => "SYNO.FileStation.Rename",
            Api::DirSize => "SYNO.FileStation.DirSize",
            Api::Md5 => "SYNO.FileStation.MD5",
            Api::CopyMove => "SYNO.FileStation.CopyMove",
            Api::Delete => "SYNO.FileStation.Delete",
            Api::Extract => "SYNO.FileStation.Extract",
            Api::Compress => "SYNO.FileStation.Compress",
            Api::Upload => "SYNO.FileStation.Upload",
            Api::Download => "SYNO.FileStation.Download",
        }
    }

    #[must_use]
    pub fn version(self) -> &'static str {
        match self {
            Api::Auth => "6",
            Api::CopyMove | Api::Compress => "3",
            _ => "2",
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Synology File Station client
pub struct SynoFS {
    host: String,
    username: String,
    password: String,
    session: String,
    client: Client,
    sid: String,
}

impl SynoFS {
    /// Creates a new `SynoFS` client with the given host, credentials and timeout
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Username, password, or host URL is empty
    /// - Host URL doesn't start with "http://" or "https://"
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(host: String, username: String, password: String, timeout_ms: u64) -> Result<Self> {
        if username.is_empty() {
            return Err(Configuration("Username cannot be empty".into()).into());
        }

        if password.is_empty() {
            return Err(Configuration("Password cannot be empty".into()).into());
        }

        if host.is_empty() {
            return Err(Configuration("Host URL cannot be empty".into()).into());
        }

        if !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(Configuration(format!(
                "Host URL must start with http:// or https://, got: {host}"
            ))
            .into());
        }

        let host = host.trim_end_matches('/').to_string();

        Ok(Self {
            host,
            username,
            password,
            session: String::from("FileStation"),
            client: create_client(timeout_ms),
            sid: String::new(),
        })
    }

    /// Creates a new `SynoFS` client with a builder pattern
    #[must_use]
    pub fn builder() -> SynoFSBuilder {
        SynoFSBuilder::default()
    }

    #[must_use]
    pub fn is_authorized(&self) -> bool {
        !self.sid.is_empty()
    }

    /// Logs in and keeps the session ID for the following requests
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Network request fails
    /// - Credentials are rejected ([`SynoError::Api`] with code 400)
    /// - Response cannot be parsed
    pub async fn authorize(&mut self) -> Result<()> {
        let params = [
            ("method", "login"),
            ("account", self.username.as_str()),
            ("passwd", self.password.as_str()),
            ("session", self.session.as_str()),
            ("format", "sid"),
        ];

        let auth = self
            .request::<AuthData>(Api::Auth, &params)
            .await
            .context("Failed to authorize")?;

        if auth.sid.is_empty() {
            return Err(Auth("Server returned an empty session ID".into()).into());
        }

        debug!("Authorized as {}", self.username);
        self.sid = auth.sid;
        Ok(())
    }

    /// Ends the current session
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not authorized or the request fails
    pub async fn logout(&mut self) -> Result<()> {
        let params = [("method", "logout"), ("session", self.session.as_str())];

        self.request_empty(Api::Auth, &params)
            .await
            .context("Failed to log out")?;

        self.sid.clear();
        Ok(())
    }

    /// Gets File Station information for the logged-in user
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the session is invalid
    pub async fn get_info(&self) -> Result<FileStationInfo> {
        self.request(Api::Info, &[("method", "get")])
            .await
            .context("Failed to get File Station info")
    }

    /// Lists the shared folders visible to the user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Network request fails
    /// - API returns an error response
    /// - Session is invalid or expired
    pub async fn list_shares(&self, offset: u32, limit: u32) -> Result<SharedFolders> {
        let offset = offset.to_string();
        let limit = limit.to_string();
        let params = [
            ("method", "list_share"),
            ("offset", offset.as_str()),
            ("limit", limit.as_str()),
            ("additional", SHARE_ADDITIONAL),
        ];

        self.request(Api::List, &params)
            .await
            .context("Failed to list shared folders")
    }

    /// Lists the files of a folder. A `limit` of 0 returns everything.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Folder path is empty
    /// - Network request fails
    /// - API returns an error response (e.g. 408 for a missing folder)
    pub async fn list_folder(&self, folder_path: &str, offset: u32, limit: u32) -> Result<Files> {
        require("Folder path", folder_path)?;

        let offset = offset.to_string();
        let limit = limit.to_string();
        let params = [
            ("method", "list"),
            ("folder_path", folder_path),
            ("offset", offset.as_str()),
            ("limit", limit.as_str()),
            ("additional", FILE_ADDITIONAL),
        ];

        self.request(Api::List, &params)
            .await
            .with_context(|| format!("Failed to list folder {folder_path}"))
    }

    /// Gets information about files or folders
    ///
    /// # Errors
    ///
    /// Returns an error if the path list is empty or the request fails
    pub async fn get_file_info(&self, paths: &[&str]) -> Result<FileInfoList> {
        let path = json_list(paths, "Paths")?;
        let params = [
            ("method", "getinfo"),
            ("path", path.as_str()),
            ("additional", FILE_ADDITIONAL),
        ];

        self.request(Api::List, &params)
            .await
            .context("Failed to get file info")
    }

    /// Lists mount point folders of a virtual file system, e.g. `cifs` or `iso`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn list_virtual_folders(&self, fs_type: &str) -> Result<VirtualFolders> {
        require("File system type", fs_type)?;

        let params = [
            ("method", "list"),
            ("type", fs_type),
            ("additional", VIRTUAL_ADDITIONAL),
        ];

        self.request(Api::VirtualFolder, &params)
            .await
            .context("Failed to list virtual folders")
    }

    /// Creates `name` inside `folder_path`
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is empty or the server refuses
    pub async fn create_folder(
        &self,
        folder_path: &str,
        name: &str,
        force_parent: bool,
    ) -> Result<CreatedFolders> {
        require("Folder path", folder_path)?;
        require("Folder name", name)?;

        let params = [
            ("method", "create"),
            ("folder_path", folder_path),
            ("name", name),
            ("force_parent", flag(force_parent)),
            ("additional", FILE_ADDITIONAL),
        ];

        self.request(Api::CreateFolder, &params)
            .await
            .with_context(|| format!("Failed to create folder {name} in {folder_path}"))
    }

    /// Renames the file or folder at `path` to `name`
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is empty or the server refuses
    pub async fn rename(&self, path: &str, name: &str) -> Result<FileInfoList> {
        require("Path", path)?;
        require("New name", name)?;

        let params = [
            ("method", "rename"),
            ("path", path),
            ("name", name),
            ("additional", FILE_ADDITIONAL),
        ];

        self.request(Api::Rename, &params)
            .await
            .with_context(|| format!("Failed to rename {path}"))
    }

    /// Starts calculating the accumulated size of `paths`, returns the task ID
    ///
    /// # Errors
    ///
    /// Returns an error if the path list is empty or the task cannot be started
    pub async fn start_dir_size(&self, paths: &[&str]) -> Result<String> {
        let path = json_list(paths, "Paths")?;
        self.start_task(Api::DirSize, &[("path", path.as_str())])
            .await
            .context("Failed to start directory size task")
    }

    /// # Errors
    ///
    /// Returns an error if the task does not exist (599) or the request fails
    pub async fn dir_size_status(&self, taskid: &str) -> Result<DirSizeStatus> {
        self.task_status(Api::DirSize, taskid).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn stop_dir_size(&self, taskid: &str) -> Result<()> {
        self.stop_task(Api::DirSize, taskid).await
    }

    /// Starts computing the MD5 checksum of a file, returns the task ID
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty or the task cannot be started
    pub async fn start_md5(&self, file_path: &str) -> Result<String> {
        require("File path", file_path)?;
        self.start_task(Api::Md5, &[("file_path", file_path)])
            .await
            .with_context(|| format!("Failed to start MD5 task for {file_path}"))
    }

    /// # Errors
    ///
    /// Returns an error if the task does not exist (599) or the request fails
    pub async fn md5_status(&self, taskid: &str) -> Result<Md5Status> {
        self.task_status(Api::Md5, taskid).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn stop_md5(&self, taskid: &str) -> Result<()> {
        self.stop_task(Api::Md5, taskid).await
    }

    /// Starts copying (or moving, see [`CopyMoveOptions::remove_src`]) `paths`
    /// into `dest_folder_path`, returns the task ID
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is empty or the task cannot be started
    pub async fn start_copy_move(
        &self,
        paths: &[&str],
        dest_folder_path: &str,
        options: &CopyMoveOptions,
    ) -> Result<String> {
        let path = json_list(paths, "Paths")?;
        require("Destination folder", dest_folder_path)?;

        let mut params = vec![
            ("path", path.as_str()),
            ("dest_folder_path", dest_folder_path),
            ("remove_src", flag(options.remove_src)),
            ("accurate_progress", flag(options.accurate_progress)),
        ];
        if let Some(overwrite) = options.overwrite {
            params.push(("overwrite", flag(overwrite)));
        }

        self.start_task(Api::CopyMove, &params)
            .await
            .with_context(|| format!("Failed to start copy/move task to {dest_folder_path}"))
    }

    /// # Errors
    ///
    /// Returns an error if the task does not exist (599) or the request fails
    pub async fn copy_move_status(&self, taskid: &str) -> Result<CopyMoveStatus> {
        self.task_status(Api::CopyMove, taskid).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn stop_copy_move(&self, taskid: &str) -> Result<()> {
        self.stop_task(Api::CopyMove, taskid).await
    }

    /// Starts deleting `paths` in the background, returns the task ID
    ///
    /// # Errors
    ///
    /// Returns an error if the path list is empty or the task cannot be started
    pub async fn start_delete(&self, paths: &[&str], options: &DeleteOptions) -> Result<String> {
        let path = json_list(paths, "Paths")?;
        let params = [
            ("path", path.as_str()),
            ("accurate_progress", flag(options.accurate_progress)),
            ("recursive", flag(options.recursive)),
        ];

        self.start_task(Api::Delete, &params)
            .await
            .context("Failed to start delete task")
    }

    /// # Errors
    ///
    /// Returns an error if the task does not exist (599) or the request fails
    pub async fn delete_status(&self, taskid: &str) -> Result<DeleteStatus> {
        self.task_status(Api::Delete, taskid).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn stop_delete(&self, taskid: &str) -> Result<()> {
        self.stop_task(Api::Delete, taskid).await
    }

    /// Deletes `paths` and returns once the server is done
    ///
    /// # Errors
    ///
    /// Returns an error if the path list is empty or the deletion fails
    pub async fn delete_blocking(&self, paths: &[&str], recursive: bool) -> Result<()> {
        let path = json_list(paths, "Paths")?;
        let params = [
            ("method", "delete"),
            ("path", path.as_str()),
            ("recursive", flag(recursive)),
        ];

        self.request_empty(Api::Delete, &params)
            .await
            .context("Failed to delete files")
    }

    /// Starts extracting an archive into `dest_folder_path`, returns the task ID
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is empty or the task cannot be started
    pub async fn start_extract(
        &self,
        file_path: &str,
        dest_folder_path: &str,
        options: &ExtractOptions,
    ) -> Result<String> {
        require("Archive path", file_path)?;
        require("Destination folder", dest_folder_path)?;

        let mut params = vec![
            ("file_path", file_path),
            ("dest_folder_path", dest_folder_path),
            ("overwrite", flag(options.overwrite)),
            ("keep_dir", flag(options.keep_dir)),
            ("create_subfolder", flag(options.create_subfolder)),
        ];
        if let Some(password) = options.password.as_deref() {
            params.push(("password", password));
        }

        self.start_task(Api::Extract, &params)
            .await
            .with_context(|| format!("Failed to start extract task for {file_path}"))
    }

    /// # Errors
    ///
    /// Returns an error if the task does not exist (599) or the request fails
    pub async fn extract_status(&self, taskid: &str) -> Result<ExtractStatus> {
        self.task_status(Api::Extract, taskid).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn stop_extract(&self, taskid: &str) -> Result<()> {
        self.stop_task(Api::Extract, taskid).await
    }

    /// Starts compressing `paths` into the archive `dest_file_path`, returns the task ID
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is empty or the task cannot be started
    pub async fn start_compress(
        &self,
        paths: &[&str],
        dest_file_path: &str,
        options: &CompressOptions,
    ) -> Result<String> {
        let path = json_list(paths, "Paths")?;
        require("Archive path", dest_file_path)?;

        let level = options.level.to_string();
        let mode = options.mode.to_string();
        let format = options.format.to_string();
        let mut params = vec![
            ("path", path.as_str()),
            ("dest_file_path", dest_file_path),
            ("level", level.as_str()),
            ("mode", mode.as_str()),
            ("format", format.as_str()),
        ];
        if let Some(password) = options.password.as_deref() {
            params.push(("password", password));
        }

        self.start_task(Api::Compress, &params)
            .await
            .with_context(|| format!("Failed to start compress task for {dest_file_path}"))
    }

    /// # Errors
    ///
    /// Returns an error if the task does not exist (599) or the request fails
    pub async fn compress_status(&self, taskid: &str) -> Result<CompressStatus> {
        self.task_status(Api::Compress, taskid).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn stop_compress(&self, taskid: &str) -> Result<()> {
        self.stop_task(Api::Compress, taskid).await
    }

    /// Uploads `data` as `filename` into `dest_folder_path`
    /// Uses multipart/form-data with POST
    ///
    /// `overwrite`: `Some(true)` overwrites, `Some(false)` skips an existing
    /// file, `None` lets the server fail with 1805.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File data, file name or destination is empty
    /// - Session ID is not available (must call [`Self::authorize()`] first)
    /// - Network request fails
    /// - API returns an error response
    pub async fn upload(
        &self,
        data: &[u8],
        filename: &str,
        dest_folder_path: &str,
        create_parents: bool,
        overwrite: Option<bool>,
    ) -> Result<()> {
        if data.is_empty() {
            return Err(InvalidInput("File data cannot be empty".into()).into());
        }
        require("File name", filename)?;
        require("Destination folder", dest_folder_path)?;
        self.require_session()?;

        debug!(
            "Uploading file. Name: {}, Size: {} bytes, Destination: {}",
            filename,
            data.len(),
            dest_folder_path
        );

        let file_part = Part::bytes(data.to_vec())
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")
            .context("Failed to create file part")?;

        let mut form = multipart::Form::new()
            .text("api", Api::Upload.name())
            .text("version", Api::Upload.version())
            .text("method", "upload")
            .text("path", dest_folder_path.to_string())
            .text("create_parents", flag(create_parents));
        if let Some(overwrite) = overwrite {
            form = form.text("overwrite", flag(overwrite));
        }
        // The file part has to come last
        let form = form.part("file", file_part);

        let response = self
            .client
            .post(format!("{}{}", self.host, API_PATH))
            .query(&[("_sid", self.sid.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(Network)
            .context("Failed to send file upload request")?;

        decode_body::<SynologyResponse<EmptyResponse>>(response)
            .await
            .and_then(|response| response.into_empty(Api::Upload))
            .with_context(|| format!("Failed to upload {filename}"))?;

        debug!("Successfully uploaded {filename} to {dest_folder_path}");
        Ok(())
    }

    /// Downloads the file at `path` into `destination`, returns the number of bytes written
    ///
    /// # Errors
    ///
    /// See [`Self::download_with_progress`]
    pub async fn download(&self, path: &str, destination: &Path) -> Result<u64> {
        self.download_with_progress(path, destination, |_, _| {})
            .await
    }

    /// Downloads the file at `path` into `destination`, calling `on_progress`
    /// with the bytes received so far and the total size when the server sent one
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Path is empty or the client is not authorized
    /// - Network request fails
    /// - Server answers with an error envelope instead of file content
    /// - The destination file cannot be written
    pub async fn download_with_progress<F>(
        &self,
        path: &str,
        destination: &Path,
        mut on_progress: F,
    ) -> Result<u64>
    where
        F: FnMut(u64, Option<u64>),
    {
        require("Path", path)?;
        self.require_session()?;

        let params = [
            ("api", Api::Download.name()),
            ("version", Api::Download.version()),
            ("method", "download"),
            ("path", path),
            ("mode", "download"),
            ("_sid", self.sid.as_str()),
        ];

        debug!("Downloading {path} to {}", destination.display());

        let response = self
            .client
            .get(format!("{}{}", self.host, API_PATH))
            .query(&params)
            .send()
            .await
            .map_err(Network)
            .with_context(|| format!("Failed to download {path}"))?;

        let response = check_status(response)?;

        // DSM answers with a JSON envelope instead of file content on failure
        if is_json(&response) {
            let envelope = decode_body::<SynologyResponse<EmptyResponse>>(response).await?;
            envelope
                .into_empty(Api::Download)
                .with_context(|| format!("Failed to download {path}"))?;
            return Err(InvalidResponse(format!(
                "Expected file content for {path}, got a JSON envelope"
            ))
            .into());
        }

        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(Io)
            .with_context(|| format!("Failed to create {}", destination.display()))?;

        match write_body(response, &mut file, &mut on_progress).await {
            Ok(downloaded) => {
                debug!("Downloaded {downloaded} bytes of {path}");
                Ok(downloaded)
            }
            Err(error) => {
                drop(file);
                // Leave nothing half-written behind
                if let Err(remove_error) = tokio::fs::remove_file(destination).await {
                    warn!(
                        "Failed to remove partial download {}: {remove_error}",
                        destination.display()
                    );
                }
                Err(error.context(format!("Failed to download {path}")))
            }
        }
    }

    async fn start_task(&self, api: Api, params: &[(&str, &str)]) -> Result<String> {
        let params = [&[("method", "start")][..], params].concat();
        let task = self.request::<BackgroundTask>(api, &params).await?;

        match task.taskid {
            Some(taskid) if !taskid.is_empty() => {
                debug!("Started {api} task {taskid}");
                Ok(taskid)
            }
            _ => Err(InvalidResponse(format!("No task ID received from {api}")).into()),
        }
    }

    async fn task_status<R>(&self, api: Api, taskid: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        require("Task ID", taskid)?;
        self.request(api, &[("method", "status"), ("taskid", taskid)])
            .await
            .with_context(|| format!("Failed to get status of {api} task {taskid}"))
    }

    async fn stop_task(&self, api: Api, taskid: &str) -> Result<()> {
        require("Task ID", taskid)?;
        self.request_empty(api, &[("method", "stop"), ("taskid", taskid)])
            .await
            .with_context(|| format!("Failed to stop {api} task {taskid}"))
    }

    /// Sends a request and returns the payload of a successful envelope
    async fn request<R>(&self, api: Api, params: &[(&str, &str)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = self.make_api_request::<R>(api, params).await?;
        Ok(response.into_result(api)?)
    }

    /// Sends a request whose successful payload carries nothing of interest
    async fn request_empty(&self, api: Api, params: &[(&str, &str)]) -> Result<()> {
        let response = self
            .make_api_request::<EmptyResponse>(api, params)
            .await?;
        Ok(response.into_empty(api)?)
    }

    /// Makes a POST API request with form parameters
    async fn make_api_request<R>(
        &self,
        api: Api,
        params: &[(&str, &str)],
    ) -> Result<SynologyResponse<R>>
    where
        R: DeserializeOwned,
    {
        // Login is the only call that goes out without a session
        let is_login = api == Api::Auth && params.contains(&("method", "login"));
        if !is_login {
            self.require_session()?;
        }

        let mut all_params =
            [&[("api", api.name()), ("version", api.version())][..], params].concat();
        if !self.sid.is_empty() {
            all_params.push(("_sid", self.sid.as_str()));
        }

        let base_url = format!("{}{}", self.host, API_PATH);
        debug!(
            "Making {} request to: {} with {} parameters",
            api,
            base_url,
            all_params.len()
        );

        let response = self
            .client
            .post(&base_url)
            .form(&all_params)
            .send()
            .await
            .map_err(Network)
            .context("Failed to make API request")?;

        debug!("API request status: {}", response.status());

        let envelope = decode_body::<SynologyResponse<R>>(response).await?;
        if !envelope.success {
            warn!(
                "{} returned an error, code: {:?}",
                api,
                envelope.error.as_ref().map(|error| error.code)
            );
        }
        Ok(envelope)
    }

    fn require_session(&self) -> Result<(), SynoError> {
        if self.sid.is_empty() {
            Err(Auth(
                "No session ID available. Make sure to call authorize() first".into(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Looks up the relay of a QuickConnect ID through the global QuickConnect service
///
/// # Errors
///
/// Returns an error if the request fails or the ID is unknown
pub async fn resolve_quickconnect(server_id: &str) -> Result<QuickConnectService> {
    resolve_quickconnect_at(QUICKCONNECT_URL, server_id).await
}

/// Same as [`resolve_quickconnect`] against a custom `Serv.php` endpoint
///
/// # Errors
///
/// Returns an error if:
/// - Server ID is empty
/// - Network request fails
/// - Service replies with a non-zero `errno` ([`SynoError::Api`])
/// - Reply carries no service block
pub async fn resolve_quickconnect_at(endpoint: &str, server_id: &str) -> Result<QuickConnectService> {
    require("QuickConnect ID", server_id)?;

    let body = serde_json::json!({
        "version": 1,
        "command": "get_server_info",
        "id": "dsm_portal_https",
        "serverID": server_id,
    });

    debug!("Resolving QuickConnect ID {server_id}");

    let response = create_client(DEFAULT_TIMEOUT_MS)
        .post(endpoint)
        .json(&body)
        .send()
        .await
        .map_err(Network)
        .context("Failed to reach QuickConnect")?;

    let reply = decode_body::<QuickConnectResponse>(response).await?;
    if reply.errno != 0 {
        return Err(SynoError::Api {
            code: reply.errno,
            message: format!("QuickConnect lookup of {server_id} failed"),
        }
        .into());
    }

    reply
        .service
        .ok_or_else(|| InvalidResponse("No service information received".into()).into())
}

/// Creates a configured HTTP client
///
/// The timeout bounds connecting and each read, not the whole request, so
/// large uploads and downloads are not cut off while data keeps flowing.
fn create_client(timeout: u64) -> Client {
    let timeout = Duration::from_millis(timeout);
    Client::builder()
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Streams a response body into `file`, returns the number of bytes written
async fn write_body<F>(
    response: Response,
    file: &mut tokio::fs::File,
    on_progress: &mut F,
) -> Result<u64>
where
    F: FnMut(u64, Option<u64>),
{
    let total = response.content_length();
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Network).context("Failed to read download stream")?;
        file.write_all(&chunk).await.map_err(Io)?;
        downloaded += chunk.len() as u64;
        on_progress(downloaded, total);
    }
    file.flush().await.map_err(Io)?;
    Ok(downloaded)
}

fn require(what: &str, value: &str) -> Result<(), SynoError> {
    if value.is_empty() {
        Err(InvalidInput(format!("{what} cannot be empty")))
    } else {
        Ok(())
    }
}

/// Encodes a path list the way File Station expects it, e.g. `["/a","/b"]`
fn json_list(items: &[&str], what: &str) -> Result<String, SynoError> {
    if items.is_empty() || items.iter().any(|item| item.is_empty()) {
        return Err(InvalidInput(format!("{what} cannot be empty")));
    }
    serde_json::to_string(items).map_err(|error| InvalidInput(error.to_string()))
}

fn check_status(response: Response) -> Result<Response, SynoError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(InvalidResponse(format!(
            "HTTP request failed with status: {} ({})",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )))
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

async fn decode_body<R>(response: Response) -> Result<R, SynoError>
where
    R: DeserializeOwned,
{
    let response = check_status(response)?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|error| {
        let excerpt: String = body.chars().take(200).collect();
        Decode(format!("{error}, body: {excerpt}"))
    })
}

/// Builder for [`SynoFS`] client
#[derive(Default)]
pub struct SynoFSBuilder {
    host: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout: Option<u64>,
    session: Option<String>,
}

impl SynoFSBuilder {
    /// Fills the builder from `SYNOLOGY_HOST`, `SYNOLOGY_USERNAME`,
    /// `SYNOLOGY_PASSWORD` and the optional `SYNOLOGY_TIMEOUT_MS`,
    /// after loading a `.env` file when one exists
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or the timeout is not a number
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("SYNOLOGY_HOST").map_err(Environment)?;
        let username = env::var("SYNOLOGY_USERNAME").map_err(Environment)?;
        let password = env::var("SYNOLOGY_PASSWORD").map_err(Environment)?;

        let mut builder = Self::default()
            .host(host)
            .username(username)
            .password(password);

        if let Ok(timeout) = env::var("SYNOLOGY_TIMEOUT_MS") {
            let timeout = timeout.parse::<u64>().map_err(|err| {
                Configuration(format!("invalid SYNOLOGY_TIMEOUT_MS: {err}"))
            })?;
            builder = builder.timeout(timeout);
        }

        Ok(builder)
    }

    /// Sets the host URL
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the username
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the password
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the connect and read timeout in milliseconds
    #[must_use]
    pub fn timeout(mut self, timeout_millis: u64) -> Self {
        self.timeout = Some(timeout_millis);
        self
    }

    /// Sets the login session name, `FileStation` by default
    #[must_use]
    pub fn session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Builds the [`SynoFS`] client
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields (host, username, password) are not provided
    /// - Host URL doesn't start with "http://" or "https://"
    pub fn build(self) -> Result<SynoFS> {
        let host = self
            .host
            .ok_or_else(|| Configuration("Host URL is required".into()))?;
        let username = self
            .username
            .ok_or_else(|| Configuration("Username is required".into()))?;
        let password = self
            .password
            .ok_or_else(|| Configuration("Password is required".into()))?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT_MS);

        let mut client = SynoFS::new(host, username, password, timeout)?;
        if let Some(session) = self.session {
            client.session = session;
        }

        Ok(client)
    }
}
