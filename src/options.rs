//! Optional parameters of the copy/move, delete, extract and compress tasks.

use std::fmt;

/// Options for [`crate::client::SynoFS::start_copy_move`]
#[derive(Debug, Clone)]
pub struct CopyMoveOptions {
    /// `Some(true)` overwrites, `Some(false)` skips existing files,
    /// `None` makes the task fail on conflicts (error 1003)
    pub overwrite: Option<bool>,
    /// Move instead of copy
    pub remove_src: bool,
    /// Accumulate progress over subfolders as well
    pub accurate_progress: bool,
}

impl Default for CopyMoveOptions {
    fn default() -> Self {
        Self {
            overwrite: None,
            remove_src: false,
            accurate_progress: true,
        }
    }
}

/// Options for [`crate::client::SynoFS::start_delete`]
#[derive(Debug, Clone)]
pub struct DeleteOptions {
    pub accurate_progress: bool,
    /// Delete folders together with their contents
    pub recursive: bool,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            accurate_progress: true,
            recursive: true,
        }
    }
}

/// Options for [`crate::client::SynoFS::start_extract`]
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub overwrite: bool,
    /// Keep the folder structure of the archive
    pub keep_dir: bool,
    /// Extract into a subfolder named after the archive
    pub create_subfolder: bool,
    pub password: Option<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            keep_dir: true,
            create_subfolder: false,
            password: None,
        }
    }
}

/// Options for [`crate::client::SynoFS::start_compress`]
#[derive(Debug, Clone, Default)]
pub struct CompressOptions {
    pub level: CompressLevel,
    pub mode: CompressMode,
    pub format: CompressFormat,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressLevel {
    #[default]
    Moderate,
    Store,
    Fastest,
    Best,
}

/// How the archive is updated when it already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressMode {
    /// Update existing items and add new ones
    #[default]
    Add,
    /// Update existing items, add only items that are newer
    Update,
    /// Update only existing items that are newer
    Refreshen,
    /// Make the archive mirror the source
    Synchronize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressFormat {
    #[default]
    Zip,
    SevenZip,
}

impl fmt::Display for CompressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Moderate => "moderate",
            Self::Store => "store",
            Self::Fastest => "fastest",
            Self::Best => "best",
        })
    }
}

impl fmt::Display for CompressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Refreshen => "refreshen",
            Self::Synchronize => "synchronize",
        })
    }
}

impl fmt::Display for CompressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Zip => "zip",
            Self::SevenZip => "7z",
        })
    }
}

pub(crate) fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
