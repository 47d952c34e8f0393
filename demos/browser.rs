use anyhow::{Result, bail};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use syno_file_station::client::{SynoFS, SynoFSBuilder};
use tracing_subscriber::EnvFilter;

// Usage:
//   browser                      list shared folders
//   browser ls <folder>          list a folder
//   browser md5 <file>           checksum a file on the NAS
//   browser get <file> [local]   download a file
//   browser put <local> <folder> upload a file
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut synofs = SynoFSBuilder::from_env()?.session("Browser").build()?;
    synofs.authorize().await?;

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let result = match args.as_slice() {
        [] => list_shares(&synofs).await,
        ["ls", folder] => list_folder(&synofs, folder).await,
        ["md5", file] => md5(&synofs, file).await,
        ["get", file] => download(&synofs, file, None).await,
        ["get", file, local] => download(&synofs, file, Some(PathBuf::from(local))).await,
        ["put", local, folder] => upload(&synofs, Path::new(local), folder).await,
        _ => Err(anyhow::anyhow!("unknown command: {}", args.join(" "))),
    };

    synofs.logout().await?;
    result
}

async fn list_shares(synofs: &SynoFS) -> Result<()> {
    let shares = synofs.list_shares(0, 0).await?;
    for share in shares.shares {
        let free = share
            .additional
            .as_ref()
            .and_then(|additional| additional.volume_status.as_ref())
            .map(|volume| format!("{} free of {}", volume.human_free(), volume.human_total()))
            .unwrap_or_default();
        println!("📁 {:<24} {}", share.to_file().display_name(), free);
    }
    Ok(())
}

async fn list_folder(synofs: &SynoFS, folder: &str) -> Result<()> {
    let files = synofs.list_folder(folder, 0, 0).await?;
    for file in files.files {
        let icon = if file.isdir { "📁" } else { "📄" };
        let modified = file
            .additional
            .as_ref()
            .and_then(|additional| additional.time.as_ref())
            .and_then(|time| time.modified())
            .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let size = file
            .additional
            .as_ref()
            .filter(|_| !file.isdir)
            .map(|additional| additional.human_size())
            .unwrap_or_default();
        println!("{icon} {:<32} {:>10} {modified}", file.display_name(), size);
    }
    Ok(())
}

async fn md5(synofs: &SynoFS, file: &str) -> Result<()> {
    let taskid = synofs.start_md5(file).await?;
    loop {
        let status = synofs.md5_status(&taskid).await?;
        if status.finished {
            match status.md5 {
                Some(md5) => println!("{md5}  {file}"),
                None => bail!("MD5 task finished without a checksum"),
            }
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}

async fn download(synofs: &SynoFS, file: &str, local: Option<PathBuf>) -> Result<()> {
    let local = local.unwrap_or_else(|| {
        PathBuf::from(file.rsplit('/').next().unwrap_or("download"))
    });
    let written = synofs
        .download_with_progress(file, &local, |done, total| {
            if let Some(total) = total.filter(|total| *total > 0) {
                eprint!("\r{:>3}%", done * 100 / total);
            }
        })
        .await?;
    eprintln!();
    println!("Downloaded {written} bytes to {}", local.display());
    Ok(())
}

async fn upload(synofs: &SynoFS, local: &Path, folder: &str) -> Result<()> {
    let data = tokio::fs::read(local).await?;
    let Some(name) = local.file_name().and_then(|name| name.to_str()) else {
        bail!("invalid file name: {}", local.display());
    };
    synofs.upload(&data, name, folder, true, Some(true)).await?;
    println!("Uploaded {name} to {folder}");
    Ok(())
}
