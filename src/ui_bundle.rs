//! Swagger UI bundle bootstrap
//!
//! The UI is not shipped with the binary. On first run (or with `-u`) the
//! latest Swagger UI release archive is downloaded into the cache directory
//! and its `dist/` files are extracted next to it. Later runs reuse both.

use hyper::StatusCode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::error::{PreviewError, Result};
use crate::logger::Logger;

pub const DIST_DIR: &str = "dist";

const USER_AGENT: &str = concat!("swagger-preview/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    zipball_url: String,
}

pub struct UiBundle {
    cache_dir: PathBuf,
    release_api: String,
    client: reqwest::Client,
    logger: Logger,
}

impl UiBundle {
    pub fn new(cache_dir: PathBuf, release_api: impl Into<String>, logger: Logger) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            cache_dir,
            release_api: release_api.into(),
            client,
            logger,
        })
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.cache_dir.join(DIST_DIR)
    }

    /// Make sure the extracted bundle exists, fetching it when missing or
    /// when `force` is set. Returns the `dist` directory.
    pub async fn ensure(&self, force: bool) -> Result<PathBuf> {
        let dist = self.dist_dir();
        if force || tokio::fs::metadata(&dist).await.is_err() {
            self.logger.info("updating swagger-ui");
            self.update().await?;
        }
        Ok(dist)
    }

    /// Fetch the latest release archive (unless already downloaded) and
    /// extract what is missing from `dist`. Returns the number of files
    /// extracted.
    pub async fn update(&self) -> Result<usize> {
        let archive_url = self.latest_archive_url().await?;
        let archive = self.cache_dir.join(archive_file_name(&archive_url));

        if tokio::fs::metadata(&archive).await.is_err() {
            self.download(&archive_url, &archive).await?;
        }

        let dist = self.dist_dir();
        let logger = self.logger.clone();
        tokio::task::spawn_blocking(move || extract_dist(&archive, &dist, &logger))
            .await
            .map_err(|e| PreviewError::Io(std::io::Error::other(e)))?
    }

    async fn latest_archive_url(&self) -> Result<String> {
        let response = self.client.get(&self.release_api).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(PreviewError::UnexpectedStatus {
                url: self.release_api.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let release: Release = response.json().await?;
        self.logger.info(&format!(
            "latest swagger-ui release {}: {}",
            release.tag_name, release.zipball_url
        ));
        Ok(release.zipball_url)
    }

    async fn download(&self, url: &str, archive: &Path) -> Result<()> {
        self.logger.info(&format!("downloading {url}"));
        let mut response = self.client.get(url).send().await?.error_for_status()?;

        tokio::fs::create_dir_all(&self.cache_dir).await?;

        // Written under a temporary name so an interrupted download is not
        // mistaken for a complete archive on the next run.
        let partial = archive.with_extension("part");
        let mut file = tokio::fs::File::create(&partial).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&partial, archive).await?;
        Ok(())
    }
}

/// Local file name for a release archive URL
pub fn archive_file_name(url: &str) -> String {
    let segment = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or("swagger-ui");

    if Path::new(segment)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    {
        segment.to_string()
    } else {
        format!("{segment}.zip")
    }
}

/// Extract every file whose parent directory is named `dist` into `dist`,
/// flattened to its file name. Files already present are left alone, and a
/// file that fails to extract is logged and skipped.
pub fn extract_dist(archive: &Path, dist: &Path, logger: &Logger) -> Result<usize> {
    let file = std::fs::File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;

    if !dist.exists() {
        logger.info(&format!("creating directory: {}", dist.display()));
        std::fs::create_dir_all(dist)?;
    }

    let mut extracted = 0;
    for index in 0..zip.len() {
        let mut entry = match zip.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                logger.error(&format!("cannot read archive entry #{index}: {e}"));
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let path = Path::new(&name);
        let in_dist = path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|dir| dir == DIST_DIR);
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if !in_dist {
            continue;
        }

        let local = dist.join(file_name);
        if local.exists() {
            logger.debug(&format!("file already exists: {}", local.display()));
            continue;
        }

        logger.info(&format!("extracting {name}"));
        match std::fs::File::create(&local).and_then(|mut out| std::io::copy(&mut entry, &mut out)) {
            Ok(_) => extracted += 1,
            Err(e) => logger.error(&format!("cannot extract {name}: {e}")),
        }
    }

    Ok(extracted)
}
