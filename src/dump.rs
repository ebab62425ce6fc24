//! Purpose: Fetch the listings payload once and save it as pretty JSON.
//! Exports: `fetch_and_dump`, `DumpOutcome`, `write_output`.
//! Role: The whole pipeline: fetch, check status, decode, render, write.
//! Invariants: Exactly one request per call; no retries.
//! Invariants: A non-200 status never touches the output path.
//! Invariants: The written file always reflects only the latest successful payload.
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{DumpConfig, WriteMode};
use crate::error::{Error, ErrorKind};
use crate::render::to_pretty_string;
use crate::transport::Transport;

pub const SUCCESS_STATUS: u16 = 200;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DumpOutcome {
    /// Payload decoded and written to `path`.
    Saved { path: PathBuf, bytes: usize },
    /// Server answered with something other than 200; nothing was written.
    Rejected { status: u16 },
}

pub fn fetch_and_dump<T: Transport>(
    config: &DumpConfig,
    transport: &T,
) -> Result<DumpOutcome, Error> {
    debug!(url = %config.url, "fetching listings");
    let response = transport.get(&config.url)?;
    debug!(status = response.status, bytes = response.body.len(), "response received");

    if response.status != SUCCESS_STATUS {
        warn!(status = response.status, "unexpected status; output left untouched");
        return Ok(DumpOutcome::Rejected {
            status: response.status,
        });
    }

    let payload: Value = serde_json::from_slice(&response.body).map_err(|err| {
        Error::new(ErrorKind::Decode)
            .with_message("response body is not valid json")
            .with_status(response.status)
            .with_source(err)
    })?;

    let text = to_pretty_string(&payload, config.indent);
    write_output(&config.output, text.as_bytes(), config.write_mode)?;
    debug!(path = %config.output.display(), bytes = text.len(), "payload written");

    Ok(DumpOutcome::Saved {
        path: config.output.clone(),
        bytes: text.len(),
    })
}

/// Replace the contents of `path` with `contents`.
pub fn write_output(path: &Path, contents: &[u8], mode: WriteMode) -> Result<(), Error> {
    match mode {
        WriteMode::Direct => write_direct(path, contents),
        WriteMode::Atomic => write_atomic(path, contents),
    }
}

fn write_direct(path: &Path, contents: &[u8]) -> Result<(), Error> {
    let mut file =
        File::create(path).map_err(|err| write_error("failed to open output", path, err))?;
    file.write_all(contents)
        .map_err(|err| write_error("failed to write output", path, err))?;
    file.flush()
        .map_err(|err| write_error("failed to flush output", path, err))
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Fresh files take the process umask, same as a direct write.
    let mut temp = tempfile::Builder::new()
        .prefix(".baxus-dump")
        .make_in(dir, |candidate| {
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(candidate)
        })
        .map_err(|err| write_error("failed to create temp file", dir, err))?;
    if let Ok(existing) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|err| write_error("failed to copy output permissions", temp.path(), err))?;
    }
    temp.write_all(contents)
        .map_err(|err| write_error("failed to write temp file", temp.path(), err))?;
    temp.as_file()
        .sync_all()
        .map_err(|err| write_error("failed to sync temp file", temp.path(), err))?;
    temp.persist(path)
        .map_err(|err| write_error("failed to move temp file into place", path, err.error))?;
    Ok(())
}

fn write_error(message: &str, path: &Path, err: std::io::Error) -> Error {
    Error::new(ErrorKind::Write)
        .with_message(message)
        .with_path(path)
        .with_source(err)
}
