//! Write/read check for the bucket mount and scratch directory
//!
//! A FUSE mount can list files before writes go through, so the startup probe
//! proves a full round trip before declaring the service ready.

use rand::Rng;
use rand::distr::Alphanumeric;
use std::io;
use std::path::Path;
use tracing::info;

pub const SELF_TEST_FILE: &str = "text_file_utf8.txt";
const SELF_TEST_LINES: usize = 5;
const SELF_TEST_LINE_LEN: usize = 40;

fn random_line() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(SELF_TEST_LINE_LEN)
        .map(char::from)
        .collect()
}

/// Write random lines to `dir/text_file_utf8.txt` and read them back
///
/// Any existing file is removed first. Returns the non-blank lines read back.
pub async fn file_io_self_test(dir: &Path) -> io::Result<Vec<String>> {
    let path = dir.join(SELF_TEST_FILE);
    info!("Running I/O self-test on {}", path.display());

    if tokio::fs::try_exists(&path).await? {
        tokio::fs::remove_file(&path).await?;
    }

    let contents: String = (0..SELF_TEST_LINES)
        .map(|_| random_line() + "\n")
        .collect();
    tokio::fs::write(&path, &contents).await?;

    let read_back = tokio::fs::read_to_string(&path).await?;
    let lines: Vec<String> = read_back
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();
    for (i, line) in lines.iter().enumerate() {
        info!("{}  {line}", i + 1);
    }

    if read_back != contents {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} read back different contents", path.display()),
        ));
    }
    Ok(lines)
}
