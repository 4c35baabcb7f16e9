//! Last-known amplifier address, kept in a one-line text file.

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::{debug, info, warn};

/// File name used under the home directory.
pub const CACHE_FILE_NAME: &str = ".devialet_expert_ip";

/// Plain-text IP cache.
#[derive(Debug, Clone)]
pub struct IpCache {
    path: PathBuf,
}

impl IpCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache in the user's home directory, if one is known.
    pub fn default_location() -> Option<Self> {
        BaseDirs::new().map(|dirs| Self::new(dirs.home_dir().join(CACHE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached address. Missing or garbled files read as `None`.
    pub fn read(&self) -> Option<IpAddr> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match contents.trim().parse() {
            Ok(addr) => Some(addr),
            Err(_) => {
                debug!(path = ?self.path, "ignoring unparsable IP cache");
                None
            }
        }
    }

    /// Store an address. Failures are logged and otherwise ignored.
    pub fn write(&self, addr: IpAddr) {
        match fs::write(&self.path, format!("{addr}\n")) {
            Ok(()) => info!(%addr, path = ?self.path, "cached amplifier address"),
            Err(err) => warn!(path = ?self.path, error = %err, "failed to write IP cache"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "expertctl-cache-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ))
    }

    #[test]
    fn write_then_read() {
        let path = temp_path("rw");
        let cache = IpCache::new(&path);
        let addr = IpAddr::V4(Ipv4Addr::new(10, 0, 7, 28));

        cache.write(addr);
        assert_eq!(fs::read_to_string(&path).unwrap(), "10.0.7.28\n");
        assert_eq!(cache.read(), Some(addr));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn default_location_is_in_home_directory() {
        let home = BaseDirs::new().expect("home directory").home_dir().to_path_buf();
        let cache = IpCache::default_location().expect("default cache");
        assert_eq!(cache.path(), home.join(CACHE_FILE_NAME));
    }

    #[test]
    fn missing_file_reads_none() {
        assert_eq!(IpCache::new(temp_path("missing")).read(), None);
    }

    #[test]
    fn garbage_reads_none() {
        let path = temp_path("garbage");
        fs::write(&path, "not an address\n").unwrap();
        assert_eq!(IpCache::new(&path).read(), None);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn write_to_missing_directory_is_ignored() {
        let cache = IpCache::new(temp_path("nodir").join("nested").join("ip"));
        cache.write(IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(cache.read(), None);
    }
}
