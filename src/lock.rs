//! Single-instance lock.

use std::fs::{self, File, OpenOptions};
use std::io;

use fs2::FileExt;
use log::info;

const LOCK_FILE: &str = "/tmp/aircontrol.lock";

/// Advisory lock preventing parallel program instances.
///
/// Acquiring blocks until any other holder exits. The lock is released and
/// the lock file removed when the guard goes out of scope, on error paths
/// included.
pub struct InstanceLock {
    file: File,
}

impl InstanceLock {
    pub fn acquire() -> io::Result<InstanceLock> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(LOCK_FILE)?;

        if file.try_lock_exclusive().is_err() {
            info!("Another instance of this program is running, waiting...");
            file.lock_exclusive()?;
        }

        Ok(InstanceLock { file })
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(LOCK_FILE);
        let _ = self.file.unlock();
    }
}
