use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Directories where rooted Android builds commonly install `su`.
const ANDROID_SU_DIRS: &[&str] = &[
    "/system/bin",
    "/system/xbin",
    "/sbin",
    "/su/bin",
    "/system/sbin",
    "/vendor/bin",
    "/debug_ramdisk",
];

/// Resolve the absolute path to the elevated shell binary.
///
/// Absolute paths are checked as-is. Bare names are searched in
/// `CARROTPLAY_EXTRA_PATHS` (colon-separated), then `PATH`, then the usual
/// Android `su` locations.
///
/// # Errors
///
/// Returns a descriptive message if no executable with that name exists.
pub fn resolve_binary(binary: &str) -> Result<PathBuf, String> {
    if binary.is_empty() {
        return Err("Binary name cannot be empty".to_string());
    }

    let candidate = Path::new(binary);
    if candidate.is_absolute() {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(format!("Binary at {} is not executable", candidate.display()))
        };
    }

    let mut search_paths = Vec::new();

    if let Ok(extra) = env::var("CARROTPLAY_EXTRA_PATHS") {
        search_paths.extend(extra.split(':').map(PathBuf::from));
    }

    if let Some(path_var) = env::var_os("PATH") {
        search_paths.extend(env::split_paths(&path_var));
    }

    search_paths.extend(ANDROID_SU_DIRS.iter().map(PathBuf::from));

    search_paths
        .into_iter()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(binary))
        .find(|path| is_executable(path))
        .ok_or_else(|| format!("Unable to locate executable '{binary}' in known search paths"))
}

fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };

    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}
