//! Sources backed by host state: sysfs readings and directory listings.

use crate::{Error, Fact, FactSource, Permission, Result, keys};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BATTERY_PATH: &str = "/sys/class/power_supply/BAT0/capacity";
pub const DEFAULT_RFKILL_ROOT: &str = "/sys/class/rfkill";

/// Battery charge percentage read from a sysfs capacity file.
#[derive(Debug, Clone)]
pub struct BatteryLevel {
    path: PathBuf,
}

impl BatteryLevel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for BatteryLevel {
    fn default() -> Self {
        Self::new(DEFAULT_BATTERY_PATH)
    }
}

impl FactSource for BatteryLevel {
    fn key(&self) -> &str {
        keys::BATTERY_LEVEL
    }

    fn read(&self) -> Result<Fact> {
        let raw = read_sysfs(&self.path)?;
        raw.parse::<i64>()
            .map(Fact::Int)
            .map_err(|e| Error::Malformed {
                source_name: self.path.display().to_string(),
                detail: e.to_string(),
            })
    }

    // No fallback: an absent reading must never match a secret.
    fn fallback(&self) -> Option<Fact> {
        None
    }
}

/// One rfkill device as exposed under `/sys/class/rfkill/rfkillN`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RfkillDevice {
    kind: String,
    soft_blocked: bool,
    hard_blocked: bool,
}

fn rfkill_devices(root: &Path) -> Result<Vec<RfkillDevice>> {
    if !root.is_dir() {
        return Err(Error::Unavailable(format!("no rfkill class at {}", root.display())));
    }

    let mut devices = Vec::new();
    for entry in fs::read_dir(root)? {
        let dir = entry?.path();
        let Ok(kind) = read_sysfs(&dir.join("type")) else {
            continue;
        };
        devices.push(RfkillDevice {
            kind,
            soft_blocked: read_sysfs(&dir.join("soft")).is_ok_and(|v| v == "1"),
            hard_blocked: read_sysfs(&dir.join("hard")).is_ok_and(|v| v == "1"),
        });
    }
    Ok(devices)
}

/// Whether a short-range radio of the given rfkill type is present and unblocked.
#[derive(Debug, Clone)]
pub struct RadioEnabled {
    key: String,
    root: PathBuf,
    radio_type: String,
}

impl RadioEnabled {
    pub fn new(
        key: impl Into<String>,
        root: impl Into<PathBuf>,
        radio_type: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            root: root.into(),
            radio_type: radio_type.into(),
        }
    }

    pub fn bluetooth(root: impl Into<PathBuf>) -> Self {
        Self::new(keys::BLUETOOTH_ENABLED, root, "bluetooth")
    }
}

impl FactSource for RadioEnabled {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Fact> {
        let adapters: Vec<_> = rfkill_devices(&self.root)?
            .into_iter()
            .filter(|d| d.kind == self.radio_type)
            .collect();

        if adapters.is_empty() {
            return Err(Error::Unavailable(format!("no {} adapter", self.radio_type)));
        }

        Ok(Fact::Bool(
            adapters.iter().any(|d| !d.soft_blocked && !d.hard_blocked),
        ))
    }

    fn fallback(&self) -> Option<Fact> {
        Some(Fact::Bool(false))
    }
}

/// Airplane mode: on when every radio on the host is soft-blocked.
#[derive(Debug, Clone)]
pub struct AirplaneMode {
    root: PathBuf,
}

impl AirplaneMode {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for AirplaneMode {
    fn default() -> Self {
        Self::new(DEFAULT_RFKILL_ROOT)
    }
}

impl FactSource for AirplaneMode {
    fn key(&self) -> &str {
        keys::AIRPLANE_MODE
    }

    fn read(&self) -> Result<Fact> {
        let devices = rfkill_devices(&self.root)?;
        if devices.is_empty() {
            return Err(Error::Unavailable("no radios registered".to_string()));
        }
        Ok(Fact::Bool(devices.iter().all(|d| d.soft_blocked)))
    }

    // Unknown mode counts as on, the unsatisfied state.
    fn fallback(&self) -> Option<Fact> {
        Some(Fact::Bool(true))
    }
}

/// Number of files in a directory, optionally filtered by extension.
///
/// Symlinks are followed, so a link to a regular file counts as a file.
#[derive(Debug, Clone)]
pub struct DirectoryCount {
    key: String,
    dir: PathBuf,
    extensions: Vec<String>,
    permission: Option<Permission>,
}

impl DirectoryCount {
    pub fn new(key: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            dir: dir.into(),
            extensions: Vec::new(),
            permission: None,
        }
    }

    /// Only list the directory once `permission` has been granted.
    pub fn requires(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Only count files with one of these extensions (case-insensitive).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    fn matches(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
    }
}

impl FactSource for DirectoryCount {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Fact> {
        if !self.dir.is_dir() {
            return Err(Error::Unavailable(format!(
                "{} is not a directory",
                self.dir.display()
            )));
        }

        let mut count = 0_i64;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && self.matches(&path) {
                count += 1;
            }
        }
        Ok(Fact::Int(count))
    }

    fn fallback(&self) -> Option<Fact> {
        Some(Fact::Int(0))
    }

    fn required_permission(&self) -> Option<Permission> {
        self.permission
    }
}

fn read_sysfs(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(s.trim().to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::Unavailable(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn add_radio(root: &Path, name: &str, kind: &str, soft: &str, hard: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("type"), format!("{kind}\n")).unwrap();
        fs::write(dir.join("soft"), format!("{soft}\n")).unwrap();
        fs::write(dir.join("hard"), format!("{hard}\n")).unwrap();
    }

    #[test]
    fn test_battery_level() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("capacity");
        fs::write(&path, "57\n").unwrap();

        assert_eq!(BatteryLevel::new(&path).read().unwrap(), Fact::Int(57));
    }

    #[test]
    fn test_battery_level_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("capacity");
        fs::write(&path, "full\n").unwrap();

        let err = BatteryLevel::new(&path).read().unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }

    #[test]
    fn test_battery_missing_has_no_fallback() {
        let source = BatteryLevel::new("/nonexistent/capacity");
        assert!(matches!(source.read(), Err(Error::Unavailable(_))));
        assert_eq!(source.fallback(), None);
    }

    #[test]
    fn test_bluetooth_enabled() {
        let root = TempDir::new().unwrap();
        add_radio(root.path(), "rfkill0", "wlan", "0", "0");
        add_radio(root.path(), "rfkill1", "bluetooth", "0", "0");

        let fact = RadioEnabled::bluetooth(root.path()).read().unwrap();
        assert_eq!(fact, Fact::Bool(true));
    }

    #[test]
    fn test_bluetooth_blocked() {
        let root = TempDir::new().unwrap();
        add_radio(root.path(), "rfkill1", "bluetooth", "0", "1");

        let fact = RadioEnabled::bluetooth(root.path()).read().unwrap();
        assert_eq!(fact, Fact::Bool(false));
    }

    #[test]
    fn test_bluetooth_without_adapter() {
        let root = TempDir::new().unwrap();
        add_radio(root.path(), "rfkill0", "wlan", "0", "0");

        let source = RadioEnabled::bluetooth(root.path());
        assert!(matches!(source.read(), Err(Error::Unavailable(_))));
        assert_eq!(source.fallback(), Some(Fact::Bool(false)));
    }

    #[test]
    fn test_airplane_mode() {
        let root = TempDir::new().unwrap();
        add_radio(root.path(), "rfkill0", "wlan", "1", "0");
        add_radio(root.path(), "rfkill1", "bluetooth", "1", "0");
        assert_eq!(AirplaneMode::new(root.path()).read().unwrap(), Fact::Bool(true));

        add_radio(root.path(), "rfkill1", "bluetooth", "0", "0");
        assert_eq!(AirplaneMode::new(root.path()).read().unwrap(), Fact::Bool(false));
    }

    #[test]
    fn test_airplane_mode_defaults_on() {
        let source = AirplaneMode::new("/nonexistent/rfkill");
        assert!(source.read().is_err());
        assert_eq!(source.fallback(), Some(Fact::Bool(true)));
    }

    #[test]
    fn test_directory_count_with_extensions() {
        let dir = TempDir::new().unwrap();
        for name in ["a.jpg", "b.PNG", "c.txt", "d.jpeg"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let all = DirectoryCount::new(keys::IMAGE_COUNT, dir.path());
        assert_eq!(all.read().unwrap(), Fact::Int(4));

        let images = all.with_extensions([".jpg", "png", "jpeg"]);
        assert_eq!(images.read().unwrap(), Fact::Int(3));
    }

    #[test]
    fn test_directory_count_missing_dir() {
        let source = DirectoryCount::new(keys::CONTACT_COUNT, "/nonexistent/contacts");
        assert!(matches!(source.read(), Err(Error::Unavailable(_))));
        assert_eq!(source.fallback(), Some(Fact::Int(0)));
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_count_follows_symlinks() {
        let store = TempDir::new().unwrap();
        let target = store.path().join("real.vcf");
        fs::write(&target, b"").unwrap();

        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("linked.vcf")).unwrap();
        std::os::unix::fs::symlink(store.path(), dir.path().join("folder.vcf")).unwrap();
        std::os::unix::fs::symlink("/nonexistent/x.vcf", dir.path().join("dangling.vcf"))
            .unwrap();

        let source = DirectoryCount::new(keys::CONTACT_COUNT, dir.path()).with_extensions(["vcf"]);
        assert_eq!(source.read().unwrap(), Fact::Int(1));
    }

    #[test]
    fn test_directory_count_required_permission() {
        let source = DirectoryCount::new(keys::CONTACT_COUNT, "/tmp");
        assert_eq!(source.required_permission(), None);

        let source = source.requires(Permission::Contacts);
        assert_eq!(source.required_permission(), Some(Permission::Contacts));
    }
}
