//! Device registry and initialization
//!
//! Maps a device string to a backend and opens it.

use std::collections::HashMap;

use crate::error::{DeviceError, Result};
use crate::handle::DeviceHandle;

/// Parsed device string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSpec {
    /// Backend name
    pub name: String,
    /// Key-value parameters
    pub params: HashMap<String, String>,
}

impl DeviceSpec {
    #[allow(dead_code)] // Used in feature-gated code
    fn parsed<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.params.get(key) {
            None => Ok(None),
            Some(value) => value.parse().map(Some).map_err(|_| DeviceError::InvalidValue {
                key: key.to_string(),
                value: value.clone(),
            }),
        }
    }
}

/// Parse a device string into backend name and parameters
///
/// Format: `"/dev/..."`, `"name"` or `"name:key1=value1,key2=value2"`.
/// A string starting with `/` is a device node for the Linux backend.
pub fn parse_device_spec(s: &str) -> Result<DeviceSpec> {
    if s.starts_with('/') {
        let mut params = HashMap::new();
        params.insert("path".to_string(), s.to_string());
        return Ok(DeviceSpec {
            name: "linux".to_string(),
            params,
        });
    }

    let (name, opts) = s.split_once(':').unwrap_or((s, ""));
    let mut params = HashMap::new();
    if !opts.is_empty() {
        for opt in opts.split(',') {
            match opt.split_once('=') {
                Some((key, value)) => {
                    params.insert(key.to_string(), value.to_string());
                }
                None => return Err(DeviceError::ParameterFormat(opt.to_string())),
            }
        }
    }

    Ok(DeviceSpec {
        name: name.to_string(),
        params,
    })
}

/// Open a drive from a device string
///
/// # Example
/// ```ignore
/// let handle = open_device("dummy:images=2")?;
/// assert_eq!(handle.backend(), "dummy");
/// ```
pub fn open_device(device: &str) -> Result<DeviceHandle> {
    let spec = parse_device_spec(device)?;

    match spec.name.as_str() {
        #[cfg(feature = "linux")]
        "linux" | "nvme" => open_linux(&spec),

        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&spec),

        _ => Err(DeviceError::UnknownBackend(spec.name)),
    }
}

#[cfg(feature = "linux")]
fn open_linux(spec: &DeviceSpec) -> Result<DeviceHandle> {
    let options: Vec<(&str, &str)> = spec
        .params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let config = vtnvme_linux::parse_options(&options).map_err(DeviceError::InvalidOptions)?;

    log::debug!("Opening {}...", config.path);
    let nvme = vtnvme_linux::LinuxNvme::open(&config)?;
    let port = nvme.path().to_string();
    Ok(DeviceHandle::new(Box::new(nvme), "linux", port))
}

#[cfg(feature = "dummy")]
fn open_dummy(spec: &DeviceSpec) -> Result<DeviceHandle> {
    use vtnvme_dummy::{DummyConfig, DummyNvme};

    let mut config = DummyConfig::default();
    if let Some(images) = spec.parsed("images")? {
        config.crash_images = images;
    }
    if let Some(pages) = spec.parsed("pages")? {
        config.crash_pages = pages;
    }
    if let Some(page_size) = spec.parsed("page_size")? {
        config.crash_page_size = page_size;
    }
    if let Some(records) = spec.parsed("records")? {
        config.event_records = records;
    }
    if let Some(record_size) = spec.parsed("record_size")? {
        config.event_record_size = record_size;
    }
    if let Some(record_type) = spec.parsed("record_type")? {
        config.event_record_type = record_type;
    }

    log::debug!("Opening emulated drive: {:?}", config);
    Ok(DeviceHandle::new(
        Box::new(DummyNvme::new(config)),
        "dummy",
        "dummy".to_string(),
    ))
}

/// Information about a device backend
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Backend name
    pub name: &'static str,
    /// Alternative names
    pub aliases: &'static [&'static str],
    /// Description, including the accepted options
    pub description: &'static str,
}

/// Get information about all backends enabled at compile time
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_devices() -> Vec<DeviceInfo> {
    let mut devices = Vec::new();

    #[cfg(feature = "linux")]
    devices.push(DeviceInfo {
        name: "linux",
        aliases: &["nvme"],
        description: "Linux NVMe admin passthrough (path=/dev/nvmeX, timeout=<ms>)",
    });

    #[cfg(feature = "dummy")]
    devices.push(DeviceInfo {
        name: "dummy",
        aliases: &[],
        description:
            "Emulated drive (images=, pages=, page_size=, records=, record_size=, record_type=)",
    });

    devices
}

/// Short list of backend names for CLI help
pub fn device_names_short() -> String {
    let devices = available_devices();
    if devices.is_empty() {
        return "none (recompile with features)".to_string();
    }
    let names: Vec<&str> = devices.iter().map(|d| d.name).collect();
    names.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_path() {
        let spec = parse_device_spec("/dev/nvme0n1").unwrap();
        assert_eq!(spec.name, "linux");
        assert_eq!(spec.params.get("path").map(String::as_str), Some("/dev/nvme0n1"));
    }

    #[test]
    fn test_parse_with_options() {
        let spec = parse_device_spec("dummy:images=2,pages=8").unwrap();
        assert_eq!(spec.name, "dummy");
        assert_eq!(spec.params.len(), 2);
        assert_eq!(spec.parsed::<u16>("pages").unwrap(), Some(8));
        assert_eq!(spec.parsed::<u16>("records").unwrap(), None);
    }

    #[test]
    fn test_parse_rejects_bare_option() {
        let err = parse_device_spec("dummy:images").unwrap_err();
        assert!(matches!(err, DeviceError::ParameterFormat(ref opt) if opt == "images"));
    }

    #[test]
    fn test_unknown_backend() {
        let err = open_device("usb:bus=1").unwrap_err();
        assert!(matches!(err, DeviceError::UnknownBackend(ref name) if name == "usb"));
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_open_dummy() {
        use vtnvme_core::params;
        use vtnvme_core::vendor::VendorSession;

        let mut handle = open_device("dummy:images=3").unwrap();
        assert_eq!(handle.backend(), "dummy");

        let mut session = VendorSession::new(&mut handle);
        let info = vtnvme_core::extract::read_crash_info(&mut session).unwrap();
        assert_eq!(info.image_count, 3);
        let sn = params::read_serial_number(&mut session).unwrap();
        assert!(!sn.is_empty());
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_open_dummy_bad_value() {
        let err = open_device("dummy:pages=many").unwrap_err();
        assert!(matches!(err, DeviceError::InvalidValue { ref key, .. } if key == "pages"));
    }

    #[cfg(feature = "linux")]
    #[test]
    fn test_open_missing_node() {
        let err = open_device("/dev/vtnvme-does-not-exist").unwrap_err();
        assert!(matches!(err, DeviceError::Linux(_)));
    }

    #[test]
    fn test_names_short() {
        let names = device_names_short();
        #[cfg(feature = "dummy")]
        assert!(names.contains("dummy"));
        assert!(!names.is_empty());
    }
}
