//! Host identity facts
//!
//! Hostname, primary IP address and MAC address are stored in the fingerprint
//! verbatim rather than hashed. They are gathered independently of the
//! instrumentation service and the active access strategy.

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::paths;
use crate::source::CommandRunner;
use hwp_error::{HwprintError, Result};

/// Host identity collaborator
#[cfg_attr(test, mockall::automock)]
pub trait HostIdentity {
    fn hostname(&self) -> Result<String>;
    fn primary_ip(&self) -> Result<String>;
    fn mac_address(&self) -> Result<String>;
}

/// Host identity read from the running system
pub struct SystemHostIdentity<'a> {
    runner: &'a dyn CommandRunner,
    sys_class_net: PathBuf,
}

impl<'a> SystemHostIdentity<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            runner,
            sys_class_net: PathBuf::from(paths::SYS_CLASS_NET),
        }
    }

    /// Read interface addresses below `root` instead of /sys/class/net
    pub fn with_sys_class_net(mut self, root: impl Into<PathBuf>) -> Self {
        self.sys_class_net = root.into();
        self
    }

    fn primary_addr() -> Result<IpAddr> {
        local_ip_address::local_ip().map_err(|e| HwprintError::host(format!("primary IP: {}", e)))
    }

    /// Name of the interface carrying `addr`
    fn interface_for(addr: IpAddr) -> Result<String> {
        let interfaces = local_ip_address::list_afinet_netifas()
            .map_err(|e| HwprintError::host(format!("network interfaces: {}", e)))?;

        interfaces
            .into_iter()
            .find(|(_, ip)| *ip == addr)
            .map(|(name, _)| name)
            .ok_or_else(|| HwprintError::host(format!("no interface carries {}", addr)))
    }

    fn mac_from_sysfs(&self, interface: &str) -> Result<String> {
        let path = self.sys_class_net.join(interface).join("address");
        let raw = fs::read_to_string(&path).map_err(|source| HwprintError::FileRead {
            path: path.clone(),
            source,
        })?;
        normalize_mac(raw.trim())
    }

    fn mac_from_getmac(&self, interface: &str) -> Result<String> {
        let output = self
            .runner
            .run(Path::new(paths::GETMAC), &["/FO", "CSV", "/NH", "/V"])?;
        let text = String::from_utf8_lossy(&output);
        let mac = parse_getmac_csv(&text, interface)
            .ok_or_else(|| HwprintError::host(format!("getmac lists no adapter {:?}", interface)))?;
        normalize_mac(&mac)
    }
}

impl HostIdentity for SystemHostIdentity<'_> {
    fn hostname(&self) -> Result<String> {
        read_hostname()
    }

    fn primary_ip(&self) -> Result<String> {
        Ok(Self::primary_addr()?.to_string())
    }

    fn mac_address(&self) -> Result<String> {
        let interface = Self::interface_for(Self::primary_addr()?)?;
        debug!(interface = %interface, "Resolving MAC address of primary interface");

        if cfg!(windows) {
            self.mac_from_getmac(&interface)
        } else {
            self.mac_from_sysfs(&interface)
        }
    }
}

// ============================================================================
// Hostname
// ============================================================================

/// DNS host name of the machine, as the OS reports it
fn read_hostname() -> Result<String> {
    let raw = hostname::get().map_err(|e| HwprintError::host(format!("hostname: {}", e)))?;
    let name = raw
        .into_string()
        .map_err(|raw| HwprintError::host(format!("hostname {:?} is not valid UTF-8", raw)))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(HwprintError::host("hostname unavailable"));
    }
    Ok(name.to_string())
}

// ============================================================================
// MAC Address Formatting
// ============================================================================

/// Lower-case, colon-separated form of a 6-byte hardware address
pub fn normalize_mac(raw: &str) -> Result<String> {
    let hex: String = raw
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .collect();

    if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(HwprintError::host(format!("invalid MAC address {:?}", raw)));
    }

    let lower = hex.to_ascii_lowercase();
    let octets: Vec<&str> = (0..6).map(|i| &lower[i * 2..i * 2 + 2]).collect();
    Ok(octets.join(":"))
}

/// Physical address of `connection` in `getmac /FO CSV /NH /V` output
///
/// Columns: connection name, adapter, physical address, transport name.
pub fn parse_getmac_csv(output: &str, connection: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let fields: Vec<&str> = line
            .trim()
            .trim_matches('"')
            .split("\",\"")
            .collect();
        if fields.len() < 3 || !fields[0].eq_ignore_ascii_case(connection) {
            return None;
        }
        let address = fields[2].trim();
        if address.is_empty() || address.eq_ignore_ascii_case("N/A") {
            None
        } else {
            Some(address.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockCommandRunner;
    use serial_test::serial;

    const GETMAC: &str = "\"Ethernet\",\"Amazon Elastic Network Adapter\",\"0A-1B-2C-3D-4E-5F\",\"\\Device\\Tcpip_{6B1C}\"\r\n\
\"Ethernet 2\",\"Hyper-V Virtual Ethernet Adapter\",\"00-15-5D-01-02-03\",\"Media disconnected\"\r\n\
\"Bluetooth\",\"Bluetooth Device (PAN)\",\"N/A\",\"Media disconnected\"\r\n";

    #[test]
    fn test_normalize_mac_forms() {
        assert_eq!(normalize_mac("0A-1B-2C-3D-4E-5F").unwrap(), "0a:1b:2c:3d:4e:5f");
        assert_eq!(normalize_mac("aa:bb:cc:dd:ee:ff").unwrap(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(normalize_mac("aabb.ccdd.eeff").unwrap(), "aa:bb:cc:dd:ee:ff");
        assert!(normalize_mac("aa:bb:cc").is_err());
        assert!(normalize_mac("zz:bb:cc:dd:ee:ff").is_err());
    }

    #[test]
    fn test_parse_getmac_csv() {
        assert_eq!(parse_getmac_csv(GETMAC, "Ethernet").as_deref(), Some("0A-1B-2C-3D-4E-5F"));
        assert_eq!(parse_getmac_csv(GETMAC, "ethernet 2").as_deref(), Some("00-15-5D-01-02-03"));
        assert_eq!(parse_getmac_csv(GETMAC, "Bluetooth"), None);
        assert_eq!(parse_getmac_csv(GETMAC, "Wi-Fi"), None);
    }

    #[test]
    fn test_mac_from_getmac_uses_runner() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args| program.ends_with("getmac") && args.contains(&"CSV"))
            .times(1)
            .returning(|_, _| Ok(GETMAC.as_bytes().to_vec()));

        let host = SystemHostIdentity::new(&runner);
        assert_eq!(host.mac_from_getmac("Ethernet").unwrap(), "0a:1b:2c:3d:4e:5f");
    }

    #[test]
    fn test_mac_from_sysfs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("eth0")).unwrap();
        fs::write(dir.path().join("eth0/address"), "02:42:AC:11:00:02\n").unwrap();

        let runner = MockCommandRunner::new();
        let host = SystemHostIdentity::new(&runner).with_sys_class_net(dir.path());
        assert_eq!(host.mac_from_sysfs("eth0").unwrap(), "02:42:ac:11:00:02");
        assert!(matches!(
            host.mac_from_sysfs("eth9"),
            Err(HwprintError::FileRead { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_hostname_is_dns_name_not_netbios_name() {
        let previous = std::env::var("COMPUTERNAME").ok();
        std::env::set_var("COMPUTERNAME", "EC2AMAZ-ABCDEFG");

        let runner = MockCommandRunner::new();
        let name = SystemHostIdentity::new(&runner).hostname().unwrap();
        let expected = hostname::get().unwrap().into_string().unwrap();
        assert_eq!(name, expected.trim());
        assert!(!name.is_empty());

        match previous {
            Some(value) => std::env::set_var("COMPUTERNAME", value),
            None => std::env::remove_var("COMPUTERNAME"),
        }
    }
}
