//! Fingerprint assembly
//!
//! A run goes through three stages:
//!
//! 1. **Gate**: wait for the instrumentation service. This is the only stage
//!    whose failure is returned to the caller.
//! 2. **Collect**: choose the access strategy once, then digest each hardware
//!    category in a fixed order. A failing category is logged and recorded
//!    as empty; the remaining categories still run.
//! 3. **Host facts**: hostname, primary IP and MAC address, gathered without
//!    regard to the gate or the strategy.
//!
//! A partially filled map is still useful for drift detection, while a run
//! that never reached the service cannot be trusted at all.

use std::path::PathBuf;
use std::result::Result as StdResult;
use tracing::{info, warn};

use crate::category::{Category, CategoryError};
use crate::constants::{keys, paths};
use crate::fingerprint::FingerprintMap;
use crate::host::HostIdentity;
use crate::platform::PlatformInfo;
use crate::readiness::{Pause, ReadinessPolicy, ReadinessWaiter, ServiceConnector};
use crate::selector::{AccessStrategy, StrategySelector};
use crate::source::{build_source, CommandRunner, RecordQuery};
use hwp_error::Result;

/// External collaborators of a fingerprint run
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub service: &'a dyn ServiceConnector,
    pub platform: &'a dyn PlatformInfo,
    pub runner: &'a dyn CommandRunner,
    pub query: &'a dyn RecordQuery,
    pub host: &'a dyn HostIdentity,
    pub pause: &'a dyn Pause,
}

/// Tunables of a fingerprint run
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub readiness: ReadinessPolicy,
    pub selector: StrategySelector,
    /// wmic utility used by the command-output backend
    pub wmic_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            readiness: ReadinessPolicy::default(),
            selector: StrategySelector::default(),
            wmic_path: paths::wmic_path(),
        }
    }
}

// ============================================================================
// Collection
// ============================================================================

/// Outcome of one hardware category
#[derive(Debug)]
pub struct CategoryOutcome {
    pub category: Category,
    pub result: StdResult<String, CategoryError>,
}

/// Outcome of the host identity lookups
#[derive(Debug)]
pub struct HostFacts {
    pub hostname: Result<String>,
    pub primary_ip: Result<String>,
    pub mac_address: Result<String>,
}

impl HostFacts {
    fn gather(host: &dyn HostIdentity) -> Self {
        Self {
            hostname: host.hostname(),
            primary_ip: host.primary_ip(),
            mac_address: host.mac_address(),
        }
    }

    fn entries(&self) -> [(&'static str, &Result<String>); 3] {
        [
            (keys::HOSTNAME, &self.hostname),
            (keys::IP_ADDRESS, &self.primary_ip),
            (keys::MAC_ADDRESS, &self.mac_address),
        ]
    }
}

/// Everything a run gathered, with per-part errors kept
#[derive(Debug)]
pub struct Collection {
    pub strategy: AccessStrategy,
    pub categories: Vec<CategoryOutcome>,
    pub host: HostFacts,
}

impl Collection {
    /// Failed keys with their error text
    pub fn failures(&self) -> Vec<(&'static str, String)> {
        let categories = self.categories.iter().filter_map(|outcome| {
            outcome
                .result
                .as_ref()
                .err()
                .map(|e| (outcome.category.key(), e.to_string()))
        });
        let host = self
            .host
            .entries()
            .into_iter()
            .filter_map(|(key, result)| result.as_ref().err().map(|e| (key, e.to_string())));
        categories.chain(host).collect()
    }

    /// Collapse into the fingerprint map, failures becoming empty strings
    pub fn into_map(self) -> FingerprintMap {
        let mut map = FingerprintMap::new();
        for outcome in self.categories {
            if let Ok(value) = outcome.result {
                map.set(outcome.category.key(), value);
            }
        }
        let HostFacts {
            hostname,
            primary_ip,
            mac_address,
        } = self.host;
        for (key, result) in [
            (keys::HOSTNAME, hostname),
            (keys::IP_ADDRESS, primary_ip),
            (keys::MAC_ADDRESS, mac_address),
        ] {
            if let Ok(value) = result {
                map.set(key, value);
            }
        }
        map
    }
}

// ============================================================================
// Engine
// ============================================================================

pub struct FingerprintEngine<'a> {
    collaborators: Collaborators<'a>,
    config: EngineConfig,
}

impl<'a> FingerprintEngine<'a> {
    pub fn new(collaborators: Collaborators<'a>, config: EngineConfig) -> Self {
        Self {
            collaborators,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the gate, then gather every category and host fact
    pub fn collect(&self) -> Result<Collection> {
        let c = self.collaborators;

        ReadinessWaiter::new(&self.config.readiness, c.pause)
            .wait_for_service(c.service)
            .map_err(|e| {
                warn!(error = %e, "Instrumentation service cannot be queried for hardware hash");
                e
            })?;

        let strategy = self.config.selector.select(c.platform);
        let source = build_source(strategy, c.runner, c.query, &self.config.wmic_path);

        let categories = Category::ALL
            .iter()
            .map(|&category| {
                let result = source.collect(category);
                if let Err(e) = &result {
                    warn!(
                        category = %category,
                        key = category.key(),
                        strategy = %strategy,
                        error = %e.source,
                        "Hardware category unavailable"
                    );
                }
                CategoryOutcome { category, result }
            })
            .collect();

        let host = HostFacts::gather(c.host);
        for (key, result) in host.entries() {
            if let Err(e) = result {
                warn!(key, error = %e, "Host identity fact unavailable");
            }
        }

        let collection = Collection {
            strategy,
            categories,
            host,
        };
        info!(
            strategy = %strategy,
            failed = collection.failures().len(),
            "Collected hardware fingerprint"
        );
        Ok(collection)
    }

    /// Compute the fingerprint map
    ///
    /// Only a readiness-gate failure is returned as an error; every other
    /// failure leaves an empty value under its key.
    pub fn compute(&self) -> Result<FingerprintMap> {
        self.collect().map(Collection::into_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::is_encoded_digest;
    use crate::host::MockHostIdentity;
    use crate::platform::MockPlatformInfo;
    use crate::readiness::{
        MockPause, MockServiceConnector, MockServiceHandle, MockServiceManager, ServiceHandle,
        ServiceManager, ServiceState,
    };
    use crate::records::*;
    use crate::source::{MockCommandRunner, MockRecordQuery};
    use hwp_error::HwprintError;

    fn connector_reporting(states: Vec<ServiceState>) -> MockServiceConnector {
        let mut connector = MockServiceConnector::new();
        let mut states = Some(states);
        connector.expect_connect().returning(move || {
            let mut queue = states.take().unwrap_or_default().into_iter();
            let mut manager = MockServiceManager::new();
            let mut handle = Some(MockServiceHandle::new());
            if let Some(h) = handle.as_mut() {
                h.expect_query_status()
                    .returning(move || Ok(queue.next().unwrap_or(ServiceState::Stopped)));
            }
            manager.expect_open_service().returning(move |_| {
                let h = handle.take().unwrap_or_else(MockServiceHandle::new);
                Ok(Box::new(h) as Box<dyn ServiceHandle>)
            });
            Ok(Box::new(manager) as Box<dyn ServiceManager>)
        });
        connector
    }

    fn platform(version: &'static str) -> MockPlatformInfo {
        let mut platform = MockPlatformInfo::new();
        platform
            .expect_platform_version()
            .returning(move || Ok(version.to_string()));
        platform
    }

    fn host() -> MockHostIdentity {
        let mut host = MockHostIdentity::new();
        host.expect_hostname().returning(|| Ok("host1".to_string()));
        host.expect_primary_ip().returning(|| Ok("10.0.0.5".to_string()));
        host.expect_mac_address()
            .returning(|| Ok("aa:bb:cc:dd:ee:ff".to_string()));
        host
    }

    fn record_for(class: RecordClass) -> RawRecord {
        match class {
            RecordClass::ComputerSystemProduct => {
                RawRecord::ComputerSystemProduct(ComputerSystemProduct {
                    uuid: "EC2B3C4D-1234-5678-9ABC-DEF012345678".to_string(),
                })
            }
            RecordClass::Processor => RawRecord::Processor(Processor {
                caption: "Intel64 Family 6 Model 85 Stepping 7".to_string(),
                device_id: "CPU0".to_string(),
                manufacturer: "GenuineIntel".to_string(),
                max_clock_speed: 2500,
                name: "Intel(R) Xeon(R) Platinum 8259CL CPU @ 2.50GHz".to_string(),
                socket_designation: "CPU 0".to_string(),
            }),
            RecordClass::PhysicalMemory => RawRecord::PhysicalMemory(PhysicalMemory {
                capacity: 8_589_934_592,
                device_locator: "DIMM 0".to_string(),
                memory_type: 0,
                name: "Physical Memory".to_string(),
                tag: "Physical Memory 0".to_string(),
                total_width: 64,
            }),
            RecordClass::Bios => RawRecord::Bios(Bios {
                manufacturer: "Amazon EC2".to_string(),
                name: "Default System BIOS".to_string(),
                serial_number: "ec2b3c4d-1234".to_string(),
                smbios_bios_version: "1.0".to_string(),
                version: "AMAZON - 1".to_string(),
            }),
            RecordClass::ComputerSystem => RawRecord::ComputerSystem(ComputerSystem {
                dns_host_name: "host1".to_string(),
                domain: "WORKGROUP".to_string(),
                manufacturer: "Amazon EC2".to_string(),
                model: "m5.large".to_string(),
                name: "HOST1".to_string(),
                primary_owner_name: "EC2".to_string(),
                total_physical_memory: 8_482_091_008,
            }),
            RecordClass::DiskDrive => RawRecord::DiskDrive(DiskDrive {
                caption: "NVMe Amazon Elastic B".to_string(),
                device_id: r"\\.\PHYSICALDRIVE0".to_string(),
                model: "NVMe Amazon Elastic B".to_string(),
                partitions: 2,
                size: 32_210_196_480,
            }),
            RecordClass::OperatingSystem => RawRecord::OperatingSystem(OperatingSystem::default()),
        }
    }

    fn config() -> EngineConfig {
        EngineConfig {
            wmic_path: PathBuf::from(r"C:\Windows\System32\wbem\wmic.exe"),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_structured_scenario_fills_all_keys() {
        let connector = connector_reporting(vec![ServiceState::Running]);
        let platform = platform("10.0.26100");
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(0);
        let mut query = MockRecordQuery::new();
        query.expect_query_first().times(6).returning(|class| Ok(record_for(class)));
        let host = host();
        let mut pause = MockPause::new();
        pause.expect_pause().times(0);

        let engine = FingerprintEngine::new(
            Collaborators {
                service: &connector,
                platform: &platform,
                runner: &runner,
                query: &query,
                host: &host,
                pause: &pause,
            },
            config(),
        );

        let collection = engine.collect().unwrap();
        assert_eq!(collection.strategy, AccessStrategy::StructuredQuery);
        assert!(collection.failures().is_empty());

        let map = collection.into_map();
        assert_eq!(map.len(), 9);
        assert_eq!(map.get(keys::HOSTNAME), Some("host1"));
        assert_eq!(map.get(keys::IP_ADDRESS), Some("10.0.0.5"));
        assert_eq!(map.get(keys::MAC_ADDRESS), Some("aa:bb:cc:dd:ee:ff"));

        let digests: Vec<&str> = Category::ALL.iter().filter_map(|c| map.get(c.key())).collect();
        assert_eq!(digests.len(), 6);
        for digest in &digests {
            assert!(is_encoded_digest(digest), "not a digest: {:?}", digest);
        }
        let unique: std::collections::HashSet<&&str> = digests.iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_processor_failure_is_isolated() {
        let connector = connector_reporting(vec![ServiceState::Running]);
        let platform = platform("10.0.26100");
        let runner = MockCommandRunner::new();
        let mut query = MockRecordQuery::new();
        query.expect_query_first().returning(|class| match class {
            RecordClass::Processor => {
                Err(HwprintError::query(class.class_name(), "provider failure"))
            }
            other => Ok(record_for(other)),
        });
        let host = host();
        let pause = MockPause::new();

        let engine = FingerprintEngine::new(
            Collaborators {
                service: &connector,
                platform: &platform,
                runner: &runner,
                query: &query,
                host: &host,
                pause: &pause,
            },
            config(),
        );

        let collection = engine.collect().unwrap();
        let failures = collection.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, keys::PROCESSOR);

        let map = collection.into_map();
        assert_eq!(map.len(), 9);
        assert_eq!(map.missing(), vec![keys::PROCESSOR]);
    }

    #[test]
    fn test_command_output_strategy_on_older_platform() {
        let connector =
            connector_reporting(vec![ServiceState::StartPending, ServiceState::Running]);
        let platform = platform("10.0.19041");
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, _| program.to_string_lossy().ends_with("wmic.exe"))
            .times(6)
            .returning(|_, args| Ok(format!("{}\r\r\n", args.join(" ")).into_bytes()));
        let mut query = MockRecordQuery::new();
        query.expect_query_first().times(0);
        let host = host();
        let mut pause = MockPause::new();
        pause.expect_pause().times(1).return_const(());

        let engine = FingerprintEngine::new(
            Collaborators {
                service: &connector,
                platform: &platform,
                runner: &runner,
                query: &query,
                host: &host,
                pause: &pause,
            },
            config(),
        );

        let collection = engine.collect().unwrap();
        assert_eq!(collection.strategy, AccessStrategy::CommandOutput);
        let map = collection.into_map();
        assert!(map.missing().is_empty());
    }

    #[test]
    fn test_everything_failing_still_returns_full_map() {
        let connector = connector_reporting(vec![ServiceState::Running]);
        let mut platform = MockPlatformInfo::new();
        platform
            .expect_platform_version()
            .returning(|| Err(HwprintError::VersionDetection("no data".into())));
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|program, _| {
                Err(HwprintError::command(program.display().to_string(), "not found"))
            });
        let query = MockRecordQuery::new();
        let mut host = MockHostIdentity::new();
        host.expect_hostname().returning(|| Err(HwprintError::host("none")));
        host.expect_primary_ip().returning(|| Err(HwprintError::host("none")));
        host.expect_mac_address().returning(|| Err(HwprintError::host("none")));
        let pause = MockPause::new();

        let engine = FingerprintEngine::new(
            Collaborators {
                service: &connector,
                platform: &platform,
                runner: &runner,
                query: &query,
                host: &host,
                pause: &pause,
            },
            config(),
        );

        let map = engine.compute().unwrap();
        assert_eq!(map.len(), 9);
        assert_eq!(map.missing().len(), 9);
    }

    #[test]
    fn test_readiness_timeout_queries_nothing() {
        let connector = connector_reporting(vec![]);
        let mut platform = MockPlatformInfo::new();
        platform.expect_platform_version().times(0);
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(0);
        let mut query = MockRecordQuery::new();
        query.expect_query_first().times(0);
        let mut host = MockHostIdentity::new();
        host.expect_hostname().times(0);
        host.expect_primary_ip().times(0);
        host.expect_mac_address().times(0);
        let mut pause = MockPause::new();
        pause
            .expect_pause()
            .withf(|d| *d == std::time::Duration::from_secs(15))
            .times(5)
            .return_const(());

        let engine = FingerprintEngine::new(
            Collaborators {
                service: &connector,
                platform: &platform,
                runner: &runner,
                query: &query,
                host: &host,
                pause: &pause,
            },
            config(),
        );

        let err = engine.compute().unwrap_err();
        assert!(matches!(err, HwprintError::ServiceUnavailable { attempts: 5, .. }));
        assert!(err.is_fatal());
    }
}
