// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for startup wiring.
//!
//! Command-line argument parsing stays out of scope; every setting is
//! read from the environment with a default matching
//! `start_server.py`'s `argparse` defaults.

use std::path::PathBuf;
use std::time::Duration;

use dia_core::detector::{AvailableDetectors, DetectorConfigFile};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
const DEFAULT_BACKEND_STREAM: &str = "tcp://localhost:40000";
const DEFAULT_WRITER_PORT: u16 = 10001;
const DEFAULT_WRITER_EXECUTABLE: &str = "/home/writer/start_writer.sh";
const DEFAULT_WRITER_LOG_DIR: &str = "/var/log/h5_zmq_writer";
const DEFAULT_BROKER_URL: &str = "http://localhost:10002";
const DEFAULT_AUX_BUS_STREAM: &str = "tcp://localhost:40001";
const DEFAULT_AUX_BUS_PORT: u16 = 10002;
const DEFAULT_TIMING_PV: &str = "SAR-CVME-TIFALL4-EVG0:SoftEvt-EvtCode-SP";
const DEFAULT_TIMING_START_CODE: i64 = 254;
const DEFAULT_TIMING_STOP_CODE: i64 = 255;
const DEFAULT_CAPUT_TIMEOUT_SECS: u64 = 3;

/// Everything the binary needs to wire up the manager and bind the
/// server, gathered from the environment once at startup.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub host: String,
    pub port: u16,
    pub detector_config_path: Option<PathBuf>,
    pub backend_api_url: String,
    pub backend_stream_url: String,
    pub writer_port: u16,
    pub writer_executable: PathBuf,
    pub writer_log_dir: PathBuf,
    pub broker_url: String,
    pub aux_bus_stream_url: String,
    pub aux_bus_port: u16,
    pub disable_aux_bus: bool,
    pub timing_pv: String,
    pub timing_start_code: i64,
    pub timing_stop_code: i64,
    pub caput_timeout: Duration,
}

impl DaemonConfig {
    /// Reads every setting from the environment, falling back to the
    /// single-detector defaults `start_server.py` uses when no
    /// detector configuration file is supplied.
    pub fn from_env() -> Self {
        Self {
            host: env_string("DIA_HOST", DEFAULT_HOST),
            port: env_parsed("DIA_PORT", DEFAULT_PORT),
            detector_config_path: std::env::var("DIA_DETECTOR_CONFIG").ok().map(PathBuf::from),
            backend_api_url: env_string("DIA_BACKEND_URL", DEFAULT_BACKEND_URL),
            backend_stream_url: env_string("DIA_BACKEND_STREAM", DEFAULT_BACKEND_STREAM),
            writer_port: env_parsed("DIA_WRITER_PORT", DEFAULT_WRITER_PORT),
            writer_executable: env_path("DIA_WRITER_EXECUTABLE", DEFAULT_WRITER_EXECUTABLE),
            writer_log_dir: env_path("DIA_WRITER_LOG_DIR", DEFAULT_WRITER_LOG_DIR),
            broker_url: env_string("DIA_BROKER_URL", DEFAULT_BROKER_URL),
            aux_bus_stream_url: env_string("DIA_AUX_BUS_STREAM", DEFAULT_AUX_BUS_STREAM),
            aux_bus_port: env_parsed("DIA_AUX_BUS_PORT", DEFAULT_AUX_BUS_PORT),
            disable_aux_bus: std::env::var("DIA_DISABLE_AUX_BUS").is_ok(),
            timing_pv: env_string("DIA_TIMING_PV", DEFAULT_TIMING_PV),
            timing_start_code: env_parsed("DIA_TIMING_START_CODE", DEFAULT_TIMING_START_CODE),
            timing_stop_code: env_parsed("DIA_TIMING_STOP_CODE", DEFAULT_TIMING_STOP_CODE),
            caput_timeout: std::env::var("DIA_CAPUT_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_secs(DEFAULT_CAPUT_TIMEOUT_SECS)),
        }
    }

    /// Loads the detector table from [`Self::detector_config_path`], or
    /// synthesizes the single-detector `"JF"` entry `start_server.py`
    /// falls back to when no file is given.
    pub fn load_detectors(&self) -> Result<AvailableDetectors, DetectorConfigError> {
        match &self.detector_config_path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| DetectorConfigError::Read(path.clone(), e))?;
                DetectorConfigFile::parse(&text)
                    .map_err(|e| DetectorConfigError::Parse(path.clone(), e))
            }
            None => {
                let mut detectors = indexmap::IndexMap::new();
                detectors.insert(
                    dia_core::DetectorName::new("JF"),
                    dia_core::detector::DetectorRecord {
                        detector_id: 0,
                        backend_api_url: self.backend_api_url.clone(),
                        backend_stream_url: self.backend_stream_url.clone(),
                        writer_port: self.writer_port,
                        n_modules: 1,
                        n_bad_modules: 0,
                    },
                );
                Ok(AvailableDetectors(detectors))
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DetectorConfigError {
    #[error("could not read detector configuration file {0:?}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("could not parse detector configuration file {0:?}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
