//! Orchestration of the pause and unpause runs.
//!
//! Processing is strictly sequential: locations, then cameras within a
//! location, then detection types within a camera, with one request in
//! flight at a time. Every failure below config loading is reported per
//! detection type and never aborts the rest of the batch.
use log::*;

use crate::client::{CameraTransport, Credentials};
use crate::config::{Config, LocationConfig};
use crate::detection::DetectionType;
use crate::errors::Error;
use crate::reachable::ReachabilityProbe;
use crate::store::{ConfigStore, Variant};
use crate::xmlcfg;

/// Which way a run drives the cameras
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Disable detections, saving the current config first
    Pause,
    /// Restore the saved enabled config
    Unpause,
}

/// Which cameras a run touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Selection {
    /// Every camera of every location
    All,
    /// Every camera of one location
    Location(String),
    /// A single camera of one location
    Camera(String, String),
}

impl Selection {
    /// Parses a `location` or `location/camera` identifier
    pub(crate) fn parse(identifier: &str) -> Result<Self, Error> {
        let mut parts = identifier.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(location), None, None) if !location.is_empty() => {
                Ok(Selection::Location(location.to_string()))
            }
            (Some(location), Some(camera), None) if !location.is_empty() && !camera.is_empty() => {
                Ok(Selection::Camera(location.to_string(), camera.to_string()))
            }
            _ => Err(Error::BadIdentifier(identifier.to_string())),
        }
    }

    fn includes_location(&self, name: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Location(location) | Selection::Camera(location, _) => location == name,
        }
    }

    fn includes_camera(&self, name: &str) -> bool {
        match self {
            Selection::Camera(_, camera) => camera == name,
            _ => true,
        }
    }
}

pub(crate) struct PauseController<'a, T, P> {
    config: &'a Config,
    store: ConfigStore,
    transport: T,
    probe: P,
}

impl<'a, T: CameraTransport, P: ReachabilityProbe> PauseController<'a, T, P> {
    pub(crate) fn new(config: &'a Config, transport: T, probe: P) -> Self {
        PauseController {
            store: ConfigStore::new(&config.storage),
            config,
            transport,
            probe,
        }
    }

    /// Runs one batch over the selected cameras.
    ///
    /// Errors are logged and recovered per camera or per detection type;
    /// this never fails the process.
    pub(crate) fn run(&self, direction: Direction, selection: &Selection) {
        for location in &self.config.locations {
            if !selection.includes_location(&location.name) {
                continue;
            }
            for (camera, address) in &location.cameras {
                if !selection.includes_camera(camera) {
                    continue;
                }
                info!("Checking {}/{}", location.name, camera);
                if !self.probe.is_reachable(address) {
                    warn!("{}", Error::TransportUnreachable(camera.clone()));
                    continue;
                }
                info!("Camera {} is reachable", camera);
                match direction {
                    Direction::Pause => self.pause_camera(location, address),
                    Direction::Unpause => self.unpause_camera(location, address),
                }
            }
        }
    }

    fn pause_camera(&self, location: &LocationConfig, address: &str) {
        let credentials = Credentials {
            username: &location.username,
            password: &location.password,
        };
        for &detection in DetectionType::ALL.iter() {
            if let Err(e) = self.pause_detection(location, address, &credentials, detection) {
                warn!("{}/{}: {}", address, detection, e);
            }
        }
    }

    fn pause_detection(
        &self,
        location: &LocationConfig,
        address: &str,
        credentials: &Credentials,
        detection: DetectionType,
    ) -> Result<(), Error> {
        let doc = self
            .transport
            .fetch(address, detection, credentials)
            .map_err(|e| match e {
                crate::client::HttpError::Status(status) => {
                    Error::UnsupportedDetection { detection, status }
                }
                other => Error::Http(other),
            })?;

        let current = self
            .store
            .write_variant(&location.name, address, detection, Variant::Current, &doc)
            .map_err(Error::Storage)?;
        info!("Writing {} config to {}", detection, current.display());

        let flag = xmlcfg::read_enabled_flag(&doc)?.ok_or(Error::MalformedDocument(detection))?;
        debug!("{} config namespace: {:?}", detection, flag.namespace);
        if !flag.enabled {
            info!("{} already disabled on {}", detection, address);
            return Ok(());
        }

        let disabled_doc = match xmlcfg::toggle_to_disabled(&doc)? {
            Some(disabled_doc) => disabled_doc,
            None => return Ok(()),
        };

        // The enabled original is kept byte-for-byte for restoration
        self.store
            .write_variant(&location.name, address, detection, Variant::On, &doc)
            .map_err(Error::Storage)?;
        let off = self
            .store
            .write_variant(&location.name, address, detection, Variant::Off, &disabled_doc)
            .map_err(Error::Storage)?;
        info!("New config: {}", off.display());

        self.transport
            .write(address, detection, credentials, &disabled_doc)
            .map_err(|e| match e {
                crate::client::HttpError::Status(status) => {
                    Error::WriteRejected { detection, status }
                }
                other => Error::Http(other),
            })?;
        info!("Disabled {} on {}", detection, address);
        Ok(())
    }

    fn unpause_camera(&self, location: &LocationConfig, address: &str) {
        if !self.store.snapshot_dir(&location.name, address).exists() {
            warn!(
                "Cannot un-pause camera {} which has not been paused first, it has no saved config",
                address
            );
            return;
        }
        let credentials = Credentials {
            username: &location.username,
            password: &location.password,
        };
        for &detection in DetectionType::ALL.iter() {
            if let Err(e) = self.unpause_detection(location, address, &credentials, detection) {
                warn!("{}/{}: {}", address, detection, e);
            }
        }
    }

    fn unpause_detection(
        &self,
        location: &LocationConfig,
        address: &str,
        credentials: &Credentials,
        detection: DetectionType,
    ) -> Result<(), Error> {
        // The saved document is restored as-is; whether it still matches the
        // camera's current schema version is not validated.
        let doc = self
            .store
            .read_variant(&location.name, address, detection, Variant::On)
            .map_err(Error::Storage)?
            .ok_or(Error::MissingRestorePoint(detection))?;

        self.transport
            .write(address, detection, credentials, &doc)
            .map_err(|e| match e {
                crate::client::HttpError::Status(status) => {
                    Error::WriteRejected { detection, status }
                }
                other => Error::Http(other),
            })?;
        info!("Restored {} on {}", detection, address);
        Ok(())
    }
}
