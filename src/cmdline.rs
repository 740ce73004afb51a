use std::path::PathBuf;
use structopt::{clap::AppSettings, StructOpt};

use crate::errors::Error;
use crate::pause::{Direction, Selection};

/// Pauses and restores detection alarms on Hikvision IP cameras
///
/// Hikpause is free software released under the GNU AGPL v3.
/// You can find its source code at https://github.com/thirtythreeforty/hikpause
#[derive(StructOpt, Debug)]
#[structopt(name = "hikpause", setting(AppSettings::UnifiedHelpMessage))]
pub struct Opt {
    /// Path to the TOML config file describing locations and cameras
    #[structopt(
        short,
        long,
        default_value = "hikpause.toml",
        parse(from_os_str)
    )]
    pub config: PathBuf,
    /// `location` or `location/camera` to select a subset, or the literal
    /// `on` to un-pause everything
    pub identifier: Option<String>,
    /// The literal `on` to un-pause the selected cameras instead of pausing
    pub direction: Option<String>,
}

impl Opt {
    /// Normalizes the positional arguments into a direction and selection
    pub fn directive(&self) -> Result<(Direction, Selection), Error> {
        directive(self.identifier.as_deref(), self.direction.as_deref())
    }
}

fn directive(first: Option<&str>, second: Option<&str>) -> Result<(Direction, Selection), Error> {
    match (first, second) {
        (None, _) => Ok((Direction::Pause, Selection::All)),
        (Some("on"), None) => Ok((Direction::Unpause, Selection::All)),
        (Some("on"), Some(other)) => Err(Error::BadDirective(other.to_string())),
        (Some(identifier), None) => Ok((Direction::Pause, Selection::parse(identifier)?)),
        (Some(identifier), Some("on")) => Ok((Direction::Unpause, Selection::parse(identifier)?)),
        (Some(_), Some(other)) => Err(Error::BadDirective(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_no_args_pauses_everything() {
        assert_eq!(
            directive(None, None).unwrap(),
            (Direction::Pause, Selection::All)
        );
    }

    #[test]
    fn test_bare_on_unpauses_everything() {
        assert_eq!(
            directive(Some("on"), None).unwrap(),
            (Direction::Unpause, Selection::All)
        );
    }

    #[test]
    fn test_identifier_pauses_subset() {
        assert_eq!(
            directive(Some("siteA/cam1"), None).unwrap(),
            (
                Direction::Pause,
                Selection::Camera("siteA".to_string(), "cam1".to_string())
            )
        );
    }

    #[test]
    fn test_identifier_then_on_unpauses_subset() {
        assert_eq!(
            directive(Some("siteA"), Some("on")).unwrap(),
            (Direction::Unpause, Selection::Location("siteA".to_string()))
        );
    }

    #[test]
    fn test_unknown_direction_is_rejected() {
        assert_matches!(
            directive(Some("siteA"), Some("off")),
            Err(Error::BadDirective(_))
        );
        assert_matches!(
            directive(Some("on"), Some("siteA")),
            Err(Error::BadDirective(_))
        );
    }
}
