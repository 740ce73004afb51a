use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use validator::Validate;
use validator_derive::Validate;

#[derive(Debug, Deserialize, Validate, Clone)]
pub(crate) struct Config {
    #[validate]
    pub(crate) locations: Vec<LocationConfig>,

    /// Directory that receives the per-camera configuration snapshots
    #[serde(default = "default_storage")]
    pub(crate) storage: PathBuf,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub(crate) struct LocationConfig {
    #[validate(length(min = 1, message = "Location name cannot be empty", code = "name"))]
    pub(crate) name: String,

    #[serde(rename = "user")]
    pub(crate) username: String,

    #[serde(rename = "pass")]
    pub(crate) password: String,

    /// Camera name to network address, in a stable order
    pub(crate) cameras: BTreeMap<String, String>,
}

fn default_storage() -> PathBuf {
    "cameras".into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_parse_sample() {
        let sample = indoc!(
            r#"
            storage = "/var/lib/hikpause"

            [[locations]]
            name = "home"
            user = "admin"
            pass = "hunter2"

            [locations.cameras]
            front = "10.0.0.5"
            garden = "10.0.0.6"
            "#
        );
        let config: Config = toml::from_str(sample).unwrap();
        config.validate().unwrap();
        assert_eq!(config.storage, PathBuf::from("/var/lib/hikpause"));
        assert_eq!(config.locations.len(), 1);
        let location = &config.locations[0];
        assert_eq!(location.name, "home");
        assert_eq!(location.username, "admin");
        assert_eq!(location.cameras["front"], "10.0.0.5");
        assert_eq!(location.cameras["garden"], "10.0.0.6");
    }

    #[test]
    fn test_storage_defaults() {
        let config: Config = toml::from_str(
            indoc!(
                r#"
                [[locations]]
                name = "home"
                user = "admin"
                pass = "hunter2"

                [locations.cameras]
                front = "10.0.0.5"
                "#
            ),
        )
        .unwrap();
        assert_eq!(config.storage, PathBuf::from("cameras"));
    }

    #[test]
    fn test_empty_location_name_rejected() {
        let config: Config = toml::from_str(
            indoc!(
                r#"
                [[locations]]
                name = ""
                user = "admin"
                pass = "hunter2"

                [locations.cameras]
                front = "10.0.0.5"
                "#
            ),
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
