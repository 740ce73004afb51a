use std::fmt::{Display, Error as FmtError, Formatter};

/// The detection alarm features a camera can expose.
///
/// This is a closed set; every camera speaks at most these four and each one
/// maps to a fixed ISAPI endpoint below the `/ISAPI/` base path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum DetectionType {
    /// Field/intrusion detection
    Intrusion,
    /// Line-crossing detection
    Line,
    /// Video motion detection
    Motion,
    /// The passive infrared sensor alarm
    Pir,
}

impl DetectionType {
    /// All detection types, in the order they are processed
    pub(crate) const ALL: [DetectionType; 4] = [
        DetectionType::Intrusion,
        DetectionType::Line,
        DetectionType::Motion,
        DetectionType::Pir,
    ];

    /// The short name used in log messages and snapshot file names
    pub(crate) fn name(self) -> &'static str {
        match self {
            DetectionType::Intrusion => "intrusion",
            DetectionType::Line => "line",
            DetectionType::Motion => "motion",
            DetectionType::Pir => "pir",
        }
    }

    /// The endpoint path below `/ISAPI/` that holds this detection's config
    pub(crate) fn path_suffix(self) -> &'static str {
        match self {
            DetectionType::Intrusion => "Smart/FieldDetection/1",
            DetectionType::Line => "Smart/LineDetection/1",
            DetectionType::Motion => "System/Video/inputs/channels/1/motionDetection",
            DetectionType::Pir => "WLAlarm/PIR",
        }
    }
}

impl Display for DetectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_table() {
        assert_eq!(DetectionType::Intrusion.path_suffix(), "Smart/FieldDetection/1");
        assert_eq!(DetectionType::Line.path_suffix(), "Smart/LineDetection/1");
        assert_eq!(
            DetectionType::Motion.path_suffix(),
            "System/Video/inputs/channels/1/motionDetection"
        );
        assert_eq!(DetectionType::Pir.path_suffix(), "WLAlarm/PIR");
    }

    #[test]
    fn test_names_match_all_order() {
        let names: Vec<_> = DetectionType::ALL.iter().map(|d| d.name()).collect();
        assert_eq!(names, ["intrusion", "line", "motion", "pir"]);
    }
}
