/// The closed set of operations a proxy request can classify to.
///
/// `Invalid` is reachable two ways: a classification failure never produces a
/// `Descriptor` (it returns an error instead), but [`FetchOps::from_raw`] keeps
/// an unchecked numeric constructor around so a value materialized from an
/// out-of-range wire/storage representation degrades to `Invalid` rather than
/// panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchOps {
    Resolve = 0,
    List = 1,
    DownloadInfo = 2,
    DownloadMod = 3,
    DownloadZip = 4,
    Invalid = 5,
}

impl FetchOps {
    /// Unchecked numeric constructor; any value outside the known range maps
    /// to `Invalid` rather than failing.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Resolve,
            1 => Self::List,
            2 => Self::DownloadInfo,
            3 => Self::DownloadMod,
            4 => Self::DownloadZip,
            _ => Self::Invalid,
        }
    }
}

impl From<u8> for FetchOps {
    fn from(raw: u8) -> Self {
        Self::from_raw(raw)
    }
}

impl std::fmt::Display for FetchOps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Resolve => "resolve",
            Self::List => "list",
            Self::DownloadInfo => "download info",
            Self::DownloadMod => "download mod",
            Self::DownloadZip => "download zip",
            Self::Invalid => "invalid",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_raw_value_stringifies_invalid() {
        assert_eq!(FetchOps::from_raw(255).to_string(), "invalid");
    }

    #[test]
    fn known_values_round_trip_through_raw() {
        for (raw, expected) in [
            (0u8, FetchOps::Resolve),
            (1, FetchOps::List),
            (2, FetchOps::DownloadInfo),
            (3, FetchOps::DownloadMod),
            (4, FetchOps::DownloadZip),
        ] {
            assert_eq!(FetchOps::from_raw(raw), expected);
        }
    }

    #[test]
    fn display_matches_spec_strings() {
        assert_eq!(FetchOps::Resolve.to_string(), "resolve");
        assert_eq!(FetchOps::List.to_string(), "list");
        assert_eq!(FetchOps::DownloadInfo.to_string(), "download info");
        assert_eq!(FetchOps::DownloadMod.to_string(), "download mod");
        assert_eq!(FetchOps::DownloadZip.to_string(), "download zip");
    }
}
