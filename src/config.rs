use std::path::PathBuf;

use clap::Parser;

/// Launch table read when no path is given on the command line.
pub const DEFAULT_DATA_FILE: &str = "spacex_launch_dash.csv";

const WINDOW_SIZE: [f32; 2] = [1100.0, 900.0];
const MIN_WINDOW_SIZE: [f32; 2] = [600.0, 400.0];

#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "launch-dash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive dashboard over a table of rocket launches")]
pub struct DashboardConfig {
    /// Launch table to load (.csv, .json or .parquet)
    #[arg(value_name = "DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_path: PathBuf,

    #[arg(skip = WINDOW_SIZE)]
    pub window_size: [f32; 2],

    #[arg(skip = MIN_WINDOW_SIZE)]
    pub min_window_size: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_bundled_file_name() {
        let config = DashboardConfig::try_parse_from(["launch-dash"]).unwrap();
        assert_eq!(config.data_path, PathBuf::from("spacex_launch_dash.csv"));
        assert_eq!(config.window_size, WINDOW_SIZE);
    }

    #[test]
    fn positional_argument_overrides_the_data_path() {
        let config =
            DashboardConfig::try_parse_from(["launch-dash", "launches.parquet"]).unwrap();
        assert_eq!(config.data_path, PathBuf::from("launches.parquet"));
    }

    #[test]
    fn unknown_flags_and_extra_arguments_are_rejected() {
        assert!(DashboardConfig::try_parse_from(["launch-dash", "--bogus"]).is_err());
        assert!(DashboardConfig::try_parse_from(["launch-dash", "a.csv", "b.csv"]).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_data_path_is_accepted() {
        use std::ffi::{OsStr, OsString};
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"\xff.csv");
        let config =
            DashboardConfig::try_parse_from([OsString::from("launch-dash"), raw.to_os_string()])
                .unwrap();
        assert_eq!(config.data_path.as_os_str(), raw);
    }
}
