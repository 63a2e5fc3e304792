//! Source locations and processing defaults.

/// GHCN-Daily station inventory
pub const STATIONS_URL: &str = "https://www.ncei.noaa.gov/pub/data/ghcn/daily/ghcnd-stations.txt";

/// Directory holding one `.dly` file per GHCN-Daily station
pub const DAILY_URL_ROOT: &str = "https://www.ncei.noaa.gov/pub/data/ghcn/daily/all";

/// CPC monthly Arctic Oscillation index
pub const AO_URL: &str =
    "https://www.cpc.ncep.noaa.gov/products/precip/CWlink/daily_ao_index/monthly.ao.index.b50.current.ascii";

/// Sentinel used by GHCN-Daily for a missing value
pub const MISSING_DAILY_VALUE: i32 = -9999;

/// Sentinel used by the station inventory for a missing coordinate or elevation
pub const MISSING_STATION_VALUE: f32 = -999.9;

/// Rows shown when a table or series is printed
pub const DEFAULT_MAX_ROWS: usize = 15;

/// Directory names
pub const APP_DIR: &str = "climex";
pub const DEFAULT_OUTPUT_DIR: &str = "climex-plots";

/// Figure sizes in pixels
pub const DEFAULT_PLOT_SIZE: (u32, u32) = (800, 600);
pub const WIDE_PLOT_SIZE: (u32, u32) = (1200, 500);

/// Stations used by the `explore` session
pub const TEXAS_STATION: &str = "USC00412679";
pub const WASHINGTON_STATION: &str = "USS0020B02S";
