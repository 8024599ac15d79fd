/// Application-wide constants to avoid magic values throughout the codebase.
///
/// Output format constants
pub mod output_formats {
    /// Human readable report on stdout
    pub const TEXT: &str = "text";
    /// Structured output for automation
    pub const JSON: &str = "json";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 2] = [TEXT, JSON];
}

/// Baltic transparency dashboard export API
pub mod export_api {
    /// Export endpoint
    pub const BASE_URL: &str = "https://api-baltic.transparency-dashboard.eu/api/v1/export";
    /// Output time zone requested from the API
    pub const DEFAULT_TIMEZONE: &str = "EET";
    /// `output_format` query value
    pub const OUTPUT_FORMAT: &str = "json";
    /// `json_header_groups` query value
    pub const JSON_HEADER_GROUPS: &str = "1";
    /// `download` query value
    pub const DOWNLOAD: &str = "0";
}

/// Dataset identifiers understood by the export API
pub mod datasets {
    /// aFRR activation volumes
    pub const AFRR_ACTIVATIONS: &str = "activations_afrr";
    /// Imbalance volumes
    pub const IMBALANCE_VOLUMES: &str = "imbalance_volumes_v2";
    /// Current balancing state
    pub const BALANCING_STATE: &str = "current_balancing_state_v2";
}

/// Timeout and retry constants
pub mod timeouts {
    /// Default HTTP timeout in seconds
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;
    /// Maximum accepted timeout in seconds
    pub const MAX_TIMEOUT_SECONDS: u64 = 3600;
    /// Default delay between retries in milliseconds
    pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
    /// Upper bound on retry attempts
    pub const MAX_RETRY_ATTEMPTS: u8 = 10;
}

/// Balancing analysis defaults
pub mod balancing {
    /// Resample period in minutes
    pub const DEFAULT_RESAMPLE_MINUTES: u32 = 15;
    /// Minutes in a day; resample periods must divide it
    pub const MINUTES_PER_DAY: u32 = 1440;
    /// Rows of the balancing state shown in the preview
    pub const DEFAULT_PREVIEW_ROWS: usize = 5;
    /// Default directory for chart output
    pub const DEFAULT_OUTPUT_DIR: &str = ".";
    /// Chart file name prefix, followed by the date
    pub const CHART_FILE_PREFIX: &str = "afrr_vs_imbalance_";
}

/// CGMES model inspection defaults
pub mod cgmes {
    /// rdf:ID of the transformer whose windings are reported
    pub const DEFAULT_TRANSFORMER_ID: &str = "_2184f365-8cd5-4b5d-8a28-9d68603bb6a4";
    /// Display label of that transformer
    pub const DEFAULT_TRANSFORMER_LABEL: &str = "NL_TR2_2";
    /// Line whose operational limits are reported
    pub const DEFAULT_LINE_NAME: &str = "NL-Line_5";
    /// Winding definitions expected for a two-winding transformer
    pub const EXPECTED_WINDINGS: usize = 2;
    /// OperationalLimitType IDs known to be malformed in the reference model
    pub const SUSPECT_LIMIT_TYPE_IDS: [&str; 1] = ["_bf2a4896-2e92-465b-b5f9-b033993a318"];
}

/// Standard config file lookup
pub mod config_files {
    /// File name searched for in the working directory and its parents
    pub const FILE_NAME: &str = ".gridprobe.toml";
    /// How many parent directories are searched
    pub const PARENT_SEARCH_DEPTH: usize = 3;
}
