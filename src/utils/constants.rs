/// Input column headers
pub const DATE_COLUMN: &str = "Date";
pub const CATEGORY_COLUMN: &str = "Filière";
pub const VALUE_COLUMN: &str = "Valeur (TWh)";

/// Category label carrying the national total rather than a single source
pub const TOTAL_PRODUCTION_LABEL: &str = "Production totale";

/// Inclusive year bounds of the retained period
pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2023;

/// Output column headers
pub const TOTAL_PRODUCTION_HEADER: &str = "Total Production (TWh)";
pub const TOTAL_EMISSIONS_HEADER: &str = "Total_CO2_Emissions (Mt CO₂)";
pub const YEAR_HEADER: &str = "Year";
pub const MONTH_HEADER: &str = "Month";
pub const EMISSIONS_SUFFIX: &str = "_emissions (Mt CO₂)";

/// Emission unit conversion. TWh are scaled up and kg scaled back down by the
/// same amount, so the emission in the output equals quantity × factor.
pub const TWH_SCALE: f64 = 1e6;
pub const EMISSIONS_SCALE_DIVISOR: f64 = 1e6;

/// File defaults
pub const DEFAULT_INPUT_FILE: &str = "production_and_emissions.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "cleaned_data_for_power_bi.csv";
pub const DEFAULT_CHARTS_DIR: &str = "charts";
pub const DEFAULT_INPUT_DELIMITER: char = ',';
pub const DEFAULT_OUTPUT_DELIMITER: char = ';';

/// Chart defaults (14 x 7 inches at 100 dpi)
pub const DEFAULT_CHART_WIDTH: u32 = 1400;
pub const DEFAULT_CHART_HEIGHT: u32 = 700;
pub const DEFAULT_AREA_ALPHA: f64 = 0.6;
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
pub const DEFAULT_CAPTION_SIZE: u32 = 24;

/// Number of rows printed after processing
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
