//! Engine-wide constants for marks, hit-testing and clustering.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Lower bound of percent space on both axes.
pub const PERCENT_MIN: f64 = 0.0;

/// Upper bound of percent space on both axes.
pub const PERCENT_MAX: f64 = 100.0;

/// Visual diameter of a rendered mark dot, in pixels.
pub const MARK_SIZE_PX: f64 = 18.0;

/// Extra pixels around the dot that still count as a hit.
pub const HIT_TOLERANCE_PX: f64 = 4.0;

/// Pixel radius around a mark center that counts as clicking the mark.
pub const HIT_RADIUS_PX: f64 = MARK_SIZE_PX / 2.0 + HIT_TOLERANCE_PX;

/// Larger hit radius used by the touch profile.
pub const TOUCH_HIT_RADIUS_PX: f64 = 22.0;

/// Percent-space distance under which pooled marks collapse into one dot.
pub const CLUSTER_THRESHOLD_PERCENT: f64 = 2.5;

/// Quiescence window before a search-as-you-type query is sent.
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Maximum number of records returned by a list query.
pub const MAX_LIST_RESULTS: usize = 200;

/// Default base URL of the marked-maps REST API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";

/// Request timeout for API calls.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;

/// Image shown in place of a map whose image is unavailable.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns=\"http://www.w3.org/2000/svg\" width=\"400\" height=\"280\" viewBox=\"0 0 400 280\"%3E%3Crect fill=\"%23f0f4f8\" width=\"400\" height=\"280\"/%3E%3Ctext fill=\"%237890a0\" font-family=\"sans-serif\" font-size=\"14\" x=\"200\" y=\"140\" text-anchor=\"middle\"%3EMap image unavailable%3C/text%3E%3C/svg%3E";
