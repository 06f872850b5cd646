//! Global constants for the annotation session

/// Default rows of the thumbnail grid
pub const DEFAULT_GRID_ROWS: usize = 3;

/// Default columns of the thumbnail grid
pub const DEFAULT_GRID_COLUMNS: usize = 3;

/// Subdirectory of a sequence holding its frame images
pub const IMAGE_SUBDIR: &str = "img";

/// Stem of the ground-truth file inside a sequence directory
pub const GROUND_TRUTH_STEM: &str = "groundtruth_rect";

/// Extension of the ground-truth file
pub const GROUND_TRUTH_EXTENSION: &str = "txt";

/// Extension of persisted label files
pub const LABEL_EXTENSION: &str = "npz";

/// Name of the label array inside a label file
pub const LABEL_ARRAY: &str = "label";

/// Supported frame image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// Dataset directory below a data root, in the benchmark on-disk layout
pub const DATASET_DIR_NAME: &str = "benchmarkDatasets";

/// Attribute directory below a data root, in the benchmark on-disk layout
pub const ATTR_DIR_NAME: &str = "otb-1occ-2def-3blur-4OccBlur";
