pub mod path_key;
pub mod string_intern;
pub mod error;
pub mod traits;
pub mod dataset;
pub mod hierarchy;
pub mod filter;
pub mod filter_set;
pub mod layout;
pub mod chart;
pub mod events;
pub mod parser;
pub mod writer;
pub mod virtual_reader;
pub mod theme;
pub mod logging;

// Export core types
pub use path_key::PathKey;
pub use string_intern::PathInterner;
pub use error::{AccessorError, HierarchyError};
pub use traits::{Accessors, DatasetReader};
pub use dataset::{DataRecord, Dataset, DatasetFooter, DatasetHeader, DatasetMetadata};

// Export hierarchy pipeline
pub use hierarchy::{synthesize_ancestors, Hierarchy, NodeId, NodeOrigin, TreeBuilder, TreeNode};

// Export filter model
pub use filter::HierarchyFilter;
pub use filter_set::{ClickResolution, FilterSet};

// Export layouts
pub use layout::{
    link_path, squarify, ArcSegment, Cluster, ClusterKind, Extent, Layout, LinkShape,
    Orientation, Partition, Point, Positioned, Separation, Sunburst, Treemap,
};

// Export chart composition
pub use chart::{
    format_value, ChildOrdering, Filterable, Highlight, HierarchyChart, HierarchyChartBuilder,
    Legendable, PreparedChart, ViewChange,
};
pub use events::RedrawCoalescer;

// Export dataset IO
pub use parser::{parse_dataset, JsonlDatasetReader};
pub use writer::DatasetWriter;
pub use virtual_reader::VirtualDatasetReader;

// Export theme support
pub use theme::{
    adjust_brightness, fade_toward, hex_to_color32, OrdinalColorScale, Theme, ThemeColors,
    ThemeManager,
};
