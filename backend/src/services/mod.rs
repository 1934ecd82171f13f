//! Business logic services for the CocoaApp backend

pub mod crop;
pub mod lot;
pub mod notification;
pub mod stats;
pub mod tree;
pub mod zone_analysis;

pub use crop::CropService;
pub use lot::LotService;
pub use notification::NotificationStore;
pub use stats::StatsService;
pub use tree::TreeService;
pub use zone_analysis::ZoneAnalysisService;
