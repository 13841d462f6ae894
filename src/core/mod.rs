pub mod config;
pub mod error;
pub mod preview;
pub mod session;
pub mod texture;

pub use error::SdfError;
pub use preview::{split_channels, thumbnail, PreviewChannels};
pub use session::{default_output_path, SaveOutcome, SdfSession};
pub use texture::{generate, GradientImage, SdfResult};
