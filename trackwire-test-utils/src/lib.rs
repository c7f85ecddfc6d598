pub mod constant;
pub mod error;
pub mod fixtures;
pub mod setup;

pub use error::TestError;
pub use setup::{TestAppState, TestSetup};

pub mod prelude {
    pub use crate::{
        fixtures::tracking::TrackingContext, test_setup_with_tables,
        test_setup_with_tracking_tables, TestError, TestSetup,
    };
}
