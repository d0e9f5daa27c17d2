pub mod http;
pub mod mock;

pub use http::HttpLearningPathAdapter;
pub use mock::MockLearningPathAdapter;
