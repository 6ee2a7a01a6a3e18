pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        constant::{
            TEST_EMAIL, TEST_EXCHANGE_PATH, TEST_FIREBASE_API_KEY, TEST_TOKEN,
            TEST_UNREACHABLE_URL, TEST_USERS_PATH,
        },
        fixtures::factory,
        TestBuilder, TestContext, TestError,
    };
}
