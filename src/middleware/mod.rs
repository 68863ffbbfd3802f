pub mod login_check;
pub mod path_matcher;
pub mod response;
pub mod session;

pub use login_check::{login_check, NOT_LOGGED_IN};
pub use path_matcher::{ExemptPaths, PathPattern};
pub use response::{ApiResponse, ApiResult};
pub use session::{parse_cookie, session_cookie, session_middleware};
