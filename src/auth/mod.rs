//! 认证模块：密码哈希、服务端会话、请求认证中间件

pub mod middleware;
pub mod password;
pub mod session;

pub use middleware::AuthContext;
pub use password::PasswordHasher;
pub use session::{Session, SessionManager};
