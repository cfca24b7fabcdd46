// Models module

pub mod group;
pub mod id;
pub mod stats;
pub mod task;
pub mod user;

mod de;

pub use group::{Group, GroupRequest};
pub use id::ResourceId;
pub use stats::{Dashboard, GroupStats, TaskStats};
pub use task::{CreateTaskRequest, Priority, Task, UpdateTaskRequest};
pub use user::{AuthTokens, LoginRequest, LoginResponse, RegisterRequest, User};
