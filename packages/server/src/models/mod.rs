pub mod assignment;
pub mod auth;
pub mod class;
pub mod score;
pub mod shared;
pub mod student_assignment;
