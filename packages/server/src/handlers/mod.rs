pub mod assignment;
pub mod auth;
pub mod class;
pub mod score;
pub mod student_assignment;
pub mod teacher;
