pub mod assignment;
pub mod class;
pub mod score;
pub mod student;
pub mod student_assignment;
pub mod teacher;
