pub mod attendance;
pub mod bus;
pub mod direction;
pub mod leave;
pub mod notification;
pub mod qr;
pub mod scanner;
pub mod student;
