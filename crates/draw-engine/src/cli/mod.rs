pub mod allocate;
pub mod draw;
pub mod verify;
