pub mod machine;
pub mod scripted;
pub mod sequence;
pub mod wheel;
pub mod wheel_ui;
