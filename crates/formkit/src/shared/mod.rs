pub mod channel;
pub mod icons;
pub mod modal_frame;
