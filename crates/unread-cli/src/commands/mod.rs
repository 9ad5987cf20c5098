pub mod decode;
pub mod first_unread;
pub mod mark;
pub mod new_topic;
pub mod read;
pub mod topics;
