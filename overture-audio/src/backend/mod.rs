//! [`AudioChannel`](crate::AudioChannel) implementations.

pub mod kira_channel;
pub mod recording;
