//! Chat hub and connection tuning

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Chat configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Frames a connection may have queued before it is dropped
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,

    /// Buffer of each hub input channel
    #[serde(default = "default_hub_channel_capacity")]
    pub hub_channel_capacity: usize,

    /// Largest inbound WebSocket frame or message in bytes
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    /// Seconds without a pong before a connection is dropped
    #[serde(default = "default_pong_wait")]
    pub pong_wait_secs: u64,

    /// Seconds a single socket write may take
    #[serde(default = "default_write_wait")]
    pub write_wait_secs: u64,

    /// Messages replayed to a newly joined connection
    #[serde(default = "default_join_history_limit")]
    pub join_history_limit: u32,

    /// Messages returned by the history endpoint
    #[serde(default = "default_query_history_limit")]
    pub query_history_limit: u32,
}

impl ChatConfig {
    pub fn pong_wait(&self) -> Duration {
        Duration::from_secs(self.pong_wait_secs)
    }

    /// Ping interval, 90% of the pong wait so a ping always lands in time.
    pub fn ping_period(&self) -> Duration {
        self.pong_wait() * 9 / 10
    }

    pub fn write_wait(&self) -> Duration {
        Duration::from_secs(self.write_wait_secs)
    }

    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.outbound_queue_capacity == 0 {
            return Err(ValidationError::InvalidChatSetting("outbound_queue_capacity"));
        }
        if self.hub_channel_capacity == 0 {
            return Err(ValidationError::InvalidChatSetting("hub_channel_capacity"));
        }
        if self.max_frame_bytes == 0 {
            return Err(ValidationError::InvalidChatSetting("max_frame_bytes"));
        }
        if self.pong_wait_secs < 2 {
            return Err(ValidationError::InvalidChatSetting("pong_wait_secs"));
        }
        if self.write_wait_secs == 0 {
            return Err(ValidationError::InvalidChatSetting("write_wait_secs"));
        }
        if self.join_history_limit == 0 || self.join_history_limit > 100 {
            return Err(ValidationError::InvalidChatSetting("join_history_limit"));
        }
        if self.query_history_limit == 0 || self.query_history_limit > 100 {
            return Err(ValidationError::InvalidChatSetting("query_history_limit"));
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            outbound_queue_capacity: default_outbound_queue_capacity(),
            hub_channel_capacity: default_hub_channel_capacity(),
            max_frame_bytes: default_max_frame_bytes(),
            pong_wait_secs: default_pong_wait(),
            write_wait_secs: default_write_wait(),
            join_history_limit: default_join_history_limit(),
            query_history_limit: default_query_history_limit(),
        }
    }
}

fn default_outbound_queue_capacity() -> usize {
    256
}

fn default_hub_channel_capacity() -> usize {
    256
}

fn default_max_frame_bytes() -> usize {
    8192
}

fn default_pong_wait() -> u64 {
    60
}

fn default_write_wait() -> u64 {
    10
}

fn default_join_history_limit() -> u32 {
    50
}

fn default_query_history_limit() -> u32 {
    100
}
