use std::time::Duration;

use murmur_types::{ReplyConfiguration, ReplyType, ThreadReplySelectType};
use thiserror::Error;

use crate::gesture::LongPressConfig;
use crate::resolve::{ChainPosition, DisplayFlags};
use crate::timestamp::{HourCycle, MAX_UTC_OFFSET_MINUTES, TimestampFormat};

pub const ENV_REPLY_TYPE: &str = "MURMUR_REPLY_TYPE";
pub const ENV_THREAD_REPLY_SELECT_TYPE: &str = "MURMUR_THREAD_REPLY_SELECT_TYPE";
pub const ENV_REACTIONS: &str = "MURMUR_REACTIONS";
pub const ENV_DISABLE_QUOTE: &str = "MURMUR_DISABLE_QUOTE";
pub const ENV_LONG_PRESS_DELAY_MS: &str = "MURMUR_LONG_PRESS_DELAY_MS";
pub const ENV_LONG_PRESS_PREVENT_DEFAULT: &str = "MURMUR_LONG_PRESS_PREVENT_DEFAULT";
pub const ENV_CLOCK: &str = "MURMUR_CLOCK";
pub const ENV_UTC_OFFSET_MINUTES: &str = "MURMUR_UTC_OFFSET_MINUTES";
pub const ENV_LOCALE: &str = "MURMUR_LOCALE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid number for {key}: {source}")]
    InvalidNumber {
        key: &'static str,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// View-wide settings the host would otherwise pass to every message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub reply: ReplyConfiguration,
    pub is_reaction_enabled: bool,
    pub disable_quote_message: bool,
    pub long_press: LongPressConfig,
    pub timestamp: TimestampFormat,
}

impl ViewConfig {
    /// Defaults overlaid with `MURMUR_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_REPLY_TYPE) {
            config.reply.reply_type = parse_reply_type(&value)?;
        }
        if let Some(value) = lookup(ENV_THREAD_REPLY_SELECT_TYPE) {
            config.reply.thread_reply_select_type = parse_select_type(&value)?;
        }
        if let Some(value) = lookup(ENV_REACTIONS) {
            config.is_reaction_enabled = parse_bool(ENV_REACTIONS, &value)?;
        }
        if let Some(value) = lookup(ENV_DISABLE_QUOTE) {
            config.disable_quote_message = parse_bool(ENV_DISABLE_QUOTE, &value)?;
        }
        if let Some(value) = lookup(ENV_LONG_PRESS_DELAY_MS) {
            let ms: u64 = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidNumber {
                    key: ENV_LONG_PRESS_DELAY_MS,
                    source,
                })?;
            config.long_press.delay = Duration::from_millis(ms);
        }
        if let Some(value) = lookup(ENV_LONG_PRESS_PREVENT_DEFAULT) {
            config.long_press.should_prevent_default =
                parse_bool(ENV_LONG_PRESS_PREVENT_DEFAULT, &value)?;
        }
        if let Some(value) = lookup(ENV_CLOCK) {
            config.timestamp.clock = match value.trim().to_ascii_lowercase().as_str() {
                "12h" | "12" => HourCycle::H12,
                "24h" | "24" => HourCycle::H24,
                _ => return Err(invalid(ENV_CLOCK, &value)),
            };
        }
        if let Some(value) = lookup(ENV_UTC_OFFSET_MINUTES) {
            let minutes: i32 =
                value
                    .trim()
                    .parse()
                    .map_err(|source| ConfigError::InvalidNumber {
                        key: ENV_UTC_OFFSET_MINUTES,
                        source,
                    })?;
            if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
                return Err(invalid(ENV_UTC_OFFSET_MINUTES, &value));
            }
            config.timestamp.utc_offset_minutes = minutes;
        }
        if let Some(value) = lookup(ENV_LOCALE) {
            config.timestamp.locale = value.trim().to_string();
        }

        Ok(config)
    }

    /// Per-message flags: the view-wide switches plus this message's chain
    /// position.
    pub fn display_flags(&self, chain: ChainPosition, disabled: bool) -> DisplayFlags {
        DisplayFlags {
            is_reaction_enabled: self.is_reaction_enabled,
            disable_quote_message: self.disable_quote_message,
            disabled,
            ..Default::default()
        }
        .with_chain(chain)
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_reply_type(value: &str) -> Result<ReplyType, ConfigError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "NONE" => Ok(ReplyType::None),
        "QUOTE_REPLY" => Ok(ReplyType::QuoteReply),
        "THREAD" => Ok(ReplyType::Thread),
        _ => Err(invalid(ENV_REPLY_TYPE, value)),
    }
}

fn parse_select_type(value: &str) -> Result<ThreadReplySelectType, ConfigError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "THREAD" => Ok(ThreadReplySelectType::Thread),
        "PARENT" => Ok(ThreadReplySelectType::Parent),
        _ => Err(invalid(ENV_THREAD_REPLY_SELECT_TYPE, value)),
    }
}
