//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use tablebook::config::{Config, ConfigMerger};
///
/// let low = Config { reserve_lead_minutes: Some(60), ..Default::default() };
/// let high = Config { reserve_lead_minutes: Some(90), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.reserve_lead_minutes, Some(90));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources must be ordered by [`ConfigLayer`](crate::config::ConfigLayer).
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target. Every field set in `source`
    /// overwrites the target's value; unset fields leave it alone.
    pub fn merge_into(target: &mut Config, source: &Config) {
        let Config {
            auto_confirm,
            loyalty_points_per_guest,
            cancellation_notice_hours,
            seating_window_minutes,
            reserve_lead_minutes,
            maximum_lock_wait_seconds,
            disable_autoinit,
            output_format,
        } = *source;

        overwrite(&mut target.auto_confirm, auto_confirm);
        overwrite(&mut target.loyalty_points_per_guest, loyalty_points_per_guest);
        overwrite(&mut target.cancellation_notice_hours, cancellation_notice_hours);
        overwrite(&mut target.seating_window_minutes, seating_window_minutes);
        overwrite(&mut target.reserve_lead_minutes, reserve_lead_minutes);
        overwrite(&mut target.maximum_lock_wait_seconds, maximum_lock_wait_seconds);
        overwrite(&mut target.disable_autoinit, disable_autoinit);
        overwrite(&mut target.output_format, output_format);
    }
}

fn overwrite<T>(target: &mut Option<T>, source: Option<T>) {
    if source.is_some() {
        *target = source;
    }
}
