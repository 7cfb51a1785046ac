//! Property-based tests for the configuration system.

use super::merger::ConfigMerger;
use super::schema::{Config, OutputFormat};
use super::validator::ConfigValidator;
use proptest::prelude::*;

fn output_format_strategy() -> impl Strategy<Value = OutputFormat> {
    prop_oneof![
        Just(OutputFormat::Table),
        Just(OutputFormat::Json),
        Just(OutputFormat::Csv),
    ]
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(any::<bool>()),
        prop::option::of(0u32..=1000),
        prop::option::of(0u32..=168),
        prop::option::of(1u16..=1440),
        prop::option::of(1u32..=1440),
        prop::option::of(1u64..=3600),
        prop::option::of(any::<bool>()),
        prop::option::of(output_format_strategy()),
    )
        .prop_map(
            |(auto_confirm, points, notice, window, lead, wait, autoinit, format)| Config {
                auto_confirm,
                loyalty_points_per_guest: points,
                cancellation_notice_hours: notice,
                seating_window_minutes: window,
                reserve_lead_minutes: lead,
                maximum_lock_wait_seconds: wait,
                disable_autoinit: autoinit,
                output_format: format,
            },
        )
}

proptest! {
    #[test]
    fn merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        prop_assert_eq!(merged.auto_confirm, high.auto_confirm.or(low.auto_confirm));
        prop_assert_eq!(
            merged.seating_window_minutes,
            high.seating_window_minutes.or(low.seating_window_minutes)
        );
        prop_assert_eq!(
            merged.reserve_lead_minutes,
            high.reserve_lead_minutes.or(low.reserve_lead_minutes)
        );
        prop_assert_eq!(merged.output_format, high.output_format.or(low.output_format));
    }

    #[test]
    fn merge_with_empty_is_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(&merged, &config);

        let mut from_empty = Config::default();
        ConfigMerger::merge_into(&mut from_empty, &config);
        prop_assert_eq!(&from_empty, &config);
    }

    #[test]
    fn in_range_configs_validate(config in config_strategy()) {
        prop_assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn merging_valid_layers_stays_valid(a in config_strategy(), b in config_strategy()) {
        let mut merged = a;
        ConfigMerger::merge_into(&mut merged, &b);
        prop_assert!(ConfigValidator::validate(&merged).is_ok());
    }
}
