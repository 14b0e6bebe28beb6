//! 归一化与详细度门控的性质测试

use logz::core::field::{normalize, Misuse};
use logz::core::sink::LogSink;
use logz::{Arg, CoreEngine, Field, InfoLogger, Level, LogConfig, Logger, MemorySink, OutputFormat};
use proptest::prelude::*;
use std::sync::Arc;

fn pairs_strategy() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec(("[a-z]{1,8}", any::<i64>()), 0..12)
}

fn flatten(pairs: &[(String, i64)]) -> Vec<Arg> {
    pairs
        .iter()
        .flat_map(|(k, v)| [Arg::from(k.as_str()), Arg::from(*v)])
        .collect()
}

proptest! {
    #[test]
    fn prop_well_formed_pairs(pairs in pairs_strategy(), extra in 0usize..4) {
        let additional: Vec<Field> = (0..extra).map(|i| Field::uint(format!("extra{}", i), i as u64)).collect();
        let result = normalize(&flatten(&pairs), &additional);

        prop_assert!(result.misuse.is_none());
        prop_assert_eq!(result.fields.len(), additional.len() + pairs.len());
        prop_assert_eq!(&result.fields[..additional.len()], &additional[..]);
        for (field, (key, value)) in result.fields[additional.len()..].iter().zip(&pairs) {
            prop_assert_eq!(&field.key, key);
            prop_assert_eq!(&field.value, &serde_json::Value::from(*value));
        }
    }

    #[test]
    fn prop_odd_length_drops_trailing_key(pairs in pairs_strategy(), tail in "[a-z]{1,8}") {
        let mut args = flatten(&pairs);
        args.push(Arg::from(tail.as_str()));
        let result = normalize(&args, &[]);

        prop_assert_eq!(result.fields.len(), pairs.len());
        prop_assert_eq!(result.misuse, Some(Misuse::UnpairedKey(serde_json::Value::from(tail))));
    }

    #[test]
    fn prop_non_string_key_stops_scan(prefix in pairs_strategy(), suffix in pairs_strategy(), bad in any::<i64>()) {
        let mut args = flatten(&prefix);
        args.push(Arg::from(bad));
        args.push(Arg::from("value"));
        args.extend(flatten(&suffix));
        let result = normalize(&args, &[]);

        prop_assert_eq!(result.fields.len(), prefix.len());
        prop_assert_eq!(result.misuse, Some(Misuse::NonStringKey(serde_json::Value::from(bad))));
    }

    #[test]
    fn prop_verbosity_gate_is_monotonic(threshold in 0u32..20, a in 0u32..40, b in 0u32..40) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let out = MemorySink::new();
        let outputs: Vec<Arc<dyn LogSink>> = vec![Arc::new(out.clone())];
        let config = LogConfig {
            level: Level::from_verbosity(threshold).unwrap().value().to_string(),
            format: OutputFormat::Json,
            ..Default::default()
        };
        let logger = Logger::from_engine(Arc::new(CoreEngine::with_sinks(&config, outputs, vec![])));

        if logger.v(high).enabled() {
            prop_assert!(logger.v(low).enabled());
        }
        prop_assert_eq!(logger.v(low).enabled(), low <= threshold);

        logger.v(high).info("gated", &[]);
        prop_assert_eq!(out.lines().len(), usize::from(high <= threshold));
    }
}
