//! Combining attribute mappings from several inputs into one.
//!
//! Conflict resolution is pluggable through [`MetadataPolicy`].
//! [`SharedValues`] is the default used by the compositors.

use sat_common::attrs::keys;
use sat_common::{AttrValue, Attributes, DataArray};

/// Strategy for combining the attributes of several arrays.
pub trait MetadataPolicy: Send + Sync + std::fmt::Debug {
    fn combine(&self, inputs: &[&Attributes]) -> Attributes;
}

/// Keep only keys whose value is identical across every input.
///
/// `start_time` takes the earliest and `end_time` the latest value when all
/// inputs carry a datetime under that key.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedValues;

impl MetadataPolicy for SharedValues {
    fn combine(&self, inputs: &[&Attributes]) -> Attributes {
        let Some((first, rest)) = inputs.split_first() else {
            return Attributes::new();
        };

        let mut combined = Attributes::new();
        for (key, value) in first.iter() {
            if key == keys::START_TIME || key == keys::END_TIME {
                if let Some(time) = combine_times(key, inputs) {
                    combined.insert(key.clone(), time);
                    continue;
                }
            }
            if rest.iter().all(|other| other.get(key) == Some(value)) {
                combined.insert(key.clone(), value.clone());
            }
        }
        combined
    }
}

fn combine_times(key: &str, inputs: &[&Attributes]) -> Option<AttrValue> {
    let times: Option<Vec<_>> = inputs
        .iter()
        .map(|attrs| attrs.get(key).and_then(AttrValue::as_datetime))
        .collect();
    let times = times?;

    let picked = if key == keys::START_TIME {
        times.into_iter().min()
    } else {
        times.into_iter().max()
    };
    picked.map(AttrValue::DateTime)
}

/// Union of all inputs where the first input to define a key wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstWins;

impl MetadataPolicy for FirstWins {
    fn combine(&self, inputs: &[&Attributes]) -> Attributes {
        let mut combined = Attributes::new();
        for attrs in inputs {
            for (key, value) in attrs.iter() {
                combined
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
        }
        combined
    }
}

/// Union of all inputs where the last input to define a key wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastWins;

impl MetadataPolicy for LastWins {
    fn combine(&self, inputs: &[&Attributes]) -> Attributes {
        let mut combined = Attributes::new();
        for attrs in inputs {
            combined.extend(attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        combined
    }
}

/// Combine the attributes of `arrays` with `policy`.
pub fn combine_metadata(arrays: &[DataArray], policy: &dyn MetadataPolicy) -> Attributes {
    let inputs: Vec<&Attributes> = arrays.iter().map(DataArray::attrs).collect();
    policy.combine(&inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 6, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn attrs(pairs: &[(&str, AttrValue)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_shared_values_drops_conflicts() {
        let a = attrs(&[
            ("sensor", "ahi".into()),
            ("name", "B02".into()),
            ("units", "%".into()),
        ]);
        let b = attrs(&[("sensor", "ahi".into()), ("name", "B04".into())]);

        let combined = SharedValues.combine(&[&a, &b]);
        assert_eq!(combined.get("sensor"), Some(&AttrValue::from("ahi")));
        assert!(!combined.contains_key("name"));
        assert!(!combined.contains_key("units"));
    }

    #[test]
    fn test_shared_values_time_span() {
        let a = attrs(&[("start_time", at(1).into()), ("end_time", at(2).into())]);
        let b = attrs(&[("start_time", at(0).into()), ("end_time", at(3).into())]);

        let combined = SharedValues.combine(&[&a, &b]);
        assert_eq!(combined["start_time"], AttrValue::DateTime(at(0)));
        assert_eq!(combined["end_time"], AttrValue::DateTime(at(3)));
    }

    #[test]
    fn test_shared_values_partial_times_dropped() {
        let a = attrs(&[("start_time", at(1).into())]);
        let b = attrs(&[("sensor", "ahi".into())]);
        assert!(SharedValues.combine(&[&a, &b]).is_empty());
    }

    #[test]
    fn test_first_and_last_wins() {
        let a = attrs(&[("name", "B02".into()), ("units", "%".into())]);
        let b = attrs(&[("name", "B04".into()), ("sensor", "ahi".into())]);

        let first = FirstWins.combine(&[&a, &b]);
        assert_eq!(first["name"], AttrValue::from("B02"));
        assert_eq!(first.len(), 3);

        let last = LastWins.combine(&[&a, &b]);
        assert_eq!(last["name"], AttrValue::from("B04"));
        assert_eq!(last.len(), 3);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(SharedValues.combine(&[]).is_empty());
    }
}
